pub mod pairing;
pub mod summary;
pub mod vector;

pub use pairing::{pair_poses, PosePair, PosePairing};
pub use summary::{FrameSimilarityResult, Report, RunSummary};
pub use vector::{compare_poses, cosine_similarity, vectorize};
