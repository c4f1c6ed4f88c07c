pub mod aligner;
pub mod driver;
pub mod setup;

pub use aligner::{Aligned, FramePair, FramePairAligner, StreamSide};
pub use driver::{Collaborator, FrameOutcome, Pipeline, PipelineState, StopReason};
pub use setup::{open_collaborators, Collaborators};
