pub mod canvas;
pub mod overlay;

pub use canvas::Canvas;
pub use overlay::{draw_poses, OverlayFlags, SKELETON_CONNECTIONS};
