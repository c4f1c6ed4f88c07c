pub mod detector;
pub mod keypoint;
#[cfg(feature = "desktop")]
pub mod onnx;
#[cfg(feature = "desktop")]
pub mod preprocess;
pub mod scripted;

pub use detector::{decode_movenet, InferenceTimings, ModelType, PoseDetector, StageTimes};
pub use keypoint::{Keypoint, KeypointIndex, Pose};
#[cfg(feature = "desktop")]
pub use onnx::OnnxPoseDetector;
#[cfg(feature = "desktop")]
pub use preprocess::preprocess_for_movenet;
pub use scripted::ScriptedDetector;
