use anyhow::{Context, Result};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::time::Instant;
use tracing::info;

use super::detector::{decode_movenet, InferenceTimings, ModelType, PoseDetector, StageTimes};
use super::keypoint::Pose;
use super::preprocess::preprocess_for_movenet;
use crate::render::{draw_poses, OverlayFlags};
use crate::video::Frame;

const INPUT_NAME: &str = "serving_default_input_0";
const OUTPUT_NAME: &str = "StatefulPartitionedCall_0";

/// MoveNet (ONNX) を使用した姿勢検出器
pub struct OnnxPoseDetector {
    session: Session,
    model: ModelType,
    threshold: f32,
    timings: InferenceTimings,
}

impl OnnxPoseDetector {
    /// ONNXモデルを読み込んで初期化
    pub fn new<P: AsRef<Path>>(model_path: P, model: ModelType, threshold: f32) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path.as_ref())
            .context("Failed to load ONNX model")?;

        info!(
            model = ?model,
            path = %model_path.as_ref().display(),
            threshold,
            "pose model loaded"
        );

        Ok(Self {
            session,
            model,
            threshold,
            timings: InferenceTimings::default(),
        })
    }
}

impl PoseDetector for OnnxPoseDetector {
    fn detect(&mut self, frame: &mut Frame, overlay: OverlayFlags) -> Result<Vec<Pose>> {
        let model = self.model;
        let started = Instant::now();

        let input = preprocess_for_movenet(frame.image(), model.input_size());
        let preprocessed = Instant::now();

        let input_tensor = Tensor::from_array(input)?;
        let raw: Vec<f32> = {
            let outputs = self
                .session
                .run(ort::inputs![INPUT_NAME => input_tensor])
                .context("Inference failed")?;
            let output: ndarray::ArrayViewD<f32> = outputs[OUTPUT_NAME]
                .try_extract_array()
                .context("Failed to extract output tensor")?;
            output.iter().copied().collect()
        };
        let inferred = Instant::now();

        let poses = decode_movenet(model, &raw, frame.width(), frame.height(), self.threshold);
        draw_poses(frame.image_mut(), &poses, overlay);

        self.timings.record(StageTimes {
            preprocess: preprocessed - started,
            inference: inferred - preprocessed,
            postprocess: inferred.elapsed(),
        });

        Ok(poses)
    }

    fn print_profiling_info(&self) {
        let (Some(last), Some(mean)) = (self.timings.last(), self.timings.mean()) else {
            return;
        };
        info!(
            calls = self.timings.calls(),
            "profile: pre {:.2}ms / infer {:.2}ms / post {:.2}ms (mean total {:.2}ms)",
            last.preprocess.as_secs_f64() * 1000.0,
            last.inference.as_secs_f64() * 1000.0,
            last.postprocess.as_secs_f64() * 1000.0,
            mean.total().as_secs_f64() * 1000.0,
        );
    }
}
