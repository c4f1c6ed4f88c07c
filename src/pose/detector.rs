use anyhow::Result;
use std::str::FromStr;
use std::time::Duration;

use super::keypoint::{Keypoint, KeypointIndex, Pose};
use crate::render::OverlayFlags;
use crate::video::Frame;

/// 姿勢検出器
pub trait PoseDetector {
    /// フレームから全員分の姿勢を検出し、指定されたオーバーレイをフレームに描画する
    fn detect(&mut self, frame: &mut Frame, overlay: OverlayFlags) -> Result<Vec<Pose>>;

    /// 処理時間の診断出力。検出結果には影響しない
    fn print_profiling_info(&self) {}
}

impl<D: PoseDetector + ?Sized> PoseDetector for Box<D> {
    fn detect(&mut self, frame: &mut Frame, overlay: OverlayFlags) -> Result<Vec<Pose>> {
        (**self).detect(frame, overlay)
    }

    fn print_profiling_info(&self) {
        (**self).print_profiling_info()
    }
}

/// MoveNet のモデル種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelType {
    /// 1人用 (出力 [1, 1, 17, 3])
    MoveNetLightning,
    /// 最大6人 (出力 [1, 6, 56])
    MoveNetMultiPose,
}

impl ModelType {
    /// 入力画像の一辺
    pub fn input_size(self) -> u32 {
        match self {
            Self::MoveNetLightning => 192,
            Self::MoveNetMultiPose => 256,
        }
    }

    pub fn max_people(self) -> usize {
        match self {
            Self::MoveNetLightning => 1,
            Self::MoveNetMultiPose => 6,
        }
    }

    /// 1人あたりの出力要素数
    fn person_stride(self) -> usize {
        match self {
            Self::MoveNetLightning => KeypointIndex::COUNT * 3,
            // 17 x (y, x, score) + bbox(4) + score
            Self::MoveNetMultiPose => KeypointIndex::COUNT * 3 + 5,
        }
    }
}

impl FromStr for ModelType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movenet-lightning" | "movenet_lightning" => Ok(Self::MoveNetLightning),
            "movenet-multipose" | "movenet_multipose" => Ok(Self::MoveNetMultiPose),
            other => anyhow::bail!("Unknown pose network: {}", other),
        }
    }
}

/// MoveNet の生出力を姿勢に変換
///
/// 座標はフレームのピクセル座標に戻す。信頼度が `threshold` 未満の
/// キーポイントと、スコアが `threshold` 未満の人物は捨てる。
pub fn decode_movenet(
    model: ModelType,
    output: &[f32],
    width: u32,
    height: u32,
    threshold: f32,
) -> Vec<Pose> {
    let stride = model.person_stride();

    output
        .chunks_exact(stride)
        .take(model.max_people())
        .filter_map(|person| {
            let score = match model {
                ModelType::MoveNetLightning => {
                    let sum: f32 = (0..KeypointIndex::COUNT).map(|i| person[i * 3 + 2]).sum();
                    sum / KeypointIndex::COUNT as f32
                }
                ModelType::MoveNetMultiPose => person[stride - 1],
            };
            if score < threshold {
                return None;
            }

            let keypoints = KeypointIndex::ALL
                .iter()
                .enumerate()
                .filter_map(|(i, index)| {
                    let y = person[i * 3];
                    let x = person[i * 3 + 1];
                    let confidence = person[i * 3 + 2];
                    (confidence >= threshold).then(|| {
                        Keypoint::new(index.label(), x * width as f32, y * height as f32)
                    })
                })
                .collect();

            Some(Pose::new(keypoints))
        })
        .collect()
}

/// 1回の検出にかかった時間
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageTimes {
    pub preprocess: Duration,
    pub inference: Duration,
    pub postprocess: Duration,
}

impl StageTimes {
    pub fn total(&self) -> Duration {
        self.preprocess + self.inference + self.postprocess
    }
}

/// 検出時間の集計
#[derive(Debug, Clone, Default)]
pub struct InferenceTimings {
    calls: u32,
    last: StageTimes,
    sum: StageTimes,
}

impl InferenceTimings {
    pub fn record(&mut self, times: StageTimes) {
        self.calls += 1;
        self.last = times;
        self.sum.preprocess += times.preprocess;
        self.sum.inference += times.inference;
        self.sum.postprocess += times.postprocess;
    }

    pub fn calls(&self) -> u32 {
        self.calls
    }

    pub fn last(&self) -> Option<StageTimes> {
        (self.calls > 0).then_some(self.last)
    }

    pub fn mean(&self) -> Option<StageTimes> {
        if self.calls == 0 {
            return None;
        }
        Some(StageTimes {
            preprocess: self.sum.preprocess / self.calls,
            inference: self.sum.inference / self.calls,
            postprocess: self.sum.postprocess / self.calls,
        })
    }
}
