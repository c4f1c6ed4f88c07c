use anyhow::Result;
use std::cell::Cell;
use std::collections::VecDeque;

use super::detector::PoseDetector;
use super::keypoint::Pose;
use crate::render::{draw_poses, OverlayFlags};
use crate::video::Frame;

/// 呼び出し順に用意済みの姿勢リストを返す検出器
///
/// パイプラインは1反復ごとに入力フレーム、基準フレームの順で検出を呼ぶので、
/// スクリプトもその順に並べる。尽きたら空リストを返す。
#[derive(Debug, Default)]
pub struct ScriptedDetector {
    script: VecDeque<Vec<Pose>>,
    canvas_sizes: Vec<(u32, u32)>,
    profiling_calls: Cell<usize>,
}

impl ScriptedDetector {
    pub fn new(script: impl IntoIterator<Item = Vec<Pose>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            canvas_sizes: Vec::new(),
            profiling_calls: Cell::new(0),
        }
    }

    /// 検出時に見たフレームサイズ (呼び出し順)
    pub fn canvas_sizes(&self) -> &[(u32, u32)] {
        &self.canvas_sizes
    }

    pub fn calls(&self) -> usize {
        self.canvas_sizes.len()
    }

    pub fn profiling_calls(&self) -> usize {
        self.profiling_calls.get()
    }
}

impl PoseDetector for ScriptedDetector {
    fn detect(&mut self, frame: &mut Frame, overlay: OverlayFlags) -> Result<Vec<Pose>> {
        self.canvas_sizes.push(frame.dimensions());
        let poses = self.script.pop_front().unwrap_or_default();
        draw_poses(frame.image_mut(), &poses, overlay);
        Ok(poses)
    }

    fn print_profiling_info(&self) {
        self.profiling_calls.set(self.profiling_calls.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint;

    #[test]
    fn test_script_order_then_empty() {
        let a = Pose::new(vec![Keypoint::new("nose", 1.0, 1.0)]);
        let mut detector = ScriptedDetector::new(vec![vec![a.clone()], vec![]]);
        let mut frame = Frame::blank(8, 8, 0);

        assert_eq!(detector.detect(&mut frame, OverlayFlags::NONE).unwrap(), vec![a]);
        assert!(detector.detect(&mut frame, OverlayFlags::NONE).unwrap().is_empty());
        assert!(detector.detect(&mut frame, OverlayFlags::NONE).unwrap().is_empty());
        assert_eq!(detector.calls(), 3);
        assert_eq!(detector.canvas_sizes()[0], (8, 8));
    }
}
