use tracing::{debug, info, warn};

use super::aligner::{Aligned, FramePairAligner, StreamSide};
use crate::compare::{compare_poses, pair_poses, FrameSimilarityResult, Report, RunSummary};
use crate::error::CompareError;
use crate::pose::{Pose, PoseDetector};
use crate::render::OverlayFlags;
use crate::video::{Frame, FrameSink, FrameSource};

/// 生存確認の対象
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    InputSource,
    ReferenceSource,
    Sink,
}

/// 停止理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream(StreamSide),
    NotStreaming(Collaborator),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Running,
    Stopped(StopReason),
}

/// 1反復分の処理結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    pub frame_index: u64,
    pub input_poses: usize,
    pub reference_poses: usize,
    pub results: Vec<FrameSimilarityResult>,
    /// スコアを出せなかったペア (ペア番号, 理由)
    pub skipped: Vec<(usize, CompareError)>,
    pub unmatched_input: usize,
    pub unmatched_reference: usize,
    /// 入力フレームをリサイズした場合、元のサイズ
    pub resized_from: Option<(u32, u32)>,
}

/// 2本の動画の姿勢を比較するメインループ
///
/// 毎反復: フレーム取得 -> 入力/基準の順に姿勢検出 -> 位置順で対応付け ->
/// ペアごとにスコア -> 入力フレームをシンクへ -> 生存確認。
pub struct Pipeline<I, R, S, D> {
    aligner: FramePairAligner<I, R>,
    sink: S,
    detector: D,
    overlay: OverlayFlags,
    state: PipelineState,
    frames: u64,
}

impl<I, R, S, D> Pipeline<I, R, S, D>
where
    I: FrameSource,
    R: FrameSource,
    S: FrameSink,
    D: PoseDetector,
{
    pub fn new(input: I, reference: R, sink: S, detector: D, overlay: OverlayFlags) -> Self {
        Self {
            aligner: FramePairAligner::new(input, reference),
            sink,
            detector,
            overlay,
            state: PipelineState::Running,
            frames: 0,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// 1反復を実行し、集計を `summary` に加える
    ///
    /// 停止済み、またはこの反復で終端を検出した場合は `None`。
    pub fn step(&mut self, summary: &mut RunSummary) -> Option<FrameOutcome> {
        self.step_with(summary, |_| {})
    }

    /// `step` と同じ。スコアが出るたびに、描画とプロファイル出力より先に `on_score` を呼ぶ
    pub fn step_with<F>(&mut self, summary: &mut RunSummary, mut on_score: F) -> Option<FrameOutcome>
    where
        F: FnMut(&FrameSimilarityResult),
    {
        if self.state != PipelineState::Running {
            return None;
        }

        let pair = match self.aligner.next_pair() {
            Aligned::Pair(pair) => pair,
            Aligned::EndOfStream(side) => {
                self.stop(StopReason::EndOfStream(side));
                return None;
            }
        };

        let mut input = pair.input;
        let mut reference = pair.reference;

        let input_poses = self.detect(&mut input, StreamSide::Input);
        let reference_poses = self.detect(&mut reference, StreamSide::Reference);

        let mut outcome = FrameOutcome {
            frame_index: self.frames,
            input_poses: input_poses.len(),
            reference_poses: reference_poses.len(),
            resized_from: pair.resized_from,
            ..FrameOutcome::default()
        };

        let pairing = pair_poses(&input_poses, &reference_poses);
        outcome.unmatched_input = pairing.unmatched_input;
        outcome.unmatched_reference = pairing.unmatched_reference;

        for pose_pair in &pairing.pairs {
            match compare_poses(pose_pair.reference, pose_pair.input) {
                Ok(score) => {
                    let result = FrameSimilarityResult {
                        pair_index: pose_pair.index,
                        score,
                    };
                    summary.record(&result);
                    on_score(&result);
                    outcome.results.push(result);
                }
                Err(e) => {
                    summary.record_skipped();
                    outcome.skipped.push((pose_pair.index, e));
                }
            }
        }

        summary.record_frame();
        self.frames += 1;

        if let Err(e) = self.sink.render(&input) {
            warn!(frame = outcome.frame_index, error = %e, "failed to render frame");
        }

        self.detector.print_profiling_info();

        if let Some(collaborator) = self.first_not_streaming() {
            self.stop(StopReason::NotStreaming(collaborator));
        }

        Some(outcome)
    }

    /// 終了までループし、各ペアのスコアを標準出力に書く
    pub fn run(&mut self) -> Report {
        let mut summary = RunSummary::new();
        while self
            .step_with(&mut summary, |result| {
                println!("Pose similarity score (Cosine): {:.2}", result.score);
            })
            .is_some()
        {}
        self.finish(summary)
    }

    /// 終了までループし、反復ごとに `on_frame` を呼ぶ
    pub fn run_with<F: FnMut(&FrameOutcome)>(&mut self, mut on_frame: F) -> Report {
        let mut summary = RunSummary::new();
        while let Some(outcome) = self.step(&mut summary) {
            on_frame(&outcome);
        }
        self.finish(summary)
    }

    fn finish(&self, summary: RunSummary) -> Report {
        info!(
            frames = summary.frames(),
            pairs = summary.pair_count(),
            skipped = summary.skipped_pairs(),
            state = ?self.state,
            "comparison finished"
        );
        summary.finalize()
    }

    /// 検出エラーはリトライせず、姿勢なしとして扱う
    fn detect(&mut self, frame: &mut Frame, side: StreamSide) -> Vec<Pose> {
        match self.detector.detect(frame, self.overlay) {
            Ok(poses) => poses,
            Err(e) => {
                warn!(stream = ?side, frame = frame.index(), error = %e, "pose detection failed");
                Vec::new()
            }
        }
    }

    fn first_not_streaming(&self) -> Option<Collaborator> {
        if !self.aligner.input().is_streaming() {
            Some(Collaborator::InputSource)
        } else if !self.aligner.reference().is_streaming() {
            Some(Collaborator::ReferenceSource)
        } else if !self.sink.is_streaming() {
            Some(Collaborator::Sink)
        } else {
            None
        }
    }

    fn stop(&mut self, reason: StopReason) {
        debug!(?reason, frames = self.frames, "pipeline stopped");
        self.state = PipelineState::Stopped(reason);
    }
}
