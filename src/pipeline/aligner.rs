use tracing::warn;

use crate::video::{Capture, Frame, FrameSource};

/// どちらのストリームか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSide {
    Input,
    Reference,
}

/// 同じ反復で取得した2フレーム
#[derive(Debug, Clone)]
pub struct FramePair {
    pub input: Frame,
    pub reference: Frame,
    /// 入力フレームをリサイズした場合、元のサイズ
    pub resized_from: Option<(u32, u32)>,
}

/// `FramePairAligner::next_pair` の結果
#[derive(Debug, Clone)]
pub enum Aligned {
    Pair(FramePair),
    EndOfStream(StreamSide),
}

/// 2つのソースから1枚ずつフレームを取り、サイズを揃える
///
/// 対応付けは単純な通し番号順 (i 枚目同士)。フレームレートの違いは補正しない。
pub struct FramePairAligner<I, R> {
    input: I,
    reference: R,
}

impl<I: FrameSource, R: FrameSource> FramePairAligner<I, R> {
    pub fn new(input: I, reference: R) -> Self {
        Self { input, reference }
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn reference(&self) -> &R {
        &self.reference
    }

    /// 両方のソースから1枚ずつ取得する
    ///
    /// 取得は毎回両方に対して行う。どちらかが終端なら `EndOfStream`。
    /// サイズが異なる場合は入力側を基準側のサイズにリサイズする。
    pub fn next_pair(&mut self) -> Aligned {
        let input = capture_or_end(&mut self.input, StreamSide::Input);
        let reference = capture_or_end(&mut self.reference, StreamSide::Reference);

        let (mut input, reference) = match (input, reference) {
            (Capture::Frame(input), Capture::Frame(reference)) => (input, reference),
            (Capture::EndOfStream, _) => return Aligned::EndOfStream(StreamSide::Input),
            (_, Capture::EndOfStream) => return Aligned::EndOfStream(StreamSide::Reference),
        };

        let resized_from = if input.dimensions() != reference.dimensions() {
            let original = input.dimensions();
            input.resize(reference.width(), reference.height());
            Some(original)
        } else {
            None
        };

        Aligned::Pair(FramePair {
            input,
            reference,
            resized_from,
        })
    }
}

/// 取得エラーはリトライせず、そのストリームの終端として扱う
fn capture_or_end<S: FrameSource>(source: &mut S, side: StreamSide) -> Capture {
    match source.capture() {
        Ok(capture) => capture,
        Err(e) => {
            warn!(stream = ?side, error = %e, "frame capture failed, treating as end of stream");
            Capture::EndOfStream
        }
    }
}
