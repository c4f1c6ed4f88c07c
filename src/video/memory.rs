use anyhow::Result;
use std::collections::VecDeque;

use super::{Capture, Frame, FrameSink, FrameSource};

/// メモリ上のフレーム列を順に返すソース
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    frames: VecDeque<Frame>,
    streaming: bool,
    captured: u64,
    live_for: Option<u64>,
}

impl MemorySource {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            streaming: true,
            captured: 0,
            live_for: None,
        }
    }

    /// 同じサイズの空フレームを `count` 枚
    pub fn blank(count: usize, width: u32, height: u32) -> Self {
        Self::new((0..count as u64).map(|i| Frame::blank(width, height, i)))
    }

    /// `frames` 枚出した時点で `is_streaming` を false にする
    pub fn live_for(mut self, frames: u64) -> Self {
        self.live_for = Some(frames);
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn captured(&self) -> u64 {
        self.captured
    }
}

impl FrameSource for MemorySource {
    fn capture(&mut self) -> Result<Capture> {
        match self.frames.pop_front() {
            Some(frame) if self.streaming => {
                self.captured += 1;
                Ok(Capture::Frame(frame))
            }
            _ => {
                self.streaming = false;
                Ok(Capture::EndOfStream)
            }
        }
    }

    fn is_streaming(&self) -> bool {
        self.streaming && self.live_for.map_or(true, |limit| self.captured < limit)
    }

    fn resolution(&self) -> Option<(u32, u32)> {
        self.frames.front().map(Frame::dimensions)
    }
}

/// 受け取ったフレームを保持するシンク
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    frames: Vec<Frame>,
    capacity: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// `capacity` 枚受け取ったら `is_streaming` を false にする
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::new(),
            capacity: Some(capacity),
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

impl FrameSink for MemorySink {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        if !self.is_streaming() {
            anyhow::bail!("Sink is closed");
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn is_streaming(&self) -> bool {
        self.capacity.map_or(true, |c| self.frames.len() < c)
    }
}
