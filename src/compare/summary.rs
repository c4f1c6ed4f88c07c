use std::fmt;

/// 1ペア分のスコア
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSimilarityResult {
    pub pair_index: usize,
    pub score: f64,
}

/// 実行全体の集計
///
/// 平均はフレームごとの平均の平均ではなく、全ペアの単純平均。
/// ペアの多いフレームほど重く効く。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    total_score: f64,
    pair_count: usize,
    skipped_pairs: usize,
    frames: u64,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &FrameSimilarityResult) {
        self.total_score += result.score;
        self.pair_count += 1;
    }

    /// スコアを出せなかったペア。合計と件数には含めない
    pub fn record_skipped(&mut self) {
        self.skipped_pairs += 1;
    }

    pub fn record_frame(&mut self) {
        self.frames += 1;
    }

    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    pub fn skipped_pairs(&self) -> usize {
        self.skipped_pairs
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn average(&self) -> Option<f64> {
        (self.pair_count > 0).then(|| self.total_score / self.pair_count as f64)
    }

    pub fn finalize(self) -> Report {
        match self.average() {
            Some(average) => Report::Average {
                average,
                percentage: average * 100.0,
                pairs: self.pair_count,
            },
            None => Report::NoPosesDetected,
        }
    }
}

/// 最終結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Report {
    Average {
        average: f64,
        percentage: f64,
        pairs: usize,
    },
    NoPosesDetected,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Average {
                average,
                percentage,
                ..
            } => {
                writeln!(f, "Average pose similarity (Cosine): {:.2}", average)?;
                write!(f, "Average pose similarity in percentage: {:.2}%", percentage)
            }
            Report::NoPosesDetected => write!(f, "No poses were detected in the videos."),
        }
    }
}
