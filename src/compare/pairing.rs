use crate::pose::Pose;

/// 対応付けられた姿勢ペア
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosePair<'a> {
    /// フレーム内での位置 (両リスト共通)
    pub index: usize,
    pub reference: &'a Pose,
    pub input: &'a Pose,
}

/// 1フレーム分の対応付け結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PosePairing<'a> {
    pub pairs: Vec<PosePair<'a>>,
    /// 対応相手のいない入力側の姿勢数
    pub unmatched_input: usize,
    /// 対応相手のいない基準側の姿勢数
    pub unmatched_reference: usize,
}

impl PosePairing<'_> {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// 捨てられた姿勢の合計
    pub fn dropped(&self) -> usize {
        self.unmatched_input + self.unmatched_reference
    }
}

/// 位置順で姿勢を対応付ける
///
/// i 番目の入力姿勢と i 番目の基準姿勢をペアにする。人物の同一性は
/// 追跡しないので、短い方のリストを超えた分は黙って捨てる。
pub fn pair_poses<'a>(input: &'a [Pose], reference: &'a [Pose]) -> PosePairing<'a> {
    let pairs: Vec<PosePair<'a>> = input
        .iter()
        .zip(reference.iter())
        .enumerate()
        .map(|(index, (input, reference))| PosePair {
            index,
            reference,
            input,
        })
        .collect();

    PosePairing {
        unmatched_input: input.len() - pairs.len(),
        unmatched_reference: reference.len() - pairs.len(),
        pairs,
    }
}
