/// MoveNet の 17 キーポイントインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const COUNT: usize = 17;

    /// モデル出力順に並んだ全インデックス
    pub const ALL: [KeypointIndex; KeypointIndex::COUNT] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// COCO 形式のラベル名
    pub fn label(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }
}

/// 単一キーポイント
#[derive(Debug, Clone, PartialEq)]
pub struct Keypoint {
    /// 部位名 (e.g. "left_wrist")
    pub label: String,
    /// X座標 (ピクセル)
    pub x: f32,
    /// Y座標 (ピクセル)
    pub y: f32,
}

impl Keypoint {
    pub fn new(label: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            label: label.into(),
            x,
            y,
        }
    }

    /// 描画用の整数ピクセル座標
    pub fn to_pixel(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

/// 1人分の姿勢
///
/// キーポイントの並びは検出器の出力順で固定。閾値未満の点は検出器が
/// 落とすので、姿勢ごとに点数が異なることがある。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    /// ラベルでキーポイントを取得
    pub fn find(&self, label: &str) -> Option<&Keypoint> {
        self.keypoints.iter().find(|k| k.label == label)
    }

    /// インデックスでキーポイントを取得
    pub fn get(&self, index: KeypointIndex) -> Option<&Keypoint> {
        self.find(index.label())
    }

    /// 全キーポイントを囲む矩形 (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        let first = self.keypoints.first()?;
        let init = (first.x, first.y, first.x, first.y);
        Some(self.keypoints.iter().fold(init, |(x0, y0, x1, y1), k| {
            (x0.min(k.x), y0.min(k.y), x1.max(k.x), y1.max(k.y))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypoint_index_count() {
        assert_eq!(KeypointIndex::COUNT, 17);
        assert_eq!(KeypointIndex::ALL.len(), KeypointIndex::COUNT);
    }

    #[test]
    fn test_keypoint_index_from_index() {
        assert_eq!(KeypointIndex::from_index(0), Some(KeypointIndex::Nose));
        assert_eq!(KeypointIndex::from_index(16), Some(KeypointIndex::RightAnkle));
        assert_eq!(KeypointIndex::from_index(17), None);
    }

    #[test]
    fn test_all_matches_discriminants() {
        for (i, index) in KeypointIndex::ALL.iter().enumerate() {
            assert_eq!(*index as usize, i);
        }
    }

    #[test]
    fn test_keypoint_to_pixel() {
        let kp = Keypoint::new("nose", 320.4, 119.6);
        assert_eq!(kp.to_pixel(), (320, 120));
    }

    #[test]
    fn test_pose_get_by_index() {
        let pose = Pose::new(vec![
            Keypoint::new("nose", 10.0, 20.0),
            Keypoint::new("left_wrist", 30.0, 40.0),
        ]);
        let wrist = pose.get(KeypointIndex::LeftWrist).unwrap();
        assert_eq!(wrist.x, 30.0);
        assert_eq!(wrist.y, 40.0);
        assert!(pose.get(KeypointIndex::RightAnkle).is_none());
    }

    #[test]
    fn test_pose_bounds() {
        let pose = Pose::new(vec![
            Keypoint::new("nose", 10.0, 50.0),
            Keypoint::new("left_hip", 4.0, 80.0),
            Keypoint::new("right_hip", 22.0, 78.0),
        ]);
        assert_eq!(pose.bounds(), Some((4.0, 50.0, 22.0, 80.0)));
        assert_eq!(Pose::default().bounds(), None);
    }
}
