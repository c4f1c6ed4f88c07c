use anyhow::Result;
use image::RgbImage;
use std::str::FromStr;

use super::canvas::Canvas;
use crate::pose::{KeypointIndex, Pose};

/// 描画する骨格線 (COCO 17点)
pub const SKELETON_CONNECTIONS: [(KeypointIndex, KeypointIndex); 16] = {
    use KeypointIndex::*;
    [
        (LeftEar, LeftEye),
        (LeftEye, Nose),
        (Nose, RightEye),
        (RightEye, RightEar),
        (LeftShoulder, RightShoulder),
        (LeftShoulder, LeftElbow),
        (LeftElbow, LeftWrist),
        (RightShoulder, RightElbow),
        (RightElbow, RightWrist),
        (LeftShoulder, LeftHip),
        (RightShoulder, RightHip),
        (LeftHip, RightHip),
        (LeftHip, LeftKnee),
        (LeftKnee, LeftAnkle),
        (RightHip, RightKnee),
        (RightKnee, RightAnkle),
    ]
};

// 0xRRGGBB
const KEYPOINT_COLOR: u32 = 0x00FF00;
const SKELETON_COLOR: u32 = 0xFFFF00;
const BOX_COLOR: u32 = 0x00A0FF;
const KEYPOINT_RADIUS: i32 = 4;

/// 検出結果の描画オプション
///
/// `"links,keypoints"` のようなカンマ区切りで指定する。
/// 使えるのは `box`, `links`, `keypoints`, `none`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayFlags {
    pub boxes: bool,
    pub links: bool,
    pub keypoints: bool,
}

impl OverlayFlags {
    pub const NONE: OverlayFlags = OverlayFlags {
        boxes: false,
        links: false,
        keypoints: false,
    };

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl FromStr for OverlayFlags {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut flags = Self::NONE;
        for flag in s.split(',').map(|f| f.trim().to_ascii_lowercase()) {
            match flag.as_str() {
                "" | "none" => {}
                "box" => flags.boxes = true,
                "links" => flags.links = true,
                "keypoints" => flags.keypoints = true,
                other => anyhow::bail!("Unknown overlay flag: {}", other),
            }
        }
        Ok(flags)
    }
}

/// 姿勢を画像に描画
pub fn draw_poses(image: &mut RgbImage, poses: &[Pose], flags: OverlayFlags) {
    if flags.is_none() {
        return;
    }

    let mut canvas = Canvas::new(image);

    for pose in poses {
        if flags.boxes {
            if let Some((x0, y0, x1, y1)) = pose.bounds() {
                canvas.draw_rect(
                    x0.round() as i32,
                    y0.round() as i32,
                    x1.round() as i32,
                    y1.round() as i32,
                    BOX_COLOR,
                );
            }
        }

        // 骨格線を描画
        if flags.links {
            for (start_idx, end_idx) in SKELETON_CONNECTIONS.iter() {
                if let (Some(start), Some(end)) = (pose.get(*start_idx), pose.get(*end_idx)) {
                    let (x1, y1) = start.to_pixel();
                    let (x2, y2) = end.to_pixel();
                    canvas.draw_line(x1, y1, x2, y2, SKELETON_COLOR);
                }
            }
        }

        // キーポイントを描画
        if flags.keypoints {
            for kp in pose.keypoints.iter() {
                let (px, py) = kp.to_pixel();
                canvas.draw_circle(px, py, KEYPOINT_RADIUS, KEYPOINT_COLOR);
            }
        }
    }
}
