use crate::error::CompareError;
use crate::pose::Pose;

/// 2つの姿勢を同じ長さの座標ベクトル [x0, y0, x1, y1, ...] に変換
///
/// キーポイントは先頭から順に対応させ、短い方の点数で打ち切る。
/// 打ち切った結果が空になる場合のみ `DimensionMismatch`。
pub fn vectorize(reference: &Pose, input: &Pose) -> Result<(Vec<f32>, Vec<f32>), CompareError> {
    let common = reference.len().min(input.len());
    if common == 0 {
        return Err(CompareError::DimensionMismatch {
            reference: reference.len(),
            input: input.len(),
        });
    }

    let mut v1 = Vec::with_capacity(common * 2);
    let mut v2 = Vec::with_capacity(common * 2);
    for (kp1, kp2) in reference.keypoints.iter().zip(input.keypoints.iter()) {
        v1.push(kp1.x);
        v1.push(kp1.y);
        v2.push(kp2.x);
        v2.push(kp2.y);
    }

    Ok((v1, v2))
}

/// コサイン類似度 dot(v1, v2) / (|v1| |v2|)
///
/// 座標は正規化しないので、値は姿勢の形より画面上の位置に強く左右される。
pub fn cosine_similarity(v1: &[f32], v2: &[f32]) -> Result<f64, CompareError> {
    if v1.is_empty() || v1.len() != v2.len() {
        return Err(CompareError::DimensionMismatch {
            reference: v1.len(),
            input: v2.len(),
        });
    }

    let (dot, sq1, sq2) = v1.iter().zip(v2.iter()).fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(dot, sq1, sq2), (&a, &b)| {
            let (a, b) = (a as f64, b as f64);
            (dot + a * b, sq1 + a * a, sq2 + b * b)
        },
    );

    let norm1 = sq1.sqrt();
    let norm2 = sq2.sqrt();
    if norm1 == 0.0 || norm2 == 0.0 {
        return Err(CompareError::DegenerateVector);
    }

    Ok(dot / (norm1 * norm2))
}

/// 姿勢ペアの類似度
pub fn compare_poses(reference: &Pose, input: &Pose) -> Result<f64, CompareError> {
    let (v1, v2) = vectorize(reference, input)?;
    cosine_similarity(&v1, &v2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn pose(points: &[(f32, f32)]) -> Pose {
        Pose::new(
            points
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| Keypoint::new(format!("kp{}", i), x, y))
                .collect(),
        )
    }

    #[test]
    fn test_vectorize_interleaves_xy() {
        let (v1, v2) = vectorize(&pose(&[(1.0, 2.0), (3.0, 4.0)]), &pose(&[(5.0, 6.0), (7.0, 8.0)])).unwrap();
        assert_eq!(v1, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(v2, vec![5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_vectorize_truncates_to_shorter_pose() {
        let long = pose(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0)]);
        let short = pose(&[(9.0, 9.0), (8.0, 8.0)]);

        let (v1, v2) = vectorize(&long, &short).unwrap();
        assert_eq!(v1.len(), 4);
        assert_eq!(v2.len(), 4);
        assert_eq!(v1, vec![1.0, 1.0, 2.0, 2.0]);

        let (v1, v2) = vectorize(&short, &long).unwrap();
        assert_eq!(v1, vec![9.0, 9.0, 8.0, 8.0]);
        assert_eq!(v2, vec![1.0, 1.0, 2.0, 2.0]);
    }

    #[test]
    fn test_vectorize_empty_pose_is_mismatch() {
        let err = vectorize(&Pose::default(), &pose(&[(1.0, 1.0)])).unwrap_err();
        assert_eq!(err, CompareError::DimensionMismatch { reference: 0, input: 1 });
    }

    #[test]
    fn test_identical_vectors_score_one() {
        for v in [vec![1.0f32, 2.0, 3.0], vec![640.0, 12.5, 0.0, 33.0], vec![-4.0, 7.0]] {
            assert!(approx_eq(cosine_similarity(&v, &v).unwrap(), 1.0, 1e-9));
        }
    }

    #[test]
    fn test_opposite_vectors_score_minus_one() {
        let v = vec![3.0f32, -1.0, 250.0, 8.0];
        let neg: Vec<f32> = v.iter().map(|x| -x).collect();
        assert!(approx_eq(cosine_similarity(&v, &neg).unwrap(), -1.0, 1e-9));
    }

    #[test]
    fn test_orthogonal_vectors_score_zero() {
        assert!(approx_eq(cosine_similarity(&[1.0, 0.0], &[0.0, 5.0]).unwrap(), 0.0, 1e-12));
    }

    #[test]
    fn test_zero_norm_is_degenerate() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), Err(CompareError::DegenerateVector));
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]), Err(CompareError::DegenerateVector));
    }

    #[test]
    fn test_unequal_or_empty_vectors_are_mismatch() {
        assert!(matches!(cosine_similarity(&[], &[]), Err(CompareError::DimensionMismatch { .. })));
        assert!(matches!(
            cosine_similarity(&[1.0], &[1.0, 2.0]),
            Err(CompareError::DimensionMismatch { reference: 1, input: 2 })
        ));
    }

    #[test]
    fn test_magnitude_does_not_matter() {
        let v = [10.0f32, 20.0, 30.0];
        let scaled = [20.0f32, 40.0, 60.0];
        assert!(approx_eq(cosine_similarity(&v, &scaled).unwrap(), 1.0, 1e-9));
    }

    // 座標は正規化しない: 形がまったく違っても画面上の同じ辺りにあれば高スコアになる
    #[test]
    fn test_raw_coordinates_dominated_by_position() {
        // 水平に伸ばした腕と垂直に下ろした腕 (画面右下付近)
        let horizontal = pose(&[(600.0, 400.0), (640.0, 400.0), (680.0, 400.0)]);
        let vertical = pose(&[(600.0, 400.0), (600.0, 440.0), (600.0, 480.0)]);
        let different_shape = compare_poses(&horizontal, &vertical).unwrap();
        assert!(different_shape > 0.99);

        // 同じ形でも画面の反対側に平行移動すると大きく下がる
        let shifted = pose(&[(10.0, 400.0), (50.0, 400.0), (90.0, 400.0)]);
        let same_shape = compare_poses(&horizontal, &shifted).unwrap();
        assert!(same_shape < different_shape);
    }

    #[test]
    fn test_compare_poses_identical() {
        let p = pose(&[(100.0, 200.0), (150.0, 250.0), (120.0, 300.0)]);
        assert!(approx_eq(compare_poses(&p, &p).unwrap(), 1.0, 1e-9));
    }
}
