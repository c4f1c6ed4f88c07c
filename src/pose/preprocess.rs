use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array4;

/// RGB画像を MoveNet用の入力テンソルに変換
///
/// - `size` x `size` にリサイズ (アスペクト比は保持しない)
/// - [1, size, size, 3] の f32 テンソルに変換 (0.0-255.0)
pub fn preprocess_for_movenet(image: &RgbImage, size: u32) -> Array4<f32> {
    let resized = imageops::resize(image, size, size, FilterType::Triangle);

    let s = size as usize;
    let mut tensor = Array4::<f32>::zeros((1, s, s, 3));

    for (x, y, pixel) in resized.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        tensor[[0, y, x, 0]] = pixel[0] as f32;
        tensor[[0, y, x, 1]] = pixel[1] as f32;
        tensor[[0, y, x, 2]] = pixel[2] as f32;
    }

    tensor
}
