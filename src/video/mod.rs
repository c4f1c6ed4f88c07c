use anyhow::Result;
use image::imageops::{self, FilterType};
use image::RgbImage;

#[cfg(feature = "desktop")]
pub mod file;
pub mod memory;

#[cfg(feature = "desktop")]
pub use file::{FileBackend, VideoFileSink, VideoFileSource};
pub use memory::{MemorySink, MemorySource};

/// デコード済みの1フレーム (RGB8)
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    image: RgbImage,
    /// ソース内での通し番号
    index: u64,
}

impl Frame {
    pub fn new(image: RgbImage, index: u64) -> Self {
        Self { image, index }
    }

    /// 黒一色のフレーム
    pub fn blank(width: u32, height: u32, index: u64) -> Self {
        Self::new(RgbImage::new(width, height), index)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbImage {
        &mut self.image
    }

    /// 指定サイズにリサイズ（元の画素は破棄される）
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.dimensions() == (width, height) {
            return;
        }
        self.image = imageops::resize(&self.image, width, height, FilterType::Triangle);
    }
}

/// `FrameSource::capture` の結果
#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    Frame(Frame),
    EndOfStream,
}

impl Capture {
    pub fn into_frame(self) -> Option<Frame> {
        match self {
            Capture::Frame(frame) => Some(frame),
            Capture::EndOfStream => None,
        }
    }
}

/// フレームの取得元。`capture` はフレームが来るまでブロックする
pub trait FrameSource {
    fn capture(&mut self) -> Result<Capture>;

    /// まだフレームを出せる状態か
    fn is_streaming(&self) -> bool;

    /// 取得前に分かる解像度 (幅, 高さ)
    fn resolution(&self) -> Option<(u32, u32)> {
        None
    }
}

/// フレームの出力先
pub trait FrameSink {
    fn render(&mut self, frame: &Frame) -> Result<()>;

    fn is_streaming(&self) -> bool;
}

/// ソースとシンクを開く口
pub trait VideoBackend {
    type Source: FrameSource;
    type Sink: FrameSink;

    fn open_source(&mut self, path: &str) -> Result<Self::Source>;

    /// `size` の動画として書き出し先を開く。開けなければエラー
    fn create_sink(&mut self, path: &str, fps: f64, size: (u32, u32)) -> Result<Self::Sink>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn capture(&mut self) -> Result<Capture> {
        (**self).capture()
    }

    fn is_streaming(&self) -> bool {
        (**self).is_streaming()
    }

    fn resolution(&self) -> Option<(u32, u32)> {
        (**self).resolution()
    }
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        (**self).render(frame)
    }

    fn is_streaming(&self) -> bool {
        (**self).is_streaming()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_resize_changes_dimensions() {
        let mut frame = Frame::new(RgbImage::from_pixel(64, 48, Rgb([200, 0, 0])), 3);
        frame.resize(32, 96);
        assert_eq!(frame.dimensions(), (32, 96));
        assert_eq!(frame.index(), 3);
    }

    #[test]
    fn test_resize_same_size_is_noop() {
        let mut image = RgbImage::new(4, 4);
        image.put_pixel(1, 2, Rgb([9, 9, 9]));
        let mut frame = Frame::new(image.clone(), 0);
        frame.resize(4, 4);
        assert_eq!(frame.image(), &image);
    }

    #[test]
    fn test_capture_into_frame() {
        assert!(Capture::EndOfStream.into_frame().is_none());
        assert!(Capture::Frame(Frame::blank(2, 2, 0)).into_frame().is_some());
    }
}
