use anyhow::{Context, Result};
use image::RgbImage;
use opencv::{
    core::{Mat, Scalar, Size, CV_8UC3},
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture, VideoWriter},
};
use std::path::Path;
use tracing::info;

use super::{Capture, Frame, FrameSink, FrameSource, VideoBackend};

/// OpenCVを使用した動画ファイルの読み込み
pub struct VideoFileSource {
    capture: VideoCapture,
    width: u32,
    height: u32,
    streaming: bool,
    next_index: u64,
}

impl VideoFileSource {
    /// 動画ファイルを開く
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path
            .to_str()
            .with_context(|| format!("Non UTF-8 path: {}", path.display()))?;

        let capture = VideoCapture::from_file(path_str, videoio::CAP_ANY)
            .with_context(|| format!("Failed to open video {}", path.display()))?;

        if !capture.is_opened()? {
            anyhow::bail!("Video {} is not available", path.display());
        }

        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        let fps = capture.get(videoio::CAP_PROP_FPS)?;
        info!(path = %path.display(), width, height, fps, "video source opened");

        Ok(Self {
            capture,
            width,
            height,
            streaming: true,
            next_index: 0,
        })
    }
}

impl FrameSource for VideoFileSource {
    fn capture(&mut self) -> Result<Capture> {
        if !self.streaming {
            return Ok(Capture::EndOfStream);
        }

        let mut mat = Mat::default();
        let read = self
            .capture
            .read(&mut mat)
            .context("Failed to read frame")?;

        if !read || mat.empty() {
            self.streaming = false;
            return Ok(Capture::EndOfStream);
        }

        let frame = Frame::new(bgr_to_rgb_image(&mat)?, self.next_index);
        self.next_index += 1;
        Ok(Capture::Frame(frame))
    }

    fn is_streaming(&self) -> bool {
        self.streaming
    }

    fn resolution(&self) -> Option<(u32, u32)> {
        (self.width > 0 && self.height > 0).then_some((self.width, self.height))
    }
}

/// OpenCVを使用した動画ファイルへの書き出し (mp4v)
pub struct VideoFileSink {
    writer: VideoWriter,
    streaming: bool,
}

impl VideoFileSink {
    /// 書き出し先を開く。コーデックや権限の問題はここでエラーになる
    pub fn create<P: AsRef<Path>>(path: P, fps: f64, (width, height): (u32, u32)) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path
            .to_str()
            .with_context(|| format!("Non UTF-8 path: {}", path.display()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let fourcc = VideoWriter::fourcc('m', 'p', '4', 'v')?;
        let writer = VideoWriter::new(
            path_str,
            fourcc,
            fps,
            Size::new(width as i32, height as i32),
            true,
        )
        .with_context(|| format!("Failed to open writer for {}", path.display()))?;

        if !writer.is_opened()? {
            anyhow::bail!("Writer for {} is not available", path.display());
        }

        info!(path = %path.display(), width, height, fps, "video sink opened");
        Ok(Self {
            writer,
            streaming: true,
        })
    }
}

impl FrameSink for VideoFileSink {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        let mat = rgb_image_to_bgr(frame.image())?;
        if let Err(e) = self.writer.write(&mat) {
            self.streaming = false;
            return Err(e).context("Failed to write frame");
        }
        Ok(())
    }

    fn is_streaming(&self) -> bool {
        self.streaming
    }
}

/// OpenCVによる動画ファイル入出力
#[derive(Debug, Default, Clone, Copy)]
pub struct FileBackend;

impl VideoBackend for FileBackend {
    type Source = VideoFileSource;
    type Sink = VideoFileSink;

    fn open_source(&mut self, path: &str) -> Result<VideoFileSource> {
        VideoFileSource::open(path)
    }

    fn create_sink(&mut self, path: &str, fps: f64, size: (u32, u32)) -> Result<VideoFileSink> {
        VideoFileSink::create(path, fps, size)
    }
}

/// BGR Mat -> RgbImage
fn bgr_to_rgb_image(mat: &Mat) -> Result<RgbImage> {
    let mut rgb = Mat::default();
    imgproc::cvt_color_def(mat, &mut rgb, imgproc::COLOR_BGR2RGB)?;

    let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
    let data = rgb.data_bytes()?.to_vec();
    RgbImage::from_raw(width, height, data).context("Frame buffer size mismatch")
}

/// RgbImage -> BGR Mat
fn rgb_image_to_bgr(image: &RgbImage) -> Result<Mat> {
    let mut rgb = Mat::new_rows_cols_with_default(
        image.height() as i32,
        image.width() as i32,
        CV_8UC3,
        Scalar::all(0.0),
    )?;
    rgb.data_bytes_mut()?.copy_from_slice(image.as_raw());

    let mut bgr = Mat::default();
    imgproc::cvt_color_def(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR)?;
    Ok(bgr)
}
