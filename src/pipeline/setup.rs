use anyhow::anyhow;
use tracing::debug;

use crate::config::VideoConfig;
use crate::error::SetupError;
use crate::video::{FrameSource, VideoBackend};

/// ループ開始前に開いておく入出力
pub struct Collaborators<S, K> {
    pub input: S,
    pub reference: S,
    pub sink: K,
}

/// 入力・基準・出力を開く
///
/// 出力は基準動画の解像度で開く (入力フレームは基準サイズに揃えられる)。
/// どれか1つでも開けなければフレームを取得する前にエラーを返す。
pub fn open_collaborators<B: VideoBackend>(
    backend: &mut B,
    input_path: &str,
    video: &VideoConfig,
) -> Result<Collaborators<B::Source, B::Sink>, SetupError> {
    let input = backend
        .open_source(input_path)
        .map_err(|e| SetupError::source_unavailable(input_path, e))?;

    let reference_path = video.reference_path.as_str();
    let reference = backend
        .open_source(reference_path)
        .map_err(|e| SetupError::source_unavailable(reference_path, e))?;
    let size = reference.resolution().ok_or_else(|| {
        SetupError::source_unavailable(reference_path, anyhow!("Unknown frame size"))
    })?;

    let output_path = video.output_path.as_str();
    let sink = backend
        .create_sink(output_path, video.output_fps, size)
        .map_err(|e| SetupError::sink_unavailable(output_path, e))?;

    debug!(width = size.0, height = size.1, "collaborators opened");
    Ok(Collaborators {
        input,
        reference,
        sink,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::{Frame, MemorySink, MemorySource};
    use anyhow::Result;
    use std::error::Error as _;

    /// 開いたパスと出力サイズを記録するバックエンド
    #[derive(Default)]
    struct RecordingBackend {
        failing_sink: bool,
        opened: Vec<String>,
        sink_size: Option<(u32, u32)>,
    }

    impl VideoBackend for RecordingBackend {
        type Source = MemorySource;
        type Sink = MemorySink;

        fn open_source(&mut self, path: &str) -> Result<MemorySource> {
            self.opened.push(path.to_string());
            match path {
                "missing.mp4" => anyhow::bail!("No such file"),
                "empty.mp4" => Ok(MemorySource::new(Vec::<Frame>::new())),
                "ref.mp4" => Ok(MemorySource::blank(3, 320, 240)),
                _ => Ok(MemorySource::blank(3, 640, 480)),
            }
        }

        fn create_sink(&mut self, path: &str, _fps: f64, size: (u32, u32)) -> Result<MemorySink> {
            self.opened.push(path.to_string());
            if self.failing_sink {
                anyhow::bail!("codec missing");
            }
            self.sink_size = Some(size);
            Ok(MemorySink::new())
        }
    }

    fn video(reference: &str) -> VideoConfig {
        VideoConfig {
            reference_path: reference.to_string(),
            output_path: "out/annotated.mp4".to_string(),
            output_fps: 30.0,
        }
    }

    #[test]
    fn test_sink_sized_to_reference() {
        let mut backend = RecordingBackend::default();
        let opened = open_collaborators(&mut backend, "in.mp4", &video("ref.mp4")).unwrap();

        assert_eq!(backend.sink_size, Some((320, 240)));
        assert_eq!(backend.opened, ["in.mp4", "ref.mp4", "out/annotated.mp4"]);
        assert_eq!(opened.input.captured(), 0);
        assert_eq!(opened.reference.captured(), 0);
        assert!(opened.sink.frames().is_empty());
    }

    #[test]
    fn test_sink_failure_is_fatal_before_capture() {
        let mut backend = RecordingBackend {
            failing_sink: true,
            ..Default::default()
        };
        let err = open_collaborators(&mut backend, "in.mp4", &video("ref.mp4"))
            .err()
            .unwrap();

        match &err {
            SetupError::SinkUnavailable { path, .. } => assert_eq!(path, "out/annotated.mp4"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.source().unwrap().to_string(), "codec missing");
    }

    #[test]
    fn test_missing_source_stops_before_sink() {
        let mut backend = RecordingBackend::default();
        let err = open_collaborators(&mut backend, "missing.mp4", &video("ref.mp4"))
            .err()
            .unwrap();

        assert!(matches!(err, SetupError::SourceUnavailable { ref path, .. } if path == "missing.mp4"));
        assert_eq!(backend.opened, ["missing.mp4"]);
    }

    #[test]
    fn test_reference_without_size_is_unavailable() {
        let mut backend = RecordingBackend::default();
        let err = open_collaborators(&mut backend, "in.mp4", &video("empty.mp4"))
            .err()
            .unwrap();

        assert!(matches!(err, SetupError::SourceUnavailable { ref path, .. } if path == "empty.mp4"));
        assert_eq!(backend.sink_size, None);
    }
}
