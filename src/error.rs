//! Error types shared across the crate.
//!
//! Collaborator I/O uses `anyhow`; the variants here are the ones callers
//! need to match on.

use std::error::Error as StdError;
use std::path::Path;
use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Per-pair scoring failure. The pair is skipped and the run continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CompareError {
    /// Truncating to the shorter pose left nothing to compare.
    #[error("no common keypoints to compare ({reference} reference vs {input} input)")]
    DimensionMismatch { reference: usize, input: usize },
    /// One of the vectors has zero norm, so cosine similarity is undefined.
    #[error("keypoint vector has zero norm")]
    DegenerateVector,
}

/// Failure to build a collaborator before the loop starts. Always fatal.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("video source unavailable: {path}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: BoxError,
    },
    #[error("video sink unavailable: {path}")]
    SinkUnavailable {
        path: String,
        #[source]
        source: BoxError,
    },
    #[error("pose detector unavailable: {path}")]
    DetectorUnavailable {
        path: String,
        #[source]
        source: BoxError,
    },
}

impl SetupError {
    pub fn source_unavailable(path: impl AsRef<Path>, source: anyhow::Error) -> Self {
        Self::SourceUnavailable {
            path: path.as_ref().display().to_string(),
            source: source.into(),
        }
    }

    pub fn sink_unavailable(path: impl AsRef<Path>, source: anyhow::Error) -> Self {
        Self::SinkUnavailable {
            path: path.as_ref().display().to_string(),
            source: source.into(),
        }
    }

    pub fn detector_unavailable(path: impl AsRef<Path>, source: anyhow::Error) -> Self {
        Self::DetectorUnavailable {
            path: path.as_ref().display().to_string(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_error_keeps_cause() {
        let err = SetupError::source_unavailable("in.mp4", anyhow::anyhow!("codec missing"));
        assert_eq!(err.to_string(), "video source unavailable: in.mp4");
        assert_eq!(err.source().unwrap().to_string(), "codec missing");
    }

    #[test]
    fn test_compare_error_message() {
        let err = CompareError::DimensionMismatch { reference: 0, input: 3 };
        assert!(err.to_string().contains("0 reference vs 3 input"));
    }
}
