//! Error types for the detection pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for detection operations.
pub type DetectResult<T> = Result<T, DetectError>;

/// Errors that can occur during moment detection.
///
/// Collaborator failures are recovered locally by the scorer (the
/// affected segment degrades to a zero score set); decode failures are
/// fatal for the run and surface as an empty result at the detector
/// boundary; config errors are fatal at construction time.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("Stream not found: {0}")]
    StreamNotFound(PathBuf),

    #[error("Decode failed: {message}")]
    Decode {
        message: String,
        stderr: Option<String>,
    },

    #[error("Collaborator {stage} failed: {message}")]
    Collaborator {
        stage: &'static str,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] dcs_models::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl DetectError {
    /// Create a decode failure without captured stderr.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            stderr: None,
        }
    }

    /// Create a collaborator failure for a named pipeline stage.
    pub fn collaborator(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Collaborator {
            stage,
            message: message.into(),
        }
    }

    /// Whether the error aborts the whole run rather than a single segment.
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(
            self,
            DetectError::FfmpegNotFound
                | DetectError::FfprobeNotFound
                | DetectError::StreamNotFound(_)
                | DetectError::Decode { .. }
                | DetectError::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_is_fatal_collaborator_is_not() {
        assert!(DetectError::decode("unreadable").is_fatal_for_run());
        assert!(!DetectError::collaborator("viral", "timeout").is_fatal_for_run());
    }
}
