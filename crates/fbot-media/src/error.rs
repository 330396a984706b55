//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during media acquisition and processing.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("yt-dlp not found in PATH")]
    YtDlpNotFound,

    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    /// All extraction-layer failures collapse into this variant. The
    /// message is for the log only; callers present a generic rejection.
    #[error("Extraction failed: {message}")]
    ExtractionFailed { message: String },

    #[error("No artifacts produced in {0}")]
    NoArtifacts(PathBuf),

    #[error("Transcode failed: {message}")]
    TranscodeFailed {
        message: String,
        exit_code: Option<i32>,
    },

    #[error("Workspace error: {0}")]
    Workspace(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create an extraction failure error.
    pub fn extraction_failed(message: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            message: message.into(),
        }
    }

    /// Create a transcode failure error.
    pub fn transcode_failed(message: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::TranscodeFailed {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a workspace error.
    pub fn workspace(message: impl Into<String>) -> Self {
        Self::Workspace(message.into())
    }
}
