//! Error types shared across Lectern crates.

use std::path::PathBuf;

/// Top-level error type for Lectern operations.
#[derive(Debug, thiserror::Error)]
pub enum LecternError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error(
        "Ordering violation: segment {index} starts at {start}s, before the previous segment at {previous_start}s"
    )]
    OrderingViolation {
        index: usize,
        previous_start: f64,
        start: f64,
    },

    #[error("Transcription error: {message}")]
    Transcription { message: String },

    #[error("Summarization error: {message}")]
    Summarization { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using LecternError.
pub type LecternResult<T> = Result<T, LecternError>;

impl LecternError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    pub fn transcription(msg: impl Into<String>) -> Self {
        Self::Transcription {
            message: msg.into(),
        }
    }

    pub fn summarization(msg: impl Into<String>) -> Self {
        Self::Summarization {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Whether this error was caused by the caller's input rather than
    /// by the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::OrderingViolation { .. }
        )
    }
}
