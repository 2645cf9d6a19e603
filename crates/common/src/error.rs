//! Error types shared across Autoframe crates.

use std::path::PathBuf;

/// Top-level error type for Autoframe operations.
#[derive(Debug, thiserror::Error)]
pub enum AutoframeError {
    #[error("Detection input error: {message}")]
    Detection { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Trace export error: {message}")]
    Export { message: String },

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using AutoframeError.
pub type AutoframeResult<T> = Result<T, AutoframeError>;

impl AutoframeError {
    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }
}
