//! Error types for Cravey.
//!
//! Library crates use [`CraveyError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Cravey operations.
#[derive(Debug, thiserror::Error)]
pub enum CraveyError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The caller sent a request without the data we need.
    #[error("{message}")]
    Input { message: String },

    /// Decoding or enriching a table failed. Carries the underlying cause.
    #[error("{message}")]
    Processing { message: String },

    /// The processor returned successfully but left no output behind.
    #[error("{message}")]
    MissingOutput { message: String },

    /// Network/HTTP error talking to a remote enrichment service.
    #[error("network error: {0}")]
    Network(String),

    /// The HTTP listener could not start or stopped unexpectedly.
    #[error("server error: {0}")]
    Server(String),

    /// JSON encoding or decoding error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CraveyError>;

impl CraveyError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a client-input error from any displayable message.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input {
            message: msg.into(),
        }
    }

    /// Create a processing error from any displayable message.
    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing {
            message: msg.into(),
        }
    }

    /// Create a missing-output error from any displayable message.
    pub fn missing_output(msg: impl Into<String>) -> Self {
        Self::MissingOutput {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error was caused by the caller rather than by us.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Input { .. })
    }
}
