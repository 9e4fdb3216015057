//! Result and error types for covstage.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for covstage operations
pub type CovResult<T> = Result<T, CovError>;

/// Errors that can occur while staging or emitting a coverage report
#[derive(Debug, Error)]
pub enum CovError {
    /// Filesystem operation failed on a specific path
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path that was being touched
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Reporter name outside the supported set
    #[error("Unknown reporter: {name}")]
    UnknownReporter {
        /// Name as written by the user
        name: String,
    },

    /// Path could not be expressed as a `file://` URL
    #[error("Cannot convert {} to a file URL", path.display())]
    InvalidPath {
        /// Offending path
        path: PathBuf,
    },

    /// Reporting engine failed
    #[error("Report engine failed: {message}")]
    Engine {
        /// Error message
        message: String,
    },

    /// Reporting engine process exited unsuccessfully
    #[error("Report engine `{program}` exited with {}", code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}")))]
    EngineExit {
        /// Program that was spawned
        program: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl CovError {
    /// Attach a path to an I/O error
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an engine error
    #[must_use]
    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine {
            message: message.into(),
        }
    }
}
