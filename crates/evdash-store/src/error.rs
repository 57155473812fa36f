//! Store error types.

use std::path::PathBuf;

use evdash_core::{CoreError, SourceError};
use thiserror::Error;

/// Errors that can occur while reading or writing report artifacts on disk.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file or directory does not exist.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Any other filesystem failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON artifact could not be parsed.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A path segment supplied by a caller is unsafe.
    #[error(transparent)]
    InvalidPath(#[from] CoreError),

    /// The generator request did not name a script.
    #[error("Missing script name")]
    MissingScript,
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, source }
        }
    }
}

impl From<StoreError> for SourceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(path) => Self::NotFound(path.display().to_string()),
            StoreError::Json { .. } => Self::Decode(error.to_string()),
            StoreError::InvalidPath(_) | StoreError::MissingScript => Self::Status {
                status: 400,
                message: error.to_string(),
            },
            StoreError::Io { .. } => Self::Transport(error.to_string()),
        }
    }
}
