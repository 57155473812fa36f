//! Client error types.

use std::path::PathBuf;

use evdash_core::SourceError;
use thiserror::Error;

/// Errors that can occur when talking to an evdash backend or reading local
/// client state.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Response body.
        message: String,
    },

    /// A response body could not be interpreted.
    #[error("parse error: {0}")]
    Parse(String),

    /// A local file could not be read or written.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No platform data directory is available for client state.
    #[error("no state directory available")]
    NoStateDir,
}

impl From<ClientError> for SourceError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Http(e) if e.is_decode() => Self::Decode(e.to_string()),
            ClientError::Api { status: 404, message } => Self::NotFound(message),
            ClientError::Api { status, message } => Self::Status { status, message },
            ClientError::Parse(message) => Self::Decode(message),
            other => Self::Transport(other.to_string()),
        }
    }
}
