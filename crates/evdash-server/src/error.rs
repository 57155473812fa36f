//! Server error types and their HTTP mapping.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use evdash_core::CoreError;
use evdash_store::StoreError;
use thiserror::Error;

/// Errors that can occur while serving a request or starting the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A path segment taken from the URL is unsafe.
    #[error(transparent)]
    InvalidPath(#[from] CoreError),

    #[error("{0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Status code sent to the client for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Store(StoreError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(StoreError::InvalidPath(_) | StoreError::MissingScript)
            | Self::InvalidPath(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Multipart(error) => error.status(),
            Self::Store(_) | Self::Bind { .. } | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (status, self.to_string()).into_response()
    }
}
