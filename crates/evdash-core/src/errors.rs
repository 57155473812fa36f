//! Cross-cutting error types for evdash.
//!
//! Domain-specific errors (`StoreError`, `ClientError`, ...) live in their
//! crates. The binary converges everything on `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any evdash crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A path segment (vendor, project or file name) is unsafe to join.
    #[error("invalid path segment: {0:?}")]
    InvalidSegment(String),

    /// A theme name other than `light` or `dark`.
    #[error("unknown theme '{0}' (expected 'light' or 'dark')")]
    UnknownTheme(String),

    /// Data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),
}
