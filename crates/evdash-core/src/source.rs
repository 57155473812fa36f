//! The contract between the dashboard and wherever report artifacts live.
//!
//! Implemented by `evdash-store` (local filesystem) and `evdash-client`
//! (HTTP against an evdash backend).

use std::future::Future;

use serde_json::Value;
use thiserror::Error;

use crate::project::{Project, Selection};

/// Pre-rendered HTML fragments stored next to a project's documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fragment {
    Summary,
    Configuration,
}

impl Fragment {
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Summary => "summary.html",
            Self::Configuration => "configuration.html",
        }
    }

    /// Panel name used in user-facing messages.
    #[must_use]
    pub const fn panel(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Configuration => "configuration",
        }
    }
}

/// Failures while reading report artifacts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The artifact does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Transport or I/O failure before a response was available.
    #[error("transport error: {0}")]
    Transport(String),

    /// The artifact exists but could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Read access to projects and their report artifacts.
pub trait ReportSource: Send + Sync + Clone + 'static {
    /// All projects, in listing order.
    fn projects(&self) -> impl Future<Output = Result<Vec<Project>, SourceError>> + Send;

    /// The raw `config.json` document of a project.
    fn config(&self, selection: &Selection)
    -> impl Future<Output = Result<Value, SourceError>> + Send;

    /// A pre-rendered HTML fragment of a project.
    fn fragment(
        &self,
        selection: &Selection,
        fragment: Fragment,
    ) -> impl Future<Output = Result<String, SourceError>> + Send;

    /// The dashboard-level summary shown when no project is selected.
    fn home_summary(&self) -> impl Future<Output = Result<String, SourceError>> + Send;

    /// Names of every `.json` file in the project's report directory.
    fn report_files(
        &self,
        selection: &Selection,
    ) -> impl Future<Output = Result<Vec<String>, SourceError>> + Send;

    /// One report document by file name.
    fn report_json(
        &self,
        selection: &Selection,
        file: &str,
    ) -> impl Future<Output = Result<Value, SourceError>> + Send;

    /// Report-generation scripts available to the generator panel.
    fn scripts(&self) -> impl Future<Output = Result<Vec<String>, SourceError>> + Send;
}
