//! Render-layer error types.

use thiserror::Error;

/// Errors raised when a UI interaction names something that is not there.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("no tab with id '{0}'")]
    UnknownTab(String),

    #[error("tab '{0}' is hidden")]
    HiddenTab(String),

    #[error("no table with id '{0}'")]
    UnknownTable(String),

    #[error("table '{table}' has no column '{column}'")]
    UnknownColumn { table: String, column: String },

    #[error("no vendor section '{0}'")]
    UnknownVendor(String),

    #[error("project '{0}' is not in the sidebar")]
    UnknownProject(String),
}
