//! # evdash-store
//!
//! Filesystem access to report artifacts: the project list, per-project
//! configuration documents and HTML fragments, additional report JSON files,
//! generation scripts, and the report generator that writes uploads and a
//! generated report back to disk.

mod error;
mod generate;
mod store;

pub use error::StoreError;
pub use generate::{GenerateRequest, GeneratedReport, Upload};
pub use store::ReportStore;
