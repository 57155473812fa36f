//! # evdash-core
//!
//! Core types shared across every evdash crate:
//! - `Project`, `Selection` and vendor grouping for the sidebar
//! - `ConfigDocument` and its flat / tablist shapes, parsed leniently
//! - cell value helpers (truthiness, display text, leading-float parsing)
//! - report file naming rules used by dynamic tab discovery
//! - the `Theme` preference
//! - the `ReportSource` contract implemented by the filesystem store and the
//!   HTTP client

pub mod document;
pub mod errors;
pub mod project;
pub mod report_file;
pub mod source;
pub mod theme;
pub mod value;

pub use document::{
    BbfvMargins, ConfigDocument, DimmRow, EndDevice, FlatConfig, Row, SystemRow, Tab, Tablist,
};
pub use errors::CoreError;
pub use project::{Project, Selection, VendorGroup, group_by_vendor};
pub use source::{Fragment, ReportSource, SourceError};
pub use theme::Theme;
