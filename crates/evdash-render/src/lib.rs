//! # evdash-render
//!
//! Headless presentation layer for the evdash dashboard.
//!
//! Everything here is a plain state machine plus a renderer to escaped HTML:
//! - [`table::TableView`]: one parametrized table with search, toggle sort
//!   and rowspan grouping recomputed from the current row order
//! - [`tabs::TabController`]: primary tabs and tablist sub-tabs
//! - [`config_view::ConfigView`]: configuration documents as table views
//! - [`sidebar::Sidebar`]: vendor accordion with name filter
//! - [`dashboard::DashboardView`]: the main panel and its loading states
//! - [`generator::GeneratorPanel`] and [`page::Layout`]
//!
//! Renderers take their link targets from [`ViewLinks`] and [`SidebarLinks`],
//! so the same views serve the server's URL-driven pages and plain tests.

pub mod config_view;
pub mod dashboard;
pub mod error;
pub mod generator;
pub mod html;
pub mod links;
pub mod page;
pub mod search;
pub mod sidebar;
pub mod table;
pub mod tabs;

pub use config_view::{ConfigView, RenderOptions};
pub use dashboard::{DashboardView, PanelState};
pub use error::RenderError;
pub use generator::{GenerateOutcome, GeneratorPanel, ScriptList};
pub use html::{Element, Node};
pub use links::ViewLinks;
pub use page::Layout;
pub use sidebar::{Sidebar, SidebarLinks};
pub use table::{Cell, Column, SortDirection, TableView};
pub use tabs::{PrimaryState, TabController, TabSpec};
