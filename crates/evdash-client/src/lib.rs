//! # evdash-client
//!
//! Client side of evdash: an HTTP [`ReportSource`](evdash_core::ReportSource)
//! against a running backend, the navigation session that turns fetched
//! artifacts into dashboard state, dynamic report discovery, the report
//! generator client, debounced search input, and the local key/value store
//! that keeps the theme preference.

pub mod debounce;
pub mod discovery;
pub mod generate;
pub mod listing;
pub mod local_store;
pub mod session;

mod error;
mod http;
mod source;

pub use error::ClientError;
pub use generate::{Download, GenerateForm};
pub use local_store::LocalStore;
pub use session::{Dashboard, Ticket, Update};
pub use source::HttpSource;
