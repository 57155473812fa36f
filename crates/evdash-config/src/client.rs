//! Dashboard client configuration.

use serde::{Deserialize, Serialize};

/// Where the project list is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSource {
    /// `GET /api/projects`
    #[default]
    Api,
    /// `GET /data/projects.json`
    Static,
}

/// How additional report files are discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryMode {
    /// `GET /api/reports/{vendor}/{project}`
    #[default]
    Api,
    /// Parse the HTML directory listing of `/reports/{vendor}/{project}/`.
    Listing,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Base URL of the evdash backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub project_source: ProjectSource,

    #[serde(default)]
    pub discovery: DiscoveryMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            project_source: ProjectSource::default(),
            discovery: DiscoveryMode::default(),
        }
    }
}
