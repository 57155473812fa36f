//! Presentation preferences shared by the server and the CLI.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const fn default_search_debounce_ms() -> u64 {
    300
}

fn default_numeric_columns() -> Vec<String> {
    ["AWG", "Length", "Loss"].map(String::from).to_vec()
}

fn default_link_columns() -> Vec<String> {
    ["result", "1dpc", "2dpc"].map(String::from).to_vec()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Quiet period before a search term is applied.
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Header labels sorted numerically (case-insensitive).
    #[serde(default = "default_numeric_columns")]
    pub numeric_columns: Vec<String>,

    /// Document keys rendered as result links.
    #[serde(default = "default_link_columns")]
    pub link_columns: Vec<String>,

    /// Directory for the local key/value store (theme). Empty means the
    /// platform data directory.
    #[serde(default)]
    pub state_dir: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: default_search_debounce_ms(),
            numeric_columns: default_numeric_columns(),
            link_columns: default_link_columns(),
            state_dir: String::new(),
        }
    }
}

impl UiConfig {
    /// Resolved state directory, or `None` when no data directory exists.
    #[must_use]
    pub fn state_path(&self) -> Option<PathBuf> {
        if self.state_dir.trim().is_empty() {
            dirs::data_dir().map(|p| p.join("evdash"))
        } else {
            Some(PathBuf::from(&self.state_dir))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = UiConfig::default();
        assert_eq!(config.search_debounce_ms, 300);
        assert_eq!(config.numeric_columns, vec!["AWG", "Length", "Loss"]);
        assert_eq!(config.link_columns, vec!["result", "1dpc", "2dpc"]);
    }

    #[test]
    fn explicit_state_dir_wins() {
        let config = UiConfig {
            state_dir: "/tmp/evdash-state".into(),
            ..UiConfig::default()
        };
        assert_eq!(config.state_path(), Some(PathBuf::from("/tmp/evdash-state")));
    }
}
