//! Persistent client-side key/value state (`state.json`).
//!
//! Holds the theme preference between sessions. Values are plain strings
//! keyed by name; unreadable or corrupt files are treated as empty.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use evdash_config::UiConfig;
use evdash_core::Theme;
use evdash_core::theme::THEME_KEY;

use crate::error::ClientError;

const STATE_FILE_NAME: &str = "state.json";

#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Store inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(STATE_FILE_NAME),
        }
    }

    /// Store in the configured state directory.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NoStateDir`] if no directory is configured and
    /// the platform has no data directory.
    pub fn from_config(ui: &UiConfig) -> Result<Self, ClientError> {
        ui.state_path()
            .map(|dir| Self::in_dir(&dir))
            .ok_or(ClientError::NoStateDir)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        let Ok(contents) = fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&contents).unwrap_or_else(|error| {
            tracing::warn!(%error, path = %self.path.display(), "ignoring corrupt state file");
            BTreeMap::new()
        })
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    /// Set one key, keeping every other key.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] if the state file cannot be written.
    pub fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let mut all = self.read_all();
        all.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ClientError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let contents = serde_json::to_string_pretty(&all)
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        fs::write(&self.path, contents).map_err(|source| ClientError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// The stored theme, defaulting to light when absent or unrecognized.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.get(THEME_KEY)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Persist a theme preference.
    ///
    /// # Errors
    ///
    /// See [`LocalStore::set`].
    pub fn set_theme(&self, theme: Theme) -> Result<(), ClientError> {
        self.set(THEME_KEY, theme.as_str())
    }

    /// Flip and persist the theme. Returns the new theme.
    ///
    /// # Errors
    ///
    /// See [`LocalStore::set`].
    pub fn toggle_theme(&self) -> Result<Theme, ClientError> {
        let theme = self.theme().toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }
}
