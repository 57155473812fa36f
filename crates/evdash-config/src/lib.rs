//! # evdash-config
//!
//! Layered configuration loading for evdash using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`EVDASH_*` prefix, `__` as separator)
//! 2. Project-level `.evdash/config.toml`
//! 3. User-level `~/.config/evdash/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `EVDASH_SERVER__BIND` -> `server.bind`,
//! `EVDASH_UI__SEARCH_DEBOUNCE_MS` -> `ui.search_debounce_ms`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use evdash_config::EvdashConfig;
//!
//! let config = EvdashConfig::load_with_dotenv().expect("config");
//! println!("backend: {}", config.client.base_url);
//! ```

mod client;
mod error;
mod server;
mod ui;

pub use client::{ClientConfig, DiscoveryMode, ProjectSource};
pub use error::ConfigError;
pub use server::ServerConfig;
pub use ui::UiConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EvdashConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl EvdashConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`EvdashConfig::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source cannot be parsed or a value fails
    /// validation.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`EvdashConfig::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".evdash/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("EVDASH_").split("__"))
    }

    /// Reject values that would make the server or client unusable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind.trim().is_empty() {
            return Err(ConfigError::invalid("server.bind", "must not be empty"));
        }
        let base_url = self.client.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::invalid("client.base_url", "must not be empty"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "client.base_url",
                format!("'{base_url}' is not an http(s) URL"),
            ));
        }
        if self.client.timeout_secs == 0 {
            return Err(ConfigError::invalid("client.timeout_secs", "must be positive"));
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("evdash").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EvdashConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.client.project_source, ProjectSource::Api);
        assert_eq!(config.client.discovery, DiscoveryMode::Api);
    }

    #[test]
    fn empty_bind_is_rejected() {
        let mut config = EvdashConfig::default();
        config.server.bind = "  ".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.bind"));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let mut config = EvdashConfig::default();
        config.client.base_url = "ftp://reports".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
