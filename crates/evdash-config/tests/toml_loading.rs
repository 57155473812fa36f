//! Integration tests for TOML and environment configuration loading.
//!
//! Uses figment::Jail for sandboxed cwd and env var manipulation.

use evdash_config::{DiscoveryMode, EvdashConfig, ProjectSource};
use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;

#[test]
fn loads_server_section_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[server]
bind = "0.0.0.0:8080"
root = "/srv/ev"
reports_dir = "published"
"#,
        )?;

        let config: EvdashConfig = Figment::from(Serialized::defaults(EvdashConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.server.root.to_str(), Some("/srv/ev"));
        assert_eq!(config.server.reports_dir.to_str(), Some("published"));
        assert_eq!(config.server.scripts_dir.to_str(), Some("autoscript"));
        Ok(())
    });
}

#[test]
fn loads_client_enums_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[client]
base_url = "https://ev.example.com"
project_source = "static"
discovery = "listing"
"#,
        )?;

        let config: EvdashConfig = Figment::from(Serialized::defaults(EvdashConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.client.base_url, "https://ev.example.com");
        assert_eq!(config.client.project_source, ProjectSource::Static);
        assert_eq!(config.client.discovery, DiscoveryMode::Listing);
        assert_eq!(config.client.timeout_secs, 10);
        Ok(())
    });
}

#[test]
fn project_local_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".evdash")?;
        jail.create_file(
            ".evdash/config.toml",
            r#"
[ui]
search_debounce_ms = 150
numeric_columns = ["AWG", "Loss", "Eye Height"]
"#,
        )?;

        let config = EvdashConfig::load().expect("config loads");
        assert_eq!(config.ui.search_debounce_ms, 150);
        assert_eq!(config.ui.numeric_columns, vec!["AWG", "Loss", "Eye Height"]);
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".evdash")?;
        jail.create_file(
            ".evdash/config.toml",
            r#"
[server]
bind = "127.0.0.1:7000"
"#,
        )?;
        jail.set_env("EVDASH_SERVER__BIND", "127.0.0.1:9000");
        jail.set_env("EVDASH_UI__SEARCH_DEBOUNCE_MS", "50");

        let config = EvdashConfig::load().expect("config loads");
        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.ui.search_debounce_ms, 50);
        Ok(())
    });
}

#[test]
fn invalid_env_value_fails_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("EVDASH_CLIENT__TIMEOUT_SECS", "0");
        let result = EvdashConfig::load();
        assert!(result.is_err());
        Ok(())
    });
}
