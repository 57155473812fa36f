use anyhow::Context;
use evdash_client::HttpSource;
use evdash_config::EvdashConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration (with `.env`) and apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<EvdashConfig> {
    let mut config = EvdashConfig::load_with_dotenv().context("failed to load evdash configuration")?;
    if let Some(base_url) = &flags.base_url {
        config.client.base_url.clone_from(base_url);
        config.validate().context("invalid --base-url")?;
    }
    tracing::debug!(
        base_url = %config.client.base_url,
        root = %config.server.root.display(),
        "configuration loaded"
    );
    Ok(config)
}

/// HTTP report source for the configured backend.
pub fn http_source(config: &EvdashConfig) -> anyhow::Result<HttpSource> {
    HttpSource::new(&config.client)
        .with_context(|| format!("failed to build HTTP client for {}", config.client.base_url))
}
