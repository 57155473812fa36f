use anyhow::Context;
use evdash_config::EvdashConfig;

use crate::cli::root_commands::ServeArgs;

/// Handle `evdash serve`.
pub async fn handle(args: &ServeArgs, mut config: EvdashConfig) -> anyhow::Result<()> {
    if let Some(bind) = &args.bind {
        config.server.bind.clone_from(bind);
    }
    if let Some(root) = &args.root {
        config.server = config.server.with_root(root);
    }
    config.validate().context("invalid server configuration")?;
    evdash_server::serve(&config)
        .await
        .context("evdash backend failed")
}
