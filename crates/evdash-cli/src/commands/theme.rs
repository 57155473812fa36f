use anyhow::Context;
use evdash_client::LocalStore;
use evdash_config::EvdashConfig;
use evdash_core::Theme;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{ThemeAction, ThemeArgs};
use crate::output::output;

#[derive(Debug, Serialize)]
struct ThemeState {
    theme: Theme,
}

/// Handle `evdash theme`.
pub fn handle(args: &ThemeArgs, config: &EvdashConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let store = LocalStore::from_config(&config.ui).context("no state directory for preferences")?;
    let theme = apply(&store, args.action.as_ref().unwrap_or(&ThemeAction::Show))?;
    output(&ThemeState { theme }, flags.format)
}

fn apply(store: &LocalStore, action: &ThemeAction) -> anyhow::Result<Theme> {
    let theme = match action {
        ThemeAction::Show => store.theme(),
        ThemeAction::Toggle => store.toggle_theme()?,
        ThemeAction::Set { theme } => {
            store.set_theme(*theme)?;
            *theme
        }
    };
    tracing::debug!(theme = %theme, path = %store.path().display(), "theme preference");
    Ok(theme)
}
