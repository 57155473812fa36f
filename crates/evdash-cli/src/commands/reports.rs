use anyhow::Context;
use evdash_client::discovery::discover;
use evdash_config::EvdashConfig;
use evdash_core::Selection;

use crate::bootstrap::http_source;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::ProjectArgs;
use crate::output::output;

/// Handle `evdash reports`.
pub async fn handle(
    args: &ProjectArgs,
    config: &EvdashConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let selection = Selection::new(args.vendor.as_str(), args.project.as_str())?;
    let source = http_source(config)?;
    let files = discover(&source, &selection)
        .await
        .with_context(|| format!("failed to list reports for {selection}"))?;
    output(&files, flags.format)
}
