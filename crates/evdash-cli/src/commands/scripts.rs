use evdash_config::EvdashConfig;
use evdash_core::ReportSource;

use crate::bootstrap::http_source;
use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `evdash scripts`.
pub async fn handle(config: &EvdashConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let source = http_source(config)?;
    let scripts = source.scripts().await?;
    output(&scripts, flags.format)
}
