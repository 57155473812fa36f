use evdash_config::EvdashConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: EvdashConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Serve(args) => commands::serve::handle(&args, config).await,
        Commands::Projects(args) => commands::projects::handle(&args, &config, flags).await,
        Commands::Show(args) => commands::show::handle(&args, &config, flags).await,
        Commands::Reports(args) => commands::reports::handle(&args, &config, flags).await,
        Commands::Generate(args) => commands::generate::handle(&args, &config, flags).await,
        Commands::Scripts => commands::scripts::handle(&config, flags).await,
        Commands::Theme(args) => commands::theme::handle(&args, &config, flags),
    }
}
