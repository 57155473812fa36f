use evdash_config::EvdashConfig;
use evdash_core::{Project, ReportSource};
use evdash_render::Sidebar;
use evdash_render::sidebar::{LOAD_FAILED, NO_MATCHES};

use crate::bootstrap::http_source;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::cli::root_commands::ProjectsArgs;
use crate::output::output;

/// Handle `evdash projects`.
pub async fn handle(
    args: &ProjectsArgs,
    config: &EvdashConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let source = http_source(config)?;
    let projects = source
        .projects()
        .await
        .map_err(|error| anyhow::anyhow!("{LOAD_FAILED}: {error}"))?;

    let mut sidebar = Sidebar::new(&projects);
    let visible = sidebar.apply_filter(args.filter.as_deref().unwrap_or_default());
    if visible == 0 && flags.format == OutputFormat::Table && !flags.quiet {
        eprintln!("{NO_MATCHES}");
    }
    output(&visible_projects(&sidebar), flags.format)
}

/// Projects the sidebar still shows, grouped by vendor.
fn visible_projects(sidebar: &Sidebar) -> Vec<Project> {
    sidebar
        .sections()
        .iter()
        .filter(|section| !section.hidden)
        .flat_map(|section| section.links.iter())
        .filter(|link| !link.hidden)
        .map(|link| link.project.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn filter_keeps_vendor_grouping() {
        let projects = vec![
            Project::new("Acme", "X1"),
            Project::new("Kioxia", "CM7"),
            Project::new("Acme", "CM7-lite"),
        ];
        let mut sidebar = Sidebar::new(&projects);
        assert_eq!(
            visible_projects(&sidebar),
            vec![
                Project::new("Acme", "X1"),
                Project::new("Acme", "CM7-lite"),
                Project::new("Kioxia", "CM7"),
            ]
        );
        sidebar.apply_filter("cm7");
        assert_eq!(
            visible_projects(&sidebar),
            vec![Project::new("Acme", "CM7-lite"), Project::new("Kioxia", "CM7")]
        );
    }
}
