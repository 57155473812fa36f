use std::time::Duration;

use anyhow::{Context, bail};
use evdash_client::debounce::debounced;
use evdash_client::{Dashboard, HttpSource};
use evdash_config::EvdashConfig;
use evdash_core::Selection;
use evdash_render::{DashboardView, RenderOptions};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::bootstrap::http_source;
use crate::cli::root_commands::ShowArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::dashboard::{Only, render_dashboard};
use crate::output::{output, table_options};

/// A `--sort` request: table id, column, and whether to end descending.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SortSpec<'a> {
    table: &'a str,
    column: &'a str,
    descending: bool,
}

fn parse_sort(value: &str) -> anyhow::Result<SortSpec<'_>> {
    let mut parts = value.splitn(3, ':');
    let (Some(table), Some(column)) = (parts.next(), parts.next()) else {
        bail!("--sort expects TABLE:COLUMN or TABLE:COLUMN:desc, got '{value}'");
    };
    let descending = match parts.next() {
        None | Some("asc") => false,
        Some("desc") => true,
        Some(other) => bail!("unknown sort direction '{other}' (expected 'asc' or 'desc')"),
    };
    if table.is_empty() || column.is_empty() {
        bail!("--sort expects TABLE:COLUMN, got '{value}'");
    }
    Ok(SortSpec {
        table,
        column,
        descending,
    })
}

/// Sort clicks toggle, so descending is two clicks on the same header.
fn apply_sort(view: &mut DashboardView, spec: &SortSpec<'_>) -> anyhow::Result<()> {
    let clicks = if spec.descending { 2 } else { 1 };
    for _ in 0..clicks {
        view.sort(spec.table, spec.column)
            .with_context(|| format!("cannot sort {}", spec.table))?;
    }
    Ok(())
}

fn print_view(view: &DashboardView, only: Only<'_>, flags: &GlobalFlags) -> anyhow::Result<()> {
    match flags.format {
        OutputFormat::Table => {
            println!("{}", render_dashboard(view, only, table_options()));
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Raw => output(view, flags.format),
    }
}

/// Handle `evdash show`.
pub async fn handle(
    args: &ShowArgs,
    config: &EvdashConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let selection = Selection::new(args.vendor.as_str(), args.project.as_str())?;
    let sort = args.sort.as_deref().map(parse_sort).transpose()?;
    let only = Only::parse(args.only.as_deref());

    let mut dashboard = Dashboard::new(http_source(config)?, RenderOptions::from(&config.ui));
    dashboard.load_projects().await;
    dashboard.open(selection).await;

    if let Some(sort) = &sort {
        apply_sort(dashboard.view_mut(), sort)?;
    }
    if let Some(term) = &args.search {
        dashboard.search(term);
    }
    print_view(dashboard.view(), only, flags)?;

    if args.interactive {
        let quiet = Duration::from_millis(config.ui.search_debounce_ms);
        interactive(&mut dashboard, only, flags, quiet).await?;
    }
    Ok(())
}

/// Treat each stdin line as the current search box value and reprint once
/// typing settles.
async fn interactive(
    dashboard: &mut Dashboard<HttpSource>,
    only: Only<'_>,
    flags: &GlobalFlags,
    quiet: Duration,
) -> anyhow::Result<()> {
    let (input, mut debouncer) = debounced(quiet);
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if !input.push(line) {
                break;
            }
        }
    });

    while let Some(term) = debouncer.next().await {
        let outcome = dashboard.search(&term);
        tracing::debug!(
            term = %term,
            visible = outcome.visible_rows,
            total = outcome.total_rows,
            "search applied"
        );
        print_view(dashboard.view(), only, flags)?;
    }
    reader.await.context("stdin reader failed")?;
    Ok(())
}
