//! Terminal rendering of a loaded dashboard.

use std::fmt::Write as _;

use evdash_core::report_file::tab_title;
use evdash_render::config_view::{ConfigSection, NO_DATA, PanelContent};
use evdash_render::dashboard::{LOADING, NO_REPORTS};
use evdash_render::search::NO_RESULTS;
use evdash_render::{ConfigView, DashboardView, PanelState};

use super::table::{TableOptions, render_view};

/// Which panels `render_dashboard` prints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Only<'a> {
    All,
    Configuration,
    Report(&'a str),
}

impl<'a> Only<'a> {
    #[must_use]
    pub fn parse(value: Option<&'a str>) -> Self {
        match value {
            None => Self::All,
            Some("configuration" | "config") => Self::Configuration,
            Some(file) => Self::Report(file),
        }
    }
}

/// Every configuration and report table, with headings and the same
/// loading, failure and no-results messages the HTML view shows. Each table
/// is preceded by its `[id]`, the name `--sort` takes.
#[must_use]
pub fn render_dashboard(view: &DashboardView, only: Only<'_>, options: TableOptions) -> String {
    let mut out = String::new();
    if matches!(only, Only::All | Only::Configuration) {
        let _ = writeln!(out, "== Configuration ==");
        write_state(&mut out, view.configuration(), options);
    }
    if only == Only::Configuration {
        return out.trim_end().to_string();
    }

    if view.reports().is_empty() && only == Only::All {
        let _ = writeln!(out, "{NO_REPORTS}");
    }
    for report in view.reports() {
        if let Only::Report(file) = only {
            if report.file != file {
                continue;
            }
        }
        let _ = writeln!(out, "\n== {} ({}) ==", tab_title(&report.file), report.file);
        write_state(&mut out, &report.state, options);
    }
    out.trim_end().to_string()
}

fn write_state(out: &mut String, state: &PanelState<ConfigView>, options: TableOptions) {
    match state {
        PanelState::Loading => {
            let _ = writeln!(out, "{LOADING}");
        }
        PanelState::Failed(message) => {
            let _ = writeln!(out, "{message}");
        }
        PanelState::Ready(config) => {
            for section in config.sections() {
                write_section(out, section, options);
            }
        }
    }
}

fn write_section(out: &mut String, section: &ConfigSection, options: TableOptions) {
    let _ = writeln!(out, "\n## {}", section.title);
    if section.no_results {
        let _ = writeln!(out, "{NO_RESULTS}");
    }
    for panel in &section.panels {
        if let Some(tabs) = &section.sub_tabs {
            if let Some(tab) = tabs.tabs().iter().find(|t| t.controls == panel.id) {
                let _ = writeln!(out, "\n### {}", tab.title);
            }
        }
        match &panel.content {
            PanelContent::Table(table) => {
                let _ = writeln!(out, "[{}]", table.id());
                let _ = writeln!(out, "{}", render_view(table, options));
            }
            PanelContent::Empty(table) => {
                let _ = writeln!(out, "[{}]", table.id());
                let _ = writeln!(out, "{NO_DATA}");
                let _ = writeln!(out, "{}", render_view(table, options));
            }
            PanelContent::Json { pretty } => {
                let _ = writeln!(out, "{pretty}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use evdash_core::{Selection, SourceError};
    use evdash_render::RenderOptions;
    use serde_json::json;

    use super::*;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    fn view() -> DashboardView {
        let mut view = DashboardView::for_selection(
            Selection::new("Acme", "X1").unwrap(),
            RenderOptions::default(),
        );
        view.set_configuration(Ok(json!({
            "dimm_configuration": [
                {"id": "RDIMM", "vendor": "Acme", "description": "16GB", "pn": "M1", "1dpc": true},
                {"id": "UDIMM", "vendor": "Acme", "description": "8GB", "pn": "M2"}
            ]
        })));
        view.set_report_files(&["eye.json".into(), "loss.json".into()]);
        view.set_report(
            "eye.json",
            Ok(json!({"tablists": [{"id": "lanes", "title": "Lanes", "tabs": [
                {"id": "gen5", "title": "Gen5", "content": [{"lane": 0, "margin": 12.5}]},
                {"id": "gen4", "title": "Gen4", "content": []}
            ]}]})),
        )
        .unwrap();
        view.set_report("loss.json", Err(SourceError::NotFound("loss.json".into())))
            .unwrap();
        view
    }

    #[test]
    fn prints_every_panel_with_headings() {
        let out = render_dashboard(&view(), Only::All, PLAIN);
        assert!(out.starts_with("== Configuration =="));
        assert!(out.contains("RDIMM"));
        assert!(out.contains("== eye (eye.json) =="));
        assert!(out.contains("### Gen5"));
        assert!(out.contains("### Gen4\n[report-0-gen4-table]\nNo data available for this category."));
        assert!(out.contains("[config-dimm-configuration]"));
        assert!(out.contains("### Gen5\n[report-0-gen5-table]"));
        assert!(out.contains("== loss (loss.json) ==\nFailed to load loss.json"));
    }

    #[test]
    fn search_hides_rows_and_marks_sections() {
        let mut view = view();
        view.apply_search("udimm");
        let out = render_dashboard(&view, Only::Configuration, PLAIN);
        assert!(out.contains("UDIMM"));
        assert!(!out.contains("RDIMM"));
        assert!(out.contains(NO_RESULTS));
        assert!(!out.contains("eye.json"));
    }

    #[test]
    fn only_one_report() {
        let out = render_dashboard(&view(), Only::parse(Some("eye.json")), PLAIN);
        assert!(!out.contains("== Configuration =="));
        assert!(out.contains("Gen5"));
        assert!(!out.contains("loss.json"));
    }

    #[test]
    fn empty_listing_is_reported() {
        let mut view = DashboardView::for_selection(
            Selection::new("Acme", "X1").unwrap(),
            RenderOptions::default(),
        );
        view.set_report_files(&[]);
        let out = render_dashboard(&view, Only::All, PLAIN);
        assert!(out.contains(LOADING));
        assert!(out.ends_with(NO_REPORTS));
    }
}
