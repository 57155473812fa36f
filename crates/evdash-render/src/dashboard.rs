//! The main panel: primary tabs and what each of them shows.
//!
//! Content arrives asynchronously, so every panel is a [`PanelState`] that
//! starts as `Loading` and is settled by the caller once the fetch completes.
//! Ids inside the Configuration panel start with `config-`; ids inside the
//! `n`-th report panel start with `report-n-`.

use evdash_core::report_file::tab_title;
use evdash_core::{Fragment, Selection, SourceError};
use serde::Serialize;
use serde_json::Value;

use crate::config_view::{CONFIG_LOAD_FAILED, ConfigView, RenderOptions};
use crate::error::RenderError;
use crate::html::{Element, Node, el};
use crate::links::ViewLinks;
use crate::search::SearchOutcome;
use crate::tabs::{
    CONFIGURATION_PANEL, PrimaryState, SUMMARY_PANEL, TabController, TabSpec, report_panel_id,
};

pub const LOADING: &str = "Loading...";
pub const NO_REPORTS: &str = "No report JSON found.";

/// Id prefix of everything inside the Configuration panel.
pub const CONFIGURATION_SCOPE: &str = "config";

/// Id prefix of everything inside the `index`-th report panel.
#[must_use]
pub fn report_scope(index: usize) -> String {
    format!("report-{index}")
}

/// Message for a fragment that failed to load.
#[must_use]
pub fn fragment_failed(fragment: Fragment) -> String {
    format!(
        "Failed to load {}. Please check the file path or server.",
        fragment.panel()
    )
}

/// Message for a report tab whose document failed to load.
#[must_use]
pub fn report_failed(file: &str) -> String {
    format!("Failed to load {file}")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum PanelState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> PanelState<T> {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub const fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTab {
    pub file: String,
    pub tab_id: String,
    pub state: PanelState<ConfigView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    selection: Option<Selection>,
    tabs: TabController,
    /// Trusted summary markup.
    summary: PanelState<String>,
    configuration: PanelState<ConfigView>,
    reports: Vec<ReportTab>,
    /// `Some(true)` once discovery finished with no report files.
    reports_empty: Option<bool>,
    search_term: String,
    #[serde(skip)]
    options: RenderOptions,
}

impl DashboardView {
    /// The Dashboard state: no project, Summary showing the home summary.
    #[must_use]
    pub fn home(options: RenderOptions) -> Self {
        Self {
            selection: None,
            tabs: TabController::primary(),
            summary: PanelState::Loading,
            configuration: PanelState::Loading,
            reports: Vec::new(),
            reports_empty: None,
            search_term: String::new(),
            options,
        }
    }

    /// A project view with every panel loading and Summary active.
    #[must_use]
    pub fn for_selection(selection: Selection, options: RenderOptions) -> Self {
        let mut view = Self::home(options);
        view.select(selection);
        view
    }

    /// Switch to `selection`: tabs reset to Summary, report tabs are dropped
    /// and every panel goes back to loading.
    pub fn select(&mut self, selection: Selection) {
        self.tabs.reset();
        self.tabs.set_configuration_visible(true);
        self.selection = Some(selection);
        self.summary = PanelState::Loading;
        self.configuration = PanelState::Loading;
        self.reports.clear();
        self.reports_empty = None;
    }

    #[must_use]
    pub const fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    #[must_use]
    pub const fn tabs(&self) -> &TabController {
        &self.tabs
    }

    #[must_use]
    pub fn state(&self) -> PrimaryState {
        self.tabs.state()
    }

    #[must_use]
    pub const fn summary(&self) -> &PanelState<String> {
        &self.summary
    }

    #[must_use]
    pub const fn configuration(&self) -> &PanelState<ConfigView> {
        &self.configuration
    }

    #[must_use]
    pub fn reports(&self) -> &[ReportTab] {
        &self.reports
    }

    /// Activate a primary tab.
    ///
    /// # Errors
    ///
    /// See [`TabController::activate`].
    pub fn activate(&mut self, tab_id: &str) -> Result<(), RenderError> {
        self.tabs.activate(tab_id)
    }

    /// Settle the Summary panel.
    pub fn set_summary(&mut self, fragment: Fragment, result: Result<String, SourceError>) {
        self.summary = match result {
            Ok(markup) => PanelState::Ready(markup),
            Err(_) => PanelState::Failed(fragment_failed(fragment)),
        };
    }

    /// Settle the Configuration panel from the fetched document.
    pub fn set_configuration(&mut self, result: Result<Value, SourceError>) {
        let Some(selection) = self.selection.clone() else {
            return;
        };
        self.configuration = match result {
            Ok(value) => {
                let mut view =
                    ConfigView::from_value_in(CONFIGURATION_SCOPE, &selection, value, &self.options);
                view.apply_search(&self.search_term);
                PanelState::Ready(view)
            }
            Err(_) => PanelState::Failed(CONFIG_LOAD_FAILED.to_string()),
        };
    }

    /// Add a loading tab per discovered report file, in listing order.
    pub fn set_report_files(&mut self, files: &[String]) {
        self.reports_empty = Some(files.is_empty());
        for file in files {
            let tab_id = self.tabs.push_report_tab(tab_title(file));
            self.reports.push(ReportTab {
                file: file.clone(),
                tab_id,
                state: PanelState::Loading,
            });
        }
    }

    /// Report discovery itself failed; shown like an empty listing.
    pub fn set_report_listing_failed(&mut self) {
        self.reports_empty = Some(true);
    }

    /// Settle one report tab. Other tabs are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownTab`] if `file` has no tab.
    pub fn set_report(&mut self, file: &str, result: Result<Value, SourceError>) -> Result<(), RenderError> {
        let Some(selection) = self.selection.clone() else {
            return Err(RenderError::UnknownTab(file.to_string()));
        };
        let (index, tab) = self
            .reports
            .iter_mut()
            .enumerate()
            .find(|(_, t)| t.file == file)
            .ok_or_else(|| RenderError::UnknownTab(file.to_string()))?;
        tab.state = match result {
            Ok(value) => {
                let mut view =
                    ConfigView::from_value_in(&report_scope(index), &selection, value, &self.options);
                view.apply_search(&self.search_term);
                PanelState::Ready(view)
            }
            Err(_) => PanelState::Failed(report_failed(file)),
        };
        Ok(())
    }

    /// Apply one search term across every rendered table.
    pub fn apply_search(&mut self, term: &str) -> SearchOutcome {
        self.search_term = term.trim().to_string();
        let mut outcome = SearchOutcome::default();
        if let Some(view) = self.configuration.ready_mut() {
            outcome = outcome.merge(view.apply_search(term));
        }
        for tab in &mut self.reports {
            if let Some(view) = tab.state.ready_mut() {
                outcome = outcome.merge(view.apply_search(term));
            }
        }
        outcome
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Toggle sorting of a column in whichever panel holds `table_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownTable`] if no ready panel has the table.
    pub fn sort(&mut self, table_id: &str, column: &str) -> Result<(), RenderError> {
        let views = self
            .configuration
            .ready_mut()
            .into_iter()
            .chain(self.reports.iter_mut().filter_map(|t| t.state.ready_mut()));
        for view in views {
            if view.table(table_id).is_some() {
                return view.sort(table_id, column);
            }
        }
        Err(RenderError::UnknownTable(table_id.to_string()))
    }

    /// Activate a sub-tab in whichever panel owns it.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownTab`] if no ready panel has the tab.
    pub fn activate_sub_tab(&mut self, tab_id: &str) -> Result<(), RenderError> {
        let views = self
            .configuration
            .ready_mut()
            .into_iter()
            .chain(self.reports.iter_mut().filter_map(|t| t.state.ready_mut()));
        for view in views {
            if view.activate_sub_tab(tab_id).is_ok() {
                return Ok(());
            }
        }
        Err(RenderError::UnknownTab(tab_id.to_string()))
    }

    /// Render the tab strip and every panel. `tab_href` gives link targets
    /// for primary and sub-tabs alike.
    pub fn to_element(&self, tab_href: impl Fn(&TabSpec) -> String) -> Element {
        self.to_element_with(&tab_href)
    }

    /// Render with tabs and sortable column headers linked through `links`.
    pub fn to_element_with<L: ViewLinks>(&self, links: &L) -> Element {
        let mut main = el("main")
            .class("dashboard")
            .child(self.tabs.to_element(|tab| links.tab(tab)))
            .child(self.panel(SUMMARY_PANEL).child(match &self.summary {
                PanelState::Loading => loading(),
                PanelState::Ready(markup) => Node::Raw(markup.clone()),
                PanelState::Failed(message) => failure(message),
            }));

        if self.selection.is_some() {
            let mut configuration =
                self.panel(CONFIGURATION_PANEL).child(view_node(&self.configuration, links));
            if self.reports_empty == Some(true) {
                configuration =
                    configuration.child(el("p").class("no-reports").text(NO_REPORTS));
            }
            main = main.child(configuration);
        }

        main.children(self.reports.iter().enumerate().map(|(index, tab)| {
            self.panel(&report_panel_id(index))
                .child(view_node(&tab.state, links))
        }))
    }

    fn panel(&self, id: &str) -> Element {
        el("div")
            .class("tab-panel")
            .id(id.to_string())
            .attr("role", "tabpanel")
            .flag(!self.tabs.is_panel_active(id), "hidden")
    }
}

fn loading() -> Node {
    el("p").class("loading").text(LOADING).into()
}

fn failure(message: &str) -> Node {
    el("p").class("error").text(message.to_string()).into()
}

fn view_node<L: ViewLinks>(state: &PanelState<ConfigView>, links: &L) -> Node {
    match state {
        PanelState::Loading => loading(),
        PanelState::Ready(view) => view.to_element_with(links).into(),
        PanelState::Failed(message) => failure(message),
    }
}
