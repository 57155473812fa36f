//! Tab state machines.
//!
//! A [`TabController`] owns an ordered set of tabs. Each tab names the panel
//! it controls (`aria-controls`); activation looks panels up by that id, never
//! by position. The same type drives the dashboard's primary tabs and the
//! sub-tab sets inside a configuration tablist.

use serde::Serialize;

use crate::error::RenderError;
use crate::html::{Element, el};

pub const SUMMARY_TAB: &str = "summary-tab";
pub const SUMMARY_PANEL: &str = "summary-panel";
pub const CONFIGURATION_TAB: &str = "configuration-tab";
pub const CONFIGURATION_PANEL: &str = "configuration-panel";

const REPORT_TAB_PREFIX: &str = "report-tab-";
const REPORT_PANEL_PREFIX: &str = "report-panel-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabSpec {
    pub id: String,
    pub title: String,
    /// Id of the panel this tab shows.
    pub controls: String,
    pub hidden: bool,
}

impl TabSpec {
    pub fn new(id: impl Into<String>, title: impl Into<String>, controls: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            controls: controls.into(),
            hidden: false,
        }
    }
}

/// Which primary panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum PrimaryState {
    Summary,
    Configuration,
    /// Index into the dynamic report tabs, in discovery order.
    Report(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabController {
    tabs: Vec<TabSpec>,
    active: usize,
}

impl TabController {
    /// Controller over `tabs`; the first visible tab starts active.
    #[must_use]
    pub fn new(tabs: Vec<TabSpec>) -> Self {
        let active = tabs.iter().position(|t| !t.hidden).unwrap_or(0);
        Self { tabs, active }
    }

    /// The dashboard's primary tabs: Summary, plus Configuration which stays
    /// hidden until a project is selected.
    #[must_use]
    pub fn primary() -> Self {
        let mut configuration = TabSpec::new(CONFIGURATION_TAB, "Configuration", CONFIGURATION_PANEL);
        configuration.hidden = true;
        Self::new(vec![
            TabSpec::new(SUMMARY_TAB, "Summary", SUMMARY_PANEL),
            configuration,
        ])
    }

    #[must_use]
    pub fn tabs(&self) -> &[TabSpec] {
        &self.tabs
    }

    /// The active tab, if the controller has any tabs at all.
    #[must_use]
    pub fn active(&self) -> Option<&TabSpec> {
        self.tabs.get(self.active)
    }

    #[must_use]
    pub fn active_panel(&self) -> Option<&str> {
        self.active().map(|t| t.controls.as_str())
    }

    #[must_use]
    pub fn is_panel_active(&self, panel: &str) -> bool {
        self.active_panel() == Some(panel)
    }

    /// Activate the tab with `id`, deactivating every other tab and panel.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownTab`] or [`RenderError::HiddenTab`];
    /// the active tab is unchanged in both cases.
    pub fn activate(&mut self, id: &str) -> Result<(), RenderError> {
        let index = self
            .tabs
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| RenderError::UnknownTab(id.to_string()))?;
        if self.tabs[index].hidden {
            return Err(RenderError::HiddenTab(id.to_string()));
        }
        self.active = index;
        Ok(())
    }

    /// Show or hide a tab. Hiding the active tab falls back to the first
    /// visible one.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownTab`] if no tab has `id`.
    pub fn set_hidden(&mut self, id: &str, hidden: bool) -> Result<(), RenderError> {
        let tab = self
            .tabs
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| RenderError::UnknownTab(id.to_string()))?;
        tab.hidden = hidden;
        if self.tabs.get(self.active).is_some_and(|t| t.hidden) {
            self.active = self.tabs.iter().position(|t| !t.hidden).unwrap_or(0);
        }
        Ok(())
    }

    /// Primary controller only: show Configuration when a project is
    /// selected.
    pub fn set_configuration_visible(&mut self, visible: bool) {
        if let Some(tab) = self.tabs.iter_mut().find(|t| t.id == CONFIGURATION_TAB) {
            tab.hidden = !visible;
        }
        if self.tabs.get(self.active).is_some_and(|t| t.hidden) {
            self.active = 0;
        }
    }

    /// Primary controller only: append a tab for a discovered report file.
    /// Returns the new tab's id.
    pub fn push_report_tab(&mut self, title: impl Into<String>) -> String {
        let index = self.report_count();
        let id = format!("{REPORT_TAB_PREFIX}{index}");
        self.tabs.push(TabSpec::new(
            id.clone(),
            title,
            format!("{REPORT_PANEL_PREFIX}{index}"),
        ));
        id
    }

    #[must_use]
    pub fn report_count(&self) -> usize {
        self.tabs
            .iter()
            .filter(|t| t.id.starts_with(REPORT_TAB_PREFIX))
            .count()
    }

    /// Primary controller only: drop report tabs and return to Summary.
    pub fn reset(&mut self) {
        self.tabs.retain(|t| !t.id.starts_with(REPORT_TAB_PREFIX));
        self.active = self
            .tabs
            .iter()
            .position(|t| t.id == SUMMARY_TAB)
            .unwrap_or(0);
    }

    /// Primary controller only: the active tab as a state.
    #[must_use]
    pub fn state(&self) -> PrimaryState {
        let Some(tab) = self.active() else {
            return PrimaryState::Summary;
        };
        if tab.id == CONFIGURATION_TAB {
            return PrimaryState::Configuration;
        }
        tab.id
            .strip_prefix(REPORT_TAB_PREFIX)
            .and_then(|n| n.parse().ok())
            .map_or(PrimaryState::Summary, PrimaryState::Report)
    }

    /// Render the tab strip. `href` gives each tab's link target.
    pub fn to_element(&self, href: impl Fn(&TabSpec) -> String) -> Element {
        el("nav").class("tabs").attr("role", "tablist").children(
            self.tabs.iter().enumerate().map(|(index, tab)| {
                let selected = index == self.active;
                el("a")
                    .id(tab.id.clone())
                    .class(if selected { "tab active" } else { "tab" })
                    .attr("role", "tab")
                    .attr("href", href(tab))
                    .attr("aria-selected", selected.to_string())
                    .attr("aria-controls", tab.controls.clone())
                    .flag(tab.hidden, "hidden")
                    .text(tab.title.clone())
            }),
        )
    }
}

/// Whether `id` names one of the dashboard's primary tabs rather than a
/// sub-tab inside a panel.
#[must_use]
pub fn is_primary_tab(id: &str) -> bool {
    id == SUMMARY_TAB
        || id == CONFIGURATION_TAB
        || id
            .strip_prefix(REPORT_TAB_PREFIX)
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Report panel id for the `index`-th report tab.
#[must_use]
pub fn report_panel_id(index: usize) -> String {
    format!("{REPORT_PANEL_PREFIX}{index}")
}
