//! Server-rendered pages.
//!
//! Each page request runs a fresh navigation session against the report
//! store, then applies the query string to the resulting view before
//! rendering it. Page state lives entirely in the URL, so every link is
//! shareable: tabs, sort headers and sidebar headers all link to the current
//! query with one parameter changed.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, header};
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect};
use evdash_client::Dashboard;
use evdash_core::theme::THEME_KEY;
use evdash_core::{Project, Selection, Theme};
use evdash_render::html::el;
use evdash_render::tabs::is_primary_tab;
use evdash_render::{
    Column, DashboardView, GeneratorPanel, Layout, ScriptList, Sidebar, SidebarLinks,
    SortDirection, TabSpec, ViewLinks,
};
use evdash_store::ReportStore;
use serde::Deserialize;

use crate::AppState;
use crate::error::ServerError;

const TITLE: &str = "evdash";
const SCRIPTS_FAILED: &str = "Failed to load scripts";
const THEME_COOKIE_MAX_AGE: u64 = 365 * 24 * 60 * 60;

/// Query string of the dashboard pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageQuery {
    /// Active primary tab id.
    pub tab: Option<String>,
    /// Active sub-tab id inside the configuration or a report panel.
    pub sub: Option<String>,
    /// Table search term.
    pub q: Option<String>,
    /// Id of the table to sort.
    pub sort: Option<String>,
    /// Column key or label to sort by.
    pub col: Option<String>,
    /// `asc` (default) or `desc`.
    pub dir: Option<String>,
    /// Sidebar project-name filter.
    pub projects: Option<String>,
    /// Comma-separated indices of the expanded sidebar sections. When
    /// present it replaces the default expansion.
    pub open: Option<String>,
}

impl PageQuery {
    /// Apply tab, sort and search parameters. Unknown ids are ignored.
    pub fn apply(&self, view: &mut DashboardView) {
        if let Some(tab) = &self.tab {
            if let Err(error) = view.activate(tab) {
                tracing::debug!(%error, "ignoring tab parameter");
            }
        }
        if let Some(sub) = &self.sub {
            if let Err(error) = view.activate_sub_tab(sub) {
                tracing::debug!(%error, "ignoring sub-tab parameter");
            }
        }
        if let (Some(table), Some(column)) = (&self.sort, &self.col) {
            let clicks = if self.dir.as_deref() == Some("desc") { 2 } else { 1 };
            for _ in 0..clicks {
                if let Err(error) = view.sort(table, column) {
                    tracing::debug!(%error, "ignoring sort parameter");
                    break;
                }
            }
        }
        if let Some(term) = &self.q {
            view.apply_search(term);
        }
    }

    /// Apply the project filter and the expanded sections.
    pub fn apply_sidebar(&self, sidebar: &mut Sidebar) {
        if let Some(term) = self.projects.as_deref().filter(|t| !t.trim().is_empty()) {
            sidebar.apply_filter(term);
        }
        if let Some(open) = self.open_sections() {
            sidebar.set_expanded_sections(&open);
        }
    }

    /// Parsed `open`; entries that are not indices are skipped.
    #[must_use]
    pub fn open_sections(&self) -> Option<Vec<usize>> {
        self.open.as_deref().map(|open| {
            open.split(',')
                .filter_map(|index| index.trim().parse().ok())
                .collect()
        })
    }

    /// Parameters in a fixed order. Empty values are dropped, except `open`,
    /// where empty means every section collapsed.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("tab", &self.tab),
            ("sub", &self.sub),
            ("q", &self.q),
            ("sort", &self.sort),
            ("col", &self.col),
            ("dir", &self.dir),
            ("projects", &self.projects),
            ("open", &self.open),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty() || key == "open")
                .map(|v| (key, v.to_string()))
        })
        .collect()
    }

    /// Parameters other than `skip`, for hidden form inputs.
    #[must_use]
    pub fn pairs_except(&self, skip: &[&str]) -> Vec<(&'static str, String)> {
        self.pairs()
            .into_iter()
            .filter(|(key, _)| !skip.contains(key))
            .collect()
    }

    /// `base` with this query appended.
    #[must_use]
    pub fn href(&self, base: &str) -> String {
        let query = self
            .pairs()
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        if query.is_empty() {
            base.to_string()
        } else {
            format!("{base}?{query}")
        }
    }

    fn with(&self, edit: impl FnOnce(&mut Self)) -> Self {
        let mut next = self.clone();
        edit(&mut next);
        next
    }

    /// Link for a tab on the page at `base`. Primary tabs replace `tab`,
    /// sub-tabs replace `sub`; everything else is carried.
    #[must_use]
    pub fn tab_href(&self, base: &str, spec: &TabSpec) -> String {
        let id = Some(spec.id.clone());
        if is_primary_tab(&spec.id) {
            self.with(|q| q.tab = id).href(base)
        } else {
            self.with(|q| q.sub = id).href(base)
        }
    }

    /// Link that sorts `table` by `column` in `direction`.
    #[must_use]
    pub fn sort_href(&self, base: &str, table: &str, column: &str, direction: SortDirection) -> String {
        self.with(|q| {
            q.sort = Some(table.to_string());
            q.col = Some(column.to_string());
            q.dir = Some(
                match direction {
                    SortDirection::Ascending => "asc",
                    SortDirection::Descending => "desc",
                }
                .to_string(),
            );
        })
        .href(base)
    }

    /// Link to the page at `base` with exactly `expanded` sidebar sections
    /// open.
    #[must_use]
    pub fn sections_href(&self, base: &str, expanded: &[usize]) -> String {
        let open = expanded
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.with(|q| q.open = Some(open)).href(base)
    }

    /// Link to a project's page, keeping the sidebar filter.
    #[must_use]
    pub fn project_href(&self, project: &Project) -> String {
        let carried = Self {
            projects: self.projects.clone(),
            ..Self::default()
        };
        carried.href(&project_href(project))
    }
}

/// Link targets of one rendered page.
struct PageLinks<'a> {
    base: &'a str,
    query: &'a PageQuery,
}

impl ViewLinks for PageLinks<'_> {
    fn tab(&self, tab: &TabSpec) -> String {
        self.query.tab_href(self.base, tab)
    }

    fn sort(&self, table: &str, column: &Column, direction: SortDirection) -> Option<String> {
        Some(self.query.sort_href(self.base, table, &column.key, direction))
    }
}

impl SidebarLinks for PageLinks<'_> {
    fn project(&self, project: &Project) -> String {
        self.query.project_href(project)
    }

    fn sections(&self, expanded: &[usize]) -> Option<String> {
        Some(self.query.sections_href(self.base, expanded))
    }

    fn filter_fields(&self) -> Vec<(&'static str, String)> {
        self.query.pairs_except(&["projects", "open"])
    }
}

/// Location of a project's dashboard page.
#[must_use]
pub fn project_href(project: &Project) -> String {
    format!(
        "/dashboard/{}/{}",
        urlencoding::encode(&project.vendor),
        urlencoding::encode(&project.name)
    )
}

/// Theme preference carried by the `theme` cookie. Light when absent.
#[must_use]
pub fn theme_from(headers: &HeaderMap) -> Theme {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix(THEME_KEY)?.strip_prefix('='))
        .find_map(|value| value.parse().ok())
        .unwrap_or_default()
}

async fn session(state: &AppState) -> Dashboard<ReportStore> {
    let mut dashboard = Dashboard::new(state.store.clone(), state.options.clone());
    dashboard.load_projects().await;
    dashboard
}

pub(crate) async fn home(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let mut dashboard = session(&state).await;
    dashboard.load_home().await;
    query.apply(dashboard.view_mut());
    query.apply_sidebar(dashboard.sidebar_mut());

    let links = PageLinks {
        base: "/",
        query: &query,
    };
    let main = dashboard.view().to_element_with(&links);
    let sidebar = dashboard.sidebar().to_element_with(&links);
    Html(
        Layout::new(TITLE, theme_from(&headers))
            .with_search_term(query.q.clone().unwrap_or_default())
            .with_search_form("/", query.pairs_except(&["q"]))
            .render(sidebar, main),
    )
}

pub(crate) async fn dashboard(
    State(state): State<AppState>,
    Path((vendor, project)): Path<(String, String)>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, ServerError> {
    let selection = Selection::new(vendor, project)?;
    let base = project_href(&Project::new(
        selection.vendor.as_str(),
        selection.name.as_str(),
    ));
    let mut dashboard = session(&state).await;
    dashboard.open(selection.clone()).await;
    query.apply(dashboard.view_mut());
    query.apply_sidebar(dashboard.sidebar_mut());

    let links = PageLinks {
        base: &base,
        query: &query,
    };
    let main = dashboard.view().to_element_with(&links);
    let sidebar = dashboard.sidebar().to_element_with(&links);
    let layout = Layout::new(format!("{TITLE}: {selection}"), theme_from(&headers))
        .with_search_term(query.q.clone().unwrap_or_default())
        .with_search_form(base.clone(), query.pairs_except(&["q"]));
    Ok(Html(layout.render(sidebar, main)))
}

pub(crate) async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let mut dashboard = session(&state).await;
    query.apply_sidebar(dashboard.sidebar_mut());
    let scripts = match state.store.list_scripts().await {
        Ok(scripts) => ScriptList::Ready { scripts },
        Err(error) => {
            tracing::warn!(%error, "failed to load scripts");
            ScriptList::Failed {
                message: SCRIPTS_FAILED.to_string(),
            }
        }
    };
    let main = el("main")
        .class("dashboard")
        .child(GeneratorPanel::new(scripts).to_element());
    let sidebar = dashboard.sidebar().to_element_with(&PageLinks {
        base: "/generate",
        query: &query,
    });
    Html(Layout::new(format!("{TITLE}: Generate Report"), theme_from(&headers)).render(sidebar, main))
}

/// Flip the theme cookie and go back to the page the toggle was on.
pub(crate) async fn toggle_theme(headers: HeaderMap) -> impl IntoResponse {
    let theme = theme_from(&headers).toggled();
    let cookie =
        format!("{THEME_KEY}={theme}; Path=/; Max-Age={THEME_COOKIE_MAX_AGE}; SameSite=Lax");
    let target = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .map_or_else(|| "/".to_string(), local_path);
    tracing::debug!(%theme, %target, "theme toggled");
    (
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Redirect::to(&target),
    )
}

/// Path and query of a referer, so redirects never leave this host.
fn local_path(referer: &str) -> String {
    let rest = referer
        .split_once("://")
        .map_or(referer, |(_, after_scheme)| {
            after_scheme.find('/').map_or("", |i| &after_scheme[i..])
        });
    if rest.starts_with('/') && !rest.starts_with("//") {
        rest.to_string()
    } else {
        "/".to_string()
    }
}
