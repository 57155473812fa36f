//! Navigation session: project selection, panel loading and stale-response
//! handling.
//!
//! Every fetch dispatched for a selection carries a [`Ticket`]. Selecting a
//! different project bumps the generation, so results that arrive for an
//! earlier selection are recognized and dropped instead of overwriting the
//! current view.

use evdash_core::{Fragment, ReportSource, Selection, SourceError};
use evdash_render::{DashboardView, RenderOptions, Sidebar};
use serde_json::Value;

use crate::discovery::{discover, spawn_fetches};

/// Identifies the selection a fetch was dispatched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub selection: Selection,
    pub generation: u64,
}

/// A fetch result waiting to be applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Summary(Result<String, SourceError>),
    Configuration(Result<Value, SourceError>),
    ReportFiles(Result<Vec<String>, SourceError>),
    Report {
        file: String,
        result: Result<Value, SourceError>,
    },
}

/// Dashboard state driven by a [`ReportSource`].
#[derive(Debug)]
pub struct Dashboard<S> {
    source: S,
    sidebar: Sidebar,
    view: DashboardView,
    options: RenderOptions,
    generation: u64,
}

impl<S: ReportSource> Dashboard<S> {
    #[must_use]
    pub fn new(source: S, options: RenderOptions) -> Self {
        Self {
            source,
            sidebar: Sidebar::new(&[]),
            view: DashboardView::home(options.clone()),
            options,
            generation: 0,
        }
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    pub const fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub const fn sidebar_mut(&mut self) -> &mut Sidebar {
        &mut self.sidebar
    }

    pub const fn view(&self) -> &DashboardView {
        &self.view
    }

    pub const fn view_mut(&mut self) -> &mut DashboardView {
        &mut self.view
    }

    /// Fetch the project list into the sidebar. On failure the sidebar shows
    /// its failure message and no sections.
    pub async fn load_projects(&mut self) -> bool {
        match self.source.projects().await {
            Ok(projects) => {
                tracing::debug!(count = projects.len(), "projects loaded");
                self.sidebar = Sidebar::new(&projects);
                true
            }
            Err(error) => {
                tracing::warn!(%error, "failed to load projects");
                self.sidebar = Sidebar::failed();
                false
            }
        }
    }

    /// Load the home summary shown before any project is selected.
    pub async fn load_home(&mut self) {
        let result = self.source.home_summary().await;
        if let Err(error) = &result {
            tracing::warn!(%error, "failed to load home summary");
        }
        self.view.set_summary(Fragment::Summary, result);
    }

    /// The ticket of the active selection, if any.
    #[must_use]
    pub fn current_ticket(&self) -> Option<Ticket> {
        self.view.selection().map(|selection| Ticket {
            selection: selection.clone(),
            generation: self.generation,
        })
    }

    #[must_use]
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation && self.view.selection() == Some(&ticket.selection)
    }

    /// Make `selection` active. Returns `None` when it already is, so a
    /// repeated click never triggers another fetch.
    pub fn select(&mut self, selection: Selection) -> Option<Ticket> {
        if self.view.selection() == Some(&selection) {
            tracing::debug!(%selection, "project already active");
            return None;
        }
        if let Err(error) = self.sidebar.select(&selection) {
            tracing::debug!(%error, "selection not listed in sidebar");
        }
        self.generation += 1;
        self.view.select(selection.clone());
        Some(Ticket {
            selection,
            generation: self.generation,
        })
    }

    /// Fetch summary, configuration and report listing concurrently.
    /// Issues exactly one configuration request.
    pub async fn fetch(&self, ticket: &Ticket) -> Vec<Update> {
        let selection = &ticket.selection;
        let (summary, configuration, files) = tokio::join!(
            self.source.fragment(selection, Fragment::Summary),
            self.source.config(selection),
            discover(&self.source, selection),
        );
        vec![
            Update::Summary(summary),
            Update::Configuration(configuration),
            Update::ReportFiles(files),
        ]
    }

    /// Apply one update if its ticket is still current. Returns whether it
    /// was applied.
    pub fn apply(&mut self, ticket: &Ticket, update: Update) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                selection = %ticket.selection,
                generation = ticket.generation,
                current = self.generation,
                "discarding stale response"
            );
            return false;
        }
        let selection = &ticket.selection;
        match update {
            Update::Summary(result) => {
                if let Err(error) = &result {
                    tracing::warn!(vendor = %selection.vendor, project = %selection.name, %error, "failed to load summary");
                }
                self.view.set_summary(Fragment::Summary, result);
            }
            Update::Configuration(result) => {
                if let Err(error) = &result {
                    tracing::warn!(vendor = %selection.vendor, project = %selection.name, %error, "failed to load configuration");
                }
                self.view.set_configuration(result);
            }
            Update::ReportFiles(Ok(files)) => self.view.set_report_files(&files),
            Update::ReportFiles(Err(error)) => {
                tracing::warn!(vendor = %selection.vendor, project = %selection.name, %error, "report discovery failed");
                self.view.set_report_listing_failed();
            }
            Update::Report { file, result } => {
                if let Err(error) = self.view.set_report(&file, result) {
                    tracing::debug!(%error, "report result without a tab");
                    return false;
                }
            }
        }
        true
    }

    /// Select a project and load everything it shows: summary,
    /// configuration, and one tab per discovered report file. Report tabs are
    /// added before their documents arrive and settle independently.
    pub async fn open(&mut self, selection: Selection) -> Option<Ticket> {
        let ticket = self.select(selection)?;
        for update in self.fetch(&ticket).await {
            self.apply(&ticket, update);
        }
        self.load_reports(&ticket).await;
        Some(ticket)
    }

    /// Fetch every report tab of the current selection concurrently.
    pub async fn load_reports(&mut self, ticket: &Ticket) {
        let files: Vec<String> = self
            .view
            .reports()
            .iter()
            .map(|tab| tab.file.clone())
            .collect();
        let mut set = spawn_fetches(&self.source, &ticket.selection, &files);
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((file, result)) => {
                    self.apply(ticket, Update::Report { file, result });
                }
                Err(error) => tracing::warn!(%error, "report task failed"),
            }
        }
    }

    /// Apply a debounced search term to every rendered table.
    pub fn search(&mut self, term: &str) -> evdash_render::search::SearchOutcome {
        self.view.apply_search(term)
    }

    /// Options used for every table this session renders.
    #[must_use]
    pub const fn options(&self) -> &RenderOptions {
        &self.options
    }
}
