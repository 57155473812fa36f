//! Navigation session tests against an in-memory report source.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use evdash_client::{Dashboard, Update};
use evdash_core::{Fragment, Project, ReportSource, Selection, SourceError};
use evdash_render::config_view::CONFIG_LOAD_FAILED;
use evdash_render::{PanelState, PrimaryState, RenderOptions};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct FakeSource {
    projects: Option<Vec<Project>>,
    configs: HashMap<String, Value>,
    reports: HashMap<String, Value>,
    listings: HashMap<String, Vec<String>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeSource {
    fn log(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn config_requests(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.starts_with("config "))
            .collect()
    }
}

impl ReportSource for FakeSource {
    async fn projects(&self) -> Result<Vec<Project>, SourceError> {
        self.log("projects".into());
        self.projects
            .clone()
            .ok_or_else(|| SourceError::Transport("connection refused".into()))
    }

    async fn config(&self, selection: &Selection) -> Result<Value, SourceError> {
        self.log(format!("config {}", selection.path()));
        self.configs
            .get(&selection.path())
            .cloned()
            .ok_or_else(|| SourceError::NotFound(selection.path()))
    }

    async fn fragment(&self, selection: &Selection, fragment: Fragment) -> Result<String, SourceError> {
        self.log(format!("fragment {} {}", selection.path(), fragment.file_name()));
        Ok(format!("<p>{} {}</p>", selection.path(), fragment.panel()))
    }

    async fn home_summary(&self) -> Result<String, SourceError> {
        self.log("home".into());
        Err(SourceError::NotFound("summary.html".into()))
    }

    async fn report_files(&self, selection: &Selection) -> Result<Vec<String>, SourceError> {
        self.log(format!("listing {}", selection.path()));
        Ok(self
            .listings
            .get(&selection.path())
            .cloned()
            .unwrap_or_default())
    }

    async fn report_json(&self, selection: &Selection, file: &str) -> Result<Value, SourceError> {
        self.log(format!("report {}/{file}", selection.path()));
        self.reports
            .get(file)
            .cloned()
            .ok_or_else(|| SourceError::Status {
                status: 500,
                message: "boom".into(),
            })
    }

    async fn scripts(&self) -> Result<Vec<String>, SourceError> {
        Ok(Vec::new())
    }
}

fn source() -> FakeSource {
    let mut source = FakeSource {
        projects: Some(vec![
            Project::new("Acme", "X1"),
            Project::new("Acme", "X2"),
            Project::new("Kioxia", "CM7"),
        ]),
        ..FakeSource::default()
    };
    source.configs.insert(
        "Acme/X1".into(),
        json!({"dimm_configuration": [{"id": "RDIMM", "1dpc": true}]}),
    );
    source.configs.insert("Kioxia/CM7".into(), json!({"tablists": []}));
    source.listings.insert(
        "Acme/X1".into(),
        vec!["config.json".into(), "eye.json".into(), "broken.json".into()],
    );
    source
        .reports
        .insert("eye.json".into(), json!({"tablists": []}));
    source
}

fn acme_x1() -> Selection {
    Selection::new("Acme", "X1").unwrap()
}

#[tokio::test]
async fn selecting_requests_configuration_exactly_once() {
    let source = source();
    let mut dashboard = Dashboard::new(source.clone(), RenderOptions::default());
    dashboard.load_projects().await;

    assert!(dashboard.open(acme_x1()).await.is_some());
    assert!(dashboard.open(acme_x1()).await.is_none());
    assert!(dashboard.open(acme_x1()).await.is_none());

    assert_eq!(source.config_requests(), vec!["config Acme/X1"]);
    assert_eq!(
        dashboard.sidebar().active(),
        Some(&Project::new("Acme", "X1"))
    );
}

#[tokio::test]
async fn switching_projects_fetches_the_new_one() {
    let source = source();
    let mut dashboard = Dashboard::new(source.clone(), RenderOptions::default());
    dashboard.load_projects().await;
    dashboard.open(acme_x1()).await;
    dashboard
        .open(Selection::new("Kioxia", "CM7").unwrap())
        .await;

    assert_eq!(
        source.config_requests(),
        vec!["config Acme/X1", "config Kioxia/CM7"]
    );
    assert!(dashboard.view().reports().is_empty());
    assert_eq!(dashboard.view().state(), PrimaryState::Summary);
}

#[tokio::test]
async fn stale_responses_are_discarded() {
    let source = source();
    let mut dashboard = Dashboard::new(source, RenderOptions::default());
    let first = dashboard.select(acme_x1()).unwrap();
    let updates = dashboard.fetch(&first).await;
    let second = dashboard
        .select(Selection::new("Kioxia", "CM7").unwrap())
        .unwrap();

    for update in updates {
        assert!(!dashboard.apply(&first, update));
    }
    assert!(dashboard.view().configuration().is_loading());

    for update in dashboard.fetch(&second).await {
        assert!(dashboard.apply(&second, update));
    }
    assert!(dashboard.view().configuration().ready().is_some());
}

#[tokio::test]
async fn report_tabs_settle_independently() {
    let source = source();
    let mut dashboard = Dashboard::new(source.clone(), RenderOptions::default());
    dashboard.open(acme_x1()).await;

    let reports = dashboard.view().reports();
    let files: Vec<&str> = reports.iter().map(|r| r.file.as_str()).collect();
    assert_eq!(files, vec!["eye.json", "broken.json"]);
    assert!(reports[0].state.ready().is_some());
    assert_eq!(
        reports[1].state,
        PanelState::Failed("Failed to load broken.json".into())
    );
    assert!(
        !source
            .requests()
            .iter()
            .any(|r| r == "report Acme/X1/config.json")
    );
}

#[tokio::test]
async fn missing_configuration_shows_fixed_message() {
    let source = source();
    let mut dashboard = Dashboard::new(source, RenderOptions::default());
    dashboard.open(Selection::new("Acme", "X2").unwrap()).await;
    assert_eq!(
        dashboard.view().configuration(),
        &PanelState::Failed(CONFIG_LOAD_FAILED.to_string())
    );
}

#[tokio::test]
async fn project_list_failure_marks_sidebar_failed() {
    let source = FakeSource::default();
    let mut dashboard = Dashboard::new(source, RenderOptions::default());
    assert!(!dashboard.load_projects().await);
    assert!(dashboard.sidebar().sections().is_empty());
    assert_eq!(dashboard.sidebar(), &evdash_render::Sidebar::failed());
}

#[tokio::test]
async fn report_update_for_unknown_file_is_rejected() {
    let source = source();
    let mut dashboard = Dashboard::new(source, RenderOptions::default());
    let ticket = dashboard.open(acme_x1()).await.unwrap();
    assert!(!dashboard.apply(
        &ticket,
        Update::Report {
            file: "ghost.json".into(),
            result: Ok(json!({})),
        }
    ));
}

#[tokio::test]
async fn search_applies_to_loaded_tables() {
    let source = source();
    let mut dashboard = Dashboard::new(source, RenderOptions::default());
    dashboard.open(acme_x1()).await;
    let outcome = dashboard.search("lrdimm");
    assert_eq!(outcome.visible_rows, 0);
    let outcome = dashboard.search("rdimm");
    assert_eq!(outcome.visible_rows, 1);
}
