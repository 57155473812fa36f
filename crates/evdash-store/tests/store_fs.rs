//! Filesystem store tests against a temporary report tree.

use std::fs;
use std::path::Path;

use evdash_config::ServerConfig;
use evdash_core::{Fragment, Project, ReportSource, Selection, SourceError};
use evdash_store::{GenerateRequest, ReportStore, StoreError, Upload};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn fixture() -> (TempDir, ReportStore) {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "data/projects.json",
        r#"[{"name": "X1", "vendor": "Acme"}, {"name": "CM7", "vendor": "Kioxia"}]"#,
    );
    write(root, "summary.html", "<h1>Overview</h1>");
    write(root, "reports/Acme/X1/config.json", r#"{"dimm_configuration": []}"#);
    write(root, "reports/Acme/X1/summary.html", "<p>X1 summary</p>");
    write(root, "reports/Acme/X1/pcie.json", r#"{"tablists": []}"#);
    write(root, "reports/Acme/X1/ddr.json", "not json");
    write(root, "reports/Acme/X1/notes.txt", "n");
    write(root, "autoscript/MemEye.py", "");
    write(root, "autoscript/LMT.py", "");
    write(root, "autoscript/README.md", "");
    let store = ReportStore::new(&ServerConfig::default().with_root(root));
    (dir, store)
}

fn x1() -> Selection {
    Selection::new("Acme", "X1").unwrap()
}

#[tokio::test]
async fn lists_projects_in_file_order() {
    let (_dir, store) = fixture();
    let projects = store.projects().await.unwrap();
    assert_eq!(
        projects,
        vec![Project::new("Acme", "X1"), Project::new("Kioxia", "CM7")]
    );
}

#[tokio::test]
async fn reads_config_and_fragments() {
    let (_dir, store) = fixture();
    assert_eq!(
        store.config(&x1()).await.unwrap(),
        json!({"dimm_configuration": []})
    );
    assert_eq!(
        store.fragment(&x1(), Fragment::Summary).await.unwrap(),
        "<p>X1 summary</p>"
    );
    assert_eq!(store.home_summary().await.unwrap(), "<h1>Overview</h1>");
}

#[tokio::test]
async fn missing_fragment_is_not_found() {
    let (_dir, store) = fixture();
    let error = store
        .fragment(&x1(), Fragment::Configuration)
        .await
        .unwrap_err();
    assert!(matches!(error, SourceError::NotFound(_)));
}

#[tokio::test]
async fn report_files_are_sorted_json_names() {
    let (_dir, store) = fixture();
    assert_eq!(
        store.report_files(&x1()).await.unwrap(),
        vec!["config.json", "ddr.json", "pcie.json"]
    );
}

#[tokio::test]
async fn invalid_report_json_is_a_decode_error() {
    let (_dir, store) = fixture();
    assert!(matches!(
        store.report_json(&x1(), "ddr.json").await,
        Err(SourceError::Decode(_))
    ));
    assert_eq!(
        store.report_json(&x1(), "pcie.json").await.unwrap(),
        json!({"tablists": []})
    );
}

#[tokio::test]
async fn scripts_are_python_files_only() {
    let (_dir, store) = fixture();
    assert_eq!(store.scripts().await.unwrap(), vec!["LMT.py", "MemEye.py"]);
}

#[tokio::test]
async fn missing_scripts_directory_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = ReportStore::new(&ServerConfig::default().with_root(dir.path()));
    assert!(store.scripts().await.unwrap().is_empty());
}

#[tokio::test]
async fn generate_saves_uploads_and_writes_report() {
    let (dir, store) = fixture();
    let report = store
        .generate(GenerateRequest {
            script: Some("MemEye.py".into()),
            eye_height: "0.25".into(),
            eye_width: "0.4".into(),
            files: vec![
                Upload {
                    file_name: "../lane 0.csv".into(),
                    bytes: b"a,b".to_vec(),
                },
                Upload {
                    file_name: "README".into(),
                    bytes: b"skipped".to_vec(),
                },
            ],
        })
        .await
        .unwrap();

    assert_eq!(report.file_name, "generated_report_MemEye.py.html");
    assert_eq!(
        fs::read(dir.path().join("uploads/lane_0.csv")).unwrap(),
        b"a,b"
    );
    assert!(!dir.path().join("uploads/README").exists());

    let body = String::from_utf8(report.body).unwrap();
    assert!(body.contains("Report for MemEye.py"));
    assert!(body.contains("Eye Height: 0.25"));
    assert!(body.contains("lane_0.csv"));
    assert_eq!(
        fs::read_to_string(dir.path().join("reports/generated_report_MemEye.py.html")).unwrap(),
        body
    );
}

#[tokio::test]
async fn generate_requires_a_script() {
    let (_dir, store) = fixture();
    let error = store
        .generate(GenerateRequest {
            script: Some("  ".into()),
            ..GenerateRequest::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(error, StoreError::MissingScript));
}
