//! Report generation behind `POST /api/generate_report`.
//!
//! Uploaded files are saved under the uploads directory and a static HTML
//! report naming the script, the eye parameters and the saved files is
//! written to the reports directory. The script itself is not executed.

use std::path::{Path, PathBuf};

use evdash_core::report_file::sanitize_filename;

use crate::error::StoreError;
use crate::store::ReportStore;

/// One uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Form fields of a generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateRequest {
    pub script: Option<String>,
    pub eye_height: String,
    pub eye_width: String,
    pub files: Vec<Upload>,
}

/// The written report, returned to the caller as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReport {
    pub file_name: String,
    pub path: PathBuf,
    pub body: Vec<u8>,
}

impl ReportStore {
    /// Save uploads and write the generated report.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingScript`] when no script is named, or
    /// [`StoreError::Io`] if a file cannot be written.
    pub async fn generate(&self, request: GenerateRequest) -> Result<GeneratedReport, StoreError> {
        let script = request
            .script
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(StoreError::MissingScript)?;

        let mut saved = Vec::new();
        for upload in &request.files {
            if !upload.file_name.contains('.') {
                tracing::debug!(file = %upload.file_name, "skipping upload without extension");
                continue;
            }
            let name = sanitize_filename(&upload.file_name);
            if name.is_empty() {
                continue;
            }
            create_dir(self.uploads_dir()).await?;
            let path = self.uploads_dir().join(&name);
            write(&path, &upload.bytes).await?;
            saved.push(path);
        }

        let file_name = format!("generated_report_{}.html", sanitize_filename(script));
        let body = report_html(script, &request.eye_height, &request.eye_width, &saved);
        create_dir(self.reports_dir()).await?;
        let path = self.reports_dir().join(&file_name);
        write(&path, body.as_bytes()).await?;
        tracing::info!(script, report = %path.display(), uploads = saved.len(), "report generated");

        Ok(GeneratedReport {
            file_name,
            path,
            body: body.into_bytes(),
        })
    }
}

fn report_html(script: &str, eye_height: &str, eye_width: &str, files: &[PathBuf]) -> String {
    let files = files
        .iter()
        .map(|p| escape(&p.display().to_string()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "<html><body><h1>Report for {}</h1><p>Eye Height: {}</p><p>Eye Width: {}</p><p>Files: {files}</p></body></html>",
        escape(script),
        escape(eye_height),
        escape(eye_width),
    )
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

async fn create_dir(dir: &Path) -> Result<(), StoreError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| StoreError::io(dir, e))
}

async fn write(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| StoreError::io(path, e))
}
