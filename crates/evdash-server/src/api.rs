//! JSON API and the report generator endpoint.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use evdash_core::{Project, Selection};
use evdash_store::{GenerateRequest, Upload};
use serde_json::{Value, json};

use crate::AppState;
use crate::error::ServerError;

pub(crate) async fn healthz() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub(crate) async fn projects(State(state): State<AppState>) -> Result<Json<Vec<Project>>, ServerError> {
    Ok(Json(state.store.read_projects().await?))
}

/// `.json` files of one project, sorted.
pub(crate) async fn report_list(
    State(state): State<AppState>,
    Path((vendor, project)): Path<(String, String)>,
) -> Result<Json<Vec<String>>, ServerError> {
    let selection = Selection::new(vendor, project)?;
    Ok(Json(state.store.list_json(&selection).await?))
}

pub(crate) async fn report_json(
    State(state): State<AppState>,
    Path((vendor, project, file)): Path<(String, String, String)>,
) -> Result<Json<Value>, ServerError> {
    let selection = Selection::new(vendor, project)?;
    let path = state.store.artifact_path(&selection, &file)?;
    Ok(Json(state.store.read_json(&path).await?))
}

pub(crate) async fn scripts(State(state): State<AppState>) -> Result<Json<Vec<String>>, ServerError> {
    Ok(Json(state.store.list_scripts().await?))
}

/// Save the uploads, write the report and return it as an attachment.
pub(crate) async fn generate_report(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ServerError> {
    let mut request = GenerateRequest::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "script" => request.script = Some(field.text().await?),
            "eye_height" => request.eye_height = field.text().await?,
            "eye_width" => request.eye_width = field.text().await?,
            "files" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if !file_name.is_empty() {
                    request.files.push(Upload {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            other => tracing::debug!(field = other, "ignoring form field"),
        }
    }

    let report = state.store.generate(request).await?;
    let disposition = format!("attachment; filename=\"{}\"", report.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.body,
    )
        .into_response())
}
