//! Directory listings for `/reports/{vendor}/{project}/`.
//!
//! Installed as the fallback of the static report service, so it only sees
//! requests for which no file exists. The request path is relative to the
//! reports root.

use axum::extract::State;
use axum::http::Uri;
use axum::response::Html;
use evdash_core::Selection;
use evdash_render::Node;
use evdash_render::html::el;

use crate::AppState;
use crate::error::ServerError;

pub(crate) async fn directory_listing(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Html<String>, ServerError> {
    let path = uri.path();
    let Some(relative) = path.strip_suffix('/') else {
        return Err(ServerError::NotFound(path.to_string()));
    };
    let segments = relative
        .trim_start_matches('/')
        .split('/')
        .map(|segment| {
            urlencoding::decode(segment)
                .map(std::borrow::Cow::into_owned)
                .map_err(|_| ServerError::BadRequest(format!("invalid path encoding: {path}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let [vendor, project] = segments.as_slice() else {
        return Err(ServerError::NotFound(path.to_string()));
    };

    let selection = Selection::new(vendor.as_str(), project.as_str())?;
    let files = state.store.list_project_files(&selection).await?;
    tracing::debug!(vendor = %selection.vendor, project = %selection.name, files = files.len(), "directory listing");
    Ok(Html(render_listing(&selection, &files)))
}

fn render_listing(selection: &Selection, files: &[String]) -> String {
    let title = format!("Index of /reports/{}/", selection.path());
    let page = el("html")
        .child(el("head").child(el("title").text(title.clone())))
        .child(
            el("body").child(el("h1").text(title)).child(
                el("ul").children(files.iter().map(|name| {
                    el("li").child(
                        el("a")
                            .attr("href", urlencoding::encode(name).into_owned())
                            .text(name.clone()),
                    )
                })),
            ),
        );
    format!("<!DOCTYPE html>{}", Node::from(page).render())
}
