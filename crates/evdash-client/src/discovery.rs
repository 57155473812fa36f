//! Dynamic report tabs.
//!
//! Every `.json` file in a project's report directory except `config.json`
//! becomes a tab. Documents are fetched concurrently on a [`JoinSet`]; one
//! failing file never affects the others.

use evdash_core::report_file::report_files;
use evdash_core::{ReportSource, Selection, SourceError};
use serde_json::Value;
use tokio::task::JoinSet;

/// Report files of a project, in listing order.
///
/// # Errors
///
/// Returns the source's error if the listing cannot be fetched.
pub async fn discover<S: ReportSource>(
    source: &S,
    selection: &Selection,
) -> Result<Vec<String>, SourceError> {
    let names = source.report_files(selection).await?;
    Ok(report_files(names))
}

/// Spawn one fetch per file. Each task yields its file name and result.
pub fn spawn_fetches<S: ReportSource>(
    source: &S,
    selection: &Selection,
    files: &[String],
) -> JoinSet<(String, Result<Value, SourceError>)> {
    let mut set = JoinSet::new();
    for file in files {
        let source = source.clone();
        let selection = selection.clone();
        let file = file.clone();
        set.spawn(async move {
            let result = source.report_json(&selection, &file).await;
            if let Err(error) = &result {
                tracing::warn!(
                    vendor = %selection.vendor,
                    project = %selection.name,
                    file = %file,
                    %error,
                    "report fetch failed"
                );
            }
            (file, result)
        });
    }
    set
}
