use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use evdash_client::GenerateForm;
use evdash_client::generate::failure_outcome;
use evdash_config::EvdashConfig;
use evdash_render::GenerateOutcome;
use serde::Serialize;

use crate::bootstrap::http_source;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::GenerateArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct Saved {
    file_name: String,
    path: PathBuf,
    bytes: usize,
}

/// Handle `evdash generate`.
pub async fn handle(
    args: &GenerateArgs,
    config: &EvdashConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let form = GenerateForm {
        script: args.script.clone(),
        eye_height: args.eye_height.clone(),
        eye_width: args.eye_width.clone(),
        files: args.files.clone(),
    };
    let source = http_source(config)?;
    let download = match source.generate(&form).await {
        Ok(download) => download,
        Err(error) => {
            tracing::debug!(%error, script = %form.script, "generation failed");
            if let GenerateOutcome::Error { message } = failure_outcome(&error) {
                bail!("Error: {message}");
            }
            return Err(error.into());
        }
    };

    let path = target_path(args.output.as_deref(), &download.file_name);
    tokio::fs::write(&path, &download.bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    output(
        &Saved {
            file_name: download.file_name,
            path,
            bytes: download.bytes.len(),
        },
        flags.format,
    )
}

/// `--output` wins; otherwise the attachment name, stripped to its final
/// component so a hostile header cannot write outside the working directory.
fn target_path(output: Option<&Path>, file_name: &str) -> PathBuf {
    if let Some(output) = output {
        return output.to_path_buf();
    }
    Path::new(file_name)
        .file_name()
        .map_or_else(|| PathBuf::from("generated_report.html"), PathBuf::from)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn explicit_output_wins() {
        assert_eq!(
            target_path(Some(Path::new("out/r.html")), "generated_report_LMT.py.html"),
            PathBuf::from("out/r.html")
        );
    }

    #[test]
    fn attachment_name_is_reduced_to_a_file_name() {
        assert_eq!(
            target_path(None, "generated_report_LMT.py.html"),
            PathBuf::from("generated_report_LMT.py.html")
        );
        assert_eq!(target_path(None, "../../etc/x.html"), PathBuf::from("x.html"));
        assert_eq!(target_path(None, ".."), PathBuf::from("generated_report.html"));
    }
}
