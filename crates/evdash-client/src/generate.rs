//! Report generator client: `POST /api/generate_report`.

use std::path::{Path, PathBuf};

use evdash_render::GenerateOutcome;

use crate::error::ClientError;
use crate::http::{attachment_name, check_response};
use crate::source::HttpSource;

/// Fields submitted by the generator form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateForm {
    pub script: String,
    pub eye_height: String,
    pub eye_width: String,
    pub files: Vec<PathBuf>,
}

/// The generated report as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Download {
    /// The render-layer outcome for this download, linked at `href`.
    #[must_use]
    pub fn outcome(&self, href: impl Into<String>) -> GenerateOutcome {
        GenerateOutcome::Download {
            href: href.into(),
            file_name: self.file_name.clone(),
        }
    }
}

impl HttpSource {
    /// Submit the generator form. No retry on failure.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] if an upload cannot be read,
    /// [`ClientError::Api`] carrying the backend's raw error text, or
    /// [`ClientError::Http`] on transport failure.
    pub async fn generate(&self, form: &GenerateForm) -> Result<Download, ClientError> {
        let mut multipart = reqwest::multipart::Form::new()
            .text("script", form.script.clone())
            .text("eye_height", form.eye_height.clone())
            .text("eye_width", form.eye_width.clone());
        for path in &form.files {
            let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
                path: path.clone(),
                source,
            })?;
            let part = reqwest::multipart::Part::bytes(bytes).file_name(upload_name(path));
            multipart = multipart.part("files", part);
        }

        let resp = self
            .http()
            .post(self.url("/api/generate_report"))
            .multipart(multipart)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        let file_name = attachment_name(&resp)
            .unwrap_or_else(|| format!("generated_report_{}.html", form.script));
        let bytes = resp.bytes().await?.to_vec();
        tracing::info!(script = %form.script, file = %file_name, size = bytes.len(), "report downloaded");
        Ok(Download { file_name, bytes })
    }
}

/// Render-layer outcome for a failed submission: the raw error text.
#[must_use]
pub fn failure_outcome(error: &ClientError) -> GenerateOutcome {
    let message = match error {
        ClientError::Api { message, .. } => message.clone(),
        other => other.to_string(),
    };
    GenerateOutcome::Error { message }
}

fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_failure_surfaces_raw_text() {
        let outcome = failure_outcome(&ClientError::Api {
            status: 400,
            message: "Missing script name".into(),
        });
        assert_eq!(
            outcome,
            GenerateOutcome::Error {
                message: "Missing script name".into()
            }
        );
    }

    #[test]
    fn upload_name_is_the_basename() {
        assert_eq!(upload_name(Path::new("/tmp/run/lane0.csv")), "lane0.csv");
    }
}
