//! [`ReportSource`] over HTTP against an evdash backend.

use std::time::Duration;

use evdash_config::{ClientConfig, DiscoveryMode, ProjectSource};
use evdash_core::report_file::CONFIG_FILE;
use evdash_core::{Fragment, Project, ReportSource, Selection, SourceError};
use serde_json::Value;

use crate::error::ClientError;
use crate::http::check_response;
use crate::listing::parse_listing;

/// HTTP client for one backend.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: reqwest::Client,
    base_url: String,
    project_source: ProjectSource,
    discovery: DiscoveryMode,
}

impl HttpSource {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("evdash/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            project_source: config.project_source,
            discovery: config.discovery,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) const fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Absolute URL for a path made of already-encoded segments.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn project_path(prefix: &str, selection: &Selection, file: Option<&str>) -> String {
        let mut path = format!(
            "{prefix}/{}/{}",
            urlencoding::encode(&selection.vendor),
            urlencoding::encode(&selection.name)
        );
        if let Some(file) = file {
            path.push('/');
            path.push_str(&urlencoding::encode(file));
        }
        path
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, ClientError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let resp = self.http.get(&url).send().await?;
        check_response(resp).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        Ok(self.get(path).await?.json().await?)
    }

    async fn get_text(&self, path: &str) -> Result<String, ClientError> {
        Ok(self.get(path).await?.text().await?)
    }
}

impl ReportSource for HttpSource {
    async fn projects(&self) -> Result<Vec<Project>, SourceError> {
        let path = match self.project_source {
            ProjectSource::Api => "/api/projects",
            ProjectSource::Static => "/data/projects.json",
        };
        Ok(self.get_json(path).await?)
    }

    async fn config(&self, selection: &Selection) -> Result<Value, SourceError> {
        let path = Self::project_path("/reports", selection, Some(CONFIG_FILE));
        Ok(self.get_json(&path).await?)
    }

    async fn fragment(&self, selection: &Selection, fragment: Fragment) -> Result<String, SourceError> {
        let path = Self::project_path("/reports", selection, Some(fragment.file_name()));
        Ok(self.get_text(&path).await?)
    }

    async fn home_summary(&self) -> Result<String, SourceError> {
        Ok(self.get_text("/summary.html").await?)
    }

    async fn report_files(&self, selection: &Selection) -> Result<Vec<String>, SourceError> {
        match self.discovery {
            DiscoveryMode::Api => {
                let path = Self::project_path("/api/reports", selection, None);
                Ok(self.get_json(&path).await?)
            }
            DiscoveryMode::Listing => {
                let path = format!("{}/", Self::project_path("/reports", selection, None));
                let html = self.get_text(&path).await?;
                Ok(parse_listing(&html))
            }
        }
    }

    async fn report_json(&self, selection: &Selection, file: &str) -> Result<Value, SourceError> {
        let path = Self::project_path("/api/report_json", selection, Some(file));
        Ok(self.get_json(&path).await?)
    }

    async fn scripts(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.get_json("/api/scripts").await?)
    }
}
