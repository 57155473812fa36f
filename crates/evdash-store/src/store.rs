//! Filesystem-backed [`ReportSource`].
//!
//! Layout under the configured root:
//!
//! ```text
//! data/projects.json
//! summary.html
//! reports/{vendor}/{project}/config.json
//! reports/{vendor}/{project}/summary.html
//! reports/{vendor}/{project}/*.json
//! autoscript/*.py
//! ```

use std::path::{Path, PathBuf};

use evdash_config::ServerConfig;
use evdash_core::report_file::validate_segment;
use evdash_core::{Fragment, Project, ReportSource, Selection, SourceError};
use serde_json::Value;

use crate::error::StoreError;

/// Reads report artifacts from disk.
#[derive(Debug, Clone)]
pub struct ReportStore {
    projects_file: PathBuf,
    reports_dir: PathBuf,
    scripts_dir: PathBuf,
    uploads_dir: PathBuf,
    summary_file: PathBuf,
}

impl ReportStore {
    /// Build a store with every path resolved against `config.root`.
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            projects_file: config.resolve(&config.projects_file),
            reports_dir: config.resolve(&config.reports_dir),
            scripts_dir: config.resolve(&config.scripts_dir),
            uploads_dir: config.resolve(&config.uploads_dir),
            summary_file: config.resolve(&config.summary_file),
        }
    }

    #[must_use]
    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    #[must_use]
    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    #[must_use]
    pub fn projects_file(&self) -> &Path {
        &self.projects_file
    }

    #[must_use]
    pub fn summary_file(&self) -> &Path {
        &self.summary_file
    }

    /// Directory holding one project's artifacts.
    #[must_use]
    pub fn project_dir(&self, selection: &Selection) -> PathBuf {
        self.reports_dir.join(&selection.vendor).join(&selection.name)
    }

    /// Path of one artifact inside a project directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] if `file` is not a plain file name.
    pub fn artifact_path(&self, selection: &Selection, file: &str) -> Result<PathBuf, StoreError> {
        validate_segment(file)?;
        Ok(self.project_dir(selection).join(file))
    }

    /// Parse the project list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file is missing or not a JSON array of
    /// `{name, vendor}` objects.
    pub async fn read_projects(&self) -> Result<Vec<Project>, StoreError> {
        let bytes = read(&self.projects_file).await?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
            path: self.projects_file.clone(),
            source,
        })
    }

    /// Parse a JSON artifact.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file is missing, unreadable or invalid.
    pub async fn read_json(&self, path: &Path) -> Result<Value, StoreError> {
        let bytes = read(path).await?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Names of the `.json` files in a project directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the project directory is missing.
    pub async fn list_json(&self, selection: &Selection) -> Result<Vec<String>, StoreError> {
        let mut names = self.list_dir(&self.project_dir(selection)).await?;
        names.retain(|name| name.ends_with(".json"));
        Ok(names)
    }

    /// Every regular file name in a project directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the project directory is missing.
    pub async fn list_project_files(&self, selection: &Selection) -> Result<Vec<String>, StoreError> {
        self.list_dir(&self.project_dir(selection)).await
    }

    /// Names of the `.py` scripts, sorted. A missing scripts directory is an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory exists but cannot be read.
    pub async fn list_scripts(&self) -> Result<Vec<String>, StoreError> {
        match self.list_dir(&self.scripts_dir).await {
            Ok(mut names) => {
                names.retain(|name| name.ends_with(".py"));
                Ok(names)
            }
            Err(StoreError::NotFound(path)) => {
                tracing::debug!(path = %path.display(), "scripts directory missing");
                Ok(Vec::new())
            }
            Err(error) => Err(error),
        }
    }

    async fn list_dir(&self, dir: &Path) -> Result<Vec<String>, StoreError> {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| StoreError::io(dir, e))?;
        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(dir, e))?
        {
            let is_file = entry
                .file_type()
                .await
                .map_err(|e| StoreError::io(entry.path(), e))?
                .is_file();
            if is_file {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

async fn read(path: &Path) -> Result<Vec<u8>, StoreError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| StoreError::io(path, e))
}

async fn read_text(path: &Path) -> Result<String, StoreError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::io(path, e))
}

impl ReportSource for ReportStore {
    async fn projects(&self) -> Result<Vec<Project>, SourceError> {
        Ok(self.read_projects().await?)
    }

    async fn config(&self, selection: &Selection) -> Result<Value, SourceError> {
        let path = self.artifact_path(selection, evdash_core::report_file::CONFIG_FILE)?;
        Ok(self.read_json(&path).await?)
    }

    async fn fragment(&self, selection: &Selection, fragment: Fragment) -> Result<String, SourceError> {
        let path = self.artifact_path(selection, fragment.file_name())?;
        Ok(read_text(&path).await?)
    }

    async fn home_summary(&self) -> Result<String, SourceError> {
        Ok(read_text(&self.summary_file).await?)
    }

    async fn report_files(&self, selection: &Selection) -> Result<Vec<String>, SourceError> {
        Ok(self.list_json(selection).await?)
    }

    async fn report_json(&self, selection: &Selection, file: &str) -> Result<Value, SourceError> {
        let path = self.artifact_path(selection, file)?;
        Ok(self.read_json(&path).await?)
    }

    async fn scripts(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.list_scripts().await?)
    }
}
