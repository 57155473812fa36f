//! Backend server configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_projects_file() -> PathBuf {
    PathBuf::from("data/projects.json")
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_scripts_dir() -> PathBuf {
    PathBuf::from("autoscript")
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_summary_file() -> PathBuf {
    PathBuf::from("summary.html")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Socket address the backend listens on.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Directory every relative path below is resolved against.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// JSON array of `{name, vendor}` served by `/api/projects`.
    #[serde(default = "default_projects_file")]
    pub projects_file: PathBuf,

    /// `{vendor}/{project}/` tree of report artifacts.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,

    /// Report-generation scripts listed by `/api/scripts`.
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,

    /// Where uploaded files from the generator panel are saved.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,

    /// Dashboard-level summary fragment.
    #[serde(default = "default_summary_file")]
    pub summary_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            root: default_root(),
            projects_file: default_projects_file(),
            reports_dir: default_reports_dir(),
            scripts_dir: default_scripts_dir(),
            uploads_dir: default_uploads_dir(),
            summary_file: default_summary_file(),
        }
    }
}

impl ServerConfig {
    /// Resolve a configured path against [`ServerConfig::root`].
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Point every location at a different root, keeping relative layout.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }
}
