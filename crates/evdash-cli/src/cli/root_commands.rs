use std::path::PathBuf;

use clap::{Args, Subcommand};
use evdash_core::Theme;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the backend: JSON API, report artifacts and dashboard pages.
    Serve(ServeArgs),
    /// List projects grouped by vendor.
    Projects(ProjectsArgs),
    /// Load a project and print its configuration and report tables.
    Show(ShowArgs),
    /// List the report JSON files discovered for a project.
    Reports(ProjectArgs),
    /// Submit the report generator form and save the result.
    Generate(GenerateArgs),
    /// List the available generation scripts.
    Scripts,
    /// Show or change the stored theme preference.
    Theme(ThemeArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Listen address, overriding `server.bind`
    #[arg(long)]
    pub bind: Option<String>,

    /// Artifact root, overriding `server.root`
    #[arg(long)]
    pub root: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct ProjectsArgs {
    /// Only projects whose name contains this text (case-insensitive)
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ProjectArgs {
    pub vendor: String,
    pub project: String,
}

#[derive(Clone, Debug, Args)]
pub struct ShowArgs {
    pub vendor: String,
    pub project: String,

    /// Filter every table by this term
    #[arg(long)]
    pub search: Option<String>,

    /// Sort one table: `TABLE:COLUMN` or `TABLE:COLUMN:desc`
    #[arg(long)]
    pub sort: Option<String>,

    /// Only print the configuration, or only the report with this file name
    #[arg(long)]
    pub only: Option<String>,

    /// Read search terms from stdin, one per line, and reprint after each
    #[arg(long)]
    pub interactive: bool,
}

#[derive(Clone, Debug, Args)]
pub struct GenerateArgs {
    /// Script name as listed by `evdash scripts`
    #[arg(long)]
    pub script: String,

    #[arg(long, default_value = "")]
    pub eye_height: String,

    #[arg(long, default_value = "")]
    pub eye_width: String,

    /// File to upload (repeatable)
    #[arg(long = "file")]
    pub files: Vec<PathBuf>,

    /// Where to save the report (defaults to the name the backend sends)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub action: Option<ThemeAction>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum ThemeAction {
    /// Print the stored theme.
    Show,
    /// Flip between light and dark.
    Toggle,
    /// Store a specific theme.
    Set { theme: Theme },
}
