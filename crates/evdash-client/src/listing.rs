//! Report discovery from an HTML directory listing.
//!
//! Used when the backend (or a plain static file server) exposes
//! `/reports/{vendor}/{project}/` as an index page instead of the JSON
//! listing endpoint.

use std::sync::LazyLock;

use evdash_core::report_file::report_files;
use regex::Regex;

static JSON_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href\s*=\s*["']([^"'?#]+\.json)["']"#).expect("valid regex")
});

/// Report file names linked from a directory listing, in page order,
/// excluding `config.json`.
#[must_use]
pub fn parse_listing(html: &str) -> Vec<String> {
    let names = JSON_HREF.captures_iter(html).filter_map(|caps| {
        let href = caps.get(1)?.as_str();
        let last = href.rsplit('/').next()?;
        let decoded = urlencoding::decode(last).ok()?;
        Some(decoded.into_owned())
    });
    report_files(names)
}
