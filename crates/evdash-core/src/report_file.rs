//! Naming rules for report artifacts.

use crate::errors::CoreError;

/// Name of the per-project configuration document.
pub const CONFIG_FILE: &str = "config.json";

/// Whether `name` is an additional report document (any `.json` except the
/// configuration document).
#[must_use]
pub fn is_report_json(name: &str) -> bool {
    name.ends_with(".json") && name != CONFIG_FILE && validate_segment(name).is_ok()
}

/// Tab title for a report file: the name without its `.json` extension.
#[must_use]
pub fn tab_title(name: &str) -> &str {
    name.strip_suffix(".json").unwrap_or(name)
}

/// Keep only report documents, preserving listing order and dropping
/// duplicates.
#[must_use]
pub fn report_files<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let name = name.as_ref();
        if is_report_json(name) && !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

/// Reject path segments that could escape their parent directory.
///
/// # Errors
///
/// Returns [`CoreError::InvalidSegment`] for empty segments, `.`, `..`, or
/// segments containing `/`, `\` or NUL.
pub fn validate_segment(segment: &str) -> Result<(), CoreError> {
    let bad = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\', '\0']);
    if bad {
        return Err(CoreError::InvalidSegment(segment.to_string()));
    }
    Ok(())
}

/// Reduce an uploaded file name to a safe basename.
///
/// Keeps ASCII alphanumerics, `-`, `_` and `.`; spaces become `_`; leading
/// dots are stripped so the result can never be `..` or a hidden file.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .filter_map(|ch| match ch {
            c if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("eye_margin.json", true)]
    #[case("config.json", false)]
    #[case("summary.html", false)]
    #[case("notes.json.bak", false)]
    #[case("../x.json", false)]
    fn report_json_detection(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_report_json(name), expected);
    }

    #[test]
    fn tab_title_strips_extension() {
        assert_eq!(tab_title("pcie_gen5.json"), "pcie_gen5");
        assert_eq!(tab_title("README"), "README");
    }

    #[test]
    fn report_files_filter_and_dedupe() {
        let names = ["a.json", "config.json", "b.txt", "a.json", "c.json"];
        assert_eq!(report_files(names), vec!["a.json", "c.json"]);
    }

    #[rstest]
    #[case("../../etc/passwd", "passwd")]
    #[case("my report.csv", "my_report.csv")]
    #[case("..hidden", "hidden")]
    #[case("C:\\data\\eye<1>.txt", "eye1.txt")]
    fn sanitize_filename_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_filename(input), expected);
    }
}
