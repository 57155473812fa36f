//! Free-text row filtering.
//!
//! A row matches when the normalized term is a substring of the row's
//! haystack: every cell's trimmed, lower-cased text followed by a space.

use serde::Serialize;

/// Message shown once per section when a non-empty term hides every row.
pub const NO_RESULTS: &str = "No results found";

/// Normalize user input the same way for every table.
#[must_use]
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Build the text a row is searched in.
pub fn haystack<'a, I>(cells: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    for cell in cells {
        out.push_str(&cell.trim().to_lowercase());
        out.push(' ');
    }
    out
}

/// Result of applying one search term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub visible_rows: usize,
    pub total_rows: usize,
    /// Sections currently showing the no-results marker.
    pub empty_sections: usize,
}

impl SearchOutcome {
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            visible_rows: self.visible_rows + other.visible_rows,
            total_rows: self.total_rows + other.total_rows,
            empty_sections: self.empty_sections + other.empty_sections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_is_trimmed_and_lowercased() {
        assert_eq!(normalize_term("  NVMe U.2 "), "nvme u.2");
    }

    #[test]
    fn haystack_joins_cells_with_spaces() {
        assert_eq!(haystack([" Low ", "CPU0", "12.4"]), "low cpu0 12.4 ");
    }

    #[test]
    fn term_can_span_adjacent_cells() {
        let row = haystack(["High", "CPU1"]);
        assert!(row.contains(&normalize_term("high cpu1")));
    }
}
