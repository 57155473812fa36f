//! Aligned terminal tables.
//!
//! Widths are counted in characters so the `—` placeholder and non-ASCII
//! part numbers line up.

use evdash_render::TableView;
use evdash_render::table::ColumnKind;

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// One column of a terminal table.
#[derive(Clone, Copy, Debug)]
pub struct Header<'a> {
    pub label: &'a str,
    /// Right-align the column.
    pub numeric: bool,
}

impl<'a> Header<'a> {
    #[must_use]
    pub const fn text(label: &'a str) -> Self {
        Self {
            label,
            numeric: false,
        }
    }
}

/// Render the visible rows of a dashboard table, in its current order.
#[must_use]
pub fn render_view(view: &TableView, options: TableOptions) -> String {
    let headers = view
        .columns()
        .iter()
        .map(|column| Header {
            label: &column.label,
            numeric: column.kind == ColumnKind::Numeric,
        })
        .collect::<Vec<_>>();
    render_rows(&headers, &view.visible_texts(), options)
}

/// Render string rows under `headers`.
#[must_use]
pub fn render_rows(headers: &[Header<'_>], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| width_of(cell))
                .max()
                .unwrap_or(0)
                .max(width_of(header.label))
                .max(4)
        })
        .collect();

    fit_widths(&mut widths, headers, options.max_width);

    let header_line = headers
        .iter()
        .zip(widths.iter())
        .map(|(header, width)| pad(&truncate_text(header.label, *width), *width, header.numeric))
        .collect::<Vec<_>>()
        .join("  ");

    let divider = "-".repeat(width_of(&header_line));

    let row_lines = rows.iter().map(|row| {
        headers
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(index, (header, width))| {
                let value = row.get(index).map_or("", String::as_str);
                let truncated = truncate_text(value, *width);
                let padded = pad(&truncated, *width, header.numeric);
                if options.color {
                    colorize_result(&truncated, padded)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    });

    let mut lines = Vec::with_capacity(2 + rows.len());
    lines.push(header_line.trim_end().to_string());
    lines.push(divider);
    lines.extend(row_lines);
    lines.join("\n")
}

fn width_of(value: &str) -> usize {
    value.chars().count()
}

fn fit_widths(widths: &mut [usize], headers: &[Header<'_>], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };

    let separators = widths.len().saturating_sub(1) * 2;
    let mut total = widths.iter().sum::<usize>() + separators;
    while total > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(idx, width)| **width > width_of(headers[*idx].label).max(4))
            .max_by_key(|(_, width)| **width)
            .map(|(idx, _)| idx);
        let Some(idx) = widest else {
            break;
        };
        widths[idx] -= 1;
        total -= 1;
    }
}

fn truncate_text(value: &str, width: usize) -> String {
    if width_of(value) <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(width_of(value)));
    if right_align {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

/// Green for passing results, red for failing ones. `padded` is `value`
/// with its alignment already applied.
fn colorize_result(value: &str, padded: String) -> String {
    let code = match value.trim().to_ascii_lowercase().as_str() {
        "pass" | "passed" | "ok" | "true" => "32",
        "fail" | "failed" | "false" | "error" => "31",
        "marginal" | "warn" | "warning" => "33",
        _ => return padded,
    };
    padded.replacen(value, &format!("\u{1b}[{code}m{value}\u{1b}[0m"), 1)
}

#[cfg(test)]
mod tests {
    use evdash_render::table::PLACEHOLDER;
    use evdash_render::{Cell, Column};
    use pretty_assertions::assert_eq;

    use super::*;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[test]
    fn placeholder_counts_as_one_column() {
        let headers = [Header::text("Part"), Header::text("Result")];
        let rows = vec![
            vec!["A".to_string(), PLACEHOLDER.to_string()],
            vec!["B".to_string(), "pass".to_string()],
        ];
        let out = render_rows(&headers, &rows, PLAIN);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Part  Result");
        assert_eq!(lines[1], "------------");
        assert_eq!(lines[2], "A     —");
        assert_eq!(lines[3], "B     pass");
    }

    #[test]
    fn numeric_columns_are_right_aligned() {
        let headers = [
            Header::text("Device"),
            Header {
                label: "Loss",
                numeric: true,
            },
        ];
        let rows = vec![vec!["A".to_string(), "3.2".to_string()]];
        let out = render_rows(&headers, &rows, PLAIN);
        assert_eq!(out.lines().nth(2), Some("A        3.2"));
    }

    #[test]
    fn narrow_terminals_truncate_the_widest_column() {
        let headers = [Header::text("Id"), Header::text("Description")];
        let rows = vec![vec![
            "1".to_string(),
            "a very long description of the channel".to_string(),
        ]];
        let options = TableOptions {
            max_width: Some(24),
            color: false,
        };
        let out = render_rows(&headers, &rows, options);
        let row = out.lines().nth(2).unwrap();
        assert_eq!(row.chars().count(), 24);
        assert!(row.ends_with('…'));
    }

    #[test]
    fn results_are_colored_without_breaking_alignment() {
        let headers = [Header::text("Result"), Header::text("Id")];
        let rows = vec![vec!["fail".to_string(), "x".to_string()]];
        let options = TableOptions {
            max_width: None,
            color: true,
        };
        let out = render_rows(&headers, &rows, options);
        assert_eq!(out.lines().nth(2), Some("\u{1b}[31mfail\u{1b}[0m    x"));
    }

    #[test]
    fn view_rows_follow_search_state() {
        let mut view = TableView::new(
            "t",
            vec![Column::new("id", "Id"), Column::new("awg", "AWG").numeric()],
        );
        view.push_row(vec![Cell::text("RDIMM"), Cell::text("28")]);
        view.push_row(vec![Cell::text("UDIMM"), Cell::text("30")]);
        view.apply_search("udimm");
        let out = render_view(&view, PLAIN);
        assert_eq!(out.lines().count(), 3);
        assert!(out.contains("UDIMM"));
    }
}
