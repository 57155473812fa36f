//! Sortable, searchable table views.
//!
//! One parametrized routine renders every table in the dashboard: a
//! [`TableView`] is a list of [`Column`]s plus rows of [`Cell`]s. Rows carry
//! explicit values for every column, including the grouping column; merged
//! cells (`rowspan`) are derived from the current row order at render time
//! and never stored.

use std::cmp::Ordering;

use evdash_core::value::{display_text, is_truthy, parse_leading_float};
use serde::Serialize;
use serde_json::Value;

use crate::error::RenderError;
use crate::html::{Element, Node, el};
use crate::search::{SearchOutcome, haystack, normalize_term};

/// Text shown for missing values and falsy result flags.
pub const PLACEHOLDER: &str = "—";

/// Label of rendered result links.
pub const LINK_LABEL: &str = "Report";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellRenderer {
    Plain,
    /// Truthy values become a result link, falsy ones the placeholder.
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Document key the column was built from.
    pub key: String,
    /// Header text.
    pub label: String,
    pub kind: ColumnKind,
    pub renderer: CellRenderer,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: ColumnKind::Text,
            renderer: CellRenderer::Plain,
        }
    }

    #[must_use]
    pub const fn numeric(mut self) -> Self {
        self.kind = ColumnKind::Numeric;
        self
    }

    #[must_use]
    pub const fn link(mut self) -> Self {
        self.renderer = CellRenderer::Link;
        self
    }

    /// Mark numeric when the label (or key) is one of `numeric_labels`,
    /// compared case-insensitively.
    #[must_use]
    pub fn numeric_if_listed(self, numeric_labels: &[String]) -> Self {
        let listed = numeric_labels
            .iter()
            .any(|n| n.eq_ignore_ascii_case(&self.label) || n.eq_ignore_ascii_case(&self.key));
        if listed { self.numeric() } else { self }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cell {
    Empty,
    Text { value: String },
    Link { href: String },
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// Convert a raw JSON value through a column renderer.
    ///
    /// Link cells use a string value as the href and `fallback_href` for any
    /// other truthy flag.
    #[must_use]
    pub fn from_value(value: Option<&Value>, renderer: CellRenderer, fallback_href: &str) -> Self {
        let Some(value) = value else {
            return Self::Empty;
        };
        match renderer {
            CellRenderer::Link if !is_truthy(value) => Self::Empty,
            CellRenderer::Link => Self::Link {
                href: match value {
                    Value::String(href) => href.clone(),
                    _ => fallback_href.to_string(),
                },
            },
            CellRenderer::Plain => display_text(value).map_or(Self::Empty, Self::text),
        }
    }

    /// The text a reader sees in the cell.
    #[must_use]
    pub fn display(&self) -> &str {
        match self {
            Self::Empty => PLACEHOLDER,
            Self::Text { value } => value,
            Self::Link { .. } => LINK_LABEL,
        }
    }

    fn td(&self) -> Element {
        self.td_in(None)
    }

    fn td_in(&self, group: Option<usize>) -> Element {
        let class = match (self, group) {
            (Self::Empty, Some(_)) => Some("group-cell placeholder"),
            (Self::Empty, None) => Some("placeholder"),
            (_, Some(_)) => Some("group-cell"),
            (_, None) => None,
        };
        let td = el("td")
            .attr_if(class.is_some(), "class", class.unwrap_or_default())
            .attr_if(
                group.is_some_and(|span| span > 1),
                "rowspan",
                group.unwrap_or(1).to_string(),
            );
        match self {
            Self::Empty => td.text(PLACEHOLDER),
            Self::Text { value } => td.text(value.clone()),
            Self::Link { href } => td.child(
                el("a")
                    .attr("href", href.clone())
                    .class("result-link")
                    .attr("target", "_blank")
                    .attr("rel", "noopener")
                    .text(LINK_LABEL),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub cells: Vec<Cell>,
    pub hidden: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Value of the header's `aria-sort` attribute.
    #[must_use]
    pub const fn aria(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub column: usize,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    id: String,
    columns: Vec<Column>,
    rows: Vec<TableRow>,
    group_column: Option<usize>,
    sort: Option<SortState>,
}

impl TableView {
    pub fn new(id: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            id: id.into(),
            columns,
            rows: Vec::new(),
            group_column: None,
            sort: None,
        }
    }

    /// Merge consecutive equal values of `key` into one spanning cell.
    #[must_use]
    pub fn grouped_by(mut self, key: &str) -> Self {
        self.group_column = self.columns.iter().position(|c| c.key == key);
        self
    }

    /// Append a row; missing trailing cells are padded with [`Cell::Empty`].
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        cells.resize(self.columns.len(), Cell::Empty);
        self.rows.push(TableRow {
            cells,
            hidden: false,
        });
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    #[must_use]
    pub const fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.hidden).count()
    }

    /// Display text of every visible row, in order.
    #[must_use]
    pub fn visible_texts(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .filter(|r| !r.hidden)
            .map(|r| r.cells.iter().map(|c| c.display().to_string()).collect())
            .collect()
    }

    /// Hide rows that do not contain `term`. Rows are never removed, so an
    /// empty term shows everything again.
    pub fn apply_search(&mut self, term: &str) -> SearchOutcome {
        let term = normalize_term(term);
        for row in &mut self.rows {
            let text = haystack(row.cells.iter().map(Cell::display));
            row.hidden = !text.contains(&term);
        }
        SearchOutcome {
            visible_rows: self.visible_count(),
            total_rows: self.rows.len(),
            empty_sections: 0,
        }
    }

    /// Find a column by key or by header label (case-insensitive).
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.key == name)
            .or_else(|| {
                self.columns
                    .iter()
                    .position(|c| c.label.eq_ignore_ascii_case(name))
            })
    }

    /// Header activation: toggle the direction for `column`, starting at
    /// ascending, and reorder rows in place.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownColumn`] for an out-of-range column.
    pub fn sort_by(&mut self, column: usize) -> Result<SortDirection, RenderError> {
        if column >= self.columns.len() {
            return Err(RenderError::UnknownColumn {
                table: self.id.clone(),
                column: column.to_string(),
            });
        }
        let direction = match self.sort {
            Some(state) if state.column == column => state.direction.flipped(),
            _ => SortDirection::Ascending,
        };
        self.sort_with(column, direction);
        Ok(direction)
    }

    /// [`TableView::sort_by`] addressed by column key or label.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownColumn`] if no column matches `name`.
    pub fn sort_by_name(&mut self, name: &str) -> Result<SortDirection, RenderError> {
        let column = self
            .column_index(name)
            .ok_or_else(|| RenderError::UnknownColumn {
                table: self.id.clone(),
                column: name.to_string(),
            })?;
        self.sort_by(column)
    }

    /// Sort by `column` in an explicit direction (stable).
    pub fn sort_with(&mut self, column: usize, direction: SortDirection) {
        if column >= self.columns.len() {
            return;
        }
        let kind = self.columns[column].kind;
        self.rows.sort_by(|a, b| {
            let ordering = compare_cells(&a.cells[column], &b.cells[column], kind);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        self.sort = Some(SortState { column, direction });
    }

    /// For each visible row, the `rowspan` of its grouping cell: `Some(n)`
    /// when the row starts a run of `n` equal values, `None` when the cell is
    /// covered by an earlier span. Empty when the table is not grouped.
    #[must_use]
    pub fn group_spans(&self) -> Vec<Option<usize>> {
        let Some(group) = self.group_column else {
            return Vec::new();
        };
        let visible: Vec<&TableRow> = self.rows.iter().filter(|r| !r.hidden).collect();
        let mut spans = vec![None; visible.len()];
        let mut start = 0;
        while start < visible.len() {
            let value = visible[start].cells[group].display();
            let mut end = start + 1;
            while end < visible.len() && visible[end].cells[group].display() == value {
                end += 1;
            }
            spans[start] = Some(end - start);
            start = end;
        }
        spans
    }

    /// Direction the next activation of `column`'s header sorts in.
    #[must_use]
    pub fn next_direction(&self, column: usize) -> SortDirection {
        self.sort
            .filter(|s| s.column == column)
            .map_or(SortDirection::Ascending, |s| s.direction.flipped())
    }

    /// Render with plain column headers.
    #[must_use]
    pub fn to_node(&self) -> Node {
        self.to_node_with(|_, _| None)
    }

    /// Render as `<table class="config-table">`.
    ///
    /// `sort_href` gives the target of each header, called with the column
    /// and the direction following it would sort in; headers with a target
    /// are rendered as links. Visible rows go in the main `<tbody>`;
    /// filtered-out rows are kept in a trailing hidden `<tbody>` so they are
    /// hidden rather than removed.
    #[must_use]
    pub fn to_node_with(
        &self,
        sort_href: impl Fn(&Column, SortDirection) -> Option<String>,
    ) -> Node {
        let header = el("tr").children(self.columns.iter().enumerate().map(|(index, column)| {
            let sorted = self.sort.filter(|s| s.column == index);
            let th = el("th")
                .attr("scope", "col")
                .attr("data-column", column.key.clone())
                .attr_if(
                    column.kind == ColumnKind::Numeric,
                    "data-kind",
                    "numeric",
                )
                .attr_if(
                    sorted.is_some(),
                    "aria-sort",
                    sorted.map_or("", |s| s.direction.aria()),
                );
            match sort_href(column, self.next_direction(index)) {
                Some(href) => th.child(
                    el("a")
                        .class("sort-link")
                        .attr("href", href)
                        .text(column.label.clone()),
                ),
                None => th.text(column.label.clone()),
            }
        }));

        let spans = self.group_spans();
        let visible_rows = self
            .rows
            .iter()
            .filter(|r| !r.hidden)
            .enumerate()
            .map(|(index, row)| {
                let mut tr = el("tr");
                for (column, cell) in row.cells.iter().enumerate() {
                    if Some(column) == self.group_column {
                        if let Some(span) = spans.get(index).copied().flatten() {
                            tr = tr.child(cell.td_in(Some(span)));
                        }
                    } else {
                        tr = tr.child(cell.td());
                    }
                }
                tr
            });

        let hidden_rows = self
            .rows
            .iter()
            .filter(|r| r.hidden)
            .map(|row| el("tr").children(row.cells.iter().map(Cell::td)));

        let mut table = el("table")
            .class("config-table")
            .id(self.id.clone())
            .child(el("thead").child(header))
            .child(el("tbody").children(visible_rows));
        if self.rows.iter().any(|r| r.hidden) {
            table = table.child(
                el("tbody")
                    .class("filtered-rows")
                    .flag(true, "hidden")
                    .children(hidden_rows),
            );
        }
        table.into()
    }
}

fn compare_cells(a: &Cell, b: &Cell, kind: ColumnKind) -> Ordering {
    let (a, b) = (a.display().trim(), b.display().trim());
    match kind {
        ColumnKind::Numeric => {
            let a = parse_leading_float(a).unwrap_or(0.0);
            let b = parse_leading_float(b).unwrap_or(0.0);
            a.total_cmp(&b)
        }
        ColumnKind::Text => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
    }
}
