//! Configuration documents as table views.
//!
//! Flat documents become three fixed tables; tablist documents become one
//! section per tablist with a sub-tab per tab; anything else is shown as
//! pretty-printed JSON.
//!
//! Every section, tab, panel and table id is prefixed with the view's scope
//! and is unique within the view, so a page holding the configuration and
//! several reports never repeats an id.

use std::collections::HashSet;

use evdash_config::UiConfig;
use evdash_core::value::display_text;
use evdash_core::{ConfigDocument, DimmRow, FlatConfig, Row, Selection, SystemRow, Tablist};
use serde::Serialize;
use serde_json::Value;

use crate::error::RenderError;
use crate::html::{Element, el};
use crate::links::ViewLinks;
use crate::search::{NO_RESULTS, SearchOutcome, normalize_term};
use crate::table::{Cell, Column, TableView};
use crate::tabs::{TabController, TabSpec};

/// Shown in place of the configuration when its document cannot be loaded.
pub const CONFIG_LOAD_FAILED: &str = "Failed to load configuration data. Please check the file path.";

/// Shown above the empty table of a tab with no content.
pub const NO_DATA: &str = "No data available for this category.";

/// Column behavior taken from the UI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Header labels (or keys) sorted numerically.
    pub numeric_columns: Vec<String>,
    /// Document keys rendered as result links.
    pub link_columns: Vec<String>,
}

impl From<&UiConfig> for RenderOptions {
    fn from(ui: &UiConfig) -> Self {
        Self {
            numeric_columns: ui.numeric_columns.clone(),
            link_columns: ui.link_columns.clone(),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&UiConfig::default())
    }
}

impl RenderOptions {
    fn column(&self, key: &str, label: &str) -> Column {
        let column = Column::new(key, label).numeric_if_listed(&self.numeric_columns);
        if self.link_columns.iter().any(|l| l.eq_ignore_ascii_case(key)) {
            column.link()
        } else {
            column
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PanelContent {
    Table(TableView),
    /// A tab with no rows: the no-data message plus an empty table.
    Empty(TableView),
    Json { pretty: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub id: String,
    pub content: PanelContent,
}

impl Panel {
    fn table(&self) -> Option<&TableView> {
        match &self.content {
            PanelContent::Table(table) | PanelContent::Empty(table) => Some(table),
            PanelContent::Json { .. } => None,
        }
    }

    fn table_mut(&mut self) -> Option<&mut TableView> {
        match &mut self.content {
            PanelContent::Table(table) | PanelContent::Empty(table) => Some(table),
            PanelContent::Json { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigSection {
    pub id: String,
    pub title: String,
    /// Present for tablist sections; flat sections show every panel.
    pub sub_tabs: Option<TabController>,
    pub panels: Vec<Panel>,
    /// Whether the section shows the no-results marker.
    pub no_results: bool,
}

impl ConfigSection {
    fn single(ids: &mut Ids, base: &str, title: &str, table: TableView) -> Self {
        let id = ids.scoped(base);
        Self {
            panels: vec![Panel {
                id: ids.claim(format!("{id}-panel")),
                content: PanelContent::Table(table),
            }],
            id,
            title: title.to_string(),
            sub_tabs: None,
            no_results: false,
        }
    }

    fn has_tables(&self) -> bool {
        self.panels.iter().any(|p| p.table().is_some())
    }

    fn is_panel_visible(&self, panel: &Panel) -> bool {
        self.sub_tabs
            .as_ref()
            .is_none_or(|tabs| tabs.is_panel_active(&panel.id))
    }
}

/// Hands out ids within one view.
#[derive(Debug)]
struct Ids {
    scope: String,
    used: HashSet<String>,
}

impl Ids {
    fn new(scope: &str) -> Self {
        Self {
            scope: slug(scope),
            used: HashSet::new(),
        }
    }

    /// `base` as an id under this scope.
    fn scoped(&mut self, base: &str) -> String {
        let base = slug(base);
        if self.scope.is_empty() {
            self.claim(base)
        } else {
            self.claim(format!("{}-{base}", self.scope))
        }
    }

    /// `id`, or `id-2`, `id-3`, ... if already taken.
    fn claim(&mut self, id: String) -> String {
        let mut candidate = id.clone();
        let mut n = 2;
        while self.used.contains(&candidate) {
            candidate = format!("{id}-{n}");
            n += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

/// Document ids are free text; keep what is safe in an id or a query value.
fn slug(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// The rendered configuration of one selection (or one report document).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigView {
    sections: Vec<ConfigSection>,
    search_term: String,
}

impl ConfigView {
    /// Build table views for a parsed document, with unprefixed ids.
    #[must_use]
    pub fn build(selection: &Selection, document: &ConfigDocument, options: &RenderOptions) -> Self {
        Self::build_in("", selection, document, options)
    }

    /// Build table views whose ids all start with `scope-`.
    #[must_use]
    pub fn build_in(
        scope: &str,
        selection: &Selection,
        document: &ConfigDocument,
        options: &RenderOptions,
    ) -> Self {
        let mut ids = Ids::new(scope);
        let sections = match document {
            ConfigDocument::Flat(flat) => flat_sections(&mut ids, selection, flat, options),
            ConfigDocument::Tablists { tablists } => tablists
                .iter()
                .map(|tablist| tablist_section(&mut ids, selection, tablist, options))
                .collect(),
            ConfigDocument::Other { value } => vec![json_section(&mut ids, value)],
        };
        Self {
            sections,
            search_term: String::new(),
        }
    }

    /// Parse and build in one step.
    #[must_use]
    pub fn from_value(selection: &Selection, value: Value, options: &RenderOptions) -> Self {
        Self::from_value_in("", selection, value, options)
    }

    /// Parse and build under `scope`.
    #[must_use]
    pub fn from_value_in(scope: &str, selection: &Selection, value: Value, options: &RenderOptions) -> Self {
        Self::build_in(scope, selection, &ConfigDocument::from_value(value), options)
    }

    #[must_use]
    pub fn sections(&self) -> &[ConfigSection] {
        &self.sections
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableView> {
        self.sections
            .iter()
            .flat_map(|s| s.panels.iter())
            .filter_map(Panel::table)
    }

    #[must_use]
    pub fn table(&self, id: &str) -> Option<&TableView> {
        self.tables().find(|t| t.id() == id)
    }

    fn table_mut(&mut self, id: &str) -> Option<&mut TableView> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.panels.iter_mut())
            .filter_map(Panel::table_mut)
            .find(|t| t.id() == id)
    }

    /// Filter every table. Sections with tables but no visible rows show the
    /// no-results marker while the term is non-empty.
    pub fn apply_search(&mut self, term: &str) -> SearchOutcome {
        let normalized = normalize_term(term);
        self.search_term = term.trim().to_string();
        let mut outcome = SearchOutcome::default();
        for section in &mut self.sections {
            let mut section_outcome = SearchOutcome::default();
            for table in section.panels.iter_mut().filter_map(Panel::table_mut) {
                section_outcome = section_outcome.merge(table.apply_search(&normalized));
            }
            section.no_results = !normalized.is_empty()
                && section.has_tables()
                && section_outcome.visible_rows == 0;
            if section.no_results {
                section_outcome.empty_sections = 1;
            }
            outcome = outcome.merge(section_outcome);
        }
        outcome
    }

    /// Toggle sorting of `column` (key or label) in table `table_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownTable`] or [`RenderError::UnknownColumn`].
    pub fn sort(&mut self, table_id: &str, column: &str) -> Result<(), RenderError> {
        let table = self
            .table_mut(table_id)
            .ok_or_else(|| RenderError::UnknownTable(table_id.to_string()))?;
        table.sort_by_name(column)?;
        Ok(())
    }

    /// Activate the sub-tab `tab_id` in whichever section owns it.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownTab`] if no section has that tab.
    pub fn activate_sub_tab(&mut self, tab_id: &str) -> Result<(), RenderError> {
        self.sections
            .iter_mut()
            .filter_map(|s| s.sub_tabs.as_mut())
            .find(|tabs| tabs.tabs().iter().any(|t| t.id == tab_id))
            .ok_or_else(|| RenderError::UnknownTab(tab_id.to_string()))?
            .activate(tab_id)
    }

    /// Render every section. `sub_tab_href` gives the link target of a
    /// sub-tab; column headers stay plain.
    pub fn to_element(&self, sub_tab_href: impl Fn(&TabSpec) -> String) -> Element {
        self.to_element_with(&sub_tab_href)
    }

    /// Render every section with sub-tabs and column headers linked through
    /// `links`.
    pub fn to_element_with<L: ViewLinks>(&self, links: &L) -> Element {
        let table_node = |table: &TableView| {
            table.to_node_with(|column, direction| links.sort(table.id(), column, direction))
        };
        el("div")
            .class("config-view")
            .children(self.sections.iter().map(|section| {
                let mut node = el("section")
                    .class("config-section")
                    .id(section.id.clone())
                    .child(el("h2").text(section.title.clone()));
                if let Some(tabs) = &section.sub_tabs {
                    node = node.child(tabs.to_element(|tab| links.tab(tab)));
                }
                node = node.children(section.panels.iter().map(|panel| {
                    let visible = section.is_panel_visible(panel);
                    let body = el("div")
                        .class("tab-panel")
                        .id(panel.id.clone())
                        .attr("role", "tabpanel")
                        .flag(!visible, "hidden");
                    match &panel.content {
                        PanelContent::Table(table) => body.child(table_node(table)),
                        PanelContent::Empty(table) => body
                            .child(el("p").class("no-data").text(NO_DATA))
                            .child(table_node(table)),
                        PanelContent::Json { pretty } => {
                            body.child(el("pre").class("raw-json").text(pretty.clone()))
                        }
                    }
                }));
                if section.no_results {
                    node = node.child(el("p").class("no-results").text(NO_RESULTS));
                }
                node
            }))
    }
}

fn flat_sections(
    ids: &mut Ids,
    selection: &Selection,
    flat: &FlatConfig,
    options: &RenderOptions,
) -> Vec<ConfigSection> {
    let fallback = selection.report_page();

    let mut margins = TableView::new(
        ids.scoped("bbfv-margins"),
        vec![Column::new("parameter", "Parameter"), Column::new("value", "Value")],
    );
    for (label, value) in [
        ("BBFV IO Margin", &flat.bbfv_margins.io),
        ("BBFV DDR Margin", &flat.bbfv_margins.ddr),
    ] {
        margins.push_row(vec![Cell::text(label), plain(value)]);
    }

    let system_columns = [
        ("risk", "Risk"),
        ("worst_ehxew", "Worst EHxEW"),
        ("end_device", "End Device"),
        ("source", "Source"),
        ("mcio_cable", "MCIO Cable"),
        ("awg", "AWG"),
        ("length", "Length"),
        ("loss", "Loss"),
        ("to", "To"),
        ("slot", "Slot"),
        ("result", "Result"),
    ]
    .map(|(key, label)| options.column(key, label))
    .to_vec();
    let mut system =
        TableView::new(ids.scoped("system-configuration"), system_columns).grouped_by("end_device");
    for device in &flat.system_configuration {
        let device_cell = if device.end_device.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::text(device.end_device.clone())
        };
        for row in &device.rows {
            let cells = system_values(row, &device_cell);
            system.push_row(render_cells(system.columns(), &cells, &fallback));
        }
    }

    let dimm_columns = [
        ("id", "DIMM Type"),
        ("vendor", "Vendor"),
        ("description", "Description"),
        ("pn", "PN"),
        ("1dpc", "1DPC"),
        ("2dpc", "2DPC"),
    ]
    .map(|(key, label)| options.column(key, label))
    .to_vec();
    let mut dimm = TableView::new(ids.scoped("dimm-configuration"), dimm_columns);
    for row in &flat.dimm_configuration {
        let cells = dimm_values(row);
        dimm.push_row(render_cells(dimm.columns(), &cells, &fallback));
    }

    vec![
        ConfigSection::single(ids, "bbfv-margins-section", "BBFV Margins", margins),
        ConfigSection::single(ids, "system-configuration-section", "System Configuration", system),
        ConfigSection::single(ids, "dimm-configuration-section", "DIMM Configuration", dimm),
    ]
}

enum RawCell<'a> {
    Value(&'a Value),
    Ready(Cell),
}

fn system_values<'a>(row: &'a SystemRow, device: &Cell) -> [RawCell<'a>; 11] {
    [
        RawCell::Value(&row.risk),
        RawCell::Value(&row.worst_ehxew),
        RawCell::Ready(device.clone()),
        RawCell::Value(&row.source),
        RawCell::Value(&row.mcio_cable),
        RawCell::Value(&row.awg),
        RawCell::Value(&row.length),
        RawCell::Value(&row.loss),
        RawCell::Value(&row.to),
        RawCell::Value(&row.slot),
        RawCell::Value(&row.result),
    ]
}

fn dimm_values(row: &DimmRow) -> [RawCell<'_>; 6] {
    [
        RawCell::Value(&row.id),
        RawCell::Value(&row.vendor),
        RawCell::Value(&row.description),
        RawCell::Value(&row.pn),
        RawCell::Value(&row.one_dpc),
        RawCell::Value(&row.two_dpc),
    ]
}

fn render_cells(columns: &[Column], raw: &[RawCell<'_>], fallback: &str) -> Vec<Cell> {
    columns
        .iter()
        .zip(raw)
        .map(|(column, raw)| match raw {
            RawCell::Value(value) => Cell::from_value(Some(value), column.renderer, fallback),
            RawCell::Ready(cell) => cell.clone(),
        })
        .collect()
}

fn plain(value: &Value) -> Cell {
    display_text(value).map_or(Cell::Empty, Cell::text)
}

/// Header label for a generic column key: underscores become spaces,
/// letters are upper-cased.
#[must_use]
pub fn column_label(key: &str) -> String {
    key.replace('_', " ").to_uppercase()
}

/// Union of the rows' keys in first-seen order.
fn union_keys(rows: &[Row]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
    }
    keys
}

fn tablist_section(
    ids: &mut Ids,
    selection: &Selection,
    tablist: &Tablist,
    options: &RenderOptions,
) -> ConfigSection {
    let fallback = selection.report_page();
    let section_id = ids.scoped(&format!("{}-section", tablist.id));
    let mut specs = Vec::with_capacity(tablist.tabs.len());
    let mut panels = Vec::with_capacity(tablist.tabs.len());

    for tab in &tablist.tabs {
        let tab_id = ids.scoped(&tab.id);
        let panel_id = ids.claim(format!("{tab_id}-panel"));
        let table_id = ids.claim(format!("{tab_id}-table"));
        specs.push(TabSpec::new(tab_id, tab.title.clone(), panel_id.clone()));

        let columns: Vec<Column> = union_keys(&tab.content)
            .iter()
            .map(|key| options.column(key, &column_label(key)))
            .collect();
        let mut table = TableView::new(table_id, columns);
        for row in &tab.content {
            let cells = table
                .columns()
                .iter()
                .map(|column| Cell::from_value(row.get(&column.key), column.renderer, &fallback))
                .collect();
            table.push_row(cells);
        }

        let content = if tab.content.is_empty() {
            PanelContent::Empty(table)
        } else {
            PanelContent::Table(table)
        };
        panels.push(Panel {
            id: panel_id,
            content,
        });
    }

    ConfigSection {
        id: section_id,
        title: tablist.title.clone(),
        sub_tabs: Some(TabController::new(specs)),
        panels,
        no_results: false,
    }
}

fn json_section(ids: &mut Ids, value: &Value) -> ConfigSection {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    let id = ids.scoped("raw-document");
    ConfigSection {
        title: "Configuration".to_string(),
        sub_tabs: None,
        panels: vec![Panel {
            id: ids.claim(format!("{id}-panel")),
            content: PanelContent::Json { pretty },
        }],
        id,
        no_results: false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::html::Node;
    use crate::table::CellRenderer;

    fn acme() -> Selection {
        Selection::new("Acme", "X1").unwrap()
    }

    #[test]
    fn labels_replace_underscores_and_uppercase() {
        assert_eq!(column_label("worst_ehxew"), "WORST EHXEW");
        assert_eq!(column_label("1dpc"), "1DPC");
    }

    #[test]
    fn union_of_keys_keeps_first_seen_order() {
        let view = ConfigView::from_value(
            &acme(),
            json!({"tablists": [{"id": "l", "title": "L", "tabs": [{"id": "t", "title": "T", "content": [
                {"lane": 0, "eye": 1},
                {"lane": 1, "result": true, "extra": "x"}
            ]}]}]}),
            &RenderOptions::default(),
        );
        let table = view.table("t-table").unwrap();
        let keys: Vec<&str> = table.columns().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["lane", "eye", "result", "extra"]);
        assert_eq!(table.columns()[2].renderer, CellRenderer::Link);
        assert_eq!(table.visible_texts()[0], vec!["0", "1", "—", "—"]);
        assert_eq!(table.visible_texts()[1], vec!["1", "—", "Report", "x"]);
    }

    #[test]
    fn flag_links_point_at_the_project_report() {
        let view = ConfigView::from_value(
            &acme(),
            json!({"dimm_configuration": [{"id": "RDIMM", "1dpc": true, "2dpc": 0}]}),
            &RenderOptions::default(),
        );
        let html = Node::from(view.to_element(|t| t.id.clone())).render();
        assert!(html.contains("href=\"reports/Acme/X1/report.html\""));
        assert_eq!(
            view.table("dimm-configuration").unwrap().visible_texts()[0],
            vec!["RDIMM", "—", "—", "—", "Report", "—"]
        );
    }

    #[test]
    fn empty_tab_shows_no_data_message() {
        let view = ConfigView::from_value(
            &acme(),
            json!({"tablists": [{"id": "l", "title": "L", "tabs": [{"id": "t", "title": "T", "content": []}]}]}),
            &RenderOptions::default(),
        );
        let html = Node::from(view.to_element(|t| t.id.clone())).render();
        assert!(html.contains(NO_DATA));
        assert!(html.contains("<table class=\"config-table\" id=\"t-table\">"));
    }

    #[test]
    fn other_documents_render_as_json() {
        let view = ConfigView::from_value(&acme(), json!({"note": "<b>"}), &RenderOptions::default());
        let html = Node::from(view.to_element(|t| t.id.clone())).render();
        assert!(html.contains("<pre class=\"raw-json\">"));
        assert!(html.contains("&lt;b&gt;"));
        assert_eq!(view.tables().count(), 0);
    }

    #[test]
    fn configured_link_columns_are_used() {
        let options = RenderOptions {
            numeric_columns: vec![],
            link_columns: vec!["waveform".into()],
        };
        let view = ConfigView::from_value(
            &acme(),
            json!({"tablists": [{"id": "l", "tabs": [{"id": "t", "content": [{"waveform": "w.html", "result": true}]}]}]}),
            &options,
        );
        let table = view.table("t-table").unwrap();
        assert_eq!(table.columns()[0].renderer, CellRenderer::Link);
        assert_eq!(table.columns()[1].renderer, CellRenderer::Plain);
    }

    #[test]
    fn sub_tab_activation_hides_sibling_panels() {
        let mut view = ConfigView::from_value(
            &acme(),
            json!({"tablists": [{"id": "l", "tabs": [
                {"id": "a", "content": [{"k": 1}]},
                {"id": "b", "content": [{"k": 2}]}
            ]}]}),
            &RenderOptions::default(),
        );
        view.activate_sub_tab("b").unwrap();
        let html = Node::from(view.to_element(|t| t.id.clone())).render();
        assert!(html.contains("id=\"a-panel\" role=\"tabpanel\" hidden"));
        assert!(html.contains("id=\"b-panel\" role=\"tabpanel\">"));
        assert!(view.activate_sub_tab("zzz").is_err());
    }

    #[test]
    fn scoped_ids_carry_the_prefix() {
        let view = ConfigView::from_value_in(
            "report-2",
            &acme(),
            json!({"dimm_configuration": [{"id": "A"}]}),
            &RenderOptions::default(),
        );
        assert!(view.table("report-2-dimm-configuration").is_some());
        assert_eq!(view.sections()[2].id, "report-2-dimm-configuration-section");
        assert!(view.table("dimm-configuration").is_none());
    }

    #[test]
    fn repeated_tab_ids_are_made_unique() {
        let mut view = ConfigView::from_value_in(
            "config",
            &acme(),
            json!({"tablists": [
                {"id": "ddr", "tabs": [{"id": "gen5", "content": [{"k": "ddr-b"}, {"k": "ddr-a"}]}]},
                {"id": "pcie", "tabs": [{"id": "gen5", "content": [{"k": "pcie-b"}, {"k": "pcie-a"}]}]}
            ]}),
            &RenderOptions::default(),
        );
        let html = Node::from(view.to_element(|t| t.id.clone())).render();
        assert_eq!(html.matches("id=\"config-gen5-table\"").count(), 1);
        assert_eq!(html.matches("id=\"config-gen5-2-table\"").count(), 1);
        assert_eq!(html.matches("id=\"config-gen5-panel\"").count(), 1);

        view.sort("config-gen5-2-table", "k").unwrap();
        let first = view.table("config-gen5-table").unwrap().visible_texts();
        let second = view.table("config-gen5-2-table").unwrap().visible_texts();
        assert_eq!(first[0], vec!["ddr-b"]);
        assert_eq!(second[0], vec!["pcie-a"]);

        view.activate_sub_tab("config-gen5-2").unwrap();
        assert!(view.sections()[1].sub_tabs.as_ref().unwrap().is_panel_active("config-gen5-2-panel"));
    }

    #[test]
    fn free_text_tab_ids_become_safe_ids() {
        let view = ConfigView::from_value(
            &acme(),
            json!({"tablists": [{"id": "l", "tabs": [{"id": "Gen 5 x16", "content": [{"k": 1}]}]}]}),
            &RenderOptions::default(),
        );
        assert!(view.table("Gen-5-x16-table").is_some());
    }

    #[test]
    fn header_links_come_from_the_links() {
        struct Sorting;
        impl ViewLinks for Sorting {
            fn tab(&self, tab: &TabSpec) -> String {
                format!("?sub={}", tab.id)
            }
            fn sort(&self, table: &str, column: &Column, direction: crate::table::SortDirection) -> Option<String> {
                Some(format!("?sort={table}&col={}&dir={}", column.key, direction.aria()))
            }
        }
        let view = ConfigView::from_value(
            &acme(),
            json!({"dimm_configuration": [{"id": "A"}]}),
            &RenderOptions::default(),
        );
        let html = Node::from(view.to_element_with(&Sorting)).render();
        assert!(html.contains("href=\"?sort=dimm-configuration&amp;col=id&amp;dir=ascending\""));
    }
}
