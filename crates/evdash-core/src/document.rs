//! Per-project configuration documents.
//!
//! Two shapes are recognized:
//!
//! ```text
//! flat     { bbfv_margins, system_configuration[], dimm_configuration[] }
//! tablists { tablists[ { id, title, tabs[ { id, title, content[row] } ] } ] }
//! ```
//!
//! Parsing is lenient: absent or malformed sections become empty sections so
//! that rendering degrades to empty tables instead of failing. Anything that
//! matches neither shape is kept verbatim as [`ConfigDocument::Other`].

use serde::Serialize;
use serde_json::{Map, Value};

/// One table row: column name to raw JSON value, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    #[must_use]
    pub const fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BbfvMargins {
    pub io: Value,
    pub ddr: Value,
}

/// One row of the system configuration table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SystemRow {
    pub risk: Value,
    pub worst_ehxew: Value,
    pub source: Value,
    pub mcio_cable: Value,
    pub awg: Value,
    pub length: Value,
    pub loss: Value,
    pub to: Value,
    pub slot: Value,
    pub result: Value,
}

/// An end device and the links measured against it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EndDevice {
    pub end_device: String,
    pub rows: Vec<SystemRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DimmRow {
    pub id: Value,
    pub vendor: Value,
    pub description: Value,
    pub pn: Value,
    pub one_dpc: Value,
    pub two_dpc: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlatConfig {
    pub bbfv_margins: BbfvMargins,
    pub system_configuration: Vec<EndDevice>,
    pub dimm_configuration: Vec<DimmRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tab {
    pub id: String,
    pub title: String,
    pub content: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tablist {
    pub id: String,
    pub title: String,
    pub tabs: Vec<Tab>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ConfigDocument {
    Flat(FlatConfig),
    Tablists { tablists: Vec<Tablist> },
    Other { value: Value },
}

const FLAT_KEYS: [&str; 3] = ["bbfv_margins", "system_configuration", "dimm_configuration"];

impl ConfigDocument {
    /// Classify and parse a raw JSON document.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::Other { value };
        };

        if object.contains_key("tablists") {
            let tablists = array(object.get("tablists"))
                .iter()
                .enumerate()
                .map(|(index, raw)| parse_tablist(index, raw))
                .collect();
            return Self::Tablists { tablists };
        }

        if FLAT_KEYS.iter().any(|key| object.contains_key(*key)) {
            return Self::Flat(parse_flat(object));
        }

        Self::Other { value }
    }
}

fn array(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn field(object: &Map<String, Value>, key: &str) -> Value {
    object.get(key).cloned().unwrap_or(Value::Null)
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_tablist(index: usize, raw: &Value) -> Tablist {
    let empty = Map::new();
    let object = raw.as_object().unwrap_or(&empty);
    let id = string_field(object, "id").unwrap_or_else(|| format!("tablist-{index}"));
    let title = string_field(object, "title").unwrap_or_else(|| id.clone());
    let tabs = array(object.get("tabs"))
        .iter()
        .enumerate()
        .map(|(tab_index, tab)| parse_tab(&id, tab_index, tab))
        .collect();
    Tablist { id, title, tabs }
}

fn parse_tab(tablist_id: &str, index: usize, raw: &Value) -> Tab {
    let empty = Map::new();
    let object = raw.as_object().unwrap_or(&empty);
    let id = string_field(object, "id").unwrap_or_else(|| format!("{tablist_id}-tab-{index}"));
    let title = string_field(object, "title").unwrap_or_else(|| id.clone());
    let content = array(object.get("content"))
        .iter()
        .filter_map(Value::as_object)
        .map(|row| Row::new(row.clone()))
        .collect();
    Tab { id, title, content }
}

fn parse_flat(object: &Map<String, Value>) -> FlatConfig {
    let empty = Map::new();
    let margins = object
        .get("bbfv_margins")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let system_configuration = array(object.get("system_configuration"))
        .iter()
        .filter_map(Value::as_object)
        .map(|device| EndDevice {
            end_device: string_field(device, "end_device").unwrap_or_default(),
            rows: array(device.get("rows"))
                .iter()
                .filter_map(Value::as_object)
                .map(|row| SystemRow {
                    risk: field(row, "risk"),
                    worst_ehxew: field(row, "worst_ehxew"),
                    source: field(row, "source"),
                    mcio_cable: field(row, "mcio_cable"),
                    awg: field(row, "awg"),
                    length: field(row, "length"),
                    loss: field(row, "loss"),
                    to: field(row, "to"),
                    slot: field(row, "slot"),
                    result: field(row, "result"),
                })
                .collect(),
        })
        .collect();

    let dimm_configuration = array(object.get("dimm_configuration"))
        .iter()
        .filter_map(Value::as_object)
        .map(|dimm| DimmRow {
            id: field(dimm, "id"),
            vendor: field(dimm, "vendor"),
            description: field(dimm, "description"),
            pn: field(dimm, "pn"),
            one_dpc: field(dimm, "1dpc"),
            two_dpc: field(dimm, "2dpc"),
        })
        .collect();

    FlatConfig {
        bbfv_margins: BbfvMargins {
            io: field(margins, "BBFV_IO_Margin"),
            ddr: field(margins, "BBFV_DDR_Margin"),
        },
        system_configuration,
        dimm_configuration,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn non_object_is_other() {
        let doc = ConfigDocument::from_value(json!([1, 2]));
        assert!(matches!(doc, ConfigDocument::Other { .. }));
    }

    #[test]
    fn row_keeps_document_column_order() {
        let raw = json!({"zeta": 1, "alpha": 2, "mid": 3});
        let row = Row::new(raw.as_object().unwrap().clone());
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn tablist_ids_are_synthesized_when_missing() {
        let doc = ConfigDocument::from_value(json!({"tablists": [{"tabs": [{"content": []}]}]}));
        let ConfigDocument::Tablists { tablists } = doc else {
            panic!("expected tablists");
        };
        assert_eq!(tablists[0].id, "tablist-0");
        assert_eq!(tablists[0].tabs[0].id, "tablist-0-tab-0");
        assert!(tablists[0].tabs[0].content.is_empty());
    }
}
