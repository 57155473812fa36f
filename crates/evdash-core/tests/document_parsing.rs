//! Parsing tests for both configuration document shapes.

use evdash_core::{ConfigDocument, FlatConfig};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn flat_document_parses_all_three_sections() {
    let raw = json!({
        "bbfv_margins": {"BBFV_IO_Margin": "12%", "BBFV_DDR_Margin": "8%"},
        "system_configuration": [
            {
                "end_device": "NVMe U.2",
                "rows": [
                    {"risk": "Low", "worst_ehxew": "45x0.3", "source": "CPU0", "mcio_cable": "MC-1",
                     "awg": 30, "length": 0.5, "loss": 12.4, "to": "BP0", "slot": "1", "result": true},
                    {"risk": "High", "worst_ehxew": "20x0.2", "source": "CPU1", "mcio_cable": "MC-2",
                     "awg": 28, "length": 0.8, "loss": 18.1, "to": "BP1", "slot": "2", "result": false}
                ]
            }
        ],
        "dimm_configuration": [
            {"id": "RDIMM", "vendor": "Samsung", "description": "64GB", "pn": "M321", "1dpc": true, "2dpc": false}
        ]
    });

    let ConfigDocument::Flat(flat) = ConfigDocument::from_value(raw) else {
        panic!("expected flat document");
    };
    assert_eq!(flat.bbfv_margins.io, json!("12%"));
    assert_eq!(flat.system_configuration.len(), 1);
    assert_eq!(flat.system_configuration[0].end_device, "NVMe U.2");
    assert_eq!(flat.system_configuration[0].rows.len(), 2);
    assert_eq!(flat.system_configuration[0].rows[1].loss, json!(18.1));
    assert_eq!(flat.dimm_configuration[0].one_dpc, json!(true));
    assert_eq!(flat.dimm_configuration[0].two_dpc, json!(false));
}

#[test]
fn flat_document_with_missing_sections_degrades_to_empty() {
    let doc = ConfigDocument::from_value(json!({"bbfv_margins": {}}));
    assert_eq!(doc, ConfigDocument::Flat(FlatConfig::default()));
}

#[test]
fn malformed_sections_are_skipped_not_fatal() {
    let doc = ConfigDocument::from_value(json!({
        "system_configuration": "oops",
        "dimm_configuration": [42, {"id": "UDIMM"}]
    }));
    let ConfigDocument::Flat(flat) = doc else {
        panic!("expected flat document");
    };
    assert!(flat.system_configuration.is_empty());
    assert_eq!(flat.dimm_configuration.len(), 1);
    assert_eq!(flat.dimm_configuration[0].id, json!("UDIMM"));
}

#[test]
fn tablists_document_parses_nested_tabs() {
    let raw = json!({
        "tablists": [
            {
                "id": "pcie",
                "title": "PCIe",
                "tabs": [
                    {"id": "gen5", "title": "Gen5", "content": [
                        {"lane": 0, "eye_height": 45, "result": "reports/a.html"},
                        {"lane": 1, "eye_width": 0.3}
                    ]},
                    {"id": "gen4", "title": "Gen4"}
                ]
            }
        ]
    });

    let ConfigDocument::Tablists { tablists } = ConfigDocument::from_value(raw) else {
        panic!("expected tablists document");
    };
    assert_eq!(tablists.len(), 1);
    assert_eq!(tablists[0].title, "PCIe");
    assert_eq!(tablists[0].tabs.len(), 2);
    assert_eq!(tablists[0].tabs[0].content.len(), 2);
    assert!(tablists[0].tabs[1].content.is_empty());
}

#[test]
fn unknown_object_is_kept_verbatim() {
    let raw = json!({"lanes": [1, 2, 3]});
    assert_eq!(
        ConfigDocument::from_value(raw.clone()),
        ConfigDocument::Other { value: raw }
    );
}
