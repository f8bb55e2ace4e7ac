//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use flexdock::model::{Border, DockLocation, Model, NodeId, TabSet};
use flexdock::{EngineConfig, LayoutStore};
use serde_json::{json, Value};

/// Two tabsets side by side (`ts0=[tab1,tab2]`, `ts1=[tab3]`), a left border
/// holding `tabX` and `tabX2`, and a right border holding `tabY`
pub fn fixture_json() -> Value {
    json!({
        "global": {"splitterSize": 8},
        "borders": [
            {"location": "left", "children": [
                {"type": "tab", "id": "tabX", "name": "X"},
                {"type": "tab", "id": "tabX2", "name": "X2"}
            ]},
            {"location": "right", "children": [
                {"type": "tab", "id": "tabY", "name": "Y"}
            ]}
        ],
        "layout": {"type": "row", "id": "root", "children": [
            {"type": "tabset", "id": "ts0", "weight": 50, "children": [
                {"type": "tab", "id": "tab1", "name": "One", "component": "text"},
                {"type": "tab", "id": "tab2", "name": "Two", "component": "text"}
            ]},
            {"type": "tabset", "id": "ts1", "weight": 50, "children": [
                {"type": "tab", "id": "tab3", "name": "Three", "component": "grid"}
            ]}
        ]}
    })
}

/// Three tabsets in one row with weights 25/50/25
pub fn three_column_json() -> Value {
    json!({
        "layout": {"type": "row", "id": "root", "children": [
            {"type": "tabset", "id": "a", "weight": 25, "children": [{"type": "tab", "id": "ta", "name": "A"}]},
            {"type": "tabset", "id": "b", "weight": 50, "children": [{"type": "tab", "id": "tb", "name": "B"}]},
            {"type": "tabset", "id": "c", "weight": 25, "children": [{"type": "tab", "id": "tc", "name": "C"}]}
        ]}
    })
}

pub fn model_from(json: Value) -> Model {
    Model::from_value(json).expect("fixture must load")
}

pub fn test_model() -> Model {
    model_from(fixture_json())
}

pub fn test_store() -> LayoutStore {
    LayoutStore::from_json(&fixture_json().to_string(), EngineConfig::default())
        .expect("fixture must load")
}

pub fn tabset<'a>(model: &'a Model, id: &str) -> &'a TabSet {
    model
        .node_by_id(&NodeId::from(id))
        .and_then(|n| n.as_tabset())
        .unwrap_or_else(|| panic!("no tabset {}", id))
}

/// Tab ids of a tabset, in order
pub fn tab_ids(model: &Model, tabset_id: &str) -> Vec<String> {
    tabset(model, tabset_id)
        .children
        .iter()
        .map(|t| t.id.as_str().to_string())
        .collect()
}

pub fn border(model: &Model, location: DockLocation) -> &Border {
    model
        .borders
        .get(location)
        .unwrap_or_else(|| panic!("no {} border", location))
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}
