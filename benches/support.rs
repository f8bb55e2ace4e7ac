//! Shared helpers for benchmarks

use flexdock::model::{Model, Rect};
use serde_json::{json, Value};

pub const SCREEN: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 1920.0,
    height: 1080.0,
};

/// A grid of `columns` columns, each a vertical row of `rows` tabsets with
/// `tabs` tabs apiece, plus a left and bottom border
#[allow(dead_code)]
pub fn grid_json(columns: usize, rows: usize, tabs: usize) -> Value {
    let column = |c: usize| {
        let tabsets: Vec<Value> = (0..rows)
            .map(|r| {
                let children: Vec<Value> = (0..tabs)
                    .map(|t| json!({"type": "tab", "id": format!("t{}_{}_{}", c, r, t), "name": format!("Tab {}", t)}))
                    .collect();
                json!({"type": "tabset", "id": format!("ts{}_{}", c, r), "weight": 50, "children": children})
            })
            .collect();
        json!({"type": "row", "id": format!("col{}", c), "weight": 100, "children": tabsets})
    };

    json!({
        "borders": [
            {"location": "left", "selected": 0, "children": [
                {"type": "tab", "id": "explorer", "name": "Explorer"},
                {"type": "tab", "id": "search", "name": "Search"}
            ]},
            {"location": "bottom", "children": [
                {"type": "tab", "id": "terminal", "name": "Terminal"}
            ]}
        ],
        "layout": {
            "type": "row",
            "id": "root",
            "children": (0..columns).map(column).collect::<Vec<_>>()
        }
    })
}

#[allow(dead_code)]
pub fn make_model(columns: usize, rows: usize, tabs: usize) -> Model {
    Model::from_value(grid_json(columns, rows, tabs)).expect("benchmark layout must load")
}
