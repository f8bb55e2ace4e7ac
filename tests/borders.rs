//! Tests for border docking: dock state, flyouts, nesting and insets

mod common;

use common::{border, model_from, test_model};
use flexdock::layout::layout_model;
use flexdock::model::{DockLocation, DockState, Model, Rect};
use flexdock::{update, Action, ActionError};
use serde_json::json;

const SCREEN: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 1024.0,
    height: 768.0,
};

/// Expanded top and left borders, each showing 100px of content
fn top_and_left(left_priority: i32) -> Model {
    model_from(json!({
        "borders": [
            {"location": "top", "selected": 0, "size": 100, "children": [
                {"type": "tab", "id": "t1", "name": "Top"}
            ]},
            {"location": "left", "selected": 0, "size": 100, "priority": left_priority, "children": [
                {"type": "tab", "id": "l1", "name": "Left"}
            ]}
        ],
        "layout": {"type": "row", "id": "root", "children": [
            {"type": "tabset", "id": "main", "children": [{"type": "tab", "id": "m", "name": "M"}]}
        ]}
    }))
}

// ========================================================================
// Flyouts
// ========================================================================

#[test]
fn test_only_one_flyout_open_at_a_time() {
    let mut model = test_model();
    update(&mut model, Action::open_flyout("border_left", "tabX")).unwrap();
    update(&mut model, Action::open_flyout("border_right", "tabY")).unwrap();

    assert_eq!(border(&model, DockLocation::Left).flyout_tab_id, None);
    let (owner, tab) = model.flyout().unwrap();
    assert_eq!(owner.location, DockLocation::Right);
    assert_eq!(tab.id.as_str(), "tabY");
}

#[test]
fn test_flyout_overlays_without_shrinking_main_area() {
    let mut model = test_model();
    update(&mut model, Action::open_flyout("border_left", "tabX")).unwrap();
    let result = layout_model(&mut model, SCREEN);

    assert_eq!(result.main_content, Rect::new(30.0, 0.0, 964.0, 768.0));
    let left = border(&model, DockLocation::Left);
    assert_eq!(left.flyout_rect, Rect::new(30.0, 0.0, 200.0, 768.0));
    assert_eq!(result.rect(&"tabX".into()), Some(left.flyout_rect));
}

#[test]
fn test_close_flyout_and_removing_its_tab() {
    let mut model = test_model();
    update(&mut model, Action::open_flyout("border_left", "tabX")).unwrap();
    update(&mut model, Action::close_flyout("border_left")).unwrap();
    assert!(model.flyout().is_none());

    update(&mut model, Action::open_flyout("border_left", "tabX2")).unwrap();
    update(&mut model, Action::delete_tab("tabX2")).unwrap();
    assert!(model.flyout().is_none());
}

#[test]
fn test_flyout_for_foreign_tab_is_rejected() {
    let mut model = test_model();
    let err = update(&mut model, Action::open_flyout("border_left", "tab1")).unwrap_err();
    assert!(matches!(err, ActionError::NotInBorder { .. }));
}

// ========================================================================
// Selection and dock state
// ========================================================================

#[test]
fn test_selecting_border_tab_twice_collapses_content() {
    let mut model = test_model();
    update(&mut model, Action::select_tab("tabX2")).unwrap();
    assert_eq!(border(&model, DockLocation::Left).selected, Some(1));
    update(&mut model, Action::select_tab("tabX2")).unwrap();
    assert_eq!(border(&model, DockLocation::Left).selected, None);
}

#[test]
fn test_collapsed_border_keeps_only_its_strip() {
    let mut model = test_model();
    update(&mut model, Action::select_tab("tabX")).unwrap();
    let expanded = layout_model(&mut model, SCREEN).main_content;
    assert_eq!(expanded.x, 230.0);

    update(
        &mut model,
        Action::SetDockState {
            node: "border_left".into(),
            state: Some(DockState::Collapsed),
        },
    )
    .unwrap();
    let collapsed = layout_model(&mut model, SCREEN).main_content;
    assert_eq!(collapsed.x, 30.0);
    // selection survives collapsing
    assert_eq!(border(&model, DockLocation::Left).selected, Some(0));
}

#[test]
fn test_dock_state_toggles_without_explicit_state() {
    let mut model = test_model();
    let toggle = || Action::SetDockState {
        node: "border_right".into(),
        state: None,
    };
    update(&mut model, toggle()).unwrap();
    assert_eq!(border(&model, DockLocation::Right).dock_state, DockState::Collapsed);
    update(&mut model, toggle()).unwrap();
    assert_eq!(border(&model, DockLocation::Right).dock_state, DockState::Expanded);
}

#[test]
fn test_auto_hidden_empty_border_takes_no_space() {
    let mut model = test_model();
    update(
        &mut model,
        Action::UpdateModelAttributes {
            json: json!({"borderEnableAutoHide": true}),
        },
    )
    .unwrap();
    update(&mut model, Action::delete_tab("tabY")).unwrap();
    let result = layout_model(&mut model, SCREEN);
    assert_eq!(result.main_content, Rect::new(30.0, 0.0, 994.0, 768.0));
}

// ========================================================================
// Nesting
// ========================================================================

#[test]
fn test_top_border_spans_full_width_by_default() {
    let mut model = top_and_left(0);
    let result = layout_model(&mut model, SCREEN);

    assert_eq!(border(&model, DockLocation::Top).rect, Rect::new(0.0, 0.0, 1024.0, 30.0));
    assert_eq!(border(&model, DockLocation::Left).rect, Rect::new(0.0, 130.0, 30.0, 638.0));
    assert_eq!(result.main_content, Rect::new(130.0, 130.0, 894.0, 638.0));
}

#[test]
fn test_priority_puts_left_border_outermost() {
    let mut model = top_and_left(1);
    let result = layout_model(&mut model, SCREEN);

    assert_eq!(border(&model, DockLocation::Left).rect, Rect::new(0.0, 0.0, 30.0, 768.0));
    assert_eq!(border(&model, DockLocation::Top).rect, Rect::new(130.0, 0.0, 894.0, 30.0));
    assert_eq!(result.main_content, Rect::new(130.0, 130.0, 894.0, 638.0));
}

#[test]
fn test_border_tabs_can_move_to_tabsets() {
    let mut model = test_model();
    update(&mut model, Action::select_tab("tabX")).unwrap();
    update(
        &mut model,
        Action::move_node("tabX", "ts1", DockLocation::Center, None),
    )
    .unwrap();

    let left = border(&model, DockLocation::Left);
    assert_eq!(left.children.len(), 1);
    assert_eq!(left.selected, Some(0));
    assert_eq!(common::tab_ids(&model, "ts1"), vec!["tab3", "tabX"]);
}
