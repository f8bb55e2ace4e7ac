//! Action types for the layout reducer
//!
//! Every change to a model flows through an [`Action`]. Actions serialize to
//! the `{"type": "MOVE_NODE", ...}` form so a host can record or replay them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::node::optional_index;
use crate::model::{DockLocation, DockState, NodeId, Rect, WindowId};

fn center() -> DockLocation {
    DockLocation::Center
}

/// A command against the layout model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    // === Tree structure ===
    /// Insert a new tab built from `json` into a tabset, border or root row
    AddNode {
        json: Value,
        to_node: NodeId,
        #[serde(default = "center")]
        location: DockLocation,
        /// Insertion index; -1 (none) appends
        #[serde(with = "optional_index", default)]
        index: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        select: Option<bool>,
    },
    /// Detach a tab or tabset and reinsert it relative to `to_node`
    MoveNode {
        from_node: NodeId,
        to_node: NodeId,
        #[serde(default = "center")]
        location: DockLocation,
        #[serde(with = "optional_index", default)]
        index: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        select: Option<bool>,
    },
    DeleteTab {
        node: NodeId,
    },
    /// Remove a tabset with all of its tabs
    DeleteTabset {
        node: NodeId,
    },

    // === Selection ===
    /// Select a tab in its tabset (making the tabset active), or toggle a border tab
    SelectTab {
        tab_node: NodeId,
    },
    /// Select by position in a tabset or border
    SelectIndex {
        node: NodeId,
        #[serde(with = "optional_index")]
        index: Option<usize>,
    },
    /// Make a tabset the active one of its window; `None` clears the window's active tabset
    SetActiveTabset {
        #[serde(default)]
        tabset_node: Option<NodeId>,
        #[serde(default)]
        window_id: Option<WindowId>,
    },
    /// Toggle the single maximized tabset of the tabset's window
    MaximizeToggle {
        node: NodeId,
    },

    // === Sizing ===
    /// Overwrite a row's child weights verbatim
    AdjustWeights {
        node_id: NodeId,
        weights: Vec<f64>,
    },
    /// Request a border content size; clamped to the border's bounds
    AdjustBorderSplit {
        node: NodeId,
        size: f64,
    },

    // === Borders ===
    /// Set a border's dock state; `None` toggles it
    SetDockState {
        node: NodeId,
        #[serde(default)]
        state: Option<DockState>,
    },
    OpenFlyout {
        node: NodeId,
        tab_node: NodeId,
    },
    CloseFlyout {
        node: NodeId,
    },

    // === Floating windows ===
    FloatTab {
        node: NodeId,
        #[serde(default)]
        rect: Option<Rect>,
    },
    FloatTabset {
        node: NodeId,
        #[serde(default)]
        rect: Option<Rect>,
    },
    MoveWindow {
        window_id: WindowId,
        rect: Rect,
    },
    BringToFront {
        window_id: WindowId,
    },
    /// Destroy a floating window together with its nodes
    CloseWindow {
        window_id: WindowId,
    },
    /// Merge a floating window's content into `to_node` and close the window
    DockTabset {
        window_id: WindowId,
        to_node: NodeId,
        #[serde(default = "center")]
        location: DockLocation,
    },

    // === Attributes ===
    RenameTab {
        node: NodeId,
        text: String,
    },
    SetTabIcon {
        node: NodeId,
        icon: Option<String>,
    },
    SetTabComponent {
        node: NodeId,
        component: Option<String>,
    },
    SetTabConfig {
        node: NodeId,
        config: Value,
    },
    SetTabEnableClose {
        node: NodeId,
        enabled: Option<bool>,
    },
    SetTabEnableDrag {
        node: NodeId,
        enabled: Option<bool>,
    },
    SetTabEnableRename {
        node: NodeId,
        enabled: Option<bool>,
    },
    /// Patch global attributes; `null` values restore defaults
    UpdateModelAttributes {
        json: Value,
    },
    /// Patch a node's own attributes; `null` values restore inheritance
    UpdateNodeAttributes {
        node: NodeId,
        json: Value,
    },
}

impl Action {
    /// Wire name of the action, e.g. `MOVE_NODE`
    pub fn kind(&self) -> &'static str {
        match self {
            Action::AddNode { .. } => "ADD_NODE",
            Action::MoveNode { .. } => "MOVE_NODE",
            Action::DeleteTab { .. } => "DELETE_TAB",
            Action::DeleteTabset { .. } => "DELETE_TABSET",
            Action::SelectTab { .. } => "SELECT_TAB",
            Action::SelectIndex { .. } => "SELECT_INDEX",
            Action::SetActiveTabset { .. } => "SET_ACTIVE_TABSET",
            Action::MaximizeToggle { .. } => "MAXIMIZE_TOGGLE",
            Action::AdjustWeights { .. } => "ADJUST_WEIGHTS",
            Action::AdjustBorderSplit { .. } => "ADJUST_BORDER_SPLIT",
            Action::SetDockState { .. } => "SET_DOCK_STATE",
            Action::OpenFlyout { .. } => "OPEN_FLYOUT",
            Action::CloseFlyout { .. } => "CLOSE_FLYOUT",
            Action::FloatTab { .. } => "FLOAT_TAB",
            Action::FloatTabset { .. } => "FLOAT_TABSET",
            Action::MoveWindow { .. } => "MOVE_WINDOW",
            Action::BringToFront { .. } => "BRING_TO_FRONT",
            Action::CloseWindow { .. } => "CLOSE_WINDOW",
            Action::DockTabset { .. } => "DOCK_TABSET",
            Action::RenameTab { .. } => "RENAME_TAB",
            Action::SetTabIcon { .. } => "SET_TAB_ICON",
            Action::SetTabComponent { .. } => "SET_TAB_COMPONENT",
            Action::SetTabConfig { .. } => "SET_TAB_CONFIG",
            Action::SetTabEnableClose { .. } => "SET_TAB_ENABLE_CLOSE",
            Action::SetTabEnableDrag { .. } => "SET_TAB_ENABLE_DRAG",
            Action::SetTabEnableRename { .. } => "SET_TAB_ENABLE_RENAME",
            Action::UpdateModelAttributes { .. } => "UPDATE_MODEL_ATTRIBUTES",
            Action::UpdateNodeAttributes { .. } => "UPDATE_NODE_ATTRIBUTES",
        }
    }

    // === Constructors for the common actions ===

    pub fn add_node(
        json: Value,
        to_node: impl Into<NodeId>,
        location: DockLocation,
        index: Option<usize>,
    ) -> Self {
        Action::AddNode {
            json,
            to_node: to_node.into(),
            location,
            index,
            select: None,
        }
    }

    pub fn move_node(
        from_node: impl Into<NodeId>,
        to_node: impl Into<NodeId>,
        location: DockLocation,
        index: Option<usize>,
    ) -> Self {
        Action::MoveNode {
            from_node: from_node.into(),
            to_node: to_node.into(),
            location,
            index,
            select: None,
        }
    }

    pub fn delete_tab(node: impl Into<NodeId>) -> Self {
        Action::DeleteTab { node: node.into() }
    }

    pub fn delete_tabset(node: impl Into<NodeId>) -> Self {
        Action::DeleteTabset { node: node.into() }
    }

    pub fn select_tab(tab_node: impl Into<NodeId>) -> Self {
        Action::SelectTab {
            tab_node: tab_node.into(),
        }
    }

    pub fn adjust_weights(node_id: impl Into<NodeId>, weights: Vec<f64>) -> Self {
        Action::AdjustWeights {
            node_id: node_id.into(),
            weights,
        }
    }

    pub fn adjust_border_split(node: impl Into<NodeId>, size: f64) -> Self {
        Action::AdjustBorderSplit {
            node: node.into(),
            size,
        }
    }

    pub fn open_flyout(border: impl Into<NodeId>, tab: impl Into<NodeId>) -> Self {
        Action::OpenFlyout {
            node: border.into(),
            tab_node: tab.into(),
        }
    }

    pub fn close_flyout(border: impl Into<NodeId>) -> Self {
        Action::CloseFlyout { node: border.into() }
    }

    pub fn maximize_toggle(node: impl Into<NodeId>) -> Self {
        Action::MaximizeToggle { node: node.into() }
    }

    pub fn float_tab(node: impl Into<NodeId>, rect: Option<Rect>) -> Self {
        Action::FloatTab {
            node: node.into(),
            rect,
        }
    }

    pub fn rename_tab(node: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Action::RenameTab {
            node: node.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_wire_format() {
        let action = Action::move_node("tab1", "ts1", DockLocation::Center, Some(0));
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(
            value,
            json!({"type": "MOVE_NODE", "fromNode": "tab1", "toNode": "ts1", "location": "center", "index": 0})
        );
        assert_eq!(action.kind(), "MOVE_NODE");
    }

    #[test]
    fn test_minus_one_index_means_append() {
        let action: Action = serde_json::from_value(json!({
            "type": "ADD_NODE",
            "json": {"type": "tab", "name": "New"},
            "toNode": "ts0",
            "index": -1
        }))
        .unwrap();
        match action {
            Action::AddNode { index, location, .. } => {
                assert_eq!(index, None);
                assert_eq!(location, DockLocation::Center);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
