//! The action reducer
//!
//! Every change to a [`Model`] flows through [`update`]. An action runs
//! against a working copy; tidying, relinking and z-order re-synchronization
//! follow, and only then is the copy committed. A rejected action leaves the
//! model untouched.

mod attributes;
mod border;
mod layout;
mod window;

pub use window::DEFAULT_FLOAT_RECT;

use tracing::{debug, span, warn, Level};

use crate::error::ActionError;
use crate::messages::Action;
use crate::model::tidy::tidy_window;
use crate::model::{LayoutWindow, Model, NodeId, Orientation, RowChild};

#[cfg(debug_assertions)]
use crate::tracing::LayoutSnapshot;

/// Apply one action; returns the node the action affected, if any
pub fn update(model: &mut Model, action: Action) -> Result<Option<NodeId>, ActionError> {
    let kind = action.kind();
    let _span = span!(Level::DEBUG, "action", kind = %kind).entered();

    #[cfg(debug_assertions)]
    let before = LayoutSnapshot::from_model(model);

    let result = apply(model, action);
    match &result {
        Ok(node) => debug!(node = ?node.as_ref().map(NodeId::as_str), "applied"),
        Err(err) => warn!(%err, "rejected"),
    }

    #[cfg(debug_assertions)]
    if result.is_ok() {
        if let Some(diff) = before.diff(&LayoutSnapshot::from_model(model)) {
            debug!(target: "layout", %diff, "structure changed");
        }
    }

    result
}

/// Run the action on a copy and commit it only if everything succeeded
fn apply(model: &mut Model, action: Action) -> Result<Option<NodeId>, ActionError> {
    let keep = lone_empty_tabset(&model.main_window);
    let mut working = model.clone();
    let affected = dispatch(&mut working, action)?;
    finish(&mut working, keep.as_ref());
    working.assert_invariants();
    *model = working;
    Ok(affected)
}

fn dispatch(model: &mut Model, action: Action) -> Result<Option<NodeId>, ActionError> {
    match action {
        // === Tree structure ===
        Action::AddNode {
            json,
            to_node,
            location,
            index,
            select,
        } => layout::add_node(model, json, &to_node, location, index, select),
        Action::MoveNode {
            from_node,
            to_node,
            location,
            index,
            select,
        } => layout::move_node(model, &from_node, &to_node, location, index, select),
        Action::DeleteTab { node } => layout::delete_tab(model, &node),
        Action::DeleteTabset { node } => layout::delete_tabset(model, &node),

        // === Selection ===
        Action::SelectTab { tab_node } => layout::select_tab(model, &tab_node),
        Action::SelectIndex { node, index } => layout::select_index(model, &node, index),
        Action::SetActiveTabset {
            tabset_node,
            window_id,
        } => layout::set_active_tabset(model, tabset_node.as_ref(), window_id.as_ref()),
        Action::MaximizeToggle { node } => layout::maximize_toggle(model, &node),

        // === Sizing ===
        Action::AdjustWeights { node_id, weights } => {
            layout::adjust_weights(model, &node_id, &weights)
        }
        Action::AdjustBorderSplit { node, size } => border::adjust_border_split(model, &node, size),

        // === Borders ===
        Action::SetDockState { node, state } => border::set_dock_state(model, &node, state),
        Action::OpenFlyout { node, tab_node } => border::open_flyout(model, &node, &tab_node),
        Action::CloseFlyout { node } => border::close_flyout(model, &node),

        // === Floating windows ===
        Action::FloatTab { node, rect } => window::float_tab(model, &node, rect),
        Action::FloatTabset { node, rect } => window::float_tabset(model, &node, rect),
        Action::MoveWindow { window_id, rect } => window::move_window(model, &window_id, rect),
        Action::BringToFront { window_id } => window::bring_window_to_front(model, &window_id),
        Action::CloseWindow { window_id } => window::close_window(model, &window_id),
        Action::DockTabset {
            window_id,
            to_node,
            location,
        } => window::dock_tabset(model, &window_id, &to_node, location),

        // === Attributes ===
        Action::RenameTab { node, text } => attributes::with_tab(model, &node, |t| t.name = text),
        Action::SetTabIcon { node, icon } => attributes::with_tab(model, &node, |t| t.icon = icon),
        Action::SetTabComponent { node, component } => {
            attributes::with_tab(model, &node, |t| t.component = component)
        }
        Action::SetTabConfig { node, config } => {
            attributes::with_tab(model, &node, |t| t.config = config)
        }
        Action::SetTabEnableClose { node, enabled } => {
            attributes::with_tab(model, &node, |t| t.enable_close = enabled)
        }
        Action::SetTabEnableDrag { node, enabled } => {
            attributes::with_tab(model, &node, |t| t.enable_drag = enabled)
        }
        Action::SetTabEnableRename { node, enabled } => {
            attributes::with_tab(model, &node, |t| t.enable_rename = enabled)
        }
        Action::UpdateModelAttributes { json } => attributes::update_model_attributes(model, &json),
        Action::UpdateNodeAttributes { node, json } => {
            attributes::update_node_attributes(model, &node, &json)
        }
    }
}

/// The main root's only child, when it is an empty tabset
fn lone_empty_tabset(window: &LayoutWindow) -> Option<NodeId> {
    match window.root.children.as_slice() {
        [RowChild::Tabset(ts)] if ts.children.is_empty() => Some(ts.id.clone()),
        _ => None,
    }
}

/// Restore structural invariants after a mutation
fn finish(model: &mut Model, keep: Option<&NodeId>) {
    let global = model.global.clone();
    let mut ids = model.id_source();
    let mut fresh = || ids.next_id();

    tidy_window(&mut model.main_window, &global, keep, &mut fresh);
    model.windows.retain(|id, window| {
        let open = tidy_window(window, &global, None, &mut fresh);
        if !open {
            debug!(window = %id, "floating window emptied; closing");
        }
        open
    });
    model.finish_ids(ids);

    model.global.root_orientation_vertical =
        model.main_window.root_orientation == Orientation::Vertical;
    model.relink();
    model.sync_z_order();
}
