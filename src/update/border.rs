//! Border actions: resize, dock state and the single flyout

use tracing::trace;

use crate::error::ActionError;
use crate::model::{Border, DockState, Model, NodeId};

fn border_mut<'a>(model: &'a mut Model, id: &NodeId) -> Result<&'a mut Border, ActionError> {
    if model.borders.by_id(id).is_none() {
        return Err(match model.node_by_id(id) {
            Some(node) => ActionError::wrong_kind(id, "border", node.kind()),
            None => ActionError::UnknownNode(id.clone()),
        });
    }
    model
        .borders
        .by_id_mut(id)
        .ok_or_else(|| ActionError::UnknownNode(id.clone()))
}

pub(super) fn adjust_border_split(
    model: &mut Model,
    id: &NodeId,
    size: f64,
) -> Result<Option<NodeId>, ActionError> {
    if !size.is_finite() {
        return Err(ActionError::InvalidSize(size));
    }
    let global = model.global.clone();
    let border = border_mut(model, id)?;
    let clamped = border.clamp_requested_size(size, &global);
    trace!(border = %id, requested = size, clamped, "border resized");
    border.size = Some(clamped);
    Ok(Some(id.clone()))
}

pub(super) fn set_dock_state(
    model: &mut Model,
    id: &NodeId,
    state: Option<DockState>,
) -> Result<Option<NodeId>, ActionError> {
    let border = border_mut(model, id)?;
    border.dock_state = state.unwrap_or_else(|| border.dock_state.toggled());
    Ok(Some(id.clone()))
}

pub(super) fn open_flyout(
    model: &mut Model,
    id: &NodeId,
    tab: &NodeId,
) -> Result<Option<NodeId>, ActionError> {
    let border = border_mut(model, id)?;
    if border.tab_index(tab).is_none() {
        return Err(ActionError::NotInBorder {
            tab: tab.clone(),
            border: id.clone(),
        });
    }
    // one flyout across the whole model
    for other in model.borders.iter_mut() {
        other.flyout_tab_id = None;
    }
    if let Some(border) = model.borders.by_id_mut(id) {
        border.flyout_tab_id = Some(tab.clone());
    }
    Ok(Some(tab.clone()))
}

pub(super) fn close_flyout(model: &mut Model, id: &NodeId) -> Result<Option<NodeId>, ActionError> {
    let border = border_mut(model, id)?;
    border.flyout_tab_id = None;
    Ok(Some(id.clone()))
}
