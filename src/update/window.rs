//! Floating-window actions: float, move, stack, close and dock back

use tracing::debug;

use super::layout::{detach_tab, detach_tabset, drop_into, expect_kind, Payload};
use crate::error::ActionError;
use crate::model::{
    bring_to_front, DockLocation, LayoutWindow, Model, NodeId, NodeKind, Rect, Row, RowChild,
    TabSet, WindowId,
};

/// Placement of a floated node whose current rect is unknown
pub const DEFAULT_FLOAT_RECT: Rect = Rect {
    x: 100.0,
    y: 100.0,
    width: 400.0,
    height: 300.0,
};

fn float_rect(requested: Option<Rect>, current: Rect) -> Rect {
    match requested {
        Some(rect) => rect,
        None if !current.is_empty() => current,
        None => DEFAULT_FLOAT_RECT,
    }
}

fn open_window(model: &mut Model, rect: Rect, tabset: TabSet, root_id: NodeId) -> WindowId {
    let window_id = model.generate_window_id();
    let active = tabset.id.clone();
    let root = Row::new(root_id).with_children(vec![RowChild::Tabset(tabset)]);
    let mut window = LayoutWindow::new(window_id.clone(), rect, root);
    window.active_tabset = Some(active);
    model.windows.insert(window_id.clone(), window);
    model.float_z_order = bring_to_front(&model.float_z_order, &window_id);
    debug!(window = %window_id, "floating window opened");
    window_id
}

pub(super) fn float_tab(
    model: &mut Model,
    id: &NodeId,
    rect: Option<Rect>,
) -> Result<Option<NodeId>, ActionError> {
    expect_kind(model, id, NodeKind::Tab)?;
    let (enabled, current) = match model.node_by_id(id).and_then(|n| n.as_tab()) {
        Some(tab) => (tab.can_float(&model.global), tab.rect),
        None => return Err(ActionError::UnknownNode(id.clone())),
    };
    if !enabled {
        return Err(ActionError::Disabled {
            node: id.clone(),
            operation: "float",
        });
    }

    let mut ids = model.id_source();
    let tab = detach_tab(model, id)?;
    let tabset = TabSet::new(ids.next_id()).with_tabs(vec![tab]);
    let root_id = ids.next_id();
    model.finish_ids(ids);
    open_window(model, float_rect(rect, current), tabset, root_id);
    Ok(Some(id.clone()))
}

pub(super) fn float_tabset(
    model: &mut Model,
    id: &NodeId,
    rect: Option<Rect>,
) -> Result<Option<NodeId>, ActionError> {
    expect_kind(model, id, NodeKind::TabSet)?;
    let current = model.node_by_id(id).map(|n| n.rect()).unwrap_or_default();

    let mut ids = model.id_source();
    let tabset = detach_tabset(model, id)?;
    let root_id = ids.next_id();
    model.finish_ids(ids);
    open_window(model, float_rect(rect, current), tabset, root_id);
    Ok(Some(id.clone()))
}

pub(super) fn move_window(
    model: &mut Model,
    id: &WindowId,
    rect: Rect,
) -> Result<Option<NodeId>, ActionError> {
    let window = model
        .window_mut(id)
        .ok_or_else(|| ActionError::UnknownWindow(id.clone()))?;
    window.rect = Rect::new(rect.x, rect.y, rect.width.max(0.0), rect.height.max(0.0));
    Ok(None)
}

fn floating_window<'a>(
    model: &'a Model,
    id: &WindowId,
    operation: &'static str,
) -> Result<&'a LayoutWindow, ActionError> {
    if id.is_main() {
        return Err(ActionError::MainWindow { operation });
    }
    model
        .windows
        .get(id)
        .ok_or_else(|| ActionError::UnknownWindow(id.clone()))
}

pub(super) fn bring_window_to_front(
    model: &mut Model,
    id: &WindowId,
) -> Result<Option<NodeId>, ActionError> {
    floating_window(model, id, "restack")?;
    model.float_z_order = bring_to_front(&model.float_z_order, id);
    Ok(None)
}

pub(super) fn close_window(model: &mut Model, id: &WindowId) -> Result<Option<NodeId>, ActionError> {
    floating_window(model, id, "close")?;
    model.windows.remove(id);
    model.float_z_order.retain(|w| w != id);
    debug!(window = %id, "floating window closed");
    Ok(None)
}

/// Merge a floating window into the tree holding `to` and close it
pub(super) fn dock_tabset(
    model: &mut Model,
    id: &WindowId,
    to: &NodeId,
    location: DockLocation,
) -> Result<Option<NodeId>, ActionError> {
    let window = floating_window(model, id, "dock")?;
    if window.root.contains(to) {
        return Err(ActionError::DropOntoSelf(to.clone()));
    }

    let mut ids = model.id_source();
    let Some(window) = model.windows.remove(id) else {
        return Err(ActionError::UnknownWindow(id.clone()));
    };
    model.float_z_order.retain(|w| w != id);

    let mut root = window.root;
    let payload = match root.children.as_slice() {
        [RowChild::Tabset(_)] => match root.children.pop() {
            Some(RowChild::Tabset(ts)) => Payload::TabSet(ts),
            _ => Payload::Row(root),
        },
        _ => Payload::Row(root),
    };
    let landed = drop_into(model, payload, to, location, None, None, &mut ids)?;
    model.finish_ids(ids);
    debug!(window = %id, into = %to, "floating window docked");
    Ok(Some(landed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tab;

    fn model_with_tabs() -> Model {
        let mut model = Model::default();
        let ts = model.main_window.root.children[0].id().clone();
        if let Some(tabset) = model.tabset_mut(&ts) {
            tabset.children = vec![Tab::new("a", "A"), Tab::new("b", "B")];
            tabset.selected = Some(0);
        }
        model.relink();
        model
    }

    #[test]
    fn test_float_tab_opens_window_on_top() {
        let mut model = model_with_tabs();
        float_tab(&mut model, &"a".into(), None).unwrap();

        assert_eq!(model.windows.len(), 1);
        let window = model.windows.values().next().unwrap();
        assert_eq!(window.rect, DEFAULT_FLOAT_RECT);
        assert_eq!(model.float_z_order, vec![window.id.clone()]);
        assert!(window.root.contains(&"a".into()));
        assert!(!model.main_window.root.contains(&"a".into()));
    }

    #[test]
    fn test_float_respects_enable_float() {
        let mut model = model_with_tabs();
        model.global.tab_enable_float = false;
        let err = float_tab(&mut model, &"a".into(), None).unwrap_err();
        assert!(matches!(err, ActionError::Disabled { .. }));
    }

    #[test]
    fn test_main_window_cannot_close() {
        let mut model = model_with_tabs();
        let err = close_window(&mut model, &WindowId::main()).unwrap_err();
        assert!(matches!(err, ActionError::MainWindow { .. }));
    }
}
