//! Tree-structure actions: add, move, delete, select and weights

use serde_json::Value;
use tracing::trace;

use crate::error::ActionError;
use crate::model::{
    Border, DockLocation, IdSource, Model, NodeId, NodeKind, Row, RowChild, Tab, TabOwner,
    TabSet, WindowId,
};

// ============================================================================
// Payloads and lookups
// ============================================================================

/// Something detached from the tree (or newly built) waiting to be dropped
pub(super) enum Payload {
    Tab(Tab),
    TabSet(TabSet),
    Row(Row),
}

impl Payload {
    fn id(&self) -> NodeId {
        match self {
            Payload::Tab(tab) => tab.id.clone(),
            Payload::TabSet(ts) => ts.id.clone(),
            Payload::Row(row) => row.id.clone(),
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            Payload::Tab(_) => NodeKind::Tab,
            Payload::TabSet(_) => NodeKind::TabSet,
            Payload::Row(_) => NodeKind::Row,
        }
    }

    /// The tabs carried, plus the position of the one that should end up selected
    fn into_tabs(self) -> (Vec<Tab>, usize) {
        match self {
            Payload::Tab(tab) => (vec![tab], 0),
            Payload::TabSet(ts) => {
                let selected = ts.selected.unwrap_or(0);
                (ts.children, selected)
            }
            Payload::Row(row) => {
                let mut tabs = Vec::new();
                drain_tabs(row, &mut tabs);
                (tabs, 0)
            }
        }
    }

    /// Turn the payload into a row child; a bare tab gets a new tabset
    fn into_row_child(self, ids: &mut IdSource) -> RowChild {
        match self {
            Payload::Tab(tab) => RowChild::Tabset(TabSet::new(ids.next_id()).with_tabs(vec![tab])),
            Payload::TabSet(ts) => RowChild::Tabset(ts),
            Payload::Row(row) => RowChild::Row(row),
        }
    }
}

fn drain_tabs(row: Row, out: &mut Vec<Tab>) {
    for child in row.children {
        match child {
            RowChild::Row(inner) => drain_tabs(inner, out),
            RowChild::Tabset(ts) => out.extend(ts.children),
        }
    }
}

fn first_tabset_id(child: &RowChild) -> Option<NodeId> {
    match child {
        RowChild::Tabset(ts) => Some(ts.id.clone()),
        RowChild::Row(row) => row.tabsets().first().map(|ts| ts.id.clone()),
    }
}

/// Kind of an existing node, or `UnknownNode`
pub(super) fn kind_of(model: &Model, id: &NodeId) -> Result<NodeKind, ActionError> {
    model
        .node_by_id(id)
        .map(|node| node.kind())
        .ok_or_else(|| ActionError::UnknownNode(id.clone()))
}

pub(super) fn expect_kind(
    model: &Model,
    id: &NodeId,
    expected: NodeKind,
) -> Result<(), ActionError> {
    let kind = kind_of(model, id)?;
    if kind == expected {
        Ok(())
    } else {
        Err(ActionError::wrong_kind(id, expected.name(), kind))
    }
}

/// Remove a tab from its tabset or border without tidying
pub(super) fn detach_tab(model: &mut Model, id: &NodeId) -> Result<Tab, ActionError> {
    for window in model.all_windows_mut() {
        if let Some(ts) = window.root.find_tab_owner_mut(id) {
            if let Some(index) = ts.tab_index(id) {
                return Ok(ts.remove_tab(index));
            }
        }
    }
    if let Some(border) = model.borders.tab_owner_mut(id) {
        if let Some(index) = border.tab_index(id) {
            return Ok(border.remove_tab(index));
        }
    }
    Err(ActionError::UnknownNode(id.clone()))
}

/// Remove a tabset from its row without tidying
pub(super) fn detach_tabset(model: &mut Model, id: &NodeId) -> Result<TabSet, ActionError> {
    for window in model.all_windows_mut() {
        match window.root.remove_child(id) {
            Some(RowChild::Tabset(ts)) => {
                if window.active_tabset.as_ref() == Some(id) {
                    window.active_tabset = None;
                }
                if window.maximized_tabset.as_ref() == Some(id) {
                    window.maximized_tabset = None;
                }
                return Ok(ts);
            }
            Some(RowChild::Row(row)) => {
                return Err(ActionError::wrong_kind(&row.id, "tabset", NodeKind::Row));
            }
            None => {}
        }
    }
    Err(ActionError::UnknownNode(id.clone()))
}

// ============================================================================
// Dropping
// ============================================================================

/// Insert `payload` relative to `to`; returns the id of the node that landed
pub(super) fn drop_into(
    model: &mut Model,
    payload: Payload,
    to: &NodeId,
    location: DockLocation,
    index: Option<usize>,
    select: Option<bool>,
    ids: &mut IdSource,
) -> Result<NodeId, ActionError> {
    if let Some(edge) = Border::location_for_id(to) {
        return drop_into_border(model, payload, edge, location, index, select);
    }
    match kind_of(model, to)? {
        NodeKind::TabSet => drop_on_tabset(model, payload, to, location, index, select, ids),
        NodeKind::Row => drop_on_row(model, payload, to, location, ids),
        other => Err(ActionError::wrong_kind(to, "tabset, row or border", other)),
    }
}

fn drop_into_border(
    model: &mut Model,
    payload: Payload,
    edge: DockLocation,
    location: DockLocation,
    index: Option<usize>,
    select: Option<bool>,
) -> Result<NodeId, ActionError> {
    if location != DockLocation::Center {
        return Err(ActionError::InvalidLocation(location.to_string()));
    }
    let tab = match payload {
        Payload::Tab(tab) => tab,
        other => return Err(ActionError::wrong_kind(&other.id(), "tab", other.kind())),
    };
    if model.borders.get(edge).is_none() && !model.global.enable_edge_dock {
        return Err(ActionError::EdgeDockDisabled);
    }
    let border = model.borders.ensure(edge);
    let id = tab.id.clone();
    let pos = border.insert_tab(index, tab);
    if select == Some(true) {
        border.selected = Some(pos);
    }
    trace!(border = %border.id, tab = %id, pos, "dropped into border");
    Ok(id)
}

fn drop_on_tabset(
    model: &mut Model,
    payload: Payload,
    to: &NodeId,
    location: DockLocation,
    index: Option<usize>,
    select: Option<bool>,
    ids: &mut IdSource,
) -> Result<NodeId, ActionError> {
    let window = model
        .window_of_mut(to)
        .ok_or_else(|| ActionError::UnknownNode(to.clone()))?;

    if location == DockLocation::Center {
        let landed = match &payload {
            Payload::Tab(tab) => tab.id.clone(),
            _ => to.clone(),
        };
        let ts = window
            .root
            .find_tabset_mut(to)
            .ok_or_else(|| ActionError::UnknownNode(to.clone()))?;
        let (tabs, preferred) = payload.into_tabs();
        let mut at = index;
        let mut positions = Vec::with_capacity(tabs.len());
        for tab in tabs {
            let pos = ts.insert_tab(at, tab);
            positions.push(pos);
            at = Some(pos + 1);
        }
        if select != Some(false) {
            if let Some(pos) = positions.get(preferred).or(positions.first()) {
                ts.selected = Some(*pos);
            }
        }
        window.active_tabset = Some(to.clone());
        return Ok(landed);
    }

    let node = payload.into_row_child(ids);
    let landed = node.id().clone();
    let active = first_tabset_id(&node);
    insert_beside(&mut window.root, to, location, node, ids)?;
    window.active_tabset = active;
    Ok(landed)
}

fn drop_on_row(
    model: &mut Model,
    payload: Payload,
    to: &NodeId,
    location: DockLocation,
    ids: &mut IdSource,
) -> Result<NodeId, ActionError> {
    if location == DockLocation::Center {
        return Err(ActionError::InvalidLocation(location.to_string()));
    }
    let window = model
        .window_of_mut(to)
        .ok_or_else(|| ActionError::UnknownNode(to.clone()))?;
    let node = payload.into_row_child(ids);
    let landed = node.id().clone();
    let active = first_tabset_id(&node);
    let row = window
        .root
        .find_row_mut(to)
        .ok_or_else(|| ActionError::UnknownNode(to.clone()))?;
    insert_at_row_edge(row, location, node, ids);
    window.active_tabset = active;
    Ok(landed)
}

/// Split next to `target`: share its slot when the parent runs the same way,
/// otherwise wrap both in a new row
fn insert_beside(
    root: &mut Row,
    target: &NodeId,
    location: DockLocation,
    mut node: RowChild,
    ids: &mut IdSource,
) -> Result<(), ActionError> {
    let orientation = location
        .orientation()
        .ok_or_else(|| ActionError::InvalidLocation(location.to_string()))?;
    let parent = root
        .find_parent_row_mut(target)
        .ok_or_else(|| ActionError::UnknownNode(target.clone()))?;
    let index = parent
        .child_index(target)
        .ok_or_else(|| ActionError::UnknownNode(target.clone()))?;

    if parent.orientation == orientation {
        let half = parent.children[index].weight() / 2.0;
        parent.children[index].set_weight(half);
        node.set_weight(half);
        parent.children.insert(index + location.index_offset(), node);
    } else {
        let mut existing = parent.children.remove(index);
        let weight = existing.weight();
        existing.set_weight(50.0);
        node.set_weight(50.0);
        let children = if location.index_offset() == 0 {
            vec![node, existing]
        } else {
            vec![existing, node]
        };
        let row = Row::new(ids.next_id())
            .with_weight(weight)
            .with_children(children);
        parent.children.insert(index, RowChild::Row(row));
    }
    Ok(())
}

/// Dock against one edge of a whole row
fn insert_at_row_edge(row: &mut Row, location: DockLocation, mut node: RowChild, ids: &mut IdSource) {
    let Some(orientation) = location.orientation() else {
        return;
    };
    if row.children.is_empty() {
        row.children.push(node);
        return;
    }
    let total: f64 = row.children.iter().map(RowChild::weight).sum();
    let total = if total > 0.0 { total } else { 100.0 };

    if row.orientation == orientation {
        node.set_weight(total / 3.0);
        if location.index_offset() == 0 {
            row.children.insert(0, node);
        } else {
            row.children.push(node);
        }
    } else {
        // the wrapper becomes the row's only child; tidy then lifts it so
        // `node` spans the whole edge
        let existing = std::mem::take(&mut row.children);
        let rest = Row::new(ids.next_id()).with_weight(75.0).with_children(existing);
        node.set_weight(25.0);
        let children = if location.index_offset() == 0 {
            vec![node, RowChild::Row(rest)]
        } else {
            vec![RowChild::Row(rest), node]
        };
        let wrapper = Row::new(ids.next_id()).with_children(children);
        row.children.push(RowChild::Row(wrapper));
    }
}

// ============================================================================
// Action handlers
// ============================================================================

pub(super) fn add_node(
    model: &mut Model,
    json: Value,
    to: &NodeId,
    location: DockLocation,
    index: Option<usize>,
    select: Option<bool>,
) -> Result<Option<NodeId>, ActionError> {
    let mut tab: Tab =
        serde_json::from_value(json).map_err(|e| ActionError::InvalidNodeJson(e.to_string()))?;
    let mut ids = model.id_source();
    if tab.id.is_empty() {
        tab.id = ids.next_id();
    } else if model.contains_id(&tab.id) {
        return Err(ActionError::DuplicateId(tab.id));
    } else {
        ids.reserve(&tab.id);
    }
    let landed = drop_into(model, Payload::Tab(tab), to, location, index, select, &mut ids)?;
    model.finish_ids(ids);
    Ok(Some(landed))
}

/// Index to insert at once the source has left the same container
fn reorder_index(
    model: &Model,
    from: &NodeId,
    to: &NodeId,
    location: DockLocation,
    index: Option<usize>,
) -> Option<usize> {
    let target = index?;
    if location != DockLocation::Center {
        return Some(target);
    }
    let from_index = match model.tab_owner(from) {
        Some(TabOwner::TabSet { tabset, .. }) if &tabset == to => model
            .node_by_id(&tabset)
            .and_then(|n| n.as_tabset())
            .and_then(|ts| ts.tab_index(from)),
        Some(TabOwner::Border(edge)) if &Border::id_for(edge) == to => model
            .borders
            .get(edge)
            .and_then(|b| b.tab_index(from)),
        _ => None,
    };
    match from_index {
        Some(from_index) if from_index < target => Some(target - 1),
        _ => Some(target),
    }
}

pub(super) fn move_node(
    model: &mut Model,
    from: &NodeId,
    to: &NodeId,
    location: DockLocation,
    index: Option<usize>,
    select: Option<bool>,
) -> Result<Option<NodeId>, ActionError> {
    let kind = kind_of(model, from)?;
    if !matches!(kind, NodeKind::Tab | NodeKind::TabSet) {
        return Err(ActionError::wrong_kind(from, "tab or tabset", kind));
    }
    if Border::location_for_id(to).is_none() && !model.contains_id(to) {
        return Err(ActionError::UnknownNode(to.clone()));
    }
    if from == to {
        return Err(ActionError::DropOntoSelf(from.clone()));
    }
    if kind == NodeKind::TabSet {
        let owned_target = model
            .node_by_id(to)
            .and_then(|n| n.parent().cloned())
            .is_some_and(|parent| &parent == from);
        if owned_target {
            return Err(ActionError::DropOntoSelf(from.clone()));
        }
    }

    let index = reorder_index(model, from, to, location, index);
    let mut ids = model.id_source();
    let payload = match kind {
        NodeKind::Tab => Payload::Tab(detach_tab(model, from)?),
        _ => Payload::TabSet(detach_tabset(model, from)?),
    };
    let landed = drop_into(model, payload, to, location, index, select, &mut ids)?;
    model.finish_ids(ids);
    trace!(from = %from, to = %to, %location, "moved");
    Ok(Some(landed))
}

pub(super) fn delete_tab(model: &mut Model, id: &NodeId) -> Result<Option<NodeId>, ActionError> {
    expect_kind(model, id, NodeKind::Tab)?;
    detach_tab(model, id)?;
    Ok(None)
}

pub(super) fn delete_tabset(model: &mut Model, id: &NodeId) -> Result<Option<NodeId>, ActionError> {
    expect_kind(model, id, NodeKind::TabSet)?;
    detach_tabset(model, id)?;
    Ok(None)
}

pub(super) fn select_tab(model: &mut Model, id: &NodeId) -> Result<Option<NodeId>, ActionError> {
    match model.tab_owner(id) {
        Some(TabOwner::TabSet {
            window: window_id,
            tabset,
        }) => {
            let window = model
                .window_mut(&window_id)
                .ok_or_else(|| ActionError::UnknownWindow(window_id.clone()))?;
            if let Some(ts) = window.root.find_tabset_mut(&tabset) {
                ts.selected = ts.tab_index(id);
            }
            window.active_tabset = Some(tabset);
            Ok(Some(id.clone()))
        }
        Some(TabOwner::Border(edge)) => {
            let border = model
                .borders
                .get_mut(edge)
                .ok_or_else(|| ActionError::UnknownNode(Border::id_for(edge)))?;
            let index = border.tab_index(id);
            // clicking the selected border tab collapses its content
            border.selected = if border.selected == index { None } else { index };
            Ok(Some(id.clone()))
        }
        None => {
            expect_kind(model, id, NodeKind::Tab)?;
            Err(ActionError::UnknownNode(id.clone()))
        }
    }
}

pub(super) fn select_index(
    model: &mut Model,
    id: &NodeId,
    index: Option<usize>,
) -> Result<Option<NodeId>, ActionError> {
    let check = |len: usize| match index {
        Some(i) if i >= len => Err(ActionError::IndexOutOfRange {
            node: id.clone(),
            index: i,
            len,
        }),
        _ => Ok(()),
    };
    match kind_of(model, id)? {
        NodeKind::TabSet => {
            let window = model
                .window_of_mut(id)
                .ok_or_else(|| ActionError::UnknownNode(id.clone()))?;
            let ts = window
                .root
                .find_tabset_mut(id)
                .ok_or_else(|| ActionError::UnknownNode(id.clone()))?;
            check(ts.children.len())?;
            ts.selected = index;
            window.active_tabset = Some(id.clone());
        }
        NodeKind::Border => {
            let border = model
                .borders
                .by_id_mut(id)
                .ok_or_else(|| ActionError::UnknownNode(id.clone()))?;
            check(border.children.len())?;
            border.selected = index;
        }
        other => return Err(ActionError::wrong_kind(id, "tabset or border", other)),
    }
    Ok(Some(id.clone()))
}

pub(super) fn set_active_tabset(
    model: &mut Model,
    tabset: Option<&NodeId>,
    window: Option<&WindowId>,
) -> Result<Option<NodeId>, ActionError> {
    match tabset {
        Some(id) => {
            expect_kind(model, id, NodeKind::TabSet)?;
            let window = model
                .window_of_mut(id)
                .ok_or_else(|| ActionError::UnknownNode(id.clone()))?;
            window.active_tabset = Some(id.clone());
            Ok(Some(id.clone()))
        }
        None => {
            let window_id = window.cloned().unwrap_or_else(WindowId::main);
            let window = model
                .window_mut(&window_id)
                .ok_or(ActionError::UnknownWindow(window_id))?;
            window.active_tabset = None;
            Ok(None)
        }
    }
}

pub(super) fn maximize_toggle(model: &mut Model, id: &NodeId) -> Result<Option<NodeId>, ActionError> {
    expect_kind(model, id, NodeKind::TabSet)?;
    let enabled = model
        .node_by_id(id)
        .and_then(|n| n.as_tabset())
        .is_some_and(|ts| ts.can_maximize(&model.global));
    if !enabled {
        return Err(ActionError::Disabled {
            node: id.clone(),
            operation: "maximize",
        });
    }
    let window = model
        .window_of_mut(id)
        .ok_or_else(|| ActionError::UnknownNode(id.clone()))?;
    window.maximized_tabset = if window.maximized_tabset.as_ref() == Some(id) {
        None
    } else {
        Some(id.clone())
    };
    Ok(Some(id.clone()))
}

pub(super) fn adjust_weights(
    model: &mut Model,
    id: &NodeId,
    weights: &[f64],
) -> Result<Option<NodeId>, ActionError> {
    expect_kind(model, id, NodeKind::Row)?;
    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w <= 0.0) {
        return Err(ActionError::InvalidWeight(*bad));
    }
    let row = model
        .window_of_mut(id)
        .and_then(|w| w.root.find_row_mut(id))
        .ok_or_else(|| ActionError::UnknownNode(id.clone()))?;
    if row.children.len() != weights.len() {
        return Err(ActionError::WeightCountMismatch {
            row: id.clone(),
            children: row.children.len(),
            weights: weights.len(),
        });
    }
    for (child, weight) in row.children.iter_mut().zip(weights) {
        child.set_weight(*weight);
    }
    Ok(Some(id.clone()))
}
