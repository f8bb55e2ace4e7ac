//! Drop-target resolution
//!
//! While a tab or tabset is dragged, [`compute_drop`] maps the pointer to a
//! [`DropInfo`]: the node that would receive the drop, where relative to it,
//! and the outline to draw. Coordinates are those of the last layout pass,
//! so floating windows are tested in their own window-local space.
//!
//! Resolution order:
//! 1. The "show hidden border" frame along outer edges whose border is
//!    missing or auto-hidden and empty. Tab strips are cut out of it.
//! 2. The short zones centered on each edge of the window's root row.
//! 3. The tabset under the pointer: its tab strip yields a reorder slot,
//!    its content yields a center or edge-split target.
//! 4. Border strips and docked content, top and bottom before left and right.
//!
//! The frame overlaps the main tree and would never be hit if tested after it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use super::geometry::{dock_zone, edge_band, tab_insert_slot};
use crate::messages::Action;
use crate::model::{
    Border, DockLocation, LayoutWindow, Model, NodeId, NodeRef, Orientation, Rect, TabSet,
    WindowId,
};

/// Widest outline that still counts as a tab-reorder indicator
pub const TAB_REORDER_MAX_WIDTH: f64 = 5.0;

/// Edge-band thickness as a fraction of a tabset's content dimension
pub const DEFAULT_EDGE_BAND_FRACTION: f64 = 0.25;

/// Cap on edge-band thickness, in pixels
pub const DEFAULT_EDGE_BAND_MAX_PX: f64 = 100.0;

/// Depth of the root-row zones that dock against a whole window edge
pub const DEFAULT_EDGE_DOCK_MARGIN: f64 = 20.0;

/// Length of each root-row zone, centered on its edge
pub const DEFAULT_EDGE_DOCK_LENGTH: f64 = 100.0;

/// Depth of the outer frame that previews a border not yet created
pub const DEFAULT_HIDDEN_BORDER_MARGIN: f64 = 10.0;

/// Width of the insertion indicator drawn between tab buttons
pub const DEFAULT_TAB_INDICATOR_WIDTH: f64 = 4.0;

/// Hit-testing numbers, overridable through the engine config
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropTuning {
    pub edge_band_fraction: f64,
    pub edge_band_max_px: f64,
    pub edge_dock_margin: f64,
    pub edge_dock_length: f64,
    pub hidden_border_margin: f64,
    pub tab_indicator_width: f64,
}

impl Default for DropTuning {
    fn default() -> Self {
        Self {
            edge_band_fraction: DEFAULT_EDGE_BAND_FRACTION,
            edge_band_max_px: DEFAULT_EDGE_BAND_MAX_PX,
            edge_dock_margin: DEFAULT_EDGE_DOCK_MARGIN,
            edge_dock_length: DEFAULT_EDGE_DOCK_LENGTH,
            hidden_border_margin: DEFAULT_HIDDEN_BORDER_MARGIN,
            tab_indicator_width: DEFAULT_TAB_INDICATOR_WIDTH,
        }
    }
}

impl DropTuning {
    fn indicator_width(&self) -> f64 {
        self.tab_indicator_width.min(TAB_REORDER_MAX_WIDTH).max(0.0)
    }
}

/// What is being dragged. Rows are never draggable.
#[derive(Debug, Clone, PartialEq)]
pub enum DragSubject {
    Tab(NodeId),
    TabSet(NodeId),
    /// A tab that does not exist yet, described by its JSON
    External(Value),
}

impl DragSubject {
    /// Classify an existing node; `None` for rows, borders and unknown ids
    pub fn of(model: &Model, id: &NodeId) -> Option<DragSubject> {
        match model.node_by_id(id)? {
            NodeRef::Tab(_) => Some(DragSubject::Tab(id.clone())),
            NodeRef::TabSet(_) => Some(DragSubject::TabSet(id.clone())),
            _ => None,
        }
    }

    fn node(&self) -> Option<&NodeId> {
        match self {
            DragSubject::Tab(id) | DragSubject::TabSet(id) => Some(id),
            DragSubject::External(_) => None,
        }
    }

    fn is_tab(&self) -> bool {
        !matches!(self, DragSubject::TabSet(_))
    }
}

/// Which kind of region produced a drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropClass {
    /// Between two tab buttons; carries an explicit index
    TabReorder,
    /// Center of a tabset or docked border content; appends
    Center,
    /// Edge band of a tabset; creates or extends a split
    Split,
    /// Edge of a window's root row
    RootEdge,
    /// Edge of the window with no border yet
    HiddenBorder,
}

/// A resolved drop target
#[derive(Debug, Clone, PartialEq)]
pub struct DropInfo {
    /// Tabset, row or border that receives the drop
    pub node: NodeId,
    pub window: WindowId,
    /// Outline to draw
    pub rect: Rect,
    pub location: DockLocation,
    /// Insertion index; `None` appends
    pub index: Option<usize>,
    pub class: DropClass,
}

impl DropInfo {
    fn new(
        node: NodeId,
        window: &WindowId,
        rect: Rect,
        location: DockLocation,
        index: Option<usize>,
        class: DropClass,
    ) -> Self {
        // any sliver-thin outline is an insertion indicator
        let class = if rect.width <= TAB_REORDER_MAX_WIDTH {
            DropClass::TabReorder
        } else {
            class
        };
        Self {
            node,
            window: window.clone(),
            rect,
            location,
            index,
            class,
        }
    }

    pub fn is_tab_reorder(&self) -> bool {
        self.class == DropClass::TabReorder
    }

    /// The action that performs this drop
    pub fn action_for(&self, subject: &DragSubject) -> Action {
        match subject {
            DragSubject::Tab(id) | DragSubject::TabSet(id) => Action::MoveNode {
                from_node: id.clone(),
                to_node: self.node.clone(),
                location: self.location,
                index: self.index,
                select: Some(true),
            },
            DragSubject::External(json) => Action::AddNode {
                json: json.clone(),
                to_node: self.node.clone(),
                location: self.location,
                index: self.index,
                select: Some(true),
            },
        }
    }
}

/// Resolve the drop target under `(px, py)` in `window`
pub fn compute_drop(
    model: &Model,
    window_id: &WindowId,
    subject: &DragSubject,
    px: f64,
    py: f64,
    tuning: &DropTuning,
) -> Option<DropInfo> {
    let window = model.window(window_id)?;
    let hidden = if window.is_main() {
        hidden_border_edge(model, window, subject, px, py, tuning)
    } else {
        None
    };

    let found = match hidden {
        Some(edge) => Some(hidden_border_drop(model, window, edge)),
        None => drop_in_tree(model, window, subject, px, py, tuning).or_else(|| {
            if window.is_main() {
                drop_in_borders(model, window_id, subject, px, py, tuning)
            } else {
                None
            }
        }),
    };
    trace!(
        window = %window_id,
        px,
        py,
        target = ?found.as_ref().map(|d| (d.node.as_str(), d.location, d.index)),
        "drop resolved"
    );
    found
}

fn drop_in_tree(
    model: &Model,
    window: &LayoutWindow,
    subject: &DragSubject,
    px: f64,
    py: f64,
    tuning: &DropTuning,
) -> Option<DropInfo> {
    let global = &model.global;

    if window.maximized_tabset.is_none() && global.enable_edge_dock {
        if let Some(info) = root_edge_drop(window, px, py, tuning) {
            return Some(info);
        }
    }

    let tabset = tabset_under(window, px, py)?;
    if !tabset.can_drop(global) || subject.node() == Some(&tabset.id) {
        return None;
    }
    drop_on_tabset(tabset, &window.id, px, py, tuning)
}

/// Visible tabset containing `(px, py)`
fn tabset_under(window: &LayoutWindow, px: f64, py: f64) -> Option<&TabSet> {
    match window.maximized_tabset() {
        Some(ts) => ts.rect.contains(px, py).then_some(ts),
        None => window
            .root
            .tabsets()
            .into_iter()
            .find(|ts| ts.rect.contains(px, py)),
    }
}

fn root_edge_drop(
    window: &LayoutWindow,
    px: f64,
    py: f64,
    tuning: &DropTuning,
) -> Option<DropInfo> {
    let root = &window.root;
    let rect = root.rect;
    if !rect.contains(px, py) || root.children.is_empty() {
        return None;
    }
    let margin = tuning.edge_dock_margin;
    let half = tuning.edge_dock_length / 2.0;
    let along_x = (px - rect.center_x()).abs() < half;
    let along_y = (py - rect.center_y()).abs() < half;
    let edge = [
        (DockLocation::Top, py - rect.y, along_x),
        (DockLocation::Bottom, rect.bottom() - py, along_x),
        (DockLocation::Left, px - rect.x, along_y),
        (DockLocation::Right, rect.right() - px, along_y),
    ]
    .into_iter()
    .filter(|(_, distance, centered)| *centered && *distance < margin)
    .min_by(|a, b| a.1.total_cmp(&b.1))
    .map(|(location, _, _)| location)?;

    let axis = edge.orientation().unwrap_or_default();
    let depth = edge_band(rect, axis, tuning.edge_band_fraction, tuning.edge_band_max_px);
    Some(DropInfo::new(
        root.id.clone(),
        &window.id,
        rect.edge_slice(edge, depth),
        edge,
        None,
        DropClass::RootEdge,
    ))
}

fn drop_on_tabset(
    ts: &TabSet,
    window: &WindowId,
    px: f64,
    py: f64,
    tuning: &DropTuning,
) -> Option<DropInfo> {
    if ts.tab_strip_rect.contains(px, py) {
        let buttons: Vec<Rect> = ts.children.iter().map(|t| t.button_rect).collect();
        let (index, indicator) = tab_insert_slot(
            ts.tab_strip_rect,
            &buttons,
            px,
            py,
            Orientation::Horizontal,
            tuning.indicator_width(),
        )?;
        return Some(DropInfo::new(
            ts.id.clone(),
            window,
            indicator,
            DockLocation::Center,
            Some(index),
            DropClass::TabReorder,
        ));
    }

    let content = ts.content_rect;
    let zone = dock_zone(
        content,
        px,
        py,
        tuning.edge_band_fraction,
        tuning.edge_band_max_px,
    )?;
    let class = if zone == DockLocation::Center {
        DropClass::Center
    } else {
        DropClass::Split
    };
    Some(DropInfo::new(
        ts.id.clone(),
        window,
        content.dock_rect(zone),
        zone,
        None,
        class,
    ))
}

fn drop_in_borders(
    model: &Model,
    window: &WindowId,
    subject: &DragSubject,
    px: f64,
    py: f64,
    tuning: &DropTuning,
) -> Option<DropInfo> {
    if !subject.is_tab() {
        return None;
    }
    let global = &model.global;
    // top and bottom span the corners, so they are tested first
    DockLocation::EDGES
        .iter()
        .filter_map(|loc| model.borders.get(*loc))
        .filter(|b| b.can_drop(global) && b.is_strip_visible(global))
        .find_map(|border| drop_on_border(border, window, px, py, tuning))
}

fn drop_on_border(
    border: &Border,
    window: &WindowId,
    px: f64,
    py: f64,
    tuning: &DropTuning,
) -> Option<DropInfo> {
    if border.rect.contains(px, py) {
        let axis = border.location.orientation().unwrap_or_default().flip();
        let buttons: Vec<Rect> = border.children.iter().map(|t| t.button_rect).collect();
        let (index, indicator) = tab_insert_slot(
            border.rect,
            &buttons,
            px,
            py,
            axis,
            tuning.indicator_width(),
        )?;
        return Some(DropInfo::new(
            border.id.clone(),
            window,
            indicator,
            DockLocation::Center,
            Some(index),
            DropClass::TabReorder,
        ));
    }
    [border.content_rect, border.flyout_rect]
        .into_iter()
        .find(|r| r.contains(px, py))
        .map(|rect| {
            DropInfo::new(
                border.id.clone(),
                window,
                rect,
                DockLocation::Center,
                None,
                DropClass::Center,
            )
        })
}

/// Outer edge with no visible border strip whose frame the pointer is in
fn hidden_border_edge(
    model: &Model,
    window: &LayoutWindow,
    subject: &DragSubject,
    px: f64,
    py: f64,
    tuning: &DropTuning,
) -> Option<DockLocation> {
    if !model.global.enable_edge_dock || !subject.is_tab() {
        return None;
    }
    let outer = window.rect;
    if !outer.contains(px, py) {
        return None;
    }
    if tabset_under(window, px, py).is_some_and(|ts| ts.tab_strip_rect.contains(px, py)) {
        return None;
    }
    let global = &model.global;
    let margin = tuning.hidden_border_margin;
    DockLocation::EDGES.into_iter().find(|edge| {
        let distance = match edge {
            DockLocation::Top => py - outer.y,
            DockLocation::Bottom => outer.bottom() - py,
            DockLocation::Left => px - outer.x,
            DockLocation::Right => outer.right() - px,
            DockLocation::Center => f64::INFINITY,
        };
        let open = match model.borders.get(*edge) {
            Some(border) => !border.is_strip_visible(global) && border.can_drop(global),
            None => true,
        };
        distance < margin && open
    })
}

fn hidden_border_drop(model: &Model, window: &LayoutWindow, edge: DockLocation) -> DropInfo {
    let preview = window.rect.edge_slice(edge, model.global.border_bar_size);
    DropInfo::new(
        Border::id_for(edge),
        &window.id,
        preview,
        DockLocation::Center,
        None,
        DropClass::HiddenBorder,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout_model;
    use crate::model::{Row, RowChild, Tab};

    fn two_tabsets() -> Model {
        let mut model = Model::default();
        model.main_window.root = Row::new("root").with_children(vec![
            RowChild::Tabset(
                TabSet::new("ts0").with_tabs(vec![Tab::new("tab1", "1"), Tab::new("tab2", "2")]),
            ),
            RowChild::Tabset(TabSet::new("ts1").with_tabs(vec![Tab::new("tab3", "3")])),
        ]);
        model.main_window.active_tabset = Some("ts0".into());
        layout_model(&mut model, Rect::new(0.0, 0.0, 1008.0, 600.0));
        model
    }

    fn resolve(model: &Model, drag: &str, px: f64, py: f64) -> Option<DropInfo> {
        let subject = DragSubject::of(model, &drag.into()).unwrap();
        compute_drop(model, &WindowId::main(), &subject, px, py, &DropTuning::default())
    }

    #[test]
    fn test_center_of_other_tabset() {
        let model = two_tabsets();
        let info = resolve(&model, "tab1", 760.0, 300.0).unwrap();
        assert_eq!(info.node, NodeId::from("ts1"));
        assert_eq!(info.location, DockLocation::Center);
        assert_eq!(info.index, None);
        assert_eq!(info.class, DropClass::Center);
    }

    #[test]
    fn test_edge_band_splits() {
        let model = two_tabsets();
        let info = resolve(&model, "tab1", 980.0, 300.0).unwrap();
        assert_eq!(info.node, NodeId::from("ts1"));
        assert_eq!(info.location, DockLocation::Right);
        assert_eq!(info.class, DropClass::Split);
    }

    #[test]
    fn test_tab_strip_yields_reorder_slot() {
        let model = two_tabsets();
        let info = resolve(&model, "tab3", 130.0, 15.0).unwrap();
        assert_eq!(info.node, NodeId::from("ts0"));
        assert_eq!(info.index, Some(1));
        assert!(info.is_tab_reorder());
        assert!(info.rect.width <= TAB_REORDER_MAX_WIDTH);
    }

    #[test]
    fn test_tabset_cannot_drop_on_itself() {
        let model = two_tabsets();
        assert_eq!(resolve(&model, "ts1", 760.0, 300.0), None);
    }

    #[test]
    fn test_tab_strip_is_cut_out_of_frame() {
        let model = two_tabsets();
        let info = resolve(&model, "tab3", 130.0, 4.0).unwrap();
        assert_eq!(info.node, NodeId::from("ts0"));
        assert_eq!(info.index, Some(1));
        assert_eq!(info.class, DropClass::TabReorder);
    }

    #[test]
    fn test_hidden_border_frame_and_root_edge() {
        let mut model = two_tabsets();
        let info = resolve(&model, "tab1", 250.0, 595.0).unwrap();
        assert_eq!(info.class, DropClass::HiddenBorder);
        assert_eq!(info.node, Border::id_for(DockLocation::Bottom));

        let info = resolve(&model, "tab1", 504.0, 585.0).unwrap();
        assert_eq!(info.class, DropClass::RootEdge);
        assert_eq!(info.node, NodeId::from("root"));
        assert_eq!(info.location, DockLocation::Bottom);

        model.global.enable_edge_dock = false;
        let info = resolve(&model, "tab1", 250.0, 595.0).unwrap();
        assert_eq!(info.node, NodeId::from("ts0"));
        assert_eq!(info.location, DockLocation::Bottom);
        assert_eq!(info.class, DropClass::Split);
    }
}
