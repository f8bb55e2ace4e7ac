//! Layout engine
//!
//! Turns weights and min/max constraints into pixel rectangles. Each pass
//! writes the rectangles onto the nodes themselves and also returns them as
//! a [`LayoutResult`], together with the splitter bars for hit-testing.
//!
//! Sizing a row happens in two steps. A pre-pass aggregates min/max bounds
//! bottom-up. Then each row hands out its main-axis space by weight, clamping
//! children into their bounds and redistributing what clamping frees or
//! consumes among the siblings that are still flexible.

pub mod splitter;

pub use splitter::{
    border_resize_snapshot, calculate_split, splitter_bounds, splitter_snapshot,
    BorderResizeSnapshot, SplitterSnapshot,
};

use std::collections::HashMap;

use tracing::trace;

use crate::model::{
    clamp_size, BorderSet, DockLocation, GlobalAttributes, LayoutWindow, Model, NodeId,
    Orientation, Rect, Row, RowChild, TabSet, WindowId, UNBOUNDED_SIZE,
};
use crate::view::geometry::{split_tabset_rect, tab_button_rects};

/// Upper bound on clamp-and-redistribute rounds within one row
pub const MAX_CLAMP_PASSES: usize = 64;

const EPSILON: f64 = 1e-9;

// ============================================================================
// Size bounds
// ============================================================================

/// Aggregated min/max size of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeBounds {
    pub min_width: f64,
    pub min_height: f64,
    pub max_width: f64,
    pub max_height: f64,
}

impl SizeBounds {
    pub const UNBOUNDED: SizeBounds = SizeBounds {
        min_width: 0.0,
        min_height: 0.0,
        max_width: UNBOUNDED_SIZE,
        max_height: UNBOUNDED_SIZE,
    };

    pub fn min(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.min_width,
            Orientation::Vertical => self.min_height,
        }
    }

    pub fn max(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.max_width,
            Orientation::Vertical => self.max_height,
        }
    }

    fn of_tabset(ts: &TabSet, global: &GlobalAttributes) -> SizeBounds {
        let (min_width, min_height) = ts.min_size(global);
        let (max_width, max_height) = ts.max_size(global);
        SizeBounds {
            min_width,
            min_height,
            max_width: max_width.max(min_width),
            max_height: max_height.max(min_height),
        }
    }
}

/// Bounds of every row and tabset below `row`, keyed by id; returns the row's own
pub fn collect_bounds(
    row: &Row,
    global: &GlobalAttributes,
    out: &mut HashMap<NodeId, SizeBounds>,
) -> SizeBounds {
    if row.children.is_empty() {
        out.insert(row.id.clone(), SizeBounds::UNBOUNDED);
        return SizeBounds::UNBOUNDED;
    }
    let along = row.orientation;
    let (mut min_along, mut max_along) = (0.0_f64, 0.0_f64);
    let (mut min_across, mut max_across) = (0.0_f64, UNBOUNDED_SIZE);

    for child in &row.children {
        let bounds = match child {
            RowChild::Row(inner) => collect_bounds(inner, global, out),
            RowChild::Tabset(ts) => {
                let bounds = SizeBounds::of_tabset(ts, global);
                out.insert(ts.id.clone(), bounds);
                bounds
            }
        };
        min_along += bounds.min(along);
        max_along += bounds.max(along);
        min_across = min_across.max(bounds.min(along.flip()));
        max_across = max_across.min(bounds.max(along.flip()));
    }
    let max_along = max_along.min(UNBOUNDED_SIZE).max(min_along);
    let max_across = max_across.max(min_across);

    let bounds = match along {
        Orientation::Horizontal => SizeBounds {
            min_width: min_along,
            min_height: min_across,
            max_width: max_along,
            max_height: max_across,
        },
        Orientation::Vertical => SizeBounds {
            min_width: min_across,
            min_height: min_along,
            max_width: max_across,
            max_height: max_along,
        },
    };
    out.insert(row.id.clone(), bounds);
    bounds
}

// ============================================================================
// Distribution
// ============================================================================

/// Share `available` pixels among siblings by weight within their bounds.
///
/// Every round hands the space not taken by fixed siblings to the flexible
/// ones by weight. Children whose ideal size violates their bounds are
/// clamped and become fixed: the min violators when clamping grew the total,
/// the max violators when it shrank it. Each round fixes at least one child,
/// so the loop ends after at most `n + 1` rounds.
///
/// When every child is fixed and space is left over, the last child takes it;
/// when the mins alone exceed `available`, children saturate at their mins.
pub fn distribute(available: f64, weights: &[f64], mins: &[f64], maxs: &[f64]) -> Vec<f64> {
    let n = weights.len();
    let mut sizes = vec![0.0; n];
    let mut fixed = vec![false; n];
    if n == 0 {
        return sizes;
    }
    let available = available.max(0.0);

    for _ in 0..MAX_CLAMP_PASSES.min(n + 1) {
        let taken: f64 = (0..n).filter(|&i| fixed[i]).map(|i| sizes[i]).sum();
        let total_weight: f64 = (0..n).filter(|&i| !fixed[i]).map(|i| weights[i]).sum();
        if total_weight <= 0.0 {
            break;
        }
        let remaining = available - taken;

        let mut violation = 0.0;
        let mut clamped = vec![None; n];
        for i in (0..n).filter(|&i| !fixed[i]) {
            let ideal = weights[i] / total_weight * remaining;
            let size = clamp_size(ideal, mins[i], maxs[i]);
            sizes[i] = ideal;
            if (size - ideal).abs() > EPSILON {
                violation += size - ideal;
                clamped[i] = Some(size);
            }
        }
        if clamped.iter().all(Option::is_none) {
            break;
        }
        for (i, size) in clamped.into_iter().enumerate() {
            let Some(size) = size else { continue };
            let fix = if violation > EPSILON {
                size > sizes[i]
            } else if violation < -EPSILON {
                size < sizes[i]
            } else {
                true
            };
            if fix {
                sizes[i] = size;
                fixed[i] = true;
            }
        }
    }

    // flexible children were sized from what remained, so only an all-fixed
    // row can leave a residual
    let residual = available - sizes.iter().sum::<f64>();
    if residual > EPSILON {
        if let Some(last) = sizes.last_mut() {
            *last += residual;
        }
    } else if residual < -EPSILON {
        for i in 0..n {
            sizes[i] = sizes[i].max(mins[i]);
        }
    }
    sizes
}

// ============================================================================
// Results
// ============================================================================

/// What a splitter resizes
#[derive(Debug, Clone, PartialEq)]
pub enum SplitterTarget {
    /// Between children `index` and `index + 1` of `row`
    Row { row: NodeId, index: usize },
    /// The content edge of a border
    Border(DockLocation),
}

/// A draggable bar between two siblings or at a border's content edge
#[derive(Debug, Clone, PartialEq)]
pub struct SplitterBar {
    pub window: WindowId,
    pub target: SplitterTarget,
    /// Axis the bar moves along
    pub orientation: Orientation,
    pub rect: Rect,
}

/// Rectangles of one layout pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    /// Node id to rect, for every laid-out row, tabset, tab and border strip
    pub rects: HashMap<NodeId, Rect>,
    pub splitters: Vec<SplitterBar>,
    /// Main window area left after border insets
    pub main_content: Rect,
}

impl LayoutResult {
    pub fn rect(&self, id: &NodeId) -> Option<Rect> {
        self.rects.get(id).copied()
    }

    /// Splitter under a point of `window`
    pub fn splitter_at(&self, window: &WindowId, px: f64, py: f64) -> Option<&SplitterBar> {
        self.splitters
            .iter()
            .find(|s| &s.window == window && s.rect.contains(px, py))
    }
}

// ============================================================================
// Layout pass
// ============================================================================

struct Pass<'a> {
    global: &'a GlobalAttributes,
    window: WindowId,
    bounds: HashMap<NodeId, SizeBounds>,
    out: &'a mut LayoutResult,
}

/// Lay out a row subtree inside `outer`, with no border insets.
///
/// Splitters are attributed to the main window.
pub fn calculate_layout(row: &mut Row, outer: Rect, global: &GlobalAttributes) -> LayoutResult {
    let mut out = LayoutResult {
        main_content: outer,
        ..Default::default()
    };
    let mut bounds = HashMap::new();
    collect_bounds(row, global, &mut bounds);
    let mut pass = Pass {
        global,
        window: WindowId::main(),
        bounds,
        out: &mut out,
    };
    layout_row(row, outer, &mut pass);
    out
}

/// Lay out a whole model: borders and the main window inside `outer`, and
/// every floating window against its own rect (in window-local coordinates).
pub fn layout_model(model: &mut Model, outer: Rect) -> LayoutResult {
    model.relink();
    // windows is public, so the order may have drifted since the last action
    model.sync_z_order();
    let global = model.global.clone();
    let mut out = LayoutResult::default();

    model.main_window.rect = outer;
    let inner = layout_borders(&mut model.borders, outer, &global, &mut out);
    out.main_content = inner;
    layout_window(&mut model.main_window, inner, &global, &mut out);

    for window in model.windows.values_mut() {
        let local = Rect::new(0.0, 0.0, window.rect.width, window.rect.height);
        layout_window(window, local, &global, &mut out);
    }
    trace!(
        nodes = out.rects.len(),
        splitters = out.splitters.len(),
        "layout pass"
    );
    out
}

fn layout_window(
    window: &mut LayoutWindow,
    rect: Rect,
    global: &GlobalAttributes,
    out: &mut LayoutResult,
) {
    let mut bounds = HashMap::new();
    collect_bounds(&window.root, global, &mut bounds);
    let mut pass = Pass {
        global,
        window: window.id.clone(),
        bounds,
        out,
    };
    layout_row(&mut window.root, rect, &mut pass);

    if let Some(id) = window.maximized_tabset.clone() {
        // the maximized tabset covers the window; nothing else can be resized
        pass.out.splitters.retain(|s| s.window != window.id);
        if let Some(ts) = window.root.find_tabset_mut(&id) {
            layout_tabset(ts, rect, &mut pass);
        }
    }
}

fn layout_row(row: &mut Row, rect: Rect, pass: &mut Pass<'_>) {
    row.rect = rect;
    pass.out.rects.insert(row.id.clone(), rect);
    let n = row.children.len();
    if n == 0 {
        return;
    }

    let along = row.orientation;
    let splitter = pass.global.splitter_size;
    let available = (rect.size(along) - splitter * (n - 1) as f64).max(0.0);

    let weights = row.weights();
    let (mins, maxs): (Vec<f64>, Vec<f64>) = row
        .children
        .iter()
        .map(|child| {
            let bounds = pass
                .bounds
                .get(child.id())
                .copied()
                .unwrap_or(SizeBounds::UNBOUNDED);
            (bounds.min(along), bounds.max(along))
        })
        .unzip();
    let sizes = distribute(available, &weights, &mins, &maxs);

    let mut pos = rect.start(along);
    for (i, (child, size)) in row.children.iter_mut().zip(sizes).enumerate() {
        let child_rect = match along {
            Orientation::Horizontal => Rect::new(pos, rect.y, size, rect.height),
            Orientation::Vertical => Rect::new(rect.x, pos, rect.width, size),
        };
        match child {
            RowChild::Row(inner) => layout_row(inner, child_rect, pass),
            RowChild::Tabset(ts) => layout_tabset(ts, child_rect, pass),
        }
        pos += size;

        if i + 1 < n {
            let bar = match along {
                Orientation::Horizontal => Rect::new(pos, rect.y, splitter, rect.height),
                Orientation::Vertical => Rect::new(rect.x, pos, rect.width, splitter),
            };
            pass.out.splitters.push(SplitterBar {
                window: pass.window.clone(),
                target: SplitterTarget::Row {
                    row: row.id.clone(),
                    index: i,
                },
                orientation: along,
                rect: bar,
            });
            pos += splitter;
        }
    }
}

fn layout_tabset(ts: &mut TabSet, rect: Rect, pass: &mut Pass<'_>) {
    let global = pass.global;
    let (strip, content) = split_tabset_rect(
        rect,
        ts.tab_location_or(global),
        global.tab_set_tab_strip_height,
    );
    ts.rect = rect;
    ts.tab_strip_rect = strip;
    ts.content_rect = content;
    pass.out.rects.insert(ts.id.clone(), rect);

    let buttons = tab_button_rects(
        strip,
        ts.children.len(),
        global.tab_button_width,
        Orientation::Horizontal,
    );
    for (tab, button) in ts.children.iter_mut().zip(buttons) {
        tab.rect = content;
        tab.button_rect = button;
        pass.out.rects.insert(tab.id.clone(), content);
    }
}

/// The edge of a border's content that faces the main area
fn facing_edge(location: DockLocation) -> DockLocation {
    match location {
        DockLocation::Top => DockLocation::Bottom,
        DockLocation::Bottom => DockLocation::Top,
        DockLocation::Left => DockLocation::Right,
        DockLocation::Right => DockLocation::Left,
        DockLocation::Center => DockLocation::Center,
    }
}

/// Reserve border strips and docked content outer-to-inner; returns what is
/// left for the main window
fn layout_borders(
    borders: &mut BorderSet,
    outer: Rect,
    global: &GlobalAttributes,
    out: &mut LayoutResult,
) -> Rect {
    let order: Vec<DockLocation> = borders.nesting_order().iter().map(|b| b.location).collect();
    let mut inner = outer;

    for location in order {
        let Some(border) = borders.get_mut(location) else {
            continue;
        };
        border.rect = Rect::EMPTY;
        border.content_rect = Rect::EMPTY;
        border.flyout_rect = Rect::EMPTY;
        for tab in &mut border.children {
            tab.rect = Rect::EMPTY;
            tab.button_rect = Rect::EMPTY;
        }
        if !border.is_strip_visible(global) {
            continue;
        }

        let strip = inner.edge_slice(location, global.border_bar_size);
        inner = inner.remove_inset(location, global.border_bar_size);
        border.rect = strip;
        out.rects.insert(border.id.clone(), strip);

        let axis = location.orientation().unwrap_or_default();
        let buttons = tab_button_rects(
            strip,
            border.children.len(),
            global.tab_button_width,
            axis.flip(),
        );
        for (tab, button) in border.children.iter_mut().zip(buttons) {
            tab.button_rect = button;
        }

        if border.is_showing_content(global) {
            let size = border.size_or(global);
            let content = inner.edge_slice(location, size);
            inner = inner.remove_inset(location, size);
            border.content_rect = content;
            if let Some(index) = border.selected {
                if let Some(tab) = border.children.get_mut(index) {
                    tab.rect = content;
                    out.rects.insert(tab.id.clone(), content);
                }
            }
            out.splitters.push(SplitterBar {
                window: WindowId::main(),
                target: SplitterTarget::Border(location),
                orientation: axis,
                rect: content.edge_slice(facing_edge(location), global.splitter_size),
            });
        }
    }

    // flyouts overlay the main area next to their strip without shrinking it
    for border in borders.iter_mut() {
        let Some(flyout) = border.flyout_tab_id.clone() else {
            continue;
        };
        let axis = border.location.orientation().unwrap_or_default();
        let size = border.size_or(global).min(inner.size(axis));
        let rect = inner.edge_slice(border.location, size);
        border.flyout_rect = rect;
        if let Some(tab) = border.children.iter_mut().find(|t| t.id == flyout) {
            tab.rect = rect;
            out.rects.insert(tab.id.clone(), rect);
        }
    }
    inner
}
