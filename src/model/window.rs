//! Layout windows and floating-window stacking order

use serde::{Deserialize, Serialize};

use super::geometry::{Orientation, Rect};
use super::node::{NodeId, Row, TabSet};

/// Reserved id of the main window
pub const MAIN_WINDOW_ID: &str = "__main_window_id__";

/// Z-index of the bottom-most floating window
pub const FLOAT_Z_INDEX_BASE: i32 = 1000;

/// Identifier of a layout window
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn main() -> Self {
        Self(MAIN_WINDOW_ID.to_string())
    }

    pub fn is_main(&self) -> bool {
        self.0 == MAIN_WINDOW_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WindowId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A top-level row tree: the main window or a floating window
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutWindow {
    pub id: WindowId,
    /// Outer rect; for floating windows this is position and size on screen
    pub rect: Rect,
    pub root: Row,
    pub root_orientation: Orientation,
    pub active_tabset: Option<NodeId>,
    pub maximized_tabset: Option<NodeId>,
}

impl LayoutWindow {
    pub fn new(id: WindowId, rect: Rect, root: Row) -> Self {
        Self {
            id,
            rect,
            root,
            root_orientation: Orientation::Horizontal,
            active_tabset: None,
            maximized_tabset: None,
        }
    }

    pub fn is_main(&self) -> bool {
        self.id.is_main()
    }

    pub fn active_tabset(&self) -> Option<&TabSet> {
        let id = self.active_tabset.as_ref()?;
        self.root.find(id).and_then(|n| n.as_tabset())
    }

    pub fn maximized_tabset(&self) -> Option<&TabSet> {
        let id = self.maximized_tabset.as_ref()?;
        self.root.find(id).and_then(|n| n.as_tabset())
    }

    /// Refresh back references and paths below this window's root
    pub(crate) fn relink(&mut self) {
        let path = if self.is_main() {
            "/r0".to_string()
        } else {
            format!("/window/{}/r0", self.id)
        };
        self.root.relink(None, self.root_orientation, &path);
    }

    /// Drop active/maximized references whose tabset has gone away
    pub(crate) fn prune_references(&mut self) {
        if self.active_tabset().is_none() {
            self.active_tabset = None;
        }
        if self.maximized_tabset().is_none() {
            self.maximized_tabset = None;
        }
    }
}

// ============================================================================
// Z-order
// ============================================================================

/// Move `id` to the end of `order`, appending it when absent.
///
/// Returns an equal list when `id` is already last.
pub fn bring_to_front(order: &[WindowId], id: &WindowId) -> Vec<WindowId> {
    if order.last() == Some(id) {
        return order.to_vec();
    }
    let mut next: Vec<WindowId> = order.iter().filter(|w| *w != id).cloned().collect();
    next.push(id.clone());
    next
}

/// Re-synchronize `order` against the live set of floating windows.
///
/// Stale ids are dropped, new ids are appended in `live` order, and the
/// relative order of survivors is preserved.
pub fn sync_z_order<'a>(
    order: &[WindowId],
    live: impl IntoIterator<Item = &'a WindowId>,
) -> Vec<WindowId> {
    let live: Vec<&WindowId> = live.into_iter().collect();
    let mut next: Vec<WindowId> = Vec::with_capacity(live.len());
    for id in order {
        if live.contains(&id) && !next.contains(id) {
            next.push(id.clone());
        }
    }
    for id in live {
        if !next.contains(id) {
            next.push(id.clone());
        }
    }
    next
}

/// Stacking index of a window: `base + position`, or `base` when unknown
pub fn z_index(order: &[WindowId], id: &WindowId, base: i32) -> i32 {
    order
        .iter()
        .position(|w| w == id)
        .map(|i| base + i as i32)
        .unwrap_or(base)
}
