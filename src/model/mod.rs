//! Layout model - the complete state of a docking layout
//!
//! The model owns every node exclusively: the main window's row tree, the
//! floating windows' row trees and the edge borders. It is only mutated by
//! the action reducer in [`crate::update`].

pub mod attributes;
pub mod border;
pub mod geometry;
pub mod json;
pub mod node;
pub(crate) mod tidy;
pub mod window;

pub use attributes::{GlobalAttributes, TabLocation, UNBOUNDED_SIZE};
pub use border::{compute_nesting_order, Border, BorderSet, DockState, BORDER_NESTING_ORDER};
pub use geometry::{clamp_size, DockLocation, Orientation, Rect};
pub use json::{ModelDocument, WindowDocument};
pub use node::{NodeId, NodeKind, NodeRef, Row, RowChild, Tab, TabSet};
pub use window::{
    bring_to_front, sync_z_order, z_index, LayoutWindow, WindowId, FLOAT_Z_INDEX_BASE,
    MAIN_WINDOW_ID,
};

use std::collections::{BTreeMap, HashSet};

/// Where a tab currently lives
#[derive(Debug, Clone, PartialEq)]
pub enum TabOwner {
    TabSet { window: WindowId, tabset: NodeId },
    Border(DockLocation),
}

/// Hands out `#<n>` ids that collide with nothing in the model
pub(crate) struct IdSource {
    next: u64,
    taken: HashSet<NodeId>,
}

impl IdSource {
    /// Mark an id held outside the model (e.g. by a detached node) as taken
    pub(crate) fn reserve(&mut self, id: &NodeId) {
        self.taken.insert(id.clone());
    }

    pub(crate) fn next_id(&mut self) -> NodeId {
        loop {
            let candidate = NodeId::new(format!("#{}", self.next));
            self.next += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// The complete layout model
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub global: GlobalAttributes,
    pub borders: BorderSet,
    pub main_window: LayoutWindow,
    /// Floating windows by id
    pub windows: BTreeMap<WindowId, LayoutWindow>,
    /// Floating window ids, bottom-most first
    pub float_z_order: Vec<WindowId>,
    /// Counter behind generated `#<n>` ids
    pub(crate) next_id: u64,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(GlobalAttributes::default())
    }
}

impl Model {
    /// An empty model: a main window holding one empty tabset
    pub fn new(global: GlobalAttributes) -> Self {
        let root_orientation = if global.root_orientation_vertical {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };
        let mut model = Self {
            global,
            borders: BorderSet::default(),
            main_window: LayoutWindow::new(WindowId::main(), Rect::EMPTY, Row::new("")),
            windows: BTreeMap::new(),
            float_z_order: Vec::new(),
            next_id: 1,
        };
        model.main_window.root_orientation = root_orientation;
        model.main_window.root.id = model.generate_id();
        let tabset = TabSet::new(model.generate_id());
        model.main_window.active_tabset = Some(tabset.id.clone());
        model.main_window.root.children.push(RowChild::Tabset(tabset));
        model.relink();
        model
    }

    // ------------------------------------------------------------------
    // Query accessors
    // ------------------------------------------------------------------

    /// Any node by id: rows, tabsets and tabs of every window, and borders
    pub fn node_by_id(&self, id: &NodeId) -> Option<NodeRef<'_>> {
        for window in self.all_windows() {
            if let Some(node) = window.root.find(id) {
                return Some(node);
            }
        }
        for border in self.borders.iter() {
            if &border.id == id {
                return Some(NodeRef::Border(border));
            }
            if let Some(tab) = border.children.iter().find(|t| &t.id == id) {
                return Some(NodeRef::Tab(tab));
            }
        }
        None
    }

    pub fn contains_id(&self, id: &NodeId) -> bool {
        self.node_by_id(id).is_some()
    }

    pub fn border_set(&self) -> &BorderSet {
        &self.borders
    }

    /// Floating windows by id (the main window is not included)
    pub fn windows_map(&self) -> &BTreeMap<WindowId, LayoutWindow> {
        &self.windows
    }

    /// The main window first, then floating windows in id order
    pub fn all_windows(&self) -> impl Iterator<Item = &LayoutWindow> {
        std::iter::once(&self.main_window).chain(self.windows.values())
    }

    pub(crate) fn all_windows_mut(&mut self) -> impl Iterator<Item = &mut LayoutWindow> {
        std::iter::once(&mut self.main_window).chain(self.windows.values_mut())
    }

    pub fn window(&self, id: &WindowId) -> Option<&LayoutWindow> {
        if id.is_main() {
            Some(&self.main_window)
        } else {
            self.windows.get(id)
        }
    }

    pub fn window_mut(&mut self, id: &WindowId) -> Option<&mut LayoutWindow> {
        if id.is_main() {
            Some(&mut self.main_window)
        } else {
            self.windows.get_mut(id)
        }
    }

    pub fn root(&self, window: &WindowId) -> Option<&Row> {
        self.window(window).map(|w| &w.root)
    }

    pub fn active_tabset(&self, window: &WindowId) -> Option<&TabSet> {
        self.window(window).and_then(|w| w.active_tabset())
    }

    pub fn maximized_tabset(&self, window: &WindowId) -> Option<&TabSet> {
        self.window(window).and_then(|w| w.maximized_tabset())
    }

    /// Window whose row tree contains `id`; borders belong to no window
    pub fn window_of(&self, id: &NodeId) -> Option<&WindowId> {
        self.all_windows()
            .find(|w| w.root.contains(id))
            .map(|w| &w.id)
    }

    pub fn tab_owner(&self, tab: &NodeId) -> Option<TabOwner> {
        for window in self.all_windows() {
            if let Some(NodeRef::Tab(t)) = window.root.find(tab) {
                let tabset = t.parent()?.clone();
                return Some(TabOwner::TabSet {
                    window: window.id.clone(),
                    tabset,
                });
            }
        }
        self.borders
            .tab_owner(tab)
            .map(|b| TabOwner::Border(b.location))
    }

    /// The open flyout, if any, as (border, tab)
    pub fn flyout(&self) -> Option<(&Border, &Tab)> {
        self.borders
            .iter()
            .find_map(|b| b.flyout_tab().map(|tab| (b, tab)))
    }

    /// Stacking index of a floating window
    pub fn z_index(&self, window: &WindowId, base: i32) -> i32 {
        z_index(&self.float_z_order, window, base)
    }

    pub fn all_ids(&self) -> HashSet<NodeId> {
        let mut ids = HashSet::new();
        for window in self.all_windows() {
            window.root.for_each_id(&mut |id| {
                ids.insert(id.clone());
            });
        }
        for border in self.borders.iter() {
            ids.insert(border.id.clone());
            for tab in &border.children {
                ids.insert(tab.id.clone());
            }
        }
        ids
    }

    // ------------------------------------------------------------------
    // Maintenance used by the reducer
    // ------------------------------------------------------------------

    /// A fresh `#<n>` id not used by any node
    pub(crate) fn generate_id(&mut self) -> NodeId {
        loop {
            let candidate = NodeId::new(format!("#{}", self.next_id));
            self.next_id += 1;
            if !self.contains_id(&candidate) {
                return candidate;
            }
        }
    }

    /// Bulk id allocation that does not borrow the model
    pub(crate) fn id_source(&self) -> IdSource {
        IdSource {
            next: self.next_id,
            taken: self.all_ids(),
        }
    }

    pub(crate) fn finish_ids(&mut self, source: IdSource) {
        self.next_id = self.next_id.max(source.next);
    }

    pub(crate) fn generate_window_id(&mut self) -> WindowId {
        loop {
            let candidate = WindowId::new(format!("#w{}", self.next_id));
            self.next_id += 1;
            if !self.windows.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Refresh parent references, orientations and paths everywhere
    pub(crate) fn relink(&mut self) {
        for window in self.all_windows_mut() {
            window.relink();
        }
        for border in self.borders.iter_mut() {
            border.relink();
        }
    }

    /// Re-synchronize the float z-order against the open floating windows
    pub fn sync_z_order(&mut self) {
        self.float_z_order = sync_z_order(&self.float_z_order, self.windows.keys());
    }

    /// Mutable access to a tabset in any window
    pub(crate) fn tabset_mut(&mut self, id: &NodeId) -> Option<&mut TabSet> {
        self.all_windows_mut()
            .find_map(|w| w.root.find_tabset_mut(id))
    }

    /// Mutable access to a tab in any window or border
    pub(crate) fn tab_mut(&mut self, id: &NodeId) -> Option<&mut Tab> {
        if self.borders.tab_owner(id).is_some() {
            return self
                .borders
                .tab_owner_mut(id)
                .and_then(|b| b.children.iter_mut().find(|t| &t.id == id));
        }
        self.all_windows_mut()
            .find_map(|w| w.root.find_tab_owner_mut(id))
            .and_then(|ts| ts.children.iter_mut().find(|t| &t.id == id))
    }

    pub(crate) fn window_of_mut(&mut self, id: &NodeId) -> Option<&mut LayoutWindow> {
        self.all_windows_mut().find(|w| w.root.contains(id))
    }

    /// Check structural invariants; panics on violation
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self) {
        let mut seen = HashSet::new();
        for window in self.all_windows() {
            window.root.for_each_id(&mut |id| {
                assert!(seen.insert(id.clone()), "duplicate node id {}", id);
            });
            for ts in window.root.tabsets() {
                if let Some(sel) = ts.selected {
                    assert!(
                        sel < ts.children.len(),
                        "tabset {} selected {} but has {} tabs",
                        ts.id,
                        sel,
                        ts.children.len()
                    );
                }
            }
            for row in window.root.rows() {
                for child in &row.children {
                    assert!(
                        child.weight().is_finite() && child.weight() > 0.0,
                        "node {} has weight {}",
                        child.id(),
                        child.weight()
                    );
                }
            }
            if let Some(id) = &window.maximized_tabset {
                assert!(
                    window.maximized_tabset().is_some(),
                    "window {} maximizes missing tabset {}",
                    window.id,
                    id
                );
            }
        }
        let mut open_flyouts = 0;
        for border in self.borders.iter() {
            for tab in &border.children {
                assert!(seen.insert(tab.id.clone()), "duplicate node id {}", tab.id);
            }
            if let Some(sel) = border.selected {
                assert!(sel < border.children.len(), "border {} selected out of range", border.id);
            }
            if let Some(flyout) = &border.flyout_tab_id {
                assert!(
                    border.tab_index(flyout).is_some(),
                    "border {} flyout {} is not its tab",
                    border.id,
                    flyout
                );
                open_flyouts += 1;
            }
        }
        assert!(open_flyouts <= 1, "{} flyouts open at once", open_flyouts);

        let live: HashSet<&WindowId> = self.windows.keys().collect();
        let ordered: HashSet<&WindowId> = self.float_z_order.iter().collect();
        assert_eq!(ordered.len(), self.float_z_order.len(), "duplicate id in z-order");
        assert_eq!(live, ordered, "z-order is not a permutation of floating windows");
    }

    #[cfg(not(debug_assertions))]
    #[inline(always)]
    pub fn assert_invariants(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_model_has_one_active_empty_tabset() {
        let model = Model::default();
        let active = model.active_tabset(&WindowId::main()).unwrap();
        assert!(active.children.is_empty());
        assert_eq!(active.selected, None);
        model.assert_invariants();
    }

    #[test]
    fn test_generated_ids_skip_existing() {
        let mut model = Model::default();
        let first = model.generate_id();
        let second = model.generate_id();
        assert_ne!(first, second);
        assert!(!model.contains_id(&first));
    }

    #[test]
    fn test_node_by_id_finds_border_tabs() {
        let mut model = Model::default();
        model.borders = BorderSet::new(vec![
            Border::new(DockLocation::Left).with_tabs(vec![Tab::new("explorer", "Explorer")]),
        ]);
        model.relink();

        let node = model.node_by_id(&"explorer".into()).unwrap();
        assert_eq!(node.kind(), NodeKind::Tab);
        assert_eq!(node.parent().map(|p| p.as_str()), Some("border_left"));
        assert_eq!(
            model.tab_owner(&"explorer".into()),
            Some(TabOwner::Border(DockLocation::Left))
        );
    }
}
