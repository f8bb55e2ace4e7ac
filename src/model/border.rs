//! Edge-docked borders
//!
//! A border lives outside the main row tree on one edge of the main window.
//! It has two orthogonal pieces of state: its dock state (expanded or
//! collapsed) and an optional flyout tab shown as an overlay. At most one
//! flyout is open across the whole model.

use serde::{Deserialize, Serialize};

use super::attributes::GlobalAttributes;
use super::geometry::{clamp_size, DockLocation, Rect};
use super::node::{adjust_selected_after_removal, optional_index, NodeId, Tab};

/// Tie-break order for borders with equal priority, outermost first.
///
/// Horizontal borders come first so they span the full window width and the
/// vertical borders fit between them.
pub const BORDER_NESTING_ORDER: [DockLocation; 4] = DockLocation::EDGES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockState {
    #[default]
    Expanded,
    Collapsed,
}

impl DockState {
    pub fn toggled(self) -> DockState {
        match self {
            DockState::Expanded => DockState::Collapsed,
            DockState::Collapsed => DockState::Expanded,
        }
    }
}

/// A tab container docked on one edge of the main window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    /// Always `border_<location>`; assigned on load
    #[serde(skip)]
    pub id: NodeId,
    pub location: DockLocation,
    #[serde(default)]
    pub children: Vec<Tab>,
    #[serde(with = "optional_index", default)]
    pub selected: Option<usize>,
    #[serde(default)]
    pub dock_state: DockState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flyout_tab_id: Option<NodeId>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_hide: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_drop: Option<bool>,

    /// The tab strip along the edge
    #[serde(skip)]
    pub rect: Rect,
    /// Docked content next to the strip; empty unless showing content
    #[serde(skip)]
    pub content_rect: Rect,
    /// Overlay for the flyout tab; empty unless a flyout is open
    #[serde(skip)]
    pub flyout_rect: Rect,
    #[serde(skip)]
    pub path: String,
}

impl Border {
    pub fn new(location: DockLocation) -> Self {
        Self {
            id: Self::id_for(location),
            location,
            children: Vec::new(),
            selected: None,
            dock_state: DockState::Expanded,
            size: None,
            min_size: None,
            max_size: None,
            flyout_tab_id: None,
            priority: 0,
            auto_hide: None,
            enable_drop: None,
            rect: Rect::EMPTY,
            content_rect: Rect::EMPTY,
            flyout_rect: Rect::EMPTY,
            path: String::new(),
        }
    }

    pub fn with_tabs(mut self, tabs: Vec<Tab>) -> Self {
        self.children = tabs;
        self
    }

    /// Canonical id of the border on `location`
    pub fn id_for(location: DockLocation) -> NodeId {
        NodeId::new(format!("border_{}", location.name()))
    }

    /// Inverse of [`Border::id_for`]
    pub fn location_for_id(id: &NodeId) -> Option<DockLocation> {
        let name = id.as_str().strip_prefix("border_")?;
        DockLocation::from_name(name).filter(|loc| *loc != DockLocation::Center)
    }

    pub fn selected_tab(&self) -> Option<&Tab> {
        self.selected.and_then(|i| self.children.get(i))
    }

    pub fn tab_index(&self, id: &NodeId) -> Option<usize> {
        self.children.iter().position(|t| &t.id == id)
    }

    pub fn flyout_tab(&self) -> Option<&Tab> {
        let id = self.flyout_tab_id.as_ref()?;
        self.children.iter().find(|t| &t.id == id)
    }

    pub fn size_or(&self, global: &GlobalAttributes) -> f64 {
        self.size.unwrap_or(global.border_size)
    }

    pub fn min_size_or(&self, global: &GlobalAttributes) -> f64 {
        self.min_size.unwrap_or(global.border_min_size)
    }

    pub fn max_size_or(&self, global: &GlobalAttributes) -> f64 {
        self.max_size.unwrap_or(global.border_max_size)
    }

    pub fn auto_hide_or(&self, global: &GlobalAttributes) -> bool {
        self.auto_hide.unwrap_or(global.border_enable_auto_hide)
    }

    pub fn can_drop(&self, global: &GlobalAttributes) -> bool {
        self.enable_drop.unwrap_or(global.border_enable_drop)
    }

    /// Clamp a requested content size into this border's bounds
    pub fn clamp_requested_size(&self, requested: f64, global: &GlobalAttributes) -> f64 {
        clamp_size(requested, self.min_size_or(global), self.max_size_or(global))
    }

    /// Whether the tab strip takes up space at all
    pub fn is_strip_visible(&self, global: &GlobalAttributes) -> bool {
        !(self.auto_hide_or(global) && self.children.is_empty())
    }

    /// Whether the docked content area is shown next to the strip
    pub fn is_showing_content(&self, global: &GlobalAttributes) -> bool {
        self.is_strip_visible(global)
            && self.dock_state == DockState::Expanded
            && self.selected_tab().is_some()
    }

    /// Space this border reserves from the main window along its edge
    pub fn inset(&self, global: &GlobalAttributes) -> f64 {
        if !self.is_strip_visible(global) {
            return 0.0;
        }
        let mut inset = global.border_bar_size;
        if self.is_showing_content(global) {
            inset += self.size_or(global).max(0.0);
        }
        inset
    }

    pub(crate) fn remove_tab(&mut self, index: usize) -> Tab {
        let tab = self.children.remove(index);
        self.selected = adjust_selected_after_removal(self.selected, index, self.children.len());
        if self.flyout_tab_id.as_ref() == Some(&tab.id) {
            self.flyout_tab_id = None;
        }
        tab
    }

    pub(crate) fn insert_tab(&mut self, index: Option<usize>, tab: Tab) -> usize {
        let pos = index
            .map(|i| i.min(self.children.len()))
            .unwrap_or(self.children.len());
        self.children.insert(pos, tab);
        if let Some(sel) = self.selected {
            if pos <= sel {
                self.selected = Some(sel + 1);
            }
        }
        pos
    }

    pub(crate) fn relink(&mut self) {
        self.id = Self::id_for(self.location);
        self.path = format!("/border/{}", self.location.name());
        for (i, tab) in self.children.iter_mut().enumerate() {
            tab.parent = Some(self.id.clone());
            tab.path = format!("{}/t{}", self.path, i);
        }
    }
}

/// The borders of a model, at most one per edge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BorderSet(Vec<Border>);

impl BorderSet {
    pub fn new(borders: Vec<Border>) -> Self {
        Self(borders)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Border> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Border> {
        self.0.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, location: DockLocation) -> Option<&Border> {
        self.0.iter().find(|b| b.location == location)
    }

    pub fn get_mut(&mut self, location: DockLocation) -> Option<&mut Border> {
        self.0.iter_mut().find(|b| b.location == location)
    }

    pub fn by_id(&self, id: &NodeId) -> Option<&Border> {
        self.0.iter().find(|b| &b.id == id)
    }

    pub fn by_id_mut(&mut self, id: &NodeId) -> Option<&mut Border> {
        self.0.iter_mut().find(|b| &b.id == id)
    }

    /// The border that owns tab `id`
    pub fn tab_owner(&self, id: &NodeId) -> Option<&Border> {
        self.0.iter().find(|b| b.tab_index(id).is_some())
    }

    pub fn tab_owner_mut(&mut self, id: &NodeId) -> Option<&mut Border> {
        self.0.iter_mut().find(|b| b.tab_index(id).is_some())
    }

    /// Add an empty border on `location` unless one already exists
    pub(crate) fn ensure(&mut self, location: DockLocation) -> &mut Border {
        let index = match self.0.iter().position(|b| b.location == location) {
            Some(index) => index,
            None => {
                let mut border = Border::new(location);
                border.relink();
                self.0.push(border);
                self.0.len() - 1
            }
        };
        &mut self.0[index]
    }

    /// Borders ordered outermost first for corner-space allocation
    pub fn nesting_order(&self) -> Vec<&Border> {
        compute_nesting_order(&self.0)
    }
}

fn nesting_rank(location: DockLocation) -> usize {
    BORDER_NESTING_ORDER
        .iter()
        .position(|l| *l == location)
        .unwrap_or(BORDER_NESTING_ORDER.len())
}

/// Sort by priority descending, ties broken by [`BORDER_NESTING_ORDER`]
pub fn compute_nesting_order(borders: &[Border]) -> Vec<&Border> {
    let mut ordered: Vec<&Border> = borders.iter().collect();
    ordered.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| nesting_rank(a.location).cmp(&nesting_rank(b.location)))
    });
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn border(location: DockLocation, priority: i32) -> Border {
        let mut b = Border::new(location);
        b.priority = priority;
        b
    }

    #[test]
    fn test_nesting_order_ties_use_fixed_edge_order() {
        let borders = vec![
            border(DockLocation::Right, 0),
            border(DockLocation::Left, 0),
            border(DockLocation::Bottom, 0),
            border(DockLocation::Top, 0),
        ];
        let order: Vec<_> = compute_nesting_order(&borders)
            .iter()
            .map(|b| b.location)
            .collect();
        assert_eq!(order, DockLocation::EDGES.to_vec());
    }

    #[test]
    fn test_nesting_order_priority_wins_over_edge_order() {
        let borders = vec![
            border(DockLocation::Top, 0),
            border(DockLocation::Left, 5),
            border(DockLocation::Bottom, 1),
            border(DockLocation::Right, 5),
        ];
        let order: Vec<_> = compute_nesting_order(&borders)
            .iter()
            .map(|b| b.location)
            .collect();
        assert_eq!(
            order,
            vec![
                DockLocation::Left,
                DockLocation::Right,
                DockLocation::Bottom,
                DockLocation::Top
            ]
        );
    }

    #[test]
    fn test_inset_depends_on_dock_state_and_selection() {
        let global = GlobalAttributes::default();
        let mut b = Border::new(DockLocation::Left).with_tabs(vec![Tab::new("a", "A")]);
        assert_eq!(b.inset(&global), global.border_bar_size);

        b.selected = Some(0);
        assert_eq!(b.inset(&global), global.border_bar_size + global.border_size);

        b.dock_state = DockState::Collapsed;
        assert_eq!(b.inset(&global), global.border_bar_size);
    }

    #[test]
    fn test_auto_hide_suppresses_empty_strip() {
        let global = GlobalAttributes::default();
        let mut b = Border::new(DockLocation::Bottom);
        assert!(b.is_strip_visible(&global));
        b.auto_hide = Some(true);
        assert!(!b.is_strip_visible(&global));
        assert_eq!(b.inset(&global), 0.0);
    }

    #[test]
    fn test_removing_flyout_tab_clears_flyout() {
        let mut b = Border::new(DockLocation::Left)
            .with_tabs(vec![Tab::new("a", "A"), Tab::new("b", "B")]);
        b.flyout_tab_id = Some("b".into());
        b.remove_tab(1);
        assert!(b.flyout_tab_id.is_none());
    }

    #[test]
    fn test_border_id_round_trips_location() {
        let id = Border::id_for(DockLocation::Right);
        assert_eq!(id.as_str(), "border_right");
        assert_eq!(Border::location_for_id(&id), Some(DockLocation::Right));
        assert_eq!(Border::location_for_id(&"border_center".into()), None);
    }
}
