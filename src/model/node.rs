//! Layout tree nodes: rows, tabsets and tabs
//!
//! Parents own their children outright. The `parent` field on each node is a
//! non-owning back reference (the parent's id) refreshed by
//! [`Row::relink`] after every structural change; it is only used for upward
//! lookups and never for ownership.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::attributes::{GlobalAttributes, TabLocation};
use super::geometry::{Orientation, Rect};

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier of a node within a model
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Variant tag of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Row,
    TabSet,
    Tab,
    Border,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Row => "row",
            NodeKind::TabSet => "tabset",
            NodeKind::Tab => "tab",
            NodeKind::Border => "border",
        }
    }
}

pub(crate) fn default_weight() -> f64 {
    100.0
}

fn is_null(value: &Value) -> bool {
    value.is_null()
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Optional indices (`selected`, insertion index) are written as integers with -1 for none
pub(crate) mod optional_index {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<usize>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(index) => s.serialize_i64(*index as i64),
            None => s.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
        let raw = i64::deserialize(d)?;
        Ok(if raw < 0 { None } else { Some(raw as usize) })
    }
}

// ============================================================================
// Tab
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum TabTag {
    #[default]
    #[serde(rename = "tab")]
    Tab,
}

/// A leaf holding one piece of content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    #[serde(rename = "type", default)]
    tag: TabTag,
    #[serde(default)]
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Opaque payload for the component; never interpreted by the engine
    #[serde(default, skip_serializing_if = "is_null")]
    pub config: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_close: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_drag: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_rename: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_float: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,

    /// Content area this tab renders into (the owner's content rect)
    #[serde(skip)]
    pub rect: Rect,
    /// The tab's button in its owner's tab strip
    #[serde(skip)]
    pub button_rect: Rect,
    #[serde(skip)]
    pub path: String,
    #[serde(skip)]
    pub(crate) parent: Option<NodeId>,
}

impl Tab {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            tag: TabTag::Tab,
            id: id.into(),
            name: name.into(),
            icon: None,
            component: None,
            config: Value::Null,
            enable_close: None,
            enable_drag: None,
            enable_rename: None,
            enable_float: None,
            min_width: None,
            min_height: None,
            max_width: None,
            max_height: None,
            rect: Rect::EMPTY,
            button_rect: Rect::EMPTY,
            path: String::new(),
            parent: None,
        }
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn parent(&self) -> Option<&NodeId> {
        self.parent.as_ref()
    }

    pub fn can_close(&self, global: &GlobalAttributes) -> bool {
        self.enable_close.unwrap_or(global.tab_enable_close)
    }

    pub fn can_drag(&self, global: &GlobalAttributes) -> bool {
        self.enable_drag.unwrap_or(global.tab_enable_drag)
    }

    pub fn can_rename(&self, global: &GlobalAttributes) -> bool {
        self.enable_rename.unwrap_or(global.tab_enable_rename)
    }

    pub fn can_float(&self, global: &GlobalAttributes) -> bool {
        self.enable_float.unwrap_or(global.tab_enable_float)
    }

    pub fn min_size(&self, global: &GlobalAttributes) -> (f64, f64) {
        (
            self.min_width.unwrap_or(global.tab_min_width),
            self.min_height.unwrap_or(global.tab_min_height),
        )
    }

    pub fn max_size(&self, global: &GlobalAttributes) -> (f64, f64) {
        (
            self.max_width.unwrap_or(global.tab_max_width),
            self.max_height.unwrap_or(global.tab_max_height),
        )
    }
}

// ============================================================================
// TabSet
// ============================================================================

fn default_selected() -> Option<usize> {
    Some(0)
}

/// A tab strip plus content area holding sibling tabs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSet {
    #[serde(default)]
    pub id: NodeId,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(with = "optional_index", default = "default_selected")]
    pub selected: Option<usize>,
    #[serde(default)]
    pub children: Vec<Tab>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_close: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_drag: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_drop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_maximize: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_delete_when_empty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_location: Option<TabLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
    #[serde(default, skip_serializing_if = "is_null")]
    pub config: Value,
    /// Document-only flags. The owning window holds the authoritative
    /// active/maximized references; these are read on load and written on save.
    #[serde(default, skip_serializing_if = "is_false")]
    pub(crate) active: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub(crate) maximized: bool,

    #[serde(skip)]
    pub rect: Rect,
    #[serde(skip)]
    pub tab_strip_rect: Rect,
    #[serde(skip)]
    pub content_rect: Rect,
    #[serde(skip)]
    pub path: String,
    #[serde(skip)]
    pub(crate) parent: Option<NodeId>,
}

impl TabSet {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            weight: default_weight(),
            name: None,
            selected: None,
            children: Vec::new(),
            enable_close: None,
            enable_drag: None,
            enable_drop: None,
            enable_maximize: None,
            enable_delete_when_empty: None,
            tab_location: None,
            min_width: None,
            min_height: None,
            max_width: None,
            max_height: None,
            config: Value::Null,
            active: false,
            maximized: false,
            rect: Rect::EMPTY,
            tab_strip_rect: Rect::EMPTY,
            content_rect: Rect::EMPTY,
            path: String::new(),
            parent: None,
        }
    }

    pub fn with_tabs(mut self, tabs: Vec<Tab>) -> Self {
        self.selected = if tabs.is_empty() { None } else { Some(0) };
        self.children = tabs;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn parent(&self) -> Option<&NodeId> {
        self.parent.as_ref()
    }

    pub fn selected_tab(&self) -> Option<&Tab> {
        self.selected.and_then(|i| self.children.get(i))
    }

    pub fn tab_index(&self, id: &NodeId) -> Option<usize> {
        self.children.iter().position(|t| &t.id == id)
    }

    pub fn can_close(&self, global: &GlobalAttributes) -> bool {
        self.enable_close.unwrap_or(global.tab_set_enable_close)
    }

    pub fn can_drag(&self, global: &GlobalAttributes) -> bool {
        self.enable_drag.unwrap_or(global.tab_set_enable_drag)
    }

    pub fn can_drop(&self, global: &GlobalAttributes) -> bool {
        self.enable_drop.unwrap_or(global.tab_set_enable_drop)
    }

    pub fn can_maximize(&self, global: &GlobalAttributes) -> bool {
        self.enable_maximize.unwrap_or(global.tab_set_enable_maximize)
    }

    pub fn delete_when_empty(&self, global: &GlobalAttributes) -> bool {
        self.enable_delete_when_empty
            .unwrap_or(global.tab_set_enable_delete_when_empty)
    }

    pub fn tab_location_or(&self, global: &GlobalAttributes) -> TabLocation {
        self.tab_location.unwrap_or(global.tab_set_tab_location)
    }

    /// Own min size, widened by the largest min of any child tab
    pub fn min_size(&self, global: &GlobalAttributes) -> (f64, f64) {
        let mut w = self.min_width.unwrap_or(global.tab_set_min_width);
        let mut h = self.min_height.unwrap_or(global.tab_set_min_height);
        for tab in &self.children {
            let (tw, th) = tab.min_size(global);
            w = w.max(tw);
            h = h.max(th);
        }
        (w, h)
    }

    /// Own max size, narrowed by the smallest max of any child tab
    pub fn max_size(&self, global: &GlobalAttributes) -> (f64, f64) {
        let mut w = self.max_width.unwrap_or(global.tab_set_max_width);
        let mut h = self.max_height.unwrap_or(global.tab_set_max_height);
        for tab in &self.children {
            let (tw, th) = tab.max_size(global);
            w = w.min(tw);
            h = h.min(th);
        }
        (w, h)
    }

    /// Remove a tab, keeping `selected` pointing at a sensible neighbour
    pub(crate) fn remove_tab(&mut self, index: usize) -> Tab {
        let tab = self.children.remove(index);
        self.selected = adjust_selected_after_removal(self.selected, index, self.children.len());
        tab
    }

    /// Insert a tab; `None` appends
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
}

/// Selection bookkeeping shared by tabsets and borders.
///
/// `remaining` is the child count after removal.
pub(crate) fn adjust_selected_after_removal(
    selected: Option<usize>,
    removed: usize,
    remaining: usize,
) -> Option<usize> {
    let sel = selected?;
    if remaining == 0 {
        return None;
    }
    if removed < sel {
        Some(sel - 1)
    } else if removed == sel {
        Some(sel.min(remaining - 1))
    } else {
        Some(sel)
    }
}

// ============================================================================
// Row
// ============================================================================

/// Child of a row: either a nested row or a tabset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RowChild {
    Row(Row),
    Tabset(TabSet),
}

impl RowChild {
    pub fn id(&self) -> &NodeId {
        match self {
            RowChild::Row(row) => &row.id,
            RowChild::Tabset(ts) => &ts.id,
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            RowChild::Row(row) => row.weight,
            RowChild::Tabset(ts) => ts.weight,
        }
    }

    pub fn set_weight(&mut self, weight: f64) {
        match self {
            RowChild::Row(row) => row.weight = weight,
            RowChild::Tabset(ts) => ts.weight = weight,
        }
    }

    pub fn rect(&self) -> Rect {
        match self {
            RowChild::Row(row) => row.rect,
            RowChild::Tabset(ts) => ts.rect,
        }
    }

    pub fn as_row(&self) -> Option<&Row> {
        match self {
            RowChild::Row(row) => Some(row),
            RowChild::Tabset(_) => None,
        }
    }

    pub fn as_tabset(&self) -> Option<&TabSet> {
        match self {
            RowChild::Tabset(ts) => Some(ts),
            RowChild::Row(_) => None,
        }
    }
}

/// A container splitting its space among children along one axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(default)]
    pub id: NodeId,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub children: Vec<RowChild>,

    /// Derived from nesting depth; refreshed by [`Row::relink`]
    #[serde(skip)]
    pub orientation: Orientation,
    #[serde(skip)]
    pub rect: Rect,
    #[serde(skip)]
    pub path: String,
    #[serde(skip)]
    pub(crate) parent: Option<NodeId>,
}

/// Borrowed view of any node in the model
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Row(&'a Row),
    TabSet(&'a TabSet),
    Tab(&'a Tab),
    Border(&'a super::border::Border),
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> &'a NodeId {
        match self {
            NodeRef::Row(n) => &n.id,
            NodeRef::TabSet(n) => &n.id,
            NodeRef::Tab(n) => &n.id,
            NodeRef::Border(n) => &n.id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Row(_) => NodeKind::Row,
            NodeRef::TabSet(_) => NodeKind::TabSet,
            NodeRef::Tab(_) => NodeKind::Tab,
            NodeRef::Border(_) => NodeKind::Border,
        }
    }

    pub fn rect(&self) -> Rect {
        match self {
            NodeRef::Row(n) => n.rect,
            NodeRef::TabSet(n) => n.rect,
            NodeRef::Tab(n) => n.rect,
            NodeRef::Border(n) => n.rect,
        }
    }

    pub fn parent(&self) -> Option<&'a NodeId> {
        match self {
            NodeRef::Row(n) => n.parent.as_ref(),
            NodeRef::TabSet(n) => n.parent.as_ref(),
            NodeRef::Tab(n) => n.parent.as_ref(),
            NodeRef::Border(_) => None,
        }
    }

    pub fn path(&self) -> &'a str {
        match self {
            NodeRef::Row(n) => &n.path,
            NodeRef::TabSet(n) => &n.path,
            NodeRef::Tab(n) => &n.path,
            NodeRef::Border(n) => &n.path,
        }
    }

    pub fn as_tab(&self) -> Option<&'a Tab> {
        match self {
            NodeRef::Tab(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_tabset(&self) -> Option<&'a TabSet> {
        match self {
            NodeRef::TabSet(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_row(&self) -> Option<&'a Row> {
        match self {
            NodeRef::Row(r) => Some(r),
            _ => None,
        }
    }
}

impl Row {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            weight: default_weight(),
            children: Vec::new(),
            orientation: Orientation::Horizontal,
            rect: Rect::EMPTY,
            path: String::new(),
            parent: None,
        }
    }

    pub fn with_children(mut self, children: Vec<RowChild>) -> Self {
        self.children = children;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn parent(&self) -> Option<&NodeId> {
        self.parent.as_ref()
    }

    pub fn child_index(&self, id: &NodeId) -> Option<usize> {
        self.children.iter().position(|c| c.id() == id)
    }

    pub fn weights(&self) -> Vec<f64> {
        self.children.iter().map(RowChild::weight).collect()
    }

    /// Refresh orientation, parent back references and addressing paths.
    ///
    /// `path` is this row's path; children get `path/r<i>` or `path/ts<i>`,
    /// tabs get `<tabset path>/t<i>`.
    pub fn relink(&mut self, parent: Option<&NodeId>, orientation: Orientation, path: &str) {
        self.parent = parent.cloned();
        self.orientation = orientation;
        self.path = path.to_string();
        let own_id = self.id.clone();
        for (i, child) in self.children.iter_mut().enumerate() {
            match child {
                RowChild::Row(row) => {
                    let child_path = format!("{}/r{}", path, i);
                    row.relink(Some(&own_id), orientation.flip(), &child_path);
                }
                RowChild::Tabset(ts) => {
                    ts.parent = Some(own_id.clone());
                    ts.path = format!("{}/ts{}", path, i);
                    let ts_id = ts.id.clone();
                    for (j, tab) in ts.children.iter_mut().enumerate() {
                        tab.parent = Some(ts_id.clone());
                        tab.path = format!("{}/t{}", ts.path, j);
                    }
                }
            }
        }
    }

    /// Depth-first lookup of any node in this subtree
    pub fn find(&self, id: &NodeId) -> Option<NodeRef<'_>> {
        if &self.id == id {
            return Some(NodeRef::Row(self));
        }
        for child in &self.children {
            match child {
                RowChild::Row(row) => {
                    if let Some(found) = row.find(id) {
                        return Some(found);
                    }
                }
                RowChild::Tabset(ts) => {
                    if &ts.id == id {
                        return Some(NodeRef::TabSet(ts));
                    }
                    if let Some(tab) = ts.children.iter().find(|t| &t.id == id) {
                        return Some(NodeRef::Tab(tab));
                    }
                }
            }
        }
        None
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.find(id).is_some()
    }

    pub fn find_row_mut(&mut self, id: &NodeId) -> Option<&mut Row> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| match child {
            RowChild::Row(row) => row.find_row_mut(id),
            RowChild::Tabset(_) => None,
        })
    }

    pub fn find_tabset_mut(&mut self, id: &NodeId) -> Option<&mut TabSet> {
        self.children.iter_mut().find_map(|child| match child {
            RowChild::Row(row) => row.find_tabset_mut(id),
            RowChild::Tabset(ts) if &ts.id == id => Some(ts),
            RowChild::Tabset(_) => None,
        })
    }

    /// The tabset that owns tab `id`
    pub fn find_tab_owner_mut(&mut self, id: &NodeId) -> Option<&mut TabSet> {
        self.children.iter_mut().find_map(|child| match child {
            RowChild::Row(row) => row.find_tab_owner_mut(id),
            RowChild::Tabset(ts) if ts.tab_index(id).is_some() => Some(ts),
            RowChild::Tabset(_) => None,
        })
    }

    /// The row that directly contains child `id`
    pub fn find_parent_row_mut(&mut self, id: &NodeId) -> Option<&mut Row> {
        if self.child_index(id).is_some() {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| match child {
            RowChild::Row(row) => row.find_parent_row_mut(id),
            RowChild::Tabset(_) => None,
        })
    }

    /// All tabsets in this subtree, in depth-first order
    pub fn tabsets(&self) -> Vec<&TabSet> {
        let mut out = Vec::new();
        self.collect_tabsets(&mut out);
        out
    }

    fn collect_tabsets<'a>(&'a self, out: &mut Vec<&'a TabSet>) {
        for child in &self.children {
            match child {
                RowChild::Row(row) => row.collect_tabsets(out),
                RowChild::Tabset(ts) => out.push(ts),
            }
        }
    }

    /// All rows in this subtree including `self`
    pub fn rows(&self) -> Vec<&Row> {
        let mut out = vec![self];
        for child in &self.children {
            if let RowChild::Row(row) = child {
                out.extend(row.rows());
            }
        }
        out
    }

    /// Visit every node id in this subtree
    pub fn for_each_id(&self, f: &mut dyn FnMut(&NodeId)) {
        f(&self.id);
        for child in &self.children {
            match child {
                RowChild::Row(row) => row.for_each_id(f),
                RowChild::Tabset(ts) => {
                    f(&ts.id);
                    for tab in &ts.children {
                        f(&tab.id);
                    }
                }
            }
        }
    }

    pub(crate) fn for_each_id_mut(&mut self, f: &mut dyn FnMut(&mut NodeId)) {
        f(&mut self.id);
        for child in &mut self.children {
            match child {
                RowChild::Row(row) => row.for_each_id_mut(f),
                RowChild::Tabset(ts) => {
                    f(&mut ts.id);
                    for tab in &mut ts.children {
                        f(&mut tab.id);
                    }
                }
            }
        }
    }

    pub fn tab_count(&self) -> usize {
        self.tabsets().iter().map(|ts| ts.children.len()).sum()
    }

    /// Detach a direct or nested child (row or tabset) from this subtree
    pub(crate) fn remove_child(&mut self, id: &NodeId) -> Option<RowChild> {
        let parent = self.find_parent_row_mut(id)?;
        let index = parent.child_index(id)?;
        Some(parent.children.remove(index))
    }
}
