//! Layout documents: the serialized form of a model
//!
//! ```json
//! {
//!   "global": { "splitterSize": 6 },
//!   "borders": [{ "location": "left", "children": [...] }],
//!   "layout": { "type": "row", "children": [...] },
//!   "windows": { "w1": { "rect": {...}, "layout": {...} } }
//! }
//! ```
//!
//! Loading validates the whole document before a [`Model`] is returned;
//! nothing partially built ever escapes.

use std::collections::{BTreeMap, HashSet};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::attributes::GlobalAttributes;
use super::border::{Border, BorderSet};
use super::geometry::{DockLocation, Orientation, Rect};
use super::node::{NodeId, Row, RowChild, TabSet};
use super::window::{sync_z_order, LayoutWindow, WindowId};
use super::Model;
use crate::error::ModelError;

fn is_false(value: &bool) -> bool {
    !*value
}

/// Top-level layout document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDocument {
    /// Attribute overrides; missing keys fall back to the engine defaults
    #[serde(default)]
    pub global: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub borders: Vec<Border>,
    #[serde(with = "root_row")]
    pub layout: Row,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub windows: BTreeMap<WindowId, WindowDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub float_z_order: Vec<WindowId>,
}

/// A floating window in a layout document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowDocument {
    pub rect: Rect,
    #[serde(with = "root_row")]
    pub layout: Row,
    #[serde(default, skip_serializing_if = "is_false")]
    pub root_orientation_vertical: bool,
}

/// The root of a window must be a row; it is written with its `type` tag
mod root_row {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::model::node::{Row, RowChild};

    #[derive(Serialize)]
    struct Tagged<'a> {
        #[serde(rename = "type")]
        kind: &'static str,
        #[serde(flatten)]
        row: &'a Row,
    }

    pub fn serialize<S: Serializer>(row: &Row, s: S) -> Result<S::Ok, S::Error> {
        Tagged { kind: "row", row }.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Row, D::Error> {
        match RowChild::deserialize(d)? {
            RowChild::Row(row) => Ok(row),
            RowChild::Tabset(ts) => Err(D::Error::custom(format!(
                "layout root must be a row, found tabset {:?}",
                ts.id.as_str()
            ))),
        }
    }
}

/// Overlay a JSON object patch onto the serialized form of `current`.
///
/// Keys in the patch replace keys in `current`; a `null` value removes the
/// key so the attribute falls back to its inherited default.
pub(crate) fn apply_patch<T>(current: &T, patch: &Value) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let mut base = serde_json::to_value(current)?;
    merge_objects(&mut base, patch);
    serde_json::from_value(base)
}

fn merge_objects(base: &mut Value, patch: &Value) {
    if let (Value::Object(base), Value::Object(patch)) = (base, patch) {
        for (key, value) in patch {
            if value.is_null() {
                base.remove(key);
            } else {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

impl Model {
    /// Parse and validate a layout document
    pub fn from_json(json: &str) -> Result<Model, ModelError> {
        Self::from_json_with_defaults(json, &GlobalAttributes::default())
    }

    /// Parse a document whose `global` overrides are layered on `defaults`
    pub fn from_json_with_defaults(
        json: &str,
        defaults: &GlobalAttributes,
    ) -> Result<Model, ModelError> {
        let document: ModelDocument = serde_json::from_str(json)?;
        Self::from_document(document, defaults)
    }

    pub fn from_value(value: Value) -> Result<Model, ModelError> {
        let document: ModelDocument = serde_json::from_value(value)?;
        Self::from_document(document, &GlobalAttributes::default())
    }

    pub fn from_document(
        document: ModelDocument,
        defaults: &GlobalAttributes,
    ) -> Result<Model, ModelError> {
        let global = if document.global.is_null() {
            defaults.clone()
        } else {
            apply_patch(defaults, &document.global)?
        };
        global.validate().map_err(ModelError::InvalidAttributes)?;

        let borders = load_borders(document.borders, &global)?;

        let mut main_window = LayoutWindow::new(WindowId::main(), Rect::EMPTY, document.layout);
        main_window.root_orientation = if global.root_orientation_vertical {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };
        load_window(&mut main_window, &global)?;

        let mut windows = BTreeMap::new();
        for (id, doc) in document.windows {
            if id.is_main() {
                return Err(ModelError::ReservedWindowId(id));
            }
            let mut window = LayoutWindow::new(id.clone(), doc.rect, doc.layout);
            window.root_orientation = if doc.root_orientation_vertical {
                Orientation::Vertical
            } else {
                Orientation::Horizontal
            };
            load_window(&mut window, &global)?;
            if windows.insert(id.clone(), window).is_some() {
                return Err(ModelError::DuplicateWindow(id));
            }
        }

        let mut seen = HashSet::new();
        for id in &document.float_z_order {
            if !windows.contains_key(id) {
                return Err(ModelError::UnknownZOrderWindow(id.clone()));
            }
            if !seen.insert(id) {
                return Err(ModelError::DuplicateZOrderWindow(id.clone()));
            }
        }
        let float_z_order = sync_z_order(&document.float_z_order, windows.keys());

        let mut model = Model {
            global,
            borders,
            main_window,
            windows,
            float_z_order,
            next_id: 1,
        };
        check_unique_ids(&model)?;
        check_reserved_ids(&model)?;
        assign_missing_ids(&mut model);
        model.relink();
        Ok(model)
    }

    /// Serialize to a layout document
    pub fn to_document(&self) -> ModelDocument {
        let mut global = self.global.clone();
        global.root_orientation_vertical = self.main_window.root_orientation == Orientation::Vertical;

        let windows = self
            .windows
            .values()
            .map(|w| {
                let doc = WindowDocument {
                    rect: w.rect,
                    layout: flagged_root(w),
                    root_orientation_vertical: w.root_orientation == Orientation::Vertical,
                };
                (w.id.clone(), doc)
            })
            .collect();

        ModelDocument {
            global: serde_json::to_value(&global).unwrap_or(Value::Null),
            borders: self.borders.iter().cloned().collect(),
            layout: flagged_root(&self.main_window),
            windows,
            float_z_order: self.float_z_order.clone(),
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self.to_document()).unwrap_or(Value::Null)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_document())
    }
}

/// Copy of a window's root with the active/maximized flags written onto tabsets
fn flagged_root(window: &LayoutWindow) -> Row {
    let mut root = window.root.clone();
    if let Some(id) = &window.active_tabset {
        if let Some(ts) = root.find_tabset_mut(id) {
            ts.active = true;
        }
    }
    if let Some(id) = &window.maximized_tabset {
        if let Some(ts) = root.find_tabset_mut(id) {
            ts.maximized = true;
        }
    }
    root
}

fn load_borders(borders: Vec<Border>, global: &GlobalAttributes) -> Result<BorderSet, ModelError> {
    let mut locations = HashSet::new();
    let mut loaded = Vec::with_capacity(borders.len());
    for mut border in borders {
        if border.location == DockLocation::Center {
            return Err(ModelError::InvalidBorderLocation(border.location.to_string()));
        }
        if !locations.insert(border.location) {
            return Err(ModelError::DuplicateBorder(border.location.to_string()));
        }
        border.relink();
        validate_border(&border, global)?;
        loaded.push(border);
    }
    Ok(BorderSet::new(loaded))
}

pub(crate) fn validate_border(border: &Border, global: &GlobalAttributes) -> Result<(), ModelError> {
    if let Some(index) = border.selected {
        if index >= border.children.len() {
            return Err(ModelError::InvalidSelected {
                node: border.id.clone(),
                index,
                len: border.children.len(),
            });
        }
    }
    if let Some(tab) = &border.flyout_tab_id {
        if border.tab_index(tab).is_none() {
            return Err(ModelError::InvalidFlyout {
                border: border.id.clone(),
                tab: tab.clone(),
            });
        }
    }
    let (min, max) = (border.min_size_or(global), border.max_size_or(global));
    if min > max {
        return Err(ModelError::InvalidConstraint {
            node: border.id.clone(),
            min,
            max,
        });
    }
    Ok(())
}

/// Validate one window's tree and lift document flags onto the window
fn load_window(window: &mut LayoutWindow, global: &GlobalAttributes) -> Result<(), ModelError> {
    validate_row(&window.root)?;
    let mut active = None;
    let mut maximized = None;
    normalize_tabsets(&mut window.root, global, &mut active, &mut maximized)?;
    window.active_tabset = active;
    window.maximized_tabset = maximized;
    Ok(())
}

fn validate_row(row: &Row) -> Result<(), ModelError> {
    for child in &row.children {
        let weight = child.weight();
        if !weight.is_finite() || weight <= 0.0 {
            return Err(ModelError::InvalidWeight {
                node: child.id().clone(),
                weight,
            });
        }
        if let RowChild::Row(inner) = child {
            validate_row(inner)?;
        }
    }
    Ok(())
}

fn normalize_tabsets(
    row: &mut Row,
    global: &GlobalAttributes,
    active: &mut Option<NodeId>,
    maximized: &mut Option<NodeId>,
) -> Result<(), ModelError> {
    for child in &mut row.children {
        match child {
            RowChild::Row(inner) => normalize_tabsets(inner, global, active, maximized)?,
            RowChild::Tabset(ts) => {
                normalize_tabset(ts, global)?;
                if std::mem::take(&mut ts.active) && active.is_none() {
                    *active = Some(ts.id.clone());
                }
                if std::mem::take(&mut ts.maximized) && maximized.is_none() {
                    *maximized = Some(ts.id.clone());
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn normalize_tabset(ts: &mut TabSet, global: &GlobalAttributes) -> Result<(), ModelError> {
    if ts.children.is_empty() {
        ts.selected = None;
    } else if let Some(index) = ts.selected {
        if index >= ts.children.len() {
            return Err(ModelError::InvalidSelected {
                node: ts.id.clone(),
                index,
                len: ts.children.len(),
            });
        }
    }
    let (min_w, min_h) = ts.min_size(global);
    let (max_w, max_h) = ts.max_size(global);
    if min_w > max_w {
        return Err(ModelError::InvalidConstraint {
            node: ts.id.clone(),
            min: min_w,
            max: max_w,
        });
    }
    if min_h > max_h {
        return Err(ModelError::InvalidConstraint {
            node: ts.id.clone(),
            min: min_h,
            max: max_h,
        });
    }
    Ok(())
}

fn check_unique_ids(model: &Model) -> Result<(), ModelError> {
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut duplicate = None;
    let mut check = |id: &NodeId| {
        if !id.is_empty() && !seen.insert(id.clone()) && duplicate.is_none() {
            duplicate = Some(id.clone());
        }
    };
    for window in model.all_windows() {
        window.root.for_each_id(&mut check);
    }
    for border in model.borders.iter() {
        check(&border.id);
        for tab in &border.children {
            check(&tab.id);
        }
    }
    match duplicate {
        Some(id) => Err(ModelError::DuplicateId(id)),
        None => Ok(()),
    }
}

/// `border_<edge>` names the border itself, so no tab, tabset or row may take it
fn check_reserved_ids(model: &Model) -> Result<(), ModelError> {
    let mut reserved = None;
    let mut check = |id: &NodeId| {
        if reserved.is_none() && Border::location_for_id(id).is_some() {
            reserved = Some(id.clone());
        }
    };
    for window in model.all_windows() {
        window.root.for_each_id(&mut check);
    }
    for tab in model.borders.iter().flat_map(|b| b.children.iter()) {
        check(&tab.id);
    }
    match reserved {
        Some(id) => Err(ModelError::ReservedId(id)),
        None => Ok(()),
    }
}

/// Give every node that arrived without an id a fresh `#<n>` id
fn assign_missing_ids(model: &mut Model) {
    let mut ids = model.id_source();
    let mut fresh = |id: &mut NodeId| {
        if id.is_empty() {
            *id = ids.next_id();
        }
    };
    for window in model.all_windows_mut() {
        window.root.for_each_id_mut(&mut fresh);
    }
    for border in model.borders.iter_mut() {
        for tab in &mut border.children {
            fresh(&mut tab.id);
        }
    }
    model.finish_ids(ids);
}
