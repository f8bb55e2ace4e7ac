//! Attribute actions: tab properties and JSON patches

use serde_json::Value;

use super::layout::kind_of;
use crate::error::ActionError;
use crate::model::json::{apply_patch, normalize_tabset, validate_border};
use crate::model::{GlobalAttributes, Model, NodeId, NodeKind, Orientation, Tab};

/// Keys a node patch may never touch; structure changes go through actions
const STRUCTURAL_KEYS: [&str; 5] = ["id", "type", "children", "active", "maximized"];

fn tab_mut<'a>(model: &'a mut Model, id: &NodeId) -> Result<&'a mut Tab, ActionError> {
    let kind = kind_of(model, id)?;
    if kind != NodeKind::Tab {
        return Err(ActionError::wrong_kind(id, "tab", kind));
    }
    model
        .tab_mut(id)
        .ok_or_else(|| ActionError::UnknownNode(id.clone()))
}

/// Apply `set` to a tab and report it as the affected node
pub(super) fn with_tab(
    model: &mut Model,
    id: &NodeId,
    set: impl FnOnce(&mut Tab),
) -> Result<Option<NodeId>, ActionError> {
    set(tab_mut(model, id)?);
    Ok(Some(id.clone()))
}

fn patch_object(json: &Value) -> Result<&serde_json::Map<String, Value>, ActionError> {
    json.as_object()
        .ok_or_else(|| ActionError::InvalidAttributes("expected a JSON object".to_string()))
}

fn invalid(e: impl std::fmt::Display) -> ActionError {
    ActionError::InvalidAttributes(e.to_string())
}

fn check_weight(weight: f64) -> Result<(), ActionError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(ActionError::InvalidWeight(weight))
    }
}

pub(super) fn update_model_attributes(
    model: &mut Model,
    json: &Value,
) -> Result<Option<NodeId>, ActionError> {
    let patch = patch_object(json)?;
    // `null` restores the engine default rather than dropping to serde's default
    let mut merged = serde_json::to_value(&model.global).map_err(invalid)?;
    let defaults = serde_json::to_value(GlobalAttributes::default()).map_err(invalid)?;
    if let (Value::Object(merged), Value::Object(defaults)) = (&mut merged, &defaults) {
        for (key, value) in patch {
            match (value, defaults.get(key)) {
                (Value::Null, Some(default)) => {
                    merged.insert(key.clone(), default.clone());
                }
                (Value::Null, None) => {}
                (value, _) => {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }
    }
    let global: GlobalAttributes = serde_json::from_value(merged).map_err(invalid)?;
    global.validate().map_err(ActionError::InvalidAttributes)?;

    if global.root_orientation_vertical != model.global.root_orientation_vertical {
        model.main_window.root_orientation = if global.root_orientation_vertical {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };
    }
    model.global = global;
    Ok(None)
}

pub(super) fn update_node_attributes(
    model: &mut Model,
    id: &NodeId,
    json: &Value,
) -> Result<Option<NodeId>, ActionError> {
    let patch = patch_object(json)?;
    if let Some(key) = STRUCTURAL_KEYS.iter().find(|k| patch.contains_key(**k)) {
        return Err(ActionError::InvalidAttributes(format!("{} cannot be patched", key)));
    }
    let global = model.global.clone();

    match kind_of(model, id)? {
        NodeKind::Tab => {
            let tab = tab_mut(model, id)?;
            let mut patched: Tab = apply_patch(&*tab, json).map_err(invalid)?;
            patched.id = tab.id.clone();
            patched.rect = tab.rect;
            patched.button_rect = tab.button_rect;
            *tab = patched;
        }
        NodeKind::TabSet => {
            let ts = model
                .tabset_mut(id)
                .ok_or_else(|| ActionError::UnknownNode(id.clone()))?;
            let mut patched = apply_patch(&*ts, json).map_err(invalid)?;
            check_weight(patched.weight)?;
            normalize_tabset(&mut patched, &global).map_err(invalid)?;
            patched.id = ts.id.clone();
            patched.rect = ts.rect;
            patched.tab_strip_rect = ts.tab_strip_rect;
            patched.content_rect = ts.content_rect;
            *ts = patched;
        }
        NodeKind::Row => {
            if patch.keys().any(|k| k != "weight") {
                return Err(ActionError::InvalidAttributes(
                    "rows only carry a weight".to_string(),
                ));
            }
            let row = model
                .window_of_mut(id)
                .and_then(|w| w.root.find_row_mut(id))
                .ok_or_else(|| ActionError::UnknownNode(id.clone()))?;
            let weight = match patch.get("weight") {
                Some(Value::Null) | None => crate::model::node::default_weight(),
                Some(value) => value
                    .as_f64()
                    .ok_or_else(|| ActionError::InvalidAttributes("weight must be a number".to_string()))?,
            };
            check_weight(weight)?;
            row.weight = weight;
        }
        NodeKind::Border => {
            if patch.contains_key("location") {
                return Err(ActionError::InvalidAttributes(
                    "a border cannot change its edge".to_string(),
                ));
            }
            let border = model
                .borders
                .by_id_mut(id)
                .ok_or_else(|| ActionError::UnknownNode(id.clone()))?;
            let mut patched = apply_patch(&*border, json).map_err(invalid)?;
            patched.id = border.id.clone();
            patched.relink();
            validate_border(&patched, &global).map_err(invalid)?;
            *border = patched;
            if border.flyout_tab_id.is_some() {
                // a patched-in flyout still closes every other one
                for other in model.borders.iter_mut().filter(|b| &b.id != id) {
                    other.flyout_tab_id = None;
                }
            }
        }
    }
    Ok(Some(id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_model_patch_null_restores_default() {
        let mut model = Model::default();
        update_model_attributes(&mut model, &json!({"splitterSize": 4})).unwrap();
        assert_eq!(model.global.splitter_size, 4.0);

        update_model_attributes(&mut model, &json!({"splitterSize": null})).unwrap();
        assert_eq!(model.global.splitter_size, 8.0);
    }

    #[test]
    fn test_model_patch_rejects_invalid_values() {
        let mut model = Model::default();
        let err = update_model_attributes(&mut model, &json!({"splitterSize": -1})).unwrap_err();
        assert!(matches!(err, ActionError::InvalidAttributes(_)));
        assert_eq!(model.global.splitter_size, 8.0);
    }

    #[test]
    fn test_node_patch_refuses_structural_keys() {
        let mut model = Model::default();
        let ts = model.main_window.root.children[0].id().clone();
        let err = update_node_attributes(&mut model, &ts, &json!({"children": []})).unwrap_err();
        assert!(matches!(err, ActionError::InvalidAttributes(_)));
    }

    #[test]
    fn test_tabset_patch_sets_and_clears_override() {
        let mut model = Model::default();
        let ts = model.main_window.root.children[0].id().clone();
        update_node_attributes(&mut model, &ts, &json!({"enableMaximize": false})).unwrap();
        assert_eq!(model.tabset_mut(&ts).unwrap().enable_maximize, Some(false));

        update_node_attributes(&mut model, &ts, &json!({"enableMaximize": null})).unwrap();
        assert_eq!(model.tabset_mut(&ts).unwrap().enable_maximize, None);
    }
}
