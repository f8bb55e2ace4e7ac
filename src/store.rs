//! The public face of the engine
//!
//! [`LayoutStore`] owns a [`Model`], runs actions through the reducer and
//! tells subscribers about what happened. Read access goes through `Deref`,
//! so every query on [`Model`] is available on the store.
//!
//! Listeners are held weakly. Registering one returns a [`Subscription`];
//! dropping it (or calling [`Subscription::dispose`]) unregisters the
//! listener. Listeners run in registration order and a panicking listener
//! does not stop the ones after it.

use std::ops::Deref;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use tracing::{error, warn};

use crate::config::EngineConfig;
use crate::error::{ActionError, ModelError};
use crate::interaction::{SessionSlot, SessionToken};
use crate::layout::{layout_model, LayoutResult};
use crate::messages::Action;
use crate::model::{Model, NodeId, Rect, WindowId};
use crate::update::update;
use crate::view::{compute_drop, DragSubject, DropInfo};

type ChangeListener = dyn Fn(&Model);
type ActionListener = dyn Fn(&Action, Option<&NodeId>);

/// Rewrites an action before it runs; `None` vetoes it
pub type ActionFilter = Box<dyn FnMut(Action) -> Option<Action>>;

/// Keeps a listener registered for as long as it is alive
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    _guard: Rc<dyn std::any::Any>,
}

impl Subscription {
    pub fn dispose(self) {}
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Subscription")
    }
}

pub struct LayoutStore {
    model: Model,
    config: EngineConfig,
    change_listeners: Vec<Weak<Box<ChangeListener>>>,
    action_listeners: Vec<Weak<Box<ActionListener>>>,
    filter: Option<ActionFilter>,
}

impl LayoutStore {
    pub fn new(model: Model) -> Self {
        Self::with_config(model, EngineConfig::default())
    }

    pub fn with_config(model: Model, config: EngineConfig) -> Self {
        Self {
            model,
            config,
            change_listeners: Vec::new(),
            action_listeners: Vec::new(),
            filter: None,
        }
    }

    /// Parse a layout document, filling unset attributes from `config`
    pub fn from_json(json: &str, config: EngineConfig) -> Result<Self, ModelError> {
        let model = Model::from_json_with_defaults(json, &config.global)?;
        Ok(Self::with_config(model, config))
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.model.to_json()
    }

    /// Run one action. Subscribers hear about it only when it applied.
    pub fn do_action(&mut self, action: Action) -> Result<Option<NodeId>, ActionError> {
        let action = match self.filter.as_mut() {
            Some(filter) => match filter(action) {
                Some(action) => action,
                None => {
                    warn!("action vetoed by filter");
                    return Err(ActionError::Vetoed);
                }
            },
            None => action,
        };

        let affected = update(&mut self.model, action.clone())?;
        self.notify_action(&action, affected.as_ref());
        self.notify_change();
        Ok(affected)
    }

    /// Commit the live interaction session and run its action, if any
    pub fn finish_session(
        &mut self,
        slot: &mut SessionSlot,
        token: SessionToken,
    ) -> Result<Option<NodeId>, ActionError> {
        match slot.commit(token) {
            Some(action) => self.do_action(action),
            None => Ok(None),
        }
    }

    /// Lay out everything inside `outer` and store the rects on the nodes
    pub fn calculate_layout(&mut self, outer: Rect) -> LayoutResult {
        layout_model(&mut self.model, outer)
    }

    /// Resolve a drop target with the configured tuning
    pub fn compute_drop(
        &self,
        window: &WindowId,
        subject: &DragSubject,
        px: f64,
        py: f64,
    ) -> Option<DropInfo> {
        compute_drop(&self.model, window, subject, px, py, &self.config.drop)
    }

    /// Stacking index of a floating window, from the configured base
    pub fn window_z_index(&self, window: &WindowId) -> i32 {
        self.model.z_index(window, self.config.z_index_base)
    }

    pub fn set_action_filter(&mut self, filter: Option<ActionFilter>) {
        self.filter = filter;
    }

    /// Called with the model after every applied action
    pub fn on_did_change(&mut self, listener: impl Fn(&Model) + 'static) -> Subscription {
        let strong: Rc<Box<ChangeListener>> = Rc::new(Box::new(listener));
        self.change_listeners.retain(|w| w.strong_count() > 0);
        self.change_listeners.push(Rc::downgrade(&strong));
        Subscription { _guard: strong }
    }

    /// Called with each applied action and the node it affected
    pub fn on_did_action(
        &mut self,
        listener: impl Fn(&Action, Option<&NodeId>) + 'static,
    ) -> Subscription {
        let strong: Rc<Box<ActionListener>> = Rc::new(Box::new(listener));
        self.action_listeners.retain(|w| w.strong_count() > 0);
        self.action_listeners.push(Rc::downgrade(&strong));
        Subscription { _guard: strong }
    }

    fn notify_action(&mut self, action: &Action, affected: Option<&NodeId>) {
        self.action_listeners.retain(|w| w.strong_count() > 0);
        for listener in self.action_listeners.iter().filter_map(Weak::upgrade) {
            if catch_unwind(AssertUnwindSafe(|| listener(action, affected))).is_err() {
                error!(kind = action.kind(), "action listener panicked");
            }
        }
    }

    fn notify_change(&mut self) {
        self.change_listeners.retain(|w| w.strong_count() > 0);
        let model = &self.model;
        for listener in self.change_listeners.iter().filter_map(Weak::upgrade) {
            if catch_unwind(AssertUnwindSafe(|| listener(model))).is_err() {
                error!("change listener panicked");
            }
        }
    }
}

impl Deref for LayoutStore {
    type Target = Model;

    fn deref(&self) -> &Model {
        &self.model
    }
}

impl Default for LayoutStore {
    fn default() -> Self {
        Self::new(Model::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_dropped_subscription_stops_notifications() {
        let mut store = LayoutStore::default();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let sub = store.on_did_change(move |_| counter.set(counter.get() + 1));

        let json = serde_json::json!({"splitterSize": 6});
        store
            .do_action(Action::UpdateModelAttributes { json: json.clone() })
            .unwrap();
        sub.dispose();
        store
            .do_action(Action::UpdateModelAttributes { json })
            .unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_filter_can_veto() {
        let mut store = LayoutStore::default();
        store.set_action_filter(Some(Box::new(|_| None)));
        let err = store
            .do_action(Action::UpdateModelAttributes {
                json: serde_json::json!({"splitterSize": 6}),
            })
            .unwrap_err();
        assert_eq!(err, ActionError::Vetoed);
        assert_eq!(store.global.splitter_size, 8.0);
    }
}
