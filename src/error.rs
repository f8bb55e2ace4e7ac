//! Error types for the layout model and the action reducer

use thiserror::Error;

use crate::model::{NodeId, NodeKind, WindowId};

/// Errors raised while building a model from a layout document.
///
/// A document that fails validation never produces a partial model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("malformed layout document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid global attributes: {0}")]
    InvalidAttributes(String),

    #[error("duplicate node id: {0}")]
    DuplicateId(NodeId),

    #[error("node id {0} is reserved for a border")]
    ReservedId(NodeId),

    #[error("duplicate window id: {0}")]
    DuplicateWindow(WindowId),

    /// Window ids share the main window's reserved id
    #[error("window id {0} is reserved")]
    ReservedWindowId(WindowId),

    #[error("node {node} has selected index {index} but only {len} children")]
    InvalidSelected { node: NodeId, index: usize, len: usize },

    #[error("border {border} flyout references {tab}, which is not one of its tabs")]
    InvalidFlyout { border: NodeId, tab: NodeId },

    #[error("node {node} has invalid weight {weight}; weights must be positive and finite")]
    InvalidWeight { node: NodeId, weight: f64 },

    #[error("node {node} has min size {min} larger than max size {max}")]
    InvalidConstraint { node: NodeId, min: f64, max: f64 },

    #[error("border location must be an edge, got {0}")]
    InvalidBorderLocation(String),

    #[error("more than one border on the {0} edge")]
    DuplicateBorder(String),

    #[error("float z-order references unknown window {0}")]
    UnknownZOrderWindow(WindowId),

    #[error("float z-order lists window {0} more than once")]
    DuplicateZOrderWindow(WindowId),
}

/// Reasons an action is rejected. The model is left unchanged.
#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    #[error("no node with id {0}")]
    UnknownNode(NodeId),

    #[error("no window with id {0}")]
    UnknownWindow(WindowId),

    #[error("node id {0} is already in use")]
    DuplicateId(NodeId),

    #[error("invalid node json: {0}")]
    InvalidNodeJson(String),

    #[error("node {id} is a {actual}, expected {expected}")]
    WrongKind {
        id: NodeId,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("row {row} has {children} children but {weights} weights were given")]
    WeightCountMismatch {
        row: NodeId,
        children: usize,
        weights: usize,
    },

    #[error("weight {0} is not a positive finite number")]
    InvalidWeight(f64),

    #[error("size {0} is not a finite number")]
    InvalidSize(f64),

    #[error("index {index} out of range for {node} with {len} children")]
    IndexOutOfRange { node: NodeId, index: usize, len: usize },

    #[error("{operation} is disabled for {node}")]
    Disabled { node: NodeId, operation: &'static str },

    #[error("tab {tab} does not belong to border {border}")]
    NotInBorder { tab: NodeId, border: NodeId },

    #[error("cannot drop {0} onto itself or into its own subtree")]
    DropOntoSelf(NodeId),

    #[error("cannot {operation} the main window")]
    MainWindow { operation: &'static str },

    #[error("edge docking is disabled")]
    EdgeDockDisabled,

    #[error("invalid drop location {0} for this target")]
    InvalidLocation(String),

    #[error("attribute update rejected: {0}")]
    InvalidAttributes(String),

    #[error("action vetoed by filter")]
    Vetoed,
}

impl ActionError {
    pub(crate) fn wrong_kind(id: &NodeId, expected: &'static str, actual: NodeKind) -> Self {
        ActionError::WrongKind {
            id: id.clone(),
            expected,
            actual: actual.name(),
        }
    }
}
