//! Pixel-level queries against a laid-out model
//!
//! Nothing here draws. `geometry` holds the shared strip and edge-band math,
//! `hit_test` resolves drop targets under the pointer.

pub mod geometry;
pub mod hit_test;

pub use hit_test::{
    compute_drop, DragSubject, DropClass, DropInfo, DropTuning, DEFAULT_EDGE_BAND_FRACTION,
    DEFAULT_EDGE_BAND_MAX_PX, DEFAULT_EDGE_DOCK_LENGTH, DEFAULT_EDGE_DOCK_MARGIN,
    DEFAULT_HIDDEN_BORDER_MARGIN, DEFAULT_TAB_INDICATOR_WIDTH, TAB_REORDER_MAX_WIDTH,
};
