//! Splitter drag math
//!
//! A drag works against a snapshot taken at press time so the result only
//! depends on where the pointer is now, not on the path it took.

use std::collections::HashMap;

use super::{collect_bounds, SizeBounds, SplitterBar, SplitterTarget};
use crate::model::{DockLocation, GlobalAttributes, Model, NodeId, Orientation};

/// Smallest weight a drag can produce; keeps every sibling strictly positive
const MIN_WEIGHT: f64 = 1e-6;

/// Pre-drag state of one splitter between two row children
#[derive(Debug, Clone, PartialEq)]
pub struct SplitterSnapshot {
    pub row: NodeId,
    /// The splitter sits between children `index` and `index + 1`
    pub index: usize,
    pub orientation: Orientation,
    pub weights: Vec<f64>,
    pub sizes: Vec<f64>,
    pub mins: Vec<f64>,
    pub maxs: Vec<f64>,
    /// Main-axis start of the row
    pub start: f64,
    pub splitter_size: f64,
}

impl SplitterSnapshot {
    /// Main-axis coordinate of the splitter's leading edge
    pub fn position(&self) -> f64 {
        self.start
            + self.sizes[..=self.index].iter().sum::<f64>()
            + self.splitter_size * self.index as f64
    }
}

/// Capture the row under a splitter bar, as last laid out
pub fn splitter_snapshot(model: &Model, bar: &SplitterBar) -> Option<SplitterSnapshot> {
    let SplitterTarget::Row { row, index } = &bar.target else {
        return None;
    };
    let row_node = model.root(&bar.window)?.find(row)?.as_row()?;
    if index + 1 >= row_node.children.len() {
        return None;
    }
    let orientation = row_node.orientation;

    let mut bounds = HashMap::new();
    collect_bounds(row_node, &model.global, &mut bounds);
    let child_bounds: Vec<SizeBounds> = row_node
        .children
        .iter()
        .map(|c| bounds.get(c.id()).copied().unwrap_or(SizeBounds::UNBOUNDED))
        .collect();

    Some(SplitterSnapshot {
        row: row.clone(),
        index: *index,
        orientation,
        weights: row_node.weights(),
        sizes: row_node
            .children
            .iter()
            .map(|c| c.rect().size(orientation))
            .collect(),
        mins: child_bounds.iter().map(|b| b.min(orientation)).collect(),
        maxs: child_bounds.iter().map(|b| b.max(orientation)).collect(),
        start: row_node.rect.start(orientation),
        splitter_size: model.global.splitter_size,
    })
}

/// Range the splitter's leading edge may move within.
///
/// Only the two adjacent children resize, so each of them bounds the travel
/// by its min on one side and its max on the other.
pub fn splitter_bounds(snapshot: &SplitterSnapshot) -> (f64, f64) {
    let i = snapshot.index;
    let p0 = snapshot.position();
    let (size_l, size_r) = (snapshot.sizes[i], snapshot.sizes[i + 1]);
    let (min_l, min_r) = (snapshot.mins[i], snapshot.mins[i + 1]);
    let (max_l, max_r) = (snapshot.maxs[i], snapshot.maxs[i + 1]);

    let lo = (p0 - (size_l - min_l)).max(p0 - (max_r - size_r));
    let hi = (p0 + (size_r - min_r)).min(p0 + (max_l - size_l));
    // already-violated bounds pin the splitter in place
    (lo.min(p0), hi.max(p0))
}

/// Weights after moving the splitter's leading edge to `position`.
///
/// The two adjacent children trade size; their weights keep the sum they had
/// so every other sibling keeps its share.
pub fn calculate_split(snapshot: &SplitterSnapshot, position: f64) -> Vec<f64> {
    let i = snapshot.index;
    let mut weights = snapshot.weights.clone();
    let (lo, hi) = splitter_bounds(snapshot);
    let delta = position.max(lo).min(hi) - snapshot.position();

    let (size_l, size_r) = (snapshot.sizes[i], snapshot.sizes[i + 1]);
    let pair_size = size_l + size_r;
    let pair_weight = weights[i] + weights[i + 1];
    if pair_size <= 0.0 || pair_weight <= 0.0 {
        return weights;
    }

    let new_l = (size_l + delta).max(0.0).min(pair_size);
    let new_r = pair_size - new_l;
    weights[i] = (new_l * pair_weight / pair_size).max(MIN_WEIGHT);
    weights[i + 1] = (new_r * pair_weight / pair_size).max(MIN_WEIGHT);
    weights
}

/// Pre-drag state of a border's content splitter
#[derive(Debug, Clone, PartialEq)]
pub struct BorderResizeSnapshot {
    pub border: NodeId,
    pub location: DockLocation,
    pub start_size: f64,
    pub min_size: f64,
    pub max_size: f64,
}

impl BorderResizeSnapshot {
    /// Content size after the pointer moved `delta` along the border's axis
    pub fn requested_size(&self, delta: f64) -> f64 {
        let grow = match self.location {
            DockLocation::Left | DockLocation::Top => delta,
            DockLocation::Right | DockLocation::Bottom => -delta,
            DockLocation::Center => 0.0,
        };
        crate::model::clamp_size(self.start_size + grow, self.min_size, self.max_size)
    }
}

pub fn border_resize_snapshot(
    model: &Model,
    location: DockLocation,
) -> Option<BorderResizeSnapshot> {
    let border = model.borders.get(location)?;
    let global: &GlobalAttributes = &model.global;
    Some(BorderResizeSnapshot {
        border: border.id.clone(),
        location,
        start_size: border.size_or(global),
        min_size: border.min_size_or(global),
        max_size: border.max_size_or(global),
    })
}
