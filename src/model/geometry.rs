//! Geometry primitives shared by the layout engine and hit-testing
//!
//! All coordinates are logical pixels relative to the owning window.

use serde::{Deserialize, Serialize};

// ============================================================================
// Rect
// ============================================================================

/// Rectangle for layout calculations
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive on the right/bottom edge so adjacent rects never both contain a point
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Size along an orientation's main axis
    pub fn size(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }

    /// Start coordinate along an orientation's main axis
    pub fn start(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }

    /// Shrink the rect by `amount` from one edge. Never produces negative sizes.
    pub fn remove_inset(&self, location: DockLocation, amount: f64) -> Rect {
        let mut r = *self;
        match location {
            DockLocation::Top => {
                let amount = amount.min(r.height).max(0.0);
                r.y += amount;
                r.height -= amount;
            }
            DockLocation::Bottom => {
                r.height = (r.height - amount).max(0.0);
            }
            DockLocation::Left => {
                let amount = amount.min(r.width).max(0.0);
                r.x += amount;
                r.width -= amount;
            }
            DockLocation::Right => {
                r.width = (r.width - amount).max(0.0);
            }
            DockLocation::Center => {}
        }
        r
    }

    /// Slice of `amount` pixels hugging one edge of this rect
    pub fn edge_slice(&self, location: DockLocation, amount: f64) -> Rect {
        match location {
            DockLocation::Top => Rect::new(self.x, self.y, self.width, amount.min(self.height)),
            DockLocation::Bottom => {
                let h = amount.min(self.height);
                Rect::new(self.x, self.bottom() - h, self.width, h)
            }
            DockLocation::Left => Rect::new(self.x, self.y, amount.min(self.width), self.height),
            DockLocation::Right => {
                let w = amount.min(self.width);
                Rect::new(self.right() - w, self.y, w, self.height)
            }
            DockLocation::Center => *self,
        }
    }

    /// Outline shown when dropping into `location` of this rect (half for edges)
    pub fn dock_rect(&self, location: DockLocation) -> Rect {
        match location {
            DockLocation::Top => Rect::new(self.x, self.y, self.width, self.height / 2.0),
            DockLocation::Bottom => Rect::new(
                self.x,
                self.y + self.height / 2.0,
                self.width,
                self.height / 2.0,
            ),
            DockLocation::Left => Rect::new(self.x, self.y, self.width / 2.0, self.height),
            DockLocation::Right => Rect::new(
                self.x + self.width / 2.0,
                self.y,
                self.width / 2.0,
                self.height,
            ),
            DockLocation::Center => *self,
        }
    }
}

// ============================================================================
// Orientation
// ============================================================================

/// Direction a Row lays out its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Children arranged left-to-right
    #[default]
    Horizontal,
    /// Children arranged top-to-bottom
    Vertical,
}

impl Orientation {
    pub fn flip(self) -> Orientation {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

// ============================================================================
// DockLocation
// ============================================================================

/// Where a dragged node lands relative to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockLocation {
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

impl DockLocation {
    /// The four screen edges, in border nesting tie-break order
    pub const EDGES: [DockLocation; 4] = [
        DockLocation::Top,
        DockLocation::Bottom,
        DockLocation::Left,
        DockLocation::Right,
    ];

    /// Orientation of the split a drop at this location creates
    pub fn orientation(self) -> Option<Orientation> {
        match self {
            DockLocation::Left | DockLocation::Right => Some(Orientation::Horizontal),
            DockLocation::Top | DockLocation::Bottom => Some(Orientation::Vertical),
            DockLocation::Center => None,
        }
    }

    /// 0 to insert before the target, 1 to insert after it
    pub fn index_offset(self) -> usize {
        match self {
            DockLocation::Top | DockLocation::Left | DockLocation::Center => 0,
            DockLocation::Bottom | DockLocation::Right => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DockLocation::Top => "top",
            DockLocation::Bottom => "bottom",
            DockLocation::Left => "left",
            DockLocation::Right => "right",
            DockLocation::Center => "center",
        }
    }

    pub fn from_name(name: &str) -> Option<DockLocation> {
        match name {
            "top" => Some(DockLocation::Top),
            "bottom" => Some(DockLocation::Bottom),
            "left" => Some(DockLocation::Left),
            "right" => Some(DockLocation::Right),
            "center" => Some(DockLocation::Center),
            _ => None,
        }
    }
}

impl std::fmt::Display for DockLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Clamp `value` into `[min, max]`. When `min > max`, `min` wins.
#[inline]
pub fn clamp_size(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_exclusive_on_far_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(rect.contains(10.0, 20.0));
        assert!(rect.contains(109.9, 69.9));
        assert!(!rect.contains(110.0, 40.0));
        assert!(!rect.contains(50.0, 70.0));
        assert!(!rect.contains(9.9, 40.0));
    }

    #[test]
    fn test_remove_inset_never_goes_negative() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let r = rect.remove_inset(DockLocation::Top, 80.0);
        assert_eq!(r.y, 50.0);
        assert_eq!(r.height, 0.0);

        let r = rect.remove_inset(DockLocation::Right, 30.0);
        assert_eq!(r.width, 70.0);
        assert_eq!(r.x, 0.0);
    }

    #[test]
    fn test_dock_rect_halves() {
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(rect.dock_rect(DockLocation::Right), Rect::new(100.0, 0.0, 100.0, 100.0));
        assert_eq!(rect.dock_rect(DockLocation::Bottom), Rect::new(0.0, 50.0, 200.0, 50.0));
        assert_eq!(rect.dock_rect(DockLocation::Center), rect);
    }

    #[test]
    fn test_clamp_size_is_idempotent_and_monotonic() {
        let (min, max) = (10.0, 90.0);
        let samples = [-50.0, 0.0, 10.0, 42.5, 90.0, 120.0, 1e9];
        let mut previous = f64::NEG_INFINITY;
        for x in samples {
            let once = clamp_size(x, min, max);
            assert_eq!(clamp_size(once, min, max), once);
            assert!(once >= previous);
            previous = once;
        }
    }

    #[test]
    fn test_clamp_size_min_wins_when_inverted() {
        assert_eq!(clamp_size(5.0, 20.0, 10.0), 20.0);
    }
}
