//! Model-wide attributes
//!
//! Node attributes left unset in a layout document inherit their value from
//! here, so changing a global attribute restyles every node that did not
//! override it.

use serde::{Deserialize, Serialize};

/// Where a tabset draws its tab strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabLocation {
    #[default]
    Top,
    Bottom,
}

/// Upper bound used for "unbounded" max sizes
pub const UNBOUNDED_SIZE: f64 = 100_000.0;

/// Global attributes of a layout model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalAttributes {
    /// Thickness of the splitter between row children
    pub splitter_size: f64,
    /// Allow tabs to be dropped near window edges to create borders
    pub enable_edge_dock: bool,
    /// Orientation of the main window's root row
    pub root_orientation_vertical: bool,

    pub tab_enable_close: bool,
    pub tab_enable_drag: bool,
    pub tab_enable_rename: bool,
    pub tab_enable_float: bool,
    pub tab_min_width: f64,
    pub tab_min_height: f64,
    pub tab_max_width: f64,
    pub tab_max_height: f64,
    /// Preferred width of a tab button in a tab strip
    pub tab_button_width: f64,

    pub tab_set_enable_close: bool,
    pub tab_set_enable_drag: bool,
    pub tab_set_enable_drop: bool,
    pub tab_set_enable_maximize: bool,
    pub tab_set_enable_delete_when_empty: bool,
    pub tab_set_tab_location: TabLocation,
    pub tab_set_tab_strip_height: f64,
    pub tab_set_min_width: f64,
    pub tab_set_min_height: f64,
    pub tab_set_max_width: f64,
    pub tab_set_max_height: f64,

    /// Default content size of a border
    pub border_size: f64,
    pub border_min_size: f64,
    pub border_max_size: f64,
    /// Thickness of a border's tab strip (its collapsed footprint)
    pub border_bar_size: f64,
    pub border_enable_drop: bool,
    pub border_enable_auto_hide: bool,
}

impl Default for GlobalAttributes {
    fn default() -> Self {
        Self {
            splitter_size: 8.0,
            enable_edge_dock: true,
            root_orientation_vertical: false,

            tab_enable_close: true,
            tab_enable_drag: true,
            tab_enable_rename: true,
            tab_enable_float: true,
            tab_min_width: 0.0,
            tab_min_height: 0.0,
            tab_max_width: UNBOUNDED_SIZE,
            tab_max_height: UNBOUNDED_SIZE,
            tab_button_width: 120.0,

            tab_set_enable_close: false,
            tab_set_enable_drag: true,
            tab_set_enable_drop: true,
            tab_set_enable_maximize: true,
            tab_set_enable_delete_when_empty: true,
            tab_set_tab_location: TabLocation::Top,
            tab_set_tab_strip_height: 30.0,
            tab_set_min_width: 0.0,
            tab_set_min_height: 0.0,
            tab_set_max_width: UNBOUNDED_SIZE,
            tab_set_max_height: UNBOUNDED_SIZE,

            border_size: 200.0,
            border_min_size: 0.0,
            border_max_size: 99_999.0,
            border_bar_size: 30.0,
            border_enable_drop: true,
            border_enable_auto_hide: false,
        }
    }
}

impl GlobalAttributes {
    /// Reject attribute sets that would make layout meaningless
    pub fn validate(&self) -> Result<(), String> {
        let non_negative = [
            ("splitterSize", self.splitter_size),
            ("tabButtonWidth", self.tab_button_width),
            ("tabSetTabStripHeight", self.tab_set_tab_strip_height),
            ("borderSize", self.border_size),
            ("borderMinSize", self.border_min_size),
            ("borderBarSize", self.border_bar_size),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, value));
            }
        }
        if self.border_min_size > self.border_max_size {
            return Err(format!(
                "borderMinSize {} exceeds borderMaxSize {}",
                self.border_min_size, self.border_max_size
            ));
        }
        if self.tab_set_min_width > self.tab_set_max_width
            || self.tab_set_min_height > self.tab_set_max_height
        {
            return Err("tabSet min size exceeds max size".to_string());
        }
        if self.tab_min_width > self.tab_max_width || self.tab_min_height > self.tab_max_height {
            return Err("tab min size exceeds max size".to_string());
        }
        Ok(())
    }
}
