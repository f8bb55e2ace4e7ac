//! Pixel geometry of tab strips and edge bands
//!
//! Pure functions shared by the layout pass, which writes the results onto
//! nodes, and the drop-target resolver, which hit-tests against them.

use crate::model::{DockLocation, Orientation, Rect, TabLocation};

/// Split a tabset's rect into (tab strip, content)
pub fn split_tabset_rect(rect: Rect, location: TabLocation, strip_height: f64) -> (Rect, Rect) {
    let strip_height = strip_height.min(rect.height).max(0.0);
    match location {
        TabLocation::Top => (
            rect.edge_slice(DockLocation::Top, strip_height),
            rect.remove_inset(DockLocation::Top, strip_height),
        ),
        TabLocation::Bottom => (
            rect.edge_slice(DockLocation::Bottom, strip_height),
            rect.remove_inset(DockLocation::Bottom, strip_height),
        ),
    }
}

/// Lay out `count` tab buttons along a strip.
///
/// Buttons get `preferred` pixels each and are compressed evenly once the
/// strip is too short to hold them all.
pub fn tab_button_rects(
    strip: Rect,
    count: usize,
    preferred: f64,
    orientation: Orientation,
) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let length = strip.size(orientation);
    let each = if preferred * count as f64 > length {
        length / count as f64
    } else {
        preferred
    };
    (0..count)
        .map(|i| {
            let offset = each * i as f64;
            match orientation {
                Orientation::Horizontal => Rect::new(strip.x + offset, strip.y, each, strip.height),
                Orientation::Vertical => Rect::new(strip.x, strip.y + offset, strip.width, each),
            }
        })
        .collect()
}

/// The insertion slot a point along a tab strip falls into, with the narrow
/// indicator rect drawn at that slot.
///
/// Slot `i` spans from the midpoint of button `i - 1` to the midpoint of
/// button `i`; the last slot runs to the end of the strip.
pub fn tab_insert_slot(
    strip: Rect,
    buttons: &[Rect],
    px: f64,
    py: f64,
    orientation: Orientation,
    indicator_width: f64,
) -> Option<(usize, Rect)> {
    if !strip.contains(px, py) {
        return None;
    }
    let along = match orientation {
        Orientation::Horizontal => px,
        Orientation::Vertical => py,
    };
    let mid = |r: &Rect| match orientation {
        Orientation::Horizontal => r.center_x(),
        Orientation::Vertical => r.center_y(),
    };
    let index = buttons
        .iter()
        .position(|b| along < mid(b))
        .unwrap_or(buttons.len());

    let edge = match (buttons.get(index), buttons.last()) {
        (Some(b), _) => b.start(orientation),
        (None, Some(last)) => last.start(orientation) + last.size(orientation),
        (None, None) => strip.start(orientation),
    };
    let half = indicator_width / 2.0;
    let indicator = match orientation {
        Orientation::Horizontal => Rect::new(edge - half, strip.y, indicator_width, strip.height),
        Orientation::Vertical => Rect::new(strip.x, edge - half, strip.width, indicator_width),
    };
    Some((index, indicator))
}

/// Thickness of the edge bands of a region: a fraction of the dimension,
/// capped at `max_px`
pub fn edge_band(rect: Rect, orientation: Orientation, fraction: f64, max_px: f64) -> f64 {
    (rect.size(orientation) * fraction).min(max_px).max(0.0)
}

/// Which zone of `rect` a point falls in: one of the four edge bands, or the
/// center. Returns `None` outside the rect.
///
/// Where two bands overlap at a corner, the band the point is deeper into
/// (relative to its thickness) wins.
pub fn dock_zone(rect: Rect, px: f64, py: f64, fraction: f64, max_px: f64) -> Option<DockLocation> {
    if !rect.contains(px, py) {
        return None;
    }
    let band_x = edge_band(rect, Orientation::Horizontal, fraction, max_px);
    let band_y = edge_band(rect, Orientation::Vertical, fraction, max_px);

    let candidates = [
        (DockLocation::Top, py - rect.y, band_y),
        (DockLocation::Bottom, rect.bottom() - py, band_y),
        (DockLocation::Left, px - rect.x, band_x),
        (DockLocation::Right, rect.right() - px, band_x),
    ];
    candidates
        .iter()
        .filter(|(_, distance, band)| *band > 0.0 && distance < band)
        .min_by(|a, b| (a.1 / a.2).total_cmp(&(b.1 / b.2)))
        .map(|(location, _, _)| *location)
        .or(Some(DockLocation::Center))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tabset_rect_top_and_bottom() {
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        let (strip, content) = split_tabset_rect(rect, TabLocation::Top, 30.0);
        assert_eq!(strip, Rect::new(0.0, 0.0, 200.0, 30.0));
        assert_eq!(content, Rect::new(0.0, 30.0, 200.0, 70.0));

        let (strip, content) = split_tabset_rect(rect, TabLocation::Bottom, 30.0);
        assert_eq!(strip, Rect::new(0.0, 70.0, 200.0, 30.0));
        assert_eq!(content, Rect::new(0.0, 0.0, 200.0, 70.0));
    }

    #[test]
    fn test_tab_buttons_compress_when_strip_is_short() {
        let strip = Rect::new(0.0, 0.0, 300.0, 30.0);
        let buttons = tab_button_rects(strip, 2, 120.0, Orientation::Horizontal);
        assert_eq!(buttons[1], Rect::new(120.0, 0.0, 120.0, 30.0));

        let buttons = tab_button_rects(strip, 5, 120.0, Orientation::Horizontal);
        assert_eq!(buttons[4], Rect::new(240.0, 0.0, 60.0, 30.0));
    }

    #[test]
    fn test_insert_slot_between_midpoints() {
        let strip = Rect::new(0.0, 0.0, 400.0, 30.0);
        let buttons = tab_button_rects(strip, 2, 100.0, Orientation::Horizontal);

        let (index, rect) =
            tab_insert_slot(strip, &buttons, 40.0, 10.0, Orientation::Horizontal, 4.0).unwrap();
        assert_eq!(index, 0);
        assert_eq!(rect, Rect::new(-2.0, 0.0, 4.0, 30.0));

        let (index, rect) =
            tab_insert_slot(strip, &buttons, 120.0, 10.0, Orientation::Horizontal, 4.0).unwrap();
        assert_eq!(index, 1);
        assert_eq!(rect.x, 98.0);

        let (index, rect) =
            tab_insert_slot(strip, &buttons, 350.0, 10.0, Orientation::Horizontal, 4.0).unwrap();
        assert_eq!(index, 2);
        assert_eq!(rect.x, 198.0);
    }

    #[test]
    fn test_dock_zone_bands_are_capped() {
        let rect = Rect::new(0.0, 0.0, 1000.0, 1000.0);
        assert_eq!(dock_zone(rect, 50.0, 500.0, 0.25, 100.0), Some(DockLocation::Left));
        assert_eq!(dock_zone(rect, 150.0, 500.0, 0.25, 100.0), Some(DockLocation::Center));
        assert_eq!(dock_zone(rect, 500.0, 990.0, 0.25, 100.0), Some(DockLocation::Bottom));
        assert_eq!(dock_zone(rect, 1500.0, 500.0, 0.25, 100.0), None);
    }

    #[test]
    fn test_dock_zone_corner_prefers_deeper_band() {
        let rect = Rect::new(0.0, 0.0, 400.0, 400.0);
        // 10px from the left, 60px from the top, bands are 100px
        assert_eq!(dock_zone(rect, 10.0, 60.0, 0.25, 100.0), Some(DockLocation::Left));
    }
}
