//! Viewport state management for scrolling.

use serde::{Deserialize, Serialize};

use super::{Axis, GridGeometry};
use crate::types::CellPosition;

/// Where an item should land when scrolled into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollAlign {
    Start,
    Center,
    End,
    /// Scroll the minimum distance needed; no-op if already visible.
    #[default]
    Auto,
}

/// Viewport state - the scrolled window over the grid body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Horizontal scroll position in content coordinates (0 = first
    /// scrollable column flush against the frozen block)
    pub scroll_left: f64,
    /// Vertical scroll position in content coordinates
    pub scroll_top: f64,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_scroll_left(geometry: &GridGeometry) -> f64 {
        (geometry.total_size(Axis::X) - geometry.body_width()).max(0.0)
    }

    pub fn max_scroll_top(geometry: &GridGeometry) -> f64 {
        (geometry.total_size(Axis::Y) - geometry.body_height()).max(0.0)
    }

    /// Clamp scroll position to the valid range.
    pub fn clamp_scroll(&mut self, geometry: &GridGeometry) {
        self.scroll_left = self
            .scroll_left
            .clamp(0.0, Self::max_scroll_left(geometry));
        self.scroll_top = self.scroll_top.clamp(0.0, Self::max_scroll_top(geometry));
    }

    /// Scroll by delta amounts. Returns true if the position changed.
    pub fn scroll_by(&mut self, dx: f64, dy: f64, geometry: &GridGeometry) -> bool {
        let before = *self;
        self.scroll_left += dx;
        self.scroll_top += dy;
        self.clamp_scroll(geometry);
        *self != before
    }

    /// Set absolute scroll position. Returns true if the position changed.
    pub fn scroll_to(&mut self, x: f64, y: f64, geometry: &GridGeometry) -> bool {
        let before = *self;
        self.scroll_left = x;
        self.scroll_top = y;
        self.clamp_scroll(geometry);
        *self != before
    }

    /// Scroll so that `pos` is visible with the requested alignment. Header
    /// positions (negative index) and frozen columns leave that axis alone.
    pub fn scroll_to_item(
        &mut self,
        pos: CellPosition,
        align: ScrollAlign,
        geometry: &GridGeometry,
    ) -> bool {
        let before = *self;
        if let Ok(col) = u32::try_from(pos.col) {
            if col >= geometry.frozen_columns && col < geometry.column_count() {
                let frozen_width = geometry.frozen_width();
                let start = geometry.offset_of(Axis::X, col) - frozen_width;
                let size = geometry.size_of(Axis::X, col);
                let view = (geometry.body_width() - frozen_width).max(0.0);
                self.scroll_left = aligned_offset(self.scroll_left, start, size, view, align);
            }
        }
        if let Ok(row) = u32::try_from(pos.row) {
            if row < geometry.row_count() {
                let start = geometry.offset_of(Axis::Y, row);
                let size = geometry.size_of(Axis::Y, row);
                let view = geometry.body_height();
                self.scroll_top = aligned_offset(self.scroll_top, start, size, view, align);
            }
        }
        self.clamp_scroll(geometry);
        *self != before
    }
}

fn aligned_offset(current: f64, start: f64, size: f64, view: f64, align: ScrollAlign) -> f64 {
    let end = start + size;
    match align {
        ScrollAlign::Start => start,
        ScrollAlign::End => end - view,
        ScrollAlign::Center => start + size / 2.0 - view / 2.0,
        ScrollAlign::Auto => {
            if start >= current && end <= current + view {
                current
            } else if start < current {
                start
            } else {
                end - view
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::config::GridConfig;

    fn geometry() -> GridGeometry {
        let mut config = GridConfig::new(20, 1000);
        config.header_height = 40.0;
        config.frozen_columns = 1;
        let mut g = GridGeometry::new(&config);
        g.resize(600.0, 440.0);
        g
    }

    #[test]
    fn test_clamp() {
        let g = geometry();
        let mut v = Viewport::new();
        assert!(!v.scroll_by(-50.0, -50.0, &g));
        v.scroll_to(1e9, 1e9, &g);
        assert_eq!(v.scroll_left, 20.0 * 120.0 - 600.0);
        assert_eq!(v.scroll_top, 1000.0 * 40.0 - 400.0);
    }

    #[test]
    fn test_scroll_to_item_auto() {
        let g = geometry();
        let mut v = Viewport::new();
        assert!(v.scroll_to_item(CellPosition::new(0, 50), ScrollAlign::Auto, &g));
        // Row 50 ends at 2040; view is 400 high.
        assert_eq!(v.scroll_top, 2040.0 - 400.0);
        assert_eq!(v.scroll_left, 0.0);
        // Already visible: no change.
        assert!(!v.scroll_to_item(CellPosition::new(0, 45), ScrollAlign::Auto, &g));
    }

    #[test]
    fn test_scroll_to_item_start_accounts_for_frozen() {
        let g = geometry();
        let mut v = Viewport::new();
        v.scroll_to_item(CellPosition::new(5, -1), ScrollAlign::Start, &g);
        // Column 5 starts at 600 in content space, 480 past the frozen block.
        assert_eq!(v.scroll_left, 480.0);
        assert_eq!(v.scroll_top, 0.0);
    }
}
