//! Geometry and coordinate resolution.
//!
//! Offsets are computed lazily: each axis walks forward from its highest
//! cached index, summing per-index sizes (default size unless a sparse
//! override exists) and memoizing every offset it passes. Sequential access
//! during a redraw is therefore amortized O(1); a first random access far
//! down the grid costs O(n) once. Any size-affecting change throws the whole
//! axis cache away.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::config::GridConfig;
use crate::types::{CellPoint, CellPosition, Rect};

/// Grid axis. `X` runs across columns, `Y` down rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Smallest size an index can take, so every index keeps a hittable pixel.
pub const MIN_SIZE: f64 = 1.0;

/// Sizes and lazily computed offsets along one axis.
#[derive(Debug, Clone)]
pub struct AxisGeometry {
    count: u32,
    default_size: f64,
    overrides: BTreeMap<u32, f64>,
    /// `offsets[i]` is the start of index `i`; entries past the high-water
    /// mark are not computed yet.
    offsets: RefCell<Vec<f64>>,
}

impl AxisGeometry {
    pub fn new(count: u32, default_size: f64, overrides: BTreeMap<u32, f64>) -> Self {
        Self {
            count,
            default_size: default_size.max(MIN_SIZE),
            overrides: overrides
                .into_iter()
                .map(|(index, size)| (index, size.max(MIN_SIZE)))
                .collect(),
            offsets: RefCell::new(vec![0.0]),
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn default_size(&self) -> f64 {
        self.default_size
    }

    /// Highest index whose offset is currently cached.
    pub fn cached_until(&self) -> u32 {
        let len = self.offsets.borrow().len();
        u32::try_from(len.saturating_sub(1)).unwrap_or(u32::MAX)
    }

    pub fn size_of(&self, index: u32) -> f64 {
        self.overrides
            .get(&index)
            .copied()
            .unwrap_or(self.default_size)
    }

    /// Start offset of `index`. `index == count` yields the total size;
    /// larger indices are clamped to it.
    pub fn offset_of(&self, index: u32) -> f64 {
        let index = index.min(self.count) as usize;
        let mut offsets = self.offsets.borrow_mut();
        let mut last = offsets.last().copied().unwrap_or(0.0);
        while offsets.len() <= index {
            let i = u32::try_from(offsets.len() - 1).unwrap_or(u32::MAX);
            last += self.size_of(i);
            offsets.push(last);
        }
        offsets.get(index).copied().unwrap_or(last)
    }

    pub fn total_size(&self) -> f64 {
        self.offset_of(self.count)
    }

    /// Index containing pixel offset `px`, or `None` when `px` is before the
    /// first or past the last index.
    pub fn index_at_offset(&self, px: f64) -> Option<u32> {
        if self.count == 0 || px < 0.0 || px.is_nan() {
            return None;
        }
        let mut offsets = self.offsets.borrow_mut();
        let mut last = offsets.last().copied().unwrap_or(0.0);
        while last <= px && offsets.len() <= self.count as usize {
            let i = u32::try_from(offsets.len() - 1).unwrap_or(u32::MAX);
            last += self.size_of(i);
            offsets.push(last);
        }
        if last <= px {
            return None;
        }
        // First start offset strictly greater than px, minus one.
        let upper = offsets.partition_point(|&start| start <= px);
        let index = upper.saturating_sub(1);
        u32::try_from(index).ok().map(|i| i.min(self.count - 1))
    }

    /// Like [`Self::index_at_offset`] but clamps out-of-range offsets to the
    /// first/last index. `None` only for an empty axis.
    pub fn index_at_offset_clamped(&self, px: f64) -> Option<u32> {
        if self.count == 0 {
            return None;
        }
        if px <= 0.0 || px.is_nan() {
            return Some(0);
        }
        Some(self.index_at_offset(px).unwrap_or(self.count - 1))
    }

    /// Inclusive `[start, stop]` of indices intersecting
    /// `[scroll_offset, scroll_offset + viewport_size)`, widened by
    /// `overscan` on both ends and clamped to the axis.
    pub fn visible_window(
        &self,
        scroll_offset: f64,
        viewport_size: f64,
        overscan: u32,
    ) -> Option<(u32, u32)> {
        let start = self.index_at_offset_clamped(scroll_offset)?;
        let stop = self.index_at_offset_clamped(scroll_offset + viewport_size.max(0.0))?;
        Some((
            start.saturating_sub(overscan),
            stop.saturating_add(overscan).min(self.count - 1),
        ))
    }

    pub fn set_count(&mut self, count: u32) {
        if count != self.count {
            self.count = count;
            self.invalidate();
        }
    }

    pub fn set_default_size(&mut self, size: f64) {
        self.default_size = size.max(MIN_SIZE);
        self.invalidate();
    }

    /// Override the size of one index. Sizes below [`MIN_SIZE`] are raised
    /// to it.
    pub fn set_size(&mut self, index: u32, size: f64) {
        self.overrides.insert(index, size.max(MIN_SIZE));
        self.invalidate();
    }

    pub fn clear_size(&mut self, index: u32) {
        if self.overrides.remove(&index).is_some() {
            self.invalidate();
        }
    }

    /// Drop every cached offset.
    pub fn invalidate(&self) {
        let mut offsets = self.offsets.borrow_mut();
        offsets.clear();
        offsets.push(0.0);
    }
}

/// Coordinate resolver for the whole grid.
///
/// Content coordinates start at the top-left of cell (0, 0); screen
/// coordinates add the header row, the row-marker column and the scroll
/// translation (frozen columns are not scrolled horizontally).
#[derive(Debug, Clone)]
pub struct GridGeometry {
    columns: AxisGeometry,
    rows: AxisGeometry,
    pub frozen_columns: u32,
    pub header_height: f64,
    pub row_marker_width: f64,
    /// Container size in CSS pixels
    pub width: f64,
    pub height: f64,
    pub overscan: u32,
}

impl GridGeometry {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            columns: AxisGeometry::new(
                config.columns,
                config.default_column_width,
                config.column_widths.clone(),
            ),
            rows: AxisGeometry::new(
                config.rows,
                config.default_row_height,
                config.row_heights.clone(),
            ),
            frozen_columns: config.frozen_columns.min(config.columns),
            header_height: config.header_height,
            row_marker_width: config.row_marker_width,
            width: 0.0,
            height: 0.0,
            overscan: config.overscan,
        }
    }

    pub fn axis(&self, axis: Axis) -> &AxisGeometry {
        match axis {
            Axis::X => &self.columns,
            Axis::Y => &self.rows,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisGeometry {
        match axis {
            Axis::X => &mut self.columns,
            Axis::Y => &mut self.rows,
        }
    }

    pub fn column_count(&self) -> u32 {
        self.columns.count()
    }

    pub fn row_count(&self) -> u32 {
        self.rows.count()
    }

    pub fn offset_of(&self, axis: Axis, index: u32) -> f64 {
        self.axis(axis).offset_of(index)
    }

    pub fn size_of(&self, axis: Axis, index: u32) -> f64 {
        self.axis(axis).size_of(index)
    }

    pub fn index_at_offset(&self, axis: Axis, px: f64) -> Option<u32> {
        self.axis(axis).index_at_offset(px)
    }

    pub fn total_size(&self, axis: Axis) -> f64 {
        self.axis(axis).total_size()
    }

    pub fn visible_window(
        &self,
        axis: Axis,
        scroll_offset: f64,
        viewport_size: f64,
    ) -> Option<(u32, u32)> {
        self.axis(axis)
            .visible_window(scroll_offset, viewport_size, self.overscan)
    }

    /// Cell under a point in content coordinates. Every size is at least
    /// [`MIN_SIZE`], so `cell_at(offset_of(X, c) + 0.5, offset_of(Y, r) + 0.5)`
    /// is `(c, r)` for every cell in bounds.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<CellPoint> {
        let col = self.columns.index_at_offset(x)?;
        let row = self.rows.index_at_offset(y)?;
        Some(CellPoint::new(col, row))
    }

    /// Width of the frozen column block.
    pub fn frozen_width(&self) -> f64 {
        self.columns.offset_of(self.frozen_columns)
    }

    /// Width available to body cells (container minus row markers).
    pub fn body_width(&self) -> f64 {
        (self.width - self.row_marker_width).max(0.0)
    }

    /// Height available to body cells (container minus header row).
    pub fn body_height(&self) -> f64 {
        (self.height - self.header_height).max(0.0)
    }

    /// Screen x of a content offset. Offsets inside the frozen block are
    /// not translated by the horizontal scroll.
    pub fn screen_x(&self, offset: f64, scroll_left: f64) -> f64 {
        let relative = if offset < self.frozen_width() {
            offset
        } else {
            offset - scroll_left
        };
        self.row_marker_width + relative
    }

    pub fn screen_y(&self, offset: f64, scroll_top: f64) -> f64 {
        self.header_height + offset - scroll_top
    }

    /// Screen rectangle of a body cell.
    pub fn cell_bounds(&self, cell: CellPoint, scroll_left: f64, scroll_top: f64) -> Rect {
        let x = self.columns.offset_of(cell.col);
        let y = self.rows.offset_of(cell.row);
        Rect::new(
            self.screen_x(x, scroll_left),
            self.screen_y(y, scroll_top),
            self.columns.size_of(cell.col),
            self.rows.size_of(cell.row),
        )
    }

    /// Screen rectangle of any position, including header hits.
    pub fn position_bounds(
        &self,
        pos: CellPosition,
        scroll_left: f64,
        scroll_top: f64,
    ) -> Option<Rect> {
        let (x, w) = match u32::try_from(pos.col) {
            Ok(col) if col < self.column_count() => (
                self.screen_x(self.columns.offset_of(col), scroll_left),
                self.columns.size_of(col),
            ),
            Ok(_) => return None,
            Err(_) => (0.0, self.row_marker_width),
        };
        let (y, h) = match u32::try_from(pos.row) {
            Ok(row) if row < self.row_count() => (
                self.screen_y(self.rows.offset_of(row), scroll_top),
                self.rows.size_of(row),
            ),
            Ok(_) => return None,
            Err(_) => (0.0, self.header_height),
        };
        Some(Rect::new(x, y, w, h))
    }

    /// Visible scrollable columns (frozen columns excluded), as an inclusive
    /// range with overscan.
    pub fn visible_scroll_columns(&self, scroll_left: f64) -> Option<(u32, u32)> {
        let frozen_width = self.frozen_width();
        let (start, stop) = self.visible_window(
            Axis::X,
            scroll_left + frozen_width,
            self.body_width() - frozen_width,
        )?;
        let start = start.max(self.frozen_columns);
        (start <= stop).then_some((start, stop))
    }

    pub fn visible_rows(&self, scroll_top: f64) -> Option<(u32, u32)> {
        self.visible_window(Axis::Y, scroll_top, self.body_height())
    }

    pub fn set_counts(&mut self, columns: u32, rows: u32) {
        self.columns.set_count(columns);
        self.rows.set_count(rows);
        self.frozen_columns = self.frozen_columns.min(columns);
    }

    pub fn set_size(&mut self, axis: Axis, index: u32, size: f64) {
        log::trace!("resize {axis:?}[{index}] -> {size}");
        self.axis_mut(axis).set_size(index, size);
    }

    pub fn clear_size(&mut self, axis: Axis, index: u32) {
        self.axis_mut(axis).clear_size(index);
    }

    pub fn set_default_size(&mut self, axis: Axis, size: f64) {
        self.axis_mut(axis).set_default_size(size);
    }

    pub fn set_frozen_columns(&mut self, frozen: u32) {
        self.frozen_columns = frozen.min(self.column_count());
    }

    /// Resize the container. Invalidates both offset caches.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.invalidate();
    }

    pub fn invalidate(&self) {
        log::debug!("geometry cache invalidated");
        self.columns.invalidate();
        self.rows.invalidate();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn geometry(cols: u32, rows: u32) -> GridGeometry {
        let mut config = GridConfig::new(cols, rows);
        config.header_height = 0.0;
        let mut g = GridGeometry::new(&config);
        g.resize(800.0, 600.0);
        g
    }

    #[test]
    fn test_offsets_use_overrides() {
        let mut g = geometry(10, 10);
        g.set_size(Axis::X, 1, 50.0);
        assert_eq!(g.offset_of(Axis::X, 0), 0.0);
        assert_eq!(g.offset_of(Axis::X, 1), 120.0);
        assert_eq!(g.offset_of(Axis::X, 2), 170.0);
        assert_eq!(g.total_size(Axis::X), 120.0 * 9.0 + 50.0);
    }

    #[test]
    fn test_cache_grows_to_high_water_mark() {
        let g = geometry(100, 100);
        assert_eq!(g.axis(Axis::Y).cached_until(), 0);
        g.offset_of(Axis::Y, 30);
        assert_eq!(g.axis(Axis::Y).cached_until(), 30);
        g.offset_of(Axis::Y, 10);
        assert_eq!(g.axis(Axis::Y).cached_until(), 30);
    }

    #[test]
    fn test_resize_invalidates_whole_axis() {
        let mut g = geometry(10, 10);
        assert_eq!(g.offset_of(Axis::X, 5), 600.0);
        g.set_size(Axis::X, 0, 40.0);
        assert_eq!(g.axis(Axis::X).cached_until(), 0);
        assert_eq!(g.offset_of(Axis::X, 5), 520.0);
    }

    #[test]
    fn test_index_at_offset_bounds() {
        let g = geometry(3, 3);
        assert_eq!(g.index_at_offset(Axis::X, -1.0), None);
        assert_eq!(g.index_at_offset(Axis::X, 0.0), Some(0));
        assert_eq!(g.index_at_offset(Axis::X, 119.9), Some(0));
        assert_eq!(g.index_at_offset(Axis::X, 120.0), Some(1));
        assert_eq!(g.index_at_offset(Axis::X, 360.0), None);
    }

    #[test]
    fn test_zero_size_override_keeps_one_pixel() {
        let mut g = geometry(3, 3);
        g.set_size(Axis::X, 1, 0.0);
        assert_eq!(g.size_of(Axis::X, 1), MIN_SIZE);
        assert_eq!(g.index_at_offset(Axis::X, 120.0), Some(1));
        assert_eq!(g.index_at_offset(Axis::X, 121.0), Some(2));
    }

    #[test]
    fn test_visible_window_with_overscan() {
        let g = geometry(4, 100_000);
        let (start, stop) = g.axis(Axis::Y).visible_window(0.0, 600.0, 5).unwrap();
        assert_eq!(start, 0);
        assert_eq!(stop, 20);

        let (start, stop) = g
            .axis(Axis::Y)
            .visible_window(40.0 * 99_990.0, 600.0, 5)
            .unwrap();
        assert_eq!(start, 99_985);
        assert_eq!(stop, 99_999);
    }

    #[test]
    fn test_empty_axis_has_no_window() {
        let g = geometry(0, 0);
        assert_eq!(g.visible_window(Axis::X, 0.0, 100.0), None);
        assert_eq!(g.cell_at(1.0, 1.0), None);
    }

    #[test]
    fn test_frozen_columns_not_scrolled() {
        let mut config = GridConfig::new(10, 10);
        config.frozen_columns = 2;
        config.row_marker_width = 30.0;
        let g = GridGeometry::new(&config);
        assert_eq!(g.frozen_width(), 240.0);
        assert_eq!(g.screen_x(120.0, 500.0), 150.0);
        assert_eq!(g.screen_x(600.0, 100.0), 530.0);
    }
}
