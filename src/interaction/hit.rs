//! Screen point to grid target resolution.

use serde::Serialize;

use crate::layout::{Axis, GridGeometry, Viewport};
use crate::types::{CellPoint, CellPosition};

/// What a pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HitTarget {
    Cell(CellPoint),
    ColumnHeader { col: u32 },
    RowHeader { row: u32 },
    CornerHeader,
    None,
}

impl HitTarget {
    /// Signed position: header hits carry -1 on the axis they do not span.
    pub fn position(&self) -> Option<CellPosition> {
        match *self {
            Self::Cell(cell) => Some(cell.to_position()),
            Self::ColumnHeader { col } => Some(CellPosition::new(to_signed(col), -1)),
            Self::RowHeader { row } => Some(CellPosition::new(-1, to_signed(row))),
            Self::CornerHeader => Some(CellPosition::new(-1, -1)),
            Self::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

fn to_signed(index: u32) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

/// Content x under screen `x`, undoing the scroll for non-frozen columns.
/// `None` left of the body.
pub fn content_x(geometry: &GridGeometry, viewport: &Viewport, x: f64) -> Option<f64> {
    let relative = x - geometry.row_marker_width;
    if relative < 0.0 || x >= geometry.width {
        return None;
    }
    if relative < geometry.frozen_width() {
        Some(relative)
    } else {
        Some(relative + viewport.scroll_left)
    }
}

/// Content y under screen `y`. `None` above the body.
pub fn content_y(geometry: &GridGeometry, viewport: &Viewport, y: f64) -> Option<f64> {
    let relative = y - geometry.header_height;
    if relative < 0.0 || y >= geometry.height {
        return None;
    }
    Some(relative + viewport.scroll_top)
}

fn column_at(geometry: &GridGeometry, viewport: &Viewport, x: f64) -> Option<u32> {
    geometry.index_at_offset(Axis::X, content_x(geometry, viewport, x)?)
}

fn row_at(geometry: &GridGeometry, viewport: &Viewport, y: f64) -> Option<u32> {
    geometry.index_at_offset(Axis::Y, content_y(geometry, viewport, y)?)
}

/// Resolve a screen point (CSS pixels relative to the surface) to a target.
pub fn hit_test(geometry: &GridGeometry, viewport: &Viewport, x: f64, y: f64) -> HitTarget {
    if x < 0.0 || y < 0.0 || x >= geometry.width || y >= geometry.height {
        return HitTarget::None;
    }
    let in_header = y < geometry.header_height;
    let in_markers = x < geometry.row_marker_width;

    match (in_header, in_markers) {
        (true, true) => HitTarget::CornerHeader,
        (true, false) => column_at(geometry, viewport, x)
            .map_or(HitTarget::None, |col| HitTarget::ColumnHeader { col }),
        (false, true) => row_at(geometry, viewport, y)
            .map_or(HitTarget::None, |row| HitTarget::RowHeader { row }),
        (false, false) => match (column_at(geometry, viewport, x), row_at(geometry, viewport, y)) {
            (Some(col), Some(row)) => HitTarget::Cell(CellPoint::new(col, row)),
            _ => HitTarget::None,
        },
    }
}

/// Cell nearest to a screen point, clamping points outside the body to its
/// edge. Used while dragging so a selection keeps following the pointer.
pub fn cell_at_clamped(
    geometry: &GridGeometry,
    viewport: &Viewport,
    x: f64,
    y: f64,
) -> Option<CellPoint> {
    let left = geometry.row_marker_width;
    let top = geometry.header_height;
    let x = x.clamp(left, (geometry.width - 1.0).max(left));
    let y = y.clamp(top, (geometry.height - 1.0).max(top));

    let cx = content_x(geometry, viewport, x).unwrap_or(0.0);
    let cy = content_y(geometry, viewport, y).unwrap_or(0.0);
    let col = geometry.axis(Axis::X).index_at_offset_clamped(cx)?;
    let row = geometry.axis(Axis::Y).index_at_offset_clamped(cy)?;
    Some(CellPoint::new(col, row))
}
