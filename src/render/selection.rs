//! Selection overlay geometry and painting.
//!
//! The rectangle math is kept free of any surface so it can be tested on
//! its own. A range that straddles the frozen-column boundary is split into
//! a frozen part and a scrolled part; edge flags say which sides of each
//! part are outer edges of the selection and get a border.

use super::painters::PaintContext;
use crate::layout::{Axis, GridGeometry, Viewport};
use crate::types::{CellPoint, CellRange, LineRange, Rect, Selection};

/// Width of the border around the active cell.
pub const ACTIVE_BORDER_WIDTH: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub rect: Rect,
    /// Whether the part is in the frozen column block (not scrolled).
    pub frozen: bool,
    pub draw_top: bool,
    pub draw_bottom: bool,
    pub draw_left: bool,
    pub draw_right: bool,
}

/// Split `cols` into its frozen and scrolled parts.
fn split_columns(cols: LineRange, frozen: u32) -> [Option<(LineRange, bool)>; 2] {
    let frozen_part = (frozen > 0 && cols.start < frozen)
        .then(|| (LineRange::new(cols.start, cols.end.min(frozen - 1)), true));
    let scroll_part = (cols.end >= frozen)
        .then(|| (LineRange::new(cols.start.max(frozen), cols.end), false));
    [frozen_part, scroll_part]
}

/// Screen rectangles for a column span x row span block.
fn block_rects(
    cols: LineRange,
    rows: LineRange,
    geometry: &GridGeometry,
    viewport: &Viewport,
) -> Vec<SelectionRect> {
    let y1 = geometry.screen_y(geometry.offset_of(Axis::Y, rows.start), viewport.scroll_top);
    let y2 = geometry.screen_y(
        geometry.offset_of(Axis::Y, rows.end.saturating_add(1)),
        viewport.scroll_top,
    );
    let frozen_width = geometry.frozen_width();
    let frozen_right = geometry.row_marker_width + frozen_width;

    split_columns(cols, geometry.frozen_columns)
        .into_iter()
        .flatten()
        .filter_map(|(part, frozen)| {
            let left = geometry.offset_of(Axis::X, part.start);
            let right = geometry.offset_of(Axis::X, part.end.saturating_add(1));
            let (mut x1, x2) = if frozen {
                (
                    geometry.row_marker_width + left,
                    geometry.row_marker_width + right,
                )
            } else {
                (
                    geometry.screen_x(left.max(frozen_width), viewport.scroll_left),
                    geometry.screen_x(right.max(frozen_width), viewport.scroll_left),
                )
            };
            // Scrolled parts never paint over the frozen block.
            if !frozen {
                x1 = x1.max(frozen_right);
            }
            let w = x2 - x1;
            let h = y2 - y1;
            if w <= 0.0 || h <= 0.0 {
                return None;
            }
            Some(SelectionRect {
                rect: Rect::new(x1, y1, w, h),
                frozen,
                draw_top: true,
                draw_bottom: true,
                draw_left: part.start == cols.start,
                draw_right: part.end == cols.end,
            })
        })
        .collect()
}

/// Overlay rectangles for `selection`, clipped to the body.
pub fn selection_rects(
    selection: &Selection,
    geometry: &GridGeometry,
    viewport: &Viewport,
) -> Vec<SelectionRect> {
    let all_cols = match geometry.column_count().checked_sub(1) {
        Some(last) => LineRange::new(0, last),
        None => return Vec::new(),
    };
    let all_rows = match geometry.row_count().checked_sub(1) {
        Some(last) => LineRange::new(0, last),
        None => return Vec::new(),
    };
    let body = Rect::new(
        geometry.row_marker_width,
        geometry.header_height,
        geometry.body_width(),
        geometry.body_height(),
    );
    let rects = match selection {
        Selection::None => Vec::new(),
        Selection::Cells([a, b]) => {
            let r = CellRange::from_corners(*a, *b);
            let cols = LineRange::new(r.start_col, r.end_col.min(all_cols.end));
            let rows = LineRange::new(r.start_row, r.end_row.min(all_rows.end));
            block_rects(cols, rows, geometry, viewport)
        }
        Selection::Rows(lines) => lines
            .iter()
            .filter(|l| l.start <= all_rows.end)
            .flat_map(|l| {
                let rows = LineRange::new(l.start, l.end.min(all_rows.end));
                block_rects(all_cols, rows, geometry, viewport)
            })
            .collect(),
        Selection::Columns(lines) => lines
            .iter()
            .filter(|l| l.start <= all_cols.end)
            .flat_map(|l| {
                let cols = LineRange::new(l.start, l.end.min(all_cols.end));
                block_rects(cols, all_rows, geometry, viewport)
            })
            .collect(),
    };
    rects
        .into_iter()
        .filter_map(|mut r| {
            r.rect = r.rect.intersect(&body)?;
            Some(r)
        })
        .collect()
}

/// Translucent fill plus a 1px accent border on the outer edges.
pub fn paint_selection(cx: &mut PaintContext<'_>, rects: &[SelectionRect]) {
    let fill = cx.theme.accent_fill.clone();
    let stroke = cx.theme.accent_color.clone();
    for r in rects {
        let Rect { x, y, width, height } = r.rect;
        cx.surface.fill_rect(r.rect, &fill);
        let (right, bottom) = (x + width - 0.5, y + height - 0.5);
        let (left, top) = (x + 0.5, y + 0.5);
        if r.draw_top {
            cx.surface.line(x, top, x + width, top, &stroke, 1.0);
        }
        if r.draw_bottom {
            cx.surface.line(x, bottom, x + width, bottom, &stroke, 1.0);
        }
        if r.draw_left {
            cx.surface.line(left, y, left, y + height, &stroke, 1.0);
        }
        if r.draw_right {
            cx.surface.line(right, y, right, y + height, &stroke, 1.0);
        }
    }
}

/// Screen rectangle of the active-cell border, if the cell is visible.
pub fn active_cell_rect(
    cell: CellPoint,
    geometry: &GridGeometry,
    viewport: &Viewport,
) -> Option<Rect> {
    if cell.col >= geometry.column_count() || cell.row >= geometry.row_count() {
        return None;
    }
    let rect = geometry.cell_bounds(cell, viewport.scroll_left, viewport.scroll_top);
    let body = Rect::new(
        geometry.row_marker_width,
        geometry.header_height,
        geometry.body_width(),
        geometry.body_height(),
    );
    // Scrolled cells that slid under the frozen block are hidden.
    if cell.col >= geometry.frozen_columns
        && rect.right() <= geometry.row_marker_width + geometry.frozen_width()
    {
        return None;
    }
    rect.intersect(&body)?;
    Some(rect)
}

pub fn paint_active_cell(cx: &mut PaintContext<'_>, rect: Rect) {
    let half = ACTIVE_BORDER_WIDTH / 2.0;
    let color = cx.theme.accent_color.clone();
    cx.surface.stroke_rect(rect.inset(half), &color, ACTIVE_BORDER_WIDTH);
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::config::GridConfig;

    fn geometry(frozen: u32) -> GridGeometry {
        let mut config = GridConfig::new(20, 100);
        config.frozen_columns = frozen;
        config.header_height = 40.0;
        let mut g = GridGeometry::new(&config);
        g.resize(1000.0, 600.0);
        g
    }

    #[test]
    fn test_cells_split_at_frozen_boundary() {
        let g = geometry(1);
        let viewport = Viewport {
            scroll_left: 240.0,
            scroll_top: 0.0,
        };
        let sel = Selection::cells(CellPoint::new(0, 0), CellPoint::new(4, 1));
        let rects = selection_rects(&sel, &g, &viewport);
        assert_eq!(rects.len(), 2);

        let frozen = rects.iter().find(|r| r.frozen).unwrap();
        assert_eq!(frozen.rect, Rect::new(0.0, 40.0, 120.0, 80.0));
        assert!(frozen.draw_left && !frozen.draw_right);

        // Columns 1-2 scrolled under the frozen block; 3-4 remain.
        let scroll = rects.iter().find(|r| !r.frozen).unwrap();
        assert_eq!(scroll.rect, Rect::new(120.0, 40.0, 240.0, 80.0));
        assert!(!scroll.draw_left && scroll.draw_right);
    }

    #[test]
    fn test_rows_span_full_width() {
        let g = geometry(0);
        let sel = Selection::Rows(vec![LineRange::new(1, 1), LineRange::new(3, 4)]);
        let rects = selection_rects(&sel, &g, &Viewport::default());
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].rect, Rect::new(0.0, 80.0, 1000.0, 40.0));
        assert_eq!(rects[1].rect.height, 80.0);
    }

    #[test]
    fn test_offscreen_selection_has_no_rects() {
        let g = geometry(0);
        let sel = Selection::cell(CellPoint::new(0, 90));
        assert!(selection_rects(&sel, &g, &Viewport::default()).is_empty());
        assert_eq!(
            active_cell_rect(CellPoint::new(0, 90), &g, &Viewport::default()),
            None
        );
    }

    #[test]
    fn test_active_cell_hidden_under_frozen_block() {
        let g = geometry(2);
        let viewport = Viewport {
            scroll_left: 120.0,
            scroll_top: 0.0,
        };
        assert_eq!(active_cell_rect(CellPoint::new(2, 0), &g, &viewport), None);
        assert!(active_cell_rect(CellPoint::new(3, 0), &g, &viewport).is_some());
    }
}
