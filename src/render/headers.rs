//! Column header row and row-number markers.
//!
//! Column headers are painted in two passes: scrollable headers first,
//! clipped to the area right of the frozen block, then the frozen headers
//! on top so nothing bleeds through when scrolled.

use super::painters::PaintContext;
use super::surface::TextAlign;
use crate::layout::{Axis, GridGeometry, Viewport};
use crate::types::{Rect, Selection};

/// Headers narrower than this get no label.
const MIN_LABEL_WIDTH: f64 = 20.0;
const FROZEN_DIVIDER_WIDTH: f64 = 2.0;

/// Convert a 0-based column index to letters (A, B, ..., Z, AA, AB, ...).
pub fn col_to_letter(col: u32) -> String {
    let mut letters = Vec::new();
    let mut n = u64::from(col) + 1;
    while n > 0 {
        n -= 1;
        // n % 26 < 26, always fits.
        #[allow(clippy::cast_possible_truncation)]
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// How strongly a header is highlighted by the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderHighlight {
    None,
    /// Some cells in the line are selected.
    Partial,
    /// The whole line is selected.
    Full,
}

pub fn column_highlight(selection: &Selection, col: u32) -> HeaderHighlight {
    match selection {
        Selection::Columns(_) if selection.contains_column(col) => HeaderHighlight::Full,
        Selection::Rows(_) => HeaderHighlight::Partial,
        Selection::Cells(_) if selection.cell_range().is_some_and(|r| r.cols().contains(col)) => {
            HeaderHighlight::Partial
        }
        _ => HeaderHighlight::None,
    }
}

pub fn row_highlight(selection: &Selection, row: u32) -> HeaderHighlight {
    match selection {
        Selection::Rows(_) if selection.contains_row(row) => HeaderHighlight::Full,
        Selection::Columns(_) => HeaderHighlight::Partial,
        Selection::Cells(_) if selection.cell_range().is_some_and(|r| r.rows().contains(row)) => {
            HeaderHighlight::Partial
        }
        _ => HeaderHighlight::None,
    }
}

fn paint_header_cell(cx: &mut PaintContext<'_>, rect: Rect, label: &str, highlight: HeaderHighlight) {
    let theme = cx.theme;
    match highlight {
        HeaderHighlight::Full => cx.surface.fill_rect(rect, &theme.accent_fill),
        HeaderHighlight::Partial => cx.surface.fill_rect(rect, &theme.header_selected_bg),
        HeaderHighlight::None => {}
    }
    let right = rect.right() - 0.5;
    cx.surface
        .line(right, rect.y, right, rect.bottom(), &theme.border_color, 1.0);

    if rect.width >= MIN_LABEL_WIDTH && !label.is_empty() {
        let color = if highlight == HeaderHighlight::Full {
            &theme.accent_color
        } else {
            &theme.header_text
        };
        let shown = cx
            .text
            .truncate(cx.surface, label, rect.width - theme.cell_padding * 2.0);
        if !shown.is_empty() {
            cx.surface.fill_text(
                &shown,
                rect.x + rect.width / 2.0,
                rect.y + rect.height / 2.0,
                TextAlign::Center,
                color,
            );
        }
    }
}

/// Paint the column header row. `title` supplies each column's label.
pub fn render_column_headers(
    cx: &mut PaintContext<'_>,
    geometry: &GridGeometry,
    viewport: &Viewport,
    selection: &Selection,
    title: &dyn Fn(u32) -> String,
) {
    let height = geometry.header_height;
    if height <= 0.0 {
        return;
    }
    let theme = cx.theme;
    let font = theme.header_font();
    cx.set_font(&font);

    let marker = geometry.row_marker_width;
    let frozen_width = geometry.frozen_width();
    let scroll_x = marker + frozen_width;
    let scroll_area = Rect::new(scroll_x, 0.0, (geometry.width - scroll_x).max(0.0), height);

    // Pass 1: scrollable headers, clipped.
    cx.surface.save();
    cx.surface.clip_rect(scroll_area);
    cx.surface.fill_rect(scroll_area, &theme.header_bg);
    if let Some((start, end)) = geometry.visible_scroll_columns(viewport.scroll_left) {
        for col in start..=end {
            let width = geometry.size_of(Axis::X, col);
            if width <= 0.0 {
                continue;
            }
            let x = geometry.screen_x(geometry.offset_of(Axis::X, col), viewport.scroll_left);
            if x + width <= scroll_x {
                continue;
            }
            if x > geometry.width {
                break;
            }
            let rect = Rect::new(x, 0.0, width, height);
            paint_header_cell(cx, rect, &title(col), column_highlight(selection, col));
        }
    }
    cx.surface.restore();

    // Pass 2: frozen headers on top.
    if geometry.frozen_columns > 0 {
        cx.surface
            .fill_rect(Rect::new(marker, 0.0, frozen_width, height), &theme.header_bg);
        for col in 0..geometry.frozen_columns {
            let width = geometry.size_of(Axis::X, col);
            if width <= 0.0 {
                continue;
            }
            let rect = Rect::new(marker + geometry.offset_of(Axis::X, col), 0.0, width, height);
            paint_header_cell(cx, rect, &title(col), column_highlight(selection, col));
        }
    }

    cx.surface.line(
        marker,
        height - 0.5,
        geometry.width,
        height - 0.5,
        &theme.border_color,
        1.0,
    );
    if geometry.frozen_columns > 0 {
        render_frozen_divider(cx, geometry, 0.0, height);
    }
}

/// Paint the row-number column. Does nothing when markers are hidden.
pub fn render_row_markers(
    cx: &mut PaintContext<'_>,
    geometry: &GridGeometry,
    viewport: &Viewport,
    selection: &Selection,
) {
    let width = geometry.row_marker_width;
    if width <= 0.0 {
        return;
    }
    let theme = cx.theme;
    let font = theme.header_font();
    cx.set_font(&font);

    let top = geometry.header_height;
    let area = Rect::new(0.0, top, width, geometry.body_height());
    cx.surface.save();
    cx.surface.clip_rect(area);
    cx.surface.fill_rect(area, &theme.header_bg);
    if let Some((start, end)) = geometry.visible_rows(viewport.scroll_top) {
        for row in start..=end {
            let height = geometry.size_of(Axis::Y, row);
            if height <= 0.0 {
                continue;
            }
            let y = geometry.screen_y(geometry.offset_of(Axis::Y, row), viewport.scroll_top);
            if y > geometry.height {
                break;
            }
            let rect = Rect::new(0.0, y, width, height);
            let label = u64::from(row).saturating_add(1).to_string();
            paint_header_cell(cx, rect, &label, row_highlight(selection, row));
            cx.surface
                .line(0.0, rect.bottom() - 0.5, width, rect.bottom() - 0.5, &theme.border_color, 1.0);
        }
    }
    cx.surface.restore();
}

/// Corner cell above the row markers.
pub fn render_corner(cx: &mut PaintContext<'_>, geometry: &GridGeometry) {
    let (w, h) = (geometry.row_marker_width, geometry.header_height);
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let theme = cx.theme;
    cx.surface.fill_rect(Rect::new(0.0, 0.0, w, h), &theme.header_bg);
    cx.surface.line(w - 0.5, 0.0, w - 0.5, h, &theme.border_color, 1.0);
    cx.surface.line(0.0, h - 0.5, w, h - 0.5, &theme.border_color, 1.0);
}

/// Vertical line at the right edge of the frozen block, from `y1` to `y2`.
pub fn render_frozen_divider(cx: &mut PaintContext<'_>, geometry: &GridGeometry, y1: f64, y2: f64) {
    let x = geometry.row_marker_width + geometry.frozen_width();
    cx.surface
        .line(x, y1, x, y2, &cx.theme.border_color, FROZEN_DIVIDER_WIDTH);
}
