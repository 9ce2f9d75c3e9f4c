//! Per-frame render orchestration.
//!
//! A frame paints, in order: body cells (scrolled columns clipped to the
//! area right of the frozen block, then frozen columns), the header row,
//! row markers and corner, grid lines, the frozen divider, the selection
//! overlay and finally the active-cell border.

use serde::Serialize;

use super::headers::{self, col_to_letter};
use super::painters::{CellState, PaintContext, PainterRegistry, ResourceLookup};
use super::selection::{active_cell_rect, paint_active_cell, paint_selection, selection_rects};
use super::surface::Surface;
use super::text::TextMeasurer;
use crate::layout::{Axis, GridGeometry, Viewport};
use crate::types::{CellContent, CellPoint, Rect, Selection, Theme};

/// Host-side cell data. Called once per visible cell per frame, so
/// implementations should be cheap and free of side effects.
pub trait CellProvider {
    fn cell_content(&self, cell: CellPoint) -> CellContent;

    fn column_title(&self, col: u32) -> String {
        col_to_letter(col)
    }
}

impl<F> CellProvider for F
where
    F: Fn(CellPoint) -> CellContent,
{
    fn cell_content(&self, cell: CellPoint) -> CellContent {
        self(cell)
    }
}

/// State a frame is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub geometry: &'a GridGeometry,
    pub viewport: &'a Viewport,
    pub selection: &'a Selection,
    pub active_cell: Option<CellPoint>,
    pub draw_grid_lines: bool,
}

/// Counters from the last frame, for host diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStats {
    /// Inclusive visible row range, with overscan
    pub rows: Option<(u32, u32)>,
    /// Inclusive visible scrollable column range, with overscan
    pub columns: Option<(u32, u32)>,
    pub frozen_columns: u32,
    pub cells_painted: u32,
    pub selection_rects: u32,
    pub resources_expired: u32,
}

/// Owns the painter registry and the text measurement cache.
pub struct GridRenderer {
    registry: PainterRegistry,
    text: TextMeasurer,
}

impl GridRenderer {
    pub fn new(registry: PainterRegistry) -> Self {
        Self {
            registry,
            text: TextMeasurer::default(),
        }
    }

    pub fn registry(&self) -> &PainterRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PainterRegistry {
        &mut self.registry
    }

    pub fn text_cache(&self) -> &TextMeasurer {
        &self.text
    }

    /// Drop cached text widths, e.g. after a theme font change.
    pub fn clear_text_cache(&mut self) {
        self.text.clear();
    }

    pub fn render(
        &mut self,
        surface: &mut dyn Surface,
        provider: &dyn CellProvider,
        resources: &mut dyn ResourceLookup,
        theme: &Theme,
        frame: &FrameInput<'_>,
        now_ms: f64,
    ) -> FrameStats {
        let mut stats = FrameStats {
            resources_expired: u32::try_from(resources.expire_stale(now_ms)).unwrap_or(u32::MAX),
            ..FrameStats::default()
        };
        let geometry = frame.geometry;
        let viewport = frame.viewport;

        let mut cx = PaintContext {
            surface,
            text: &mut self.text,
            resources,
            theme,
            now_ms,
        };
        cx.surface.clear(&theme.cell_bg);

        stats.rows = geometry.visible_rows(viewport.scroll_top);
        stats.columns = geometry.visible_scroll_columns(viewport.scroll_left);
        stats.frozen_columns = geometry.frozen_columns;

        if let Some((row_start, row_end)) = stats.rows {
            let frozen_right = geometry.row_marker_width + geometry.frozen_width();
            let top = geometry.header_height;
            let body_bottom = top + geometry.body_height();

            if let Some((col_start, col_end)) = stats.columns {
                let area = Rect::new(
                    frozen_right,
                    top,
                    (geometry.width - frozen_right).max(0.0),
                    geometry.body_height(),
                );
                stats.cells_painted += paint_block(
                    &self.registry,
                    &mut cx,
                    provider,
                    frame,
                    area,
                    (col_start, col_end),
                    (row_start, row_end),
                );
            }
            if let Some(last_frozen) = geometry.frozen_columns.checked_sub(1) {
                let area = Rect::new(
                    geometry.row_marker_width,
                    top,
                    geometry.frozen_width(),
                    body_bottom - top,
                );
                stats.cells_painted += paint_block(
                    &self.registry,
                    &mut cx,
                    provider,
                    frame,
                    area,
                    (0, last_frozen),
                    (row_start, row_end),
                );
            }
        }

        let title = |col: u32| provider.column_title(col);
        headers::render_column_headers(&mut cx, geometry, viewport, frame.selection, &title);
        headers::render_row_markers(&mut cx, geometry, viewport, frame.selection);
        headers::render_corner(&mut cx, geometry);

        if frame.draw_grid_lines {
            paint_grid_lines(&mut cx, frame, stats.rows, stats.columns);
        }
        if geometry.frozen_columns > 0 {
            let top = geometry.header_height;
            headers::render_frozen_divider(&mut cx, geometry, top, top + geometry.body_height());
        }

        let rects = selection_rects(frame.selection, geometry, viewport);
        stats.selection_rects = u32::try_from(rects.len()).unwrap_or(u32::MAX);
        paint_selection(&mut cx, &rects);
        if let Some(rect) = frame
            .active_cell
            .and_then(|cell| active_cell_rect(cell, geometry, viewport))
        {
            paint_active_cell(&mut cx, rect);
        }

        log::trace!(
            "frame: {} cells, rows {:?}, columns {:?}",
            stats.cells_painted,
            stats.rows,
            stats.columns
        );
        stats
    }

    /// Width the content of `cell` would like, from its painter.
    pub fn preferred_width(
        &mut self,
        surface: &mut dyn Surface,
        provider: &dyn CellProvider,
        resources: &mut dyn ResourceLookup,
        theme: &Theme,
        cell: CellPoint,
    ) -> Option<f64> {
        let content = provider.cell_content(cell);
        let mut cx = PaintContext {
            surface,
            text: &mut self.text,
            resources,
            theme,
            now_ms: 0.0,
        };
        self.registry
            .get(content.kind)
            .preferred_width(&mut cx, &content)
    }

    /// Height the content of `cell` would like, from its painter.
    pub fn preferred_height(
        &mut self,
        surface: &mut dyn Surface,
        provider: &dyn CellProvider,
        resources: &mut dyn ResourceLookup,
        theme: &Theme,
        cell: CellPoint,
    ) -> Option<f64> {
        let content = provider.cell_content(cell);
        let mut cx = PaintContext {
            surface,
            text: &mut self.text,
            resources,
            theme,
            now_ms: 0.0,
        };
        self.registry
            .get(content.kind)
            .preferred_height(&mut cx, &content)
    }

    /// Width the header label of `col` needs.
    pub fn header_width(
        &mut self,
        surface: &mut dyn Surface,
        provider: &dyn CellProvider,
        theme: &Theme,
        col: u32,
    ) -> f64 {
        self.text.set_font(surface, &theme.header_font());
        self.text.measure(surface, &provider.column_title(col)) + theme.cell_padding * 2.0
    }
}

impl Default for GridRenderer {
    fn default() -> Self {
        Self::new(PainterRegistry::with_defaults())
    }
}

/// Paint one clipped block of cells. Returns the number painted.
fn paint_block(
    registry: &PainterRegistry,
    cx: &mut PaintContext<'_>,
    provider: &dyn CellProvider,
    frame: &FrameInput<'_>,
    area: Rect,
    (col_start, col_end): (u32, u32),
    (row_start, row_end): (u32, u32),
) -> u32 {
    if area.width <= 0.0 || area.height <= 0.0 {
        return 0;
    }
    let geometry = frame.geometry;
    let mut painted = 0;
    cx.surface.save();
    cx.surface.clip_rect(area);
    for row in row_start..=row_end {
        for col in col_start..=col_end {
            let cell = CellPoint::new(col, row);
            let rect = geometry.cell_bounds(cell, frame.viewport.scroll_left, frame.viewport.scroll_top);
            if rect.width <= 0.0 || rect.height <= 0.0 || rect.intersect(&area).is_none() {
                continue;
            }
            let content = provider.cell_content(cell);
            let state = CellState {
                selected: frame.selection.contains_cell(cell),
                active: frame.active_cell == Some(cell),
            };
            let painter = registry.get(content.kind);
            painter.render_background(cx, rect, state);
            painter.render(cx, &content, rect);
            painted += 1;
        }
    }
    cx.surface.restore();
    painted
}

/// Grid lines for the visible window only.
fn paint_grid_lines(
    cx: &mut PaintContext<'_>,
    frame: &FrameInput<'_>,
    rows: Option<(u32, u32)>,
    columns: Option<(u32, u32)>,
) {
    let geometry = frame.geometry;
    let viewport = frame.viewport;
    let color = cx.theme.grid_line_color.clone();
    let left = geometry.row_marker_width;
    let top = geometry.header_height;
    let right = geometry.width;
    let bottom = top + geometry.body_height();
    let frozen_right = left + geometry.frozen_width();

    if let Some((start, end)) = rows {
        for row in start..=end {
            let y = geometry.screen_y(geometry.offset_of(Axis::Y, row + 1), viewport.scroll_top);
            if y <= top {
                continue;
            }
            if y > bottom {
                break;
            }
            cx.surface.line(left, y - 0.5, right, y - 0.5, &color, 1.0);
        }
    }

    let frozen = (0..geometry.frozen_columns).map(|col| {
        left + geometry.offset_of(Axis::X, col + 1)
    });
    let scrolled = columns.into_iter().flat_map(|(start, end)| start..=end).filter_map(|col| {
        let x = geometry.screen_x(geometry.offset_of(Axis::X, col + 1), viewport.scroll_left);
        (x > frozen_right && x <= right).then_some(x)
    });
    for x in frozen.chain(scrolled) {
        cx.surface.line(x - 0.5, top, x - 0.5, bottom, &color, 1.0);
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::render::painters::NoResources;
    use crate::render::{DrawOp, RecordingSurface};

    fn labelled(cell: CellPoint) -> CellContent {
        CellContent::text(format!("{}:{}", cell.col, cell.row))
    }

    fn setup(frozen: u32) -> (GridGeometry, RecordingSurface) {
        let mut config = GridConfig::new(50, 1_000);
        config.frozen_columns = frozen;
        let mut geometry = GridGeometry::new(&config);
        geometry.resize(600.0, 440.0);
        (geometry, RecordingSurface::new(600.0, 440.0))
    }

    #[test]
    fn test_renders_visible_window_only() {
        let (geometry, mut surface) = setup(0);
        let viewport = Viewport::default();
        let frame = FrameInput {
            geometry: &geometry,
            viewport: &viewport,
            selection: &Selection::None,
            active_cell: None,
            draw_grid_lines: true,
        };
        let mut renderer = GridRenderer::default();
        let stats = renderer.render(
            &mut surface,
            &labelled,
            &mut NoResources,
            &Theme::light(),
            &frame,
            0.0,
        );
        // 400px body / 40px rows reaches row 10, plus 5 overscan.
        assert_eq!(stats.rows, Some((0, 15)));
        assert_eq!(stats.columns, Some((0, 10)));
        let texts = surface.texts();
        assert!(texts.contains(&"0:0"));
        assert!(!texts.iter().any(|t| t.ends_with(":10")));
        // Rows past the body bottom are skipped before painting.
        assert_eq!(stats.cells_painted, 5 * 10);
    }

    #[test]
    fn test_overlay_paints_after_cells() {
        let (geometry, mut surface) = setup(1);
        let viewport = Viewport::default();
        let selection = Selection::cell(CellPoint::new(1, 1));
        let frame = FrameInput {
            geometry: &geometry,
            viewport: &viewport,
            selection: &selection,
            active_cell: Some(CellPoint::new(1, 1)),
            draw_grid_lines: false,
        };
        let theme = Theme::light();
        let stats = GridRenderer::default().render(
            &mut surface,
            &labelled,
            &mut NoResources,
            &theme,
            &frame,
            0.0,
        );
        assert_eq!(stats.selection_rects, 1);
        let ops = surface.ops();
        assert!(matches!(ops[0], DrawOp::Clear(_)));
        assert!(matches!(
            ops.last(),
            Some(DrawOp::StrokeRect { width, .. }) if *width == 3.0
        ));
        let selected_bg = ops
            .iter()
            .position(|op| matches!(op, DrawOp::FillRect { color, .. } if *color == theme.selected_cell_bg))
            .unwrap();
        let overlay = ops
            .iter()
            .rposition(|op| matches!(op, DrawOp::FillRect { color, .. } if *color == theme.accent_fill))
            .unwrap();
        assert!(selected_bg < overlay);
    }

    #[test]
    fn test_preferred_width_uses_painter() {
        let (_, mut surface) = setup(0);
        let mut renderer = GridRenderer::default();
        let width = renderer.preferred_width(
            &mut surface,
            &|_cell: CellPoint| CellContent::boolean(true),
            &mut NoResources,
            &Theme::light(),
            CellPoint::new(0, 0),
        );
        assert_eq!(width, Some(60.0));
    }
}
