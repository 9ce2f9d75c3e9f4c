//! The grid engine: geometry, selection, input and painting behind one
//! imperative surface.
//!
//! The engine is synchronous and host driven. It never schedules its own
//! redraws; input handlers report whether a redraw is needed and the host
//! calls [`GridEngine::render`] when it is ready to paint.

use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::interaction::{
    hit_test, GridHost, HitTarget, Interaction, Key, Modifiers, Notice, Outcome, PointerInput,
};
use crate::layout::{Axis, GridGeometry, ScrollAlign, Viewport};
use crate::render::{
    CellProvider, FrameInput, FrameStats, GridRenderer, PainterRegistry, ResourceLookup, Surface,
};
use crate::search::{self, SearchOptions};
use crate::session::{SelectionSession, SessionChange};
use crate::types::{
    CellPoint, CellPosition, Rect, Selection, SelectionKind, SelectionRange, Theme, ThemeMode,
    ThemeOverride,
};

/// Bounds for [`GridEngine::auto_size_column`].
pub const MIN_AUTO_WIDTH: f64 = 40.0;
pub const MAX_AUTO_WIDTH: f64 = 500.0;
pub const MIN_AUTO_HEIGHT: f64 = 20.0;
pub const MAX_AUTO_HEIGHT: f64 = 300.0;

pub struct GridEngine<H, R> {
    host: H,
    resources: R,
    config: GridConfig,
    geometry: GridGeometry,
    viewport: Viewport,
    session: SelectionSession,
    interaction: Interaction,
    renderer: GridRenderer,
    theme: Theme,
    prefers_dark: bool,
    last_stats: FrameStats,
    dirty: bool,
}

impl<H: GridHost, R: ResourceLookup> GridEngine<H, R> {
    pub fn new(config: GridConfig, host: H, resources: R) -> Result<Self> {
        config.validate()?;
        let theme = Theme::resolve(config.theme_mode, false, config.theme.as_ref());
        Ok(Self {
            geometry: GridGeometry::new(&config),
            viewport: Viewport::new(),
            session: SelectionSession::new(config.columns, config.rows),
            interaction: Interaction::new(config.drag_threshold, config.page_rows),
            renderer: GridRenderer::new(PainterRegistry::with_defaults()),
            theme,
            prefers_dark: false,
            last_stats: FrameStats::default(),
            dirty: true,
            host,
            resources,
            config,
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn resources(&self) -> &R {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut R {
        &mut self.resources
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn session(&self) -> &SelectionSession {
        &self.session
    }

    pub fn selection(&self) -> &Selection {
        self.session.selection()
    }

    pub fn registry_mut(&mut self) -> &mut PainterRegistry {
        self.renderer.registry_mut()
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Whether something changed since the last frame.
    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    /// Mark the grid dirty, e.g. after the host's cell data changed.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    // ---- configuration ----

    /// Replace the whole configuration. Geometry caches are rebuilt and any
    /// selection that no longer fits is cleared.
    pub fn set_config(&mut self, config: GridConfig) -> Result<()> {
        config.validate()?;
        let (width, height) = (self.geometry.width, self.geometry.height);
        self.geometry = GridGeometry::new(&config);
        self.geometry.resize(width, height);
        self.interaction
            .configure(config.drag_threshold, config.page_rows);
        self.config = config;
        self.refresh_theme();
        let change = self.session.set_bounds(self.config.columns, self.config.rows);
        self.notify(change);
        self.viewport.clamp_scroll(&self.geometry);
        self.dirty = true;
        Ok(())
    }

    pub fn set_counts(&mut self, columns: u32, rows: u32) {
        self.config.columns = columns;
        self.config.rows = rows;
        self.config.frozen_columns = self.config.frozen_columns.min(columns);
        self.geometry.set_counts(columns, rows);
        let change = self.session.set_bounds(columns, rows);
        self.notify(change);
        self.viewport.clamp_scroll(&self.geometry);
        self.dirty = true;
    }

    pub fn set_column_width(&mut self, col: u32, width: f64) {
        let width = width.max(0.0);
        self.config.column_widths.insert(col, width);
        self.geometry.set_size(Axis::X, col, width);
        self.viewport.clamp_scroll(&self.geometry);
        self.dirty = true;
    }

    pub fn set_row_height(&mut self, row: u32, height: f64) {
        let height = height.max(0.0);
        self.config.row_heights.insert(row, height);
        self.geometry.set_size(Axis::Y, row, height);
        self.viewport.clamp_scroll(&self.geometry);
        self.dirty = true;
    }

    pub fn set_frozen_columns(&mut self, frozen: u32) {
        self.geometry.set_frozen_columns(frozen);
        self.config.frozen_columns = self.geometry.frozen_columns;
        self.viewport.clamp_scroll(&self.geometry);
        self.dirty = true;
    }

    pub fn set_theme_mode(&mut self, mode: ThemeMode) {
        self.config.theme_mode = mode;
        self.refresh_theme();
    }

    pub fn set_theme_override(&mut self, overrides: Option<ThemeOverride>) {
        self.config.theme = overrides;
        self.refresh_theme();
    }

    /// System color-scheme preference, used by [`ThemeMode::Auto`].
    pub fn set_prefers_dark(&mut self, prefers_dark: bool) {
        self.prefers_dark = prefers_dark;
        self.refresh_theme();
    }

    fn refresh_theme(&mut self) {
        let theme = Theme::resolve(
            self.config.theme_mode,
            self.prefers_dark,
            self.config.theme.as_ref(),
        );
        if theme != self.theme {
            if theme.font_family != self.theme.font_family
                || theme.font_size.to_bits() != self.theme.font_size.to_bits()
            {
                self.renderer.clear_text_cache();
            }
            self.theme = theme;
            self.dirty = true;
        }
    }

    /// Resize the container (CSS pixels).
    pub fn resize(&mut self, width: f64, height: f64) {
        self.geometry.resize(width, height);
        self.viewport.clamp_scroll(&self.geometry);
        self.dirty = true;
    }

    // ---- imperative control ----

    /// Clear selection, active cell, any gesture in progress and scroll.
    pub fn reset_state(&mut self) {
        self.interaction.reset();
        let change = self.session.clear();
        self.notify(change);
        self.viewport = Viewport::new();
        self.dirty = true;
    }

    pub fn render(&mut self, surface: &mut dyn Surface, now_ms: f64) -> FrameStats {
        let frame = FrameInput {
            geometry: &self.geometry,
            viewport: &self.viewport,
            selection: self.session.selection(),
            active_cell: self.session.active_cell(),
            draw_grid_lines: self.config.draw_grid_lines,
        };
        self.last_stats = self.renderer.render(
            surface,
            &self.host,
            &mut self.resources,
            &self.theme,
            &frame,
            now_ms,
        );
        self.dirty = false;
        self.last_stats
    }

    /// Drop every cache that depends on content or fonts, then paint.
    pub fn force_redraw(&mut self, surface: &mut dyn Surface, now_ms: f64) -> FrameStats {
        self.renderer.clear_text_cache();
        self.geometry.invalidate();
        self.render(surface, now_ms)
    }

    pub fn get_active_cell(&self) -> Option<CellPosition> {
        self.session.active_cell().map(CellPoint::to_position)
    }

    /// Replace the selection. The host already knows the new selection so
    /// it is not echoed back; an active-cell move is still reported.
    pub fn set_selection(&mut self, selection: Selection) {
        let change = self.session.set_selection(selection);
        self.notify(SessionChange {
            selection: false,
            ..change
        });
        self.dirty |= change.any();
    }

    /// Build a selection from raw ranges and apply it. Ranges outside the
    /// grid are rejected.
    pub fn set_selection_ranges(
        &mut self,
        kind: SelectionKind,
        ranges: &[SelectionRange],
    ) -> Result<()> {
        let (columns, rows) = self.session.bounds();
        let selection = Selection::from_ranges(kind, ranges)
            .and_then(|selection| {
                if selection.fits(columns, rows) {
                    Ok(selection)
                } else {
                    Err(GridError::InvalidSelection(format!(
                        "selection exceeds {columns}x{rows} grid"
                    )))
                }
            })
            .map_err(|e| {
                log::warn!("rejected selection from host: {e}");
                e
            })?;
        self.set_selection(selection);
        Ok(())
    }

    pub fn scroll_by(&mut self, dx: f64, dy: f64) -> bool {
        let moved = self.viewport.scroll_by(dx, dy, &self.geometry);
        self.dirty |= moved;
        moved
    }

    pub fn scroll_to(&mut self, left: f64, top: f64) -> bool {
        let moved = self.viewport.scroll_to(left, top, &self.geometry);
        self.dirty |= moved;
        moved
    }

    pub fn scroll_to_item(&mut self, position: CellPosition, align: ScrollAlign) -> bool {
        let moved = self
            .viewport
            .scroll_to_item(position, align, &self.geometry);
        self.dirty |= moved;
        moved
    }

    /// Screen rectangle of a cell or header position.
    pub fn get_cell_bounds(&self, position: CellPosition) -> Option<Rect> {
        self.geometry.position_bounds(
            position,
            self.viewport.scroll_left,
            self.viewport.scroll_top,
        )
    }

    /// Grid position under a surface point; headers carry -1 on one axis.
    pub fn get_cell_indices_at_position(&self, x: f64, y: f64) -> Option<CellPosition> {
        self.hit(x, y).position()
    }

    pub fn is_editing(&self) -> bool {
        self.interaction.is_editing()
    }

    pub fn set_editing(&mut self, editing: bool) {
        self.interaction.set_editing(editing);
    }

    /// Fit column `col` to the preferred width of its visible cells and its
    /// header label, clamped to [`MIN_AUTO_WIDTH`, `MAX_AUTO_WIDTH`].
    pub fn auto_size_column(&mut self, col: u32, surface: &mut dyn Surface) -> Option<f64> {
        if col >= self.geometry.column_count() {
            return None;
        }
        let mut width = self
            .renderer
            .header_width(surface, &self.host, &self.theme, col);
        if let Some((start, end)) = self.geometry.visible_rows(self.viewport.scroll_top) {
            for row in start..=end {
                let preferred = self.renderer.preferred_width(
                    surface,
                    &self.host,
                    &mut self.resources,
                    &self.theme,
                    CellPoint::new(col, row),
                );
                width = width.max(preferred.unwrap_or(0.0));
            }
        }
        let width = width.ceil().clamp(MIN_AUTO_WIDTH, MAX_AUTO_WIDTH);
        log::debug!("auto-size column {col} -> {width}");
        self.set_column_width(col, width);
        Some(width)
    }

    /// Fit row `row` to the tallest preferred height among its visible
    /// cells. Rows whose painters have no preference keep the default
    /// height.
    pub fn auto_size_row(&mut self, row: u32, surface: &mut dyn Surface) -> Option<f64> {
        if row >= self.geometry.row_count() {
            return None;
        }
        let frozen = (0..self.geometry.frozen_columns).map(|col| (col, col));
        let scrolled = self
            .geometry
            .visible_scroll_columns(self.viewport.scroll_left);
        let mut height: Option<f64> = None;
        for (start, end) in frozen.chain(scrolled) {
            for col in start..=end {
                if let Some(preferred) = self.renderer.preferred_height(
                    surface,
                    &self.host,
                    &mut self.resources,
                    &self.theme,
                    CellPoint::new(col, row),
                ) {
                    height = Some(height.map_or(preferred, |h| h.max(preferred)));
                }
            }
        }
        let height = height
            .unwrap_or(self.config.default_row_height)
            .ceil()
            .clamp(MIN_AUTO_HEIGHT, MAX_AUTO_HEIGHT);
        log::debug!("auto-size row {row} -> {height}");
        self.set_row_height(row, height);
        Some(height)
    }

    pub fn find(&self, pattern: &str, options: SearchOptions) -> Vec<CellPoint> {
        search::find_cells(
            &self.host,
            (self.geometry.column_count(), self.geometry.row_count()),
            pattern,
            options,
        )
    }

    // ---- input ----

    pub fn hit(&self, x: f64, y: f64) -> HitTarget {
        hit_test(&self.geometry, &self.viewport, x, y)
    }

    /// Returns whether a redraw is needed.
    pub fn pointer_down(&mut self, input: &PointerInput) -> bool {
        let target = self.hit(input.x, input.y);
        let outcome = self.interaction.pointer_down(&mut self.session, target, input);
        self.dispatch(outcome, input)
    }

    pub fn pointer_move(&mut self, input: &PointerInput) -> bool {
        let outcome = self.interaction.pointer_move(
            &mut self.session,
            &self.geometry,
            &self.viewport,
            input.x,
            input.y,
        );
        self.dispatch(outcome, input)
    }

    pub fn pointer_up(&mut self, input: &PointerInput) -> bool {
        let outcome = self.interaction.pointer_up();
        self.dispatch(outcome, input)
    }

    pub fn double_click(&mut self, input: &PointerInput) -> bool {
        let target = self.hit(input.x, input.y);
        let outcome = self.interaction.double_click(target);
        self.dispatch(outcome, input)
    }

    /// Returns whether the browser menu should be suppressed.
    pub fn context_menu(&mut self, input: &PointerInput) -> bool {
        let target = self.hit(input.x, input.y);
        let outcome = self.interaction.context_menu(&mut self.session, target);
        let handled = outcome.handled;
        self.dispatch(outcome, input);
        handled
    }

    /// Returns whether the key was consumed.
    pub fn key_down(&mut self, key: &str, modifiers: Modifiers) -> bool {
        let outcome = self
            .interaction
            .key_down(&mut self.session, Key::parse(key), modifiers);
        let handled = outcome.handled;
        self.dispatch(outcome, &PointerInput::default());
        handled
    }

    fn dispatch(&mut self, outcome: Outcome, input: &PointerInput) -> bool {
        self.notify(outcome.change);
        if let Some(cell) = outcome.reveal {
            self.scroll_to_item(cell.to_position(), ScrollAlign::Auto);
        }
        for notice in &outcome.notices {
            match *notice {
                Notice::Click(position) => self.host.on_cell_click(position, input),
                Notice::DoubleClick(position) => self.host.on_cell_double_click(position, input),
                Notice::ContextMenu(position) => self.host.on_context_menu(position, input),
                Notice::EditStart(cell) => self.host.on_edit_start(cell),
            }
        }
        self.dirty |= outcome.needs_redraw();
        self.dirty
    }

    fn notify(&mut self, change: SessionChange) {
        if change.selection {
            self.host.on_selection_change(self.session.selection());
        }
        if change.active_cell {
            self.host.on_active_cell_change(self.get_active_cell());
        }
        self.dirty |= change.any();
    }
}

impl<H, R> std::fmt::Debug for GridEngine<H, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridEngine")
            .field("columns", &self.geometry.column_count())
            .field("rows", &self.geometry.row_count())
            .field("viewport", &self.viewport)
            .field("selection", self.session.selection())
            .finish_non_exhaustive()
    }
}
