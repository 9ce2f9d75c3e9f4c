//! `CanvasGrid` - the WASM-exported entry point.
//!
//! This module provides the wasm-bindgen surface that:
//! - Owns the `HtmlCanvasElement` and its Canvas 2D context
//! - Pulls cell content from a JS `getCellContent(col, row)` function
//! - Wires mouse, wheel and keyboard events to the engine automatically
//! - Forwards selection and click notifications to JS callbacks
//!
//! Redraws are host driven. When something changes the grid calls the
//! render callback set with `setRenderCallback` (typically a
//! `requestAnimationFrame` wrapper that calls `render()`); without one it
//! paints synchronously.
//!
//! ```javascript
//! const grid = new CanvasGrid(canvas, (col, row) => ({ kind: "text", value: data[row][col] }), {
//!   columns: 12, rows: 100000, frozenColumns: 1,
//! });
//! grid.setCallbacks({ onSelectionChange: (sel) => console.log(sel) });
//! grid.render();
//! ```

mod events;
mod host;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Function, Promise};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::config::GridConfig;
use crate::engine::GridEngine;
use crate::error::GridError;
use crate::layout::ScrollAlign;
use crate::render::CanvasSurface;
use crate::resources::{DomImageFetcher, Resources};
use crate::search::SearchOptions;
use crate::types::{CellPosition, SelectionKind, SelectionRange, ThemeMode, ThemeOverride};

use events::Listener;
use host::{to_js, Callbacks, JsHost};

pub(crate) type Engine = GridEngine<JsHost, Resources<DomImageFetcher>>;

/// Shared state reachable from event listeners.
pub(crate) struct SharedState {
    pub(crate) engine: Engine,
    pub(crate) surface: CanvasSurface,
    pub(crate) callbacks: Callbacks,
    pub(crate) render_callback: Option<Function>,
}

/// Selection as sent by the host: a kind plus raw ranges.
#[derive(Deserialize)]
struct SelectionInput {
    kind: SelectionKind,
    #[serde(default)]
    ranges: Vec<SelectionRange>,
}

pub(crate) fn now_ms() -> f64 {
    if let Some(window) = web_sys::window() {
        if let Some(perf) = window.performance() {
            return perf.now();
        }
    }
    js_sys::Date::now()
}

fn device_pixel_ratio() -> f64 {
    web_sys::window().map_or(1.0, |w| w.device_pixel_ratio())
}

fn from_js<T: for<'de> Deserialize<'de>>(value: JsValue, what: &str) -> Result<T, GridError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| GridError::Other(format!("{what}: {e}")))
}

#[wasm_bindgen]
pub struct CanvasGrid {
    state: Rc<RefCell<SharedState>>,
    #[allow(dead_code)]
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl CanvasGrid {
    /// Create a grid on `canvas`. `config` is a partial `GridConfig`
    /// object; `undefined` uses the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        get_cell_content: Function,
        config: JsValue,
    ) -> Result<CanvasGrid, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            GridConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| GridError::InvalidConfig(e.to_string()))?
        };
        Self::create(canvas, get_cell_content, config)
    }

    /// Create a grid from a JSON configuration string.
    #[wasm_bindgen(js_name = "fromJson")]
    pub fn from_json(
        canvas: HtmlCanvasElement,
        get_cell_content: Function,
        json: &str,
    ) -> Result<CanvasGrid, JsValue> {
        Self::create(canvas, get_cell_content, GridConfig::from_json(json)?)
    }

    #[wasm_bindgen(js_name = "setCallbacks")]
    pub fn set_callbacks(&mut self, callbacks: JsValue) {
        self.state.borrow_mut().callbacks = Callbacks::from_object(&callbacks);
    }

    #[wasm_bindgen(js_name = "setRenderCallback")]
    pub fn set_render_callback(&mut self, callback: Option<Function>) {
        self.state.borrow_mut().render_callback = callback;
    }

    /// Custom column header labels: `(col) => string`.
    #[wasm_bindgen(js_name = "setColumnTitle")]
    pub fn set_column_title(&mut self, f: Option<Function>) {
        let mut s = self.state.borrow_mut();
        s.engine.host_mut().set_column_title(f);
        s.engine.invalidate();
    }

    /// Paint a frame. Returns the frame statistics.
    pub fn render(&mut self) -> Result<JsValue, JsValue> {
        let mut s = self
            .state
            .try_borrow_mut()
            .map_err(|_| GridError::Render("render called re-entrantly".to_string()))?;
        let SharedState {
            engine, surface, ..
        } = &mut *s;
        let stats = engine.render(surface, now_ms());
        Ok(to_js(&stats))
    }

    #[wasm_bindgen(js_name = "forceRedraw")]
    pub fn force_redraw(&mut self) -> Result<JsValue, JsValue> {
        let mut s = self.state.borrow_mut();
        let SharedState {
            engine, surface, ..
        } = &mut *s;
        let stats = engine.force_redraw(surface, now_ms());
        Ok(to_js(&stats))
    }

    /// The data changed; repaint on the next frame.
    pub fn invalidate(&mut self) {
        self.state.borrow_mut().engine.invalidate();
        Self::request_redraw(&self.state);
    }

    /// Resize to `width` x `height` CSS pixels.
    pub fn resize(&mut self, width: f64, height: f64) {
        {
            let mut s = self.state.borrow_mut();
            s.surface.resize(width, height, device_pixel_ratio());
            s.engine.resize(width, height);
        }
        Self::request_redraw(&self.state);
    }

    #[wasm_bindgen(js_name = "setConfig")]
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config: GridConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| GridError::InvalidConfig(e.to_string()))?;
        let icons = config.custom_icons.clone();
        Self::with_engine(&self.state, &JsValue::NULL, |e| {
            e.set_config(config)?;
            e.resources_mut().sprites.set_icons(icons);
            Ok::<(), GridError>(())
        })
        .unwrap_or(Ok(()))?;
        Ok(())
    }

    #[wasm_bindgen(js_name = "setCounts")]
    pub fn set_counts(&mut self, columns: u32, rows: u32) {
        Self::with_engine(&self.state, &JsValue::NULL, |e| e.set_counts(columns, rows));
    }

    #[wasm_bindgen(js_name = "setColumnWidth")]
    pub fn set_column_width(&mut self, col: u32, width: f64) {
        Self::with_engine(&self.state, &JsValue::NULL, |e| e.set_column_width(col, width));
    }

    #[wasm_bindgen(js_name = "setRowHeight")]
    pub fn set_row_height(&mut self, row: u32, height: f64) {
        Self::with_engine(&self.state, &JsValue::NULL, |e| e.set_row_height(row, height));
    }

    #[wasm_bindgen(js_name = "setFrozenColumns")]
    pub fn set_frozen_columns(&mut self, frozen: u32) {
        Self::with_engine(&self.state, &JsValue::NULL, |e| e.set_frozen_columns(frozen));
    }

    /// `"light"`, `"dark"` or `"auto"`.
    #[wasm_bindgen(js_name = "setThemeMode")]
    pub fn set_theme_mode(&mut self, mode: JsValue) -> Result<(), JsValue> {
        let mode: ThemeMode = from_js(mode, "theme mode")?;
        Self::with_engine(&self.state, &JsValue::NULL, |e| e.set_theme_mode(mode));
        Ok(())
    }

    /// Partial theme override; `null` removes it.
    #[wasm_bindgen(js_name = "setTheme")]
    pub fn set_theme(&mut self, overrides: JsValue) -> Result<(), JsValue> {
        let overrides: Option<ThemeOverride> = if overrides.is_null() || overrides.is_undefined() {
            None
        } else {
            Some(from_js(overrides, "theme")?)
        };
        Self::with_engine(&self.state, &JsValue::NULL, |e| e.set_theme_override(overrides));
        Ok(())
    }

    /// The resolved theme as `--gc-*` CSS custom properties.
    #[wasm_bindgen(js_name = "themeVariables")]
    pub fn theme_variables(&self) -> JsValue {
        to_js(&self.state.borrow().engine.theme().css_variables())
    }

    #[wasm_bindgen(js_name = "resetState")]
    pub fn reset_state(&mut self) {
        Self::with_engine(&self.state, &JsValue::NULL, Engine::reset_state);
    }

    /// `{col, row}` or `null`.
    #[wasm_bindgen(js_name = "getActiveCell")]
    pub fn get_active_cell(&self) -> JsValue {
        to_js(&self.state.borrow().engine.get_active_cell())
    }

    #[wasm_bindgen(js_name = "getSelection")]
    pub fn get_selection(&self) -> JsValue {
        to_js(self.state.borrow().engine.selection())
    }

    /// Replace the selection with `{kind, ranges}`.
    #[wasm_bindgen(js_name = "setSelection")]
    pub fn set_selection(&mut self, selection: JsValue) -> Result<(), JsValue> {
        let input: SelectionInput = from_js(selection, "selection")?;
        Self::with_engine(&self.state, &JsValue::NULL, |e| {
            e.set_selection_ranges(input.kind, &input.ranges)
        })
        .unwrap_or(Ok(()))?;
        Ok(())
    }

    #[wasm_bindgen(js_name = "scrollBy")]
    pub fn scroll_by(&mut self, dx: f64, dy: f64) -> bool {
        Self::with_engine(&self.state, &JsValue::NULL, |e| e.scroll_by(dx, dy)).unwrap_or(false)
    }

    #[wasm_bindgen(js_name = "scrollTo")]
    pub fn scroll_to(&mut self, left: f64, top: f64) -> bool {
        Self::with_engine(&self.state, &JsValue::NULL, |e| e.scroll_to(left, top)).unwrap_or(false)
    }

    /// Scroll so `(col, row)` is visible. `align` is `"start"`, `"center"`,
    /// `"end"` or `"auto"` (default). Pass -1 on an axis to leave it alone.
    #[wasm_bindgen(js_name = "scrollToItem")]
    pub fn scroll_to_item(&mut self, col: i32, row: i32, align: JsValue) -> Result<bool, JsValue> {
        let align: ScrollAlign = if align.is_undefined() || align.is_null() {
            ScrollAlign::default()
        } else {
            from_js(align, "scroll align")?
        };
        let position = CellPosition::new(col, row);
        Ok(
            Self::with_engine(&self.state, &JsValue::NULL, |e| {
                e.scroll_to_item(position, align)
            })
            .unwrap_or(false),
        )
    }

    /// Screen rectangle `{x, y, width, height}` of a cell or header, or
    /// `null` for an index past the grid.
    #[wasm_bindgen(js_name = "getCellBounds")]
    pub fn get_cell_bounds(&self, col: i32, row: i32) -> JsValue {
        to_js(
            &self
                .state
                .borrow()
                .engine
                .get_cell_bounds(CellPosition::new(col, row)),
        )
    }

    /// `{col, row}` under a canvas point (-1 for header axes), or `null`.
    #[wasm_bindgen(js_name = "getCellIndicesAtPosition")]
    pub fn get_cell_indices_at_position(&self, x: f64, y: f64) -> JsValue {
        to_js(&self.state.borrow().engine.get_cell_indices_at_position(x, y))
    }

    #[wasm_bindgen(js_name = "isEditing")]
    pub fn is_editing(&self) -> bool {
        self.state.borrow().engine.is_editing()
    }

    /// Tell the grid an overlay editor is open, so keys go to the editor.
    #[wasm_bindgen(js_name = "setEditing")]
    pub fn set_editing(&mut self, editing: bool) {
        self.state.borrow_mut().engine.set_editing(editing);
    }

    /// Fit a column to its visible content. Returns the new width.
    #[wasm_bindgen(js_name = "autoSizeColumn")]
    pub fn auto_size_column(&mut self, col: u32) -> Option<f64> {
        let width = {
            let mut s = self.state.borrow_mut();
            let SharedState {
                engine, surface, ..
            } = &mut *s;
            engine.auto_size_column(col, surface)
        };
        if width.is_some() {
            Self::request_redraw(&self.state);
        }
        width
    }

    /// Fit a row to its visible content. Returns the new height.
    #[wasm_bindgen(js_name = "autoSizeRow")]
    pub fn auto_size_row(&mut self, row: u32) -> Option<f64> {
        let height = {
            let mut s = self.state.borrow_mut();
            let SharedState {
                engine, surface, ..
            } = &mut *s;
            engine.auto_size_row(row, surface)
        };
        if height.is_some() {
            Self::request_redraw(&self.state);
        }
        height
    }

    /// Cells whose display text matches `pattern`, as `[{col, row}]`.
    pub fn find(&self, pattern: &str, options: JsValue) -> Result<JsValue, JsValue> {
        let options: SearchOptions = if options.is_undefined() || options.is_null() {
            SearchOptions::default()
        } else {
            from_js(options, "search options")?
        };
        Ok(to_js(&self.state.borrow().engine.find(pattern, options)))
    }

    #[wasm_bindgen(js_name = "registerIcon")]
    pub fn register_icon(&mut self, name: String, url: String) {
        let mut s = self.state.borrow_mut();
        s.engine.resources_mut().sprites.register(name, url);
        s.engine.invalidate();
    }

    /// Start loading `urls` into the image cache. The promise resolves with
    /// the number of images that loaded once every load has settled.
    #[wasm_bindgen(js_name = "preloadImages")]
    pub fn preload_images(&mut self, urls: Vec<String>) -> Promise {
        let handles = self
            .state
            .borrow_mut()
            .engine
            .resources_mut()
            .images
            .preload(&urls, now_ms());
        wasm_bindgen_futures::future_to_promise(async move {
            let mut loaded = 0u32;
            for handle in handles {
                match handle.await {
                    Ok(_) => loaded += 1,
                    Err(e) => log::warn!("preload failed: {e}"),
                }
            }
            Ok(JsValue::from(loaded))
        })
    }

    #[wasm_bindgen(js_name = "contentWidth")]
    pub fn content_width(&self) -> f64 {
        self.state
            .borrow()
            .engine
            .geometry()
            .total_size(crate::layout::Axis::X)
    }

    #[wasm_bindgen(js_name = "contentHeight")]
    pub fn content_height(&self) -> f64 {
        self.state
            .borrow()
            .engine
            .geometry()
            .total_size(crate::layout::Axis::Y)
    }
}

impl CanvasGrid {
    fn create(
        canvas: HtmlCanvasElement,
        get_cell_content: Function,
        config: GridConfig,
    ) -> Result<CanvasGrid, JsValue> {
        console_error_panic_hook::set_once();

        // Image loads finish outside any borrow and ask for a redraw through
        // this slot, filled once the state exists.
        let slot: Rc<RefCell<Weak<RefCell<SharedState>>>> = Rc::new(RefCell::new(Weak::new()));
        let on_ready: Rc<dyn Fn()> = {
            let slot = Rc::clone(&slot);
            Rc::new(move || {
                let state = slot.borrow().upgrade();
                if let Some(state) = state {
                    if let Ok(mut s) = state.try_borrow_mut() {
                        s.engine.invalidate();
                    }
                    Self::request_redraw(&state);
                }
            })
        };
        let resources = Resources::new(&config, DomImageFetcher::new(on_ready));

        let rect = canvas.get_bounding_client_rect();
        let (width, height) = (rect.width(), rect.height());
        let mut surface = CanvasSurface::new(canvas.clone())?;
        surface.resize(width, height, device_pixel_ratio());

        let mut engine = GridEngine::new(config, JsHost::new(get_cell_content), resources)?;
        engine.resize(width, height);

        let state = Rc::new(RefCell::new(SharedState {
            engine,
            surface,
            callbacks: Callbacks::default(),
            render_callback: None,
        }));
        *slot.borrow_mut() = Rc::downgrade(&state);

        let mut listeners = Self::wire_events(&canvas, &state);
        listeners.extend(Self::watch_color_scheme(&state));
        log::debug!("canvas grid created at {width}x{height}");

        Ok(CanvasGrid { state, listeners })
    }

    /// Ask the host for a frame, or paint now when no render callback is set.
    pub(crate) fn request_redraw(state: &Rc<RefCell<SharedState>>) {
        let callback = match state.try_borrow() {
            Ok(s) => s.render_callback.clone(),
            Err(_) => {
                log::debug!("redraw skipped: grid state is borrowed");
                return;
            }
        };
        match callback {
            Some(callback) => {
                if let Err(err) = callback.call0(&JsValue::NULL) {
                    log::warn!("render callback threw: {err:?}");
                }
            }
            None => {
                if let Ok(mut s) = state.try_borrow_mut() {
                    let SharedState {
                        engine, surface, ..
                    } = &mut *s;
                    engine.render(surface, now_ms());
                }
            }
        }
    }
}
