//! JavaScript side of the [`GridHost`] contract.
//!
//! Cell content is pulled synchronously from a JS function during paint.
//! Notifications are queued and delivered by the viewer once its shared
//! state is no longer borrowed, so JS callbacks may call back into the grid.

use js_sys::{Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::interaction::{GridHost, PointerInput};
use crate::render::{col_to_letter, CellProvider};
use crate::types::{CellContent, CellPoint, CellPosition, Selection};

/// A notification waiting for delivery.
#[derive(Debug, Clone)]
pub(crate) enum HostEvent {
    SelectionChange(Selection),
    ActiveCellChange(Option<CellPosition>),
    CellClick(CellPosition),
    CellDoubleClick(CellPosition),
    ContextMenu(CellPosition),
    EditStart(CellPoint),
}

pub(crate) struct JsHost {
    get_cell_content: Function,
    get_column_title: Option<Function>,
    outbox: Vec<HostEvent>,
}

impl JsHost {
    pub(crate) fn new(get_cell_content: Function) -> Self {
        Self {
            get_cell_content,
            get_column_title: None,
            outbox: Vec::new(),
        }
    }

    pub(crate) fn set_column_title(&mut self, f: Option<Function>) {
        self.get_column_title = f;
    }

    pub(crate) fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.outbox)
    }
}

impl CellProvider for JsHost {
    fn cell_content(&self, cell: CellPoint) -> CellContent {
        let value = match self.get_cell_content.call2(
            &JsValue::NULL,
            &JsValue::from(cell.col),
            &JsValue::from(cell.row),
        ) {
            Ok(value) => value,
            Err(err) => {
                log::debug!("getCellContent({}, {}) threw: {err:?}", cell.col, cell.row);
                return CellContent::default();
            }
        };
        if value.is_undefined() || value.is_null() {
            return CellContent::default();
        }
        serde_wasm_bindgen::from_value(value).unwrap_or_else(|e| {
            log::debug!("bad cell content at ({}, {}): {e}", cell.col, cell.row);
            CellContent::default()
        })
    }

    fn column_title(&self, col: u32) -> String {
        self.get_column_title
            .as_ref()
            .and_then(|f| f.call1(&JsValue::NULL, &JsValue::from(col)).ok())
            .and_then(|v| v.as_string())
            .unwrap_or_else(|| col_to_letter(col))
    }
}

impl GridHost for JsHost {
    fn on_selection_change(&mut self, selection: &Selection) {
        self.outbox.push(HostEvent::SelectionChange(selection.clone()));
    }

    fn on_active_cell_change(&mut self, cell: Option<CellPosition>) {
        self.outbox.push(HostEvent::ActiveCellChange(cell));
    }

    fn on_cell_click(&mut self, position: CellPosition, _input: &PointerInput) {
        self.outbox.push(HostEvent::CellClick(position));
    }

    fn on_cell_double_click(&mut self, position: CellPosition, _input: &PointerInput) {
        self.outbox.push(HostEvent::CellDoubleClick(position));
    }

    fn on_context_menu(&mut self, position: CellPosition, _input: &PointerInput) {
        self.outbox.push(HostEvent::ContextMenu(position));
    }

    fn on_edit_start(&mut self, cell: CellPoint) {
        self.outbox.push(HostEvent::EditStart(cell));
    }
}

/// JS callbacks registered by the host. All optional.
#[derive(Debug, Clone, Default)]
pub(crate) struct Callbacks {
    pub(crate) on_selection_change: Option<Function>,
    pub(crate) on_active_cell_change: Option<Function>,
    pub(crate) on_cell_click: Option<Function>,
    pub(crate) on_cell_double_click: Option<Function>,
    pub(crate) on_context_menu: Option<Function>,
    pub(crate) on_edit_start: Option<Function>,
}

fn function_prop(obj: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(obj, &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.dyn_into::<Function>().ok())
}

impl Callbacks {
    /// Read the `on*` functions from a plain JS object. Missing or
    /// non-function properties are left unset.
    pub(crate) fn from_object(obj: &JsValue) -> Self {
        Self {
            on_selection_change: function_prop(obj, "onSelectionChange"),
            on_active_cell_change: function_prop(obj, "onActiveCellChange"),
            on_cell_click: function_prop(obj, "onCellClick"),
            on_cell_double_click: function_prop(obj, "onCellDoubleClick"),
            on_context_menu: function_prop(obj, "onContextMenu"),
            on_edit_start: function_prop(obj, "onEditStart"),
        }
    }

    /// Deliver queued events. `raw` is the DOM event that caused them, or
    /// `null` for imperative calls.
    pub(crate) fn deliver(&self, events: Vec<HostEvent>, raw: &JsValue) {
        for event in events {
            let (callback, payload) = match event {
                HostEvent::SelectionChange(selection) => {
                    (&self.on_selection_change, to_js(&selection))
                }
                HostEvent::ActiveCellChange(cell) => (&self.on_active_cell_change, to_js(&cell)),
                HostEvent::CellClick(position) => (&self.on_cell_click, to_js(&position)),
                HostEvent::CellDoubleClick(position) => {
                    (&self.on_cell_double_click, to_js(&position))
                }
                HostEvent::ContextMenu(position) => (&self.on_context_menu, to_js(&position)),
                HostEvent::EditStart(cell) => (&self.on_edit_start, to_js(&cell)),
            };
            if let Some(callback) = callback {
                if let Err(err) = callback.call2(&JsValue::NULL, &payload, raw) {
                    log::warn!("grid callback threw: {err:?}");
                }
            }
        }
    }
}

/// Serialize with `null` for `None` and plain objects for maps.
pub(crate) fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}
