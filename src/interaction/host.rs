//! Engine to host boundary.

use serde::Serialize;

use super::Modifiers;
use crate::render::CellProvider;
use crate::types::{CellPoint, CellPosition, Selection};

/// Pointer event data forwarded with click callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerInput {
    /// Surface-relative CSS pixels
    pub x: f64,
    pub y: f64,
    /// DOM `MouseEvent.button`
    pub button: i16,
    pub modifiers: Modifiers,
}

impl PointerInput {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// The host owning the grid: supplies cell content and receives
/// notifications. Every callback defaults to a no-op.
pub trait GridHost: CellProvider {
    fn on_selection_change(&mut self, _selection: &Selection) {}

    fn on_active_cell_change(&mut self, _cell: Option<CellPosition>) {}

    fn on_cell_click(&mut self, _position: CellPosition, _input: &PointerInput) {}

    fn on_cell_double_click(&mut self, _position: CellPosition, _input: &PointerInput) {}

    fn on_context_menu(&mut self, _position: CellPosition, _input: &PointerInput) {}

    /// Edit intent for `cell` (double-click or Enter). The engine does not
    /// enter an editing state itself.
    fn on_edit_start(&mut self, _cell: CellPoint) {}
}
