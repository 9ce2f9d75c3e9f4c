//! Pointer and keyboard input.
//!
//! [`Interaction`] turns resolved input into [`SelectionSession`] mutations
//! and collects the host notifications they imply. It never talks to the
//! host directly; the engine dispatches the returned [`Outcome`].

mod hit;
mod host;
mod keyboard;
mod pointer;

pub use hit::{cell_at_clamped, content_x, content_y, hit_test, HitTarget};
pub use host::{GridHost, PointerInput};
pub use keyboard::{key_command, Key, KeyCommand, Motion};
pub use pointer::{PointerPhase, PointerTracker};

use serde::{Deserialize, Serialize};

use crate::layout::{GridGeometry, Viewport};
use crate::session::{SelectionSession, SessionChange};
use crate::types::{CellPoint, CellPosition, Selection};

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Host notification produced by an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Click(CellPosition),
    DoubleClick(CellPosition),
    ContextMenu(CellPosition),
    EditStart(CellPoint),
}

/// Result of feeding one input event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub change: SessionChange,
    pub notices: Vec<Notice>,
    /// Cell to scroll into view
    pub reveal: Option<CellPoint>,
    /// Whether the event was consumed (the browser default should be
    /// suppressed).
    pub handled: bool,
}

impl Outcome {
    fn changed(change: SessionChange) -> Self {
        Self {
            change,
            handled: true,
            ..Self::default()
        }
    }

    fn notice(mut self, notice: Notice) -> Self {
        self.handled = true;
        self.notices.push(notice);
        self
    }

    pub fn needs_redraw(&self) -> bool {
        self.change.any()
    }
}

/// Per-grid input state.
#[derive(Debug, Clone)]
pub struct Interaction {
    pointer: PointerTracker,
    /// Whether the current press may grow into a drag selection
    drag_enabled: bool,
    page_rows: u32,
    editing: bool,
}

impl Interaction {
    pub fn new(drag_threshold: f64, page_rows: u32) -> Self {
        Self {
            pointer: PointerTracker::new(drag_threshold),
            drag_enabled: false,
            page_rows,
            editing: false,
        }
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn configure(&mut self, drag_threshold: f64, page_rows: u32) {
        self.pointer.set_threshold(drag_threshold);
        self.page_rows = page_rows;
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// While editing, keyboard navigation is left to the host's editor.
    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }

    /// Forget any gesture in progress.
    pub fn reset(&mut self) {
        self.pointer.cancel();
        self.drag_enabled = false;
        self.editing = false;
    }

    pub fn pointer_down(
        &mut self,
        session: &mut SelectionSession,
        target: HitTarget,
        input: &PointerInput,
    ) -> Outcome {
        let mods = input.modifiers;
        let change = match target {
            HitTarget::None => {
                self.pointer.cancel();
                return Outcome::default();
            }
            HitTarget::Cell(cell) => session.select_cell(cell, mods.shift, mods.command()),
            HitTarget::ColumnHeader { col } => session.select_column(col, mods.shift, mods.command()),
            HitTarget::RowHeader { row } => session.select_row(row, mods.shift, mods.command()),
            HitTarget::CornerHeader => session.select_all(),
        };
        self.pointer.down(input.x, input.y, target);
        // Toggle clicks and select-all never grow into a drag.
        self.drag_enabled = !mods.command()
            && !matches!(target, HitTarget::CornerHeader)
            && session.anchor().is_some();
        Outcome::changed(change)
    }

    pub fn pointer_move(
        &mut self,
        session: &mut SelectionSession,
        geometry: &GridGeometry,
        viewport: &Viewport,
        x: f64,
        y: f64,
    ) -> Outcome {
        if !self.pointer.move_to(x, y) || !self.drag_enabled {
            return Outcome::default();
        }
        let Some(cell) = cell_at_clamped(geometry, viewport, x, y) else {
            return Outcome::default();
        };
        let change = session.extend_to(cell);
        let mut outcome = Outcome::changed(change);
        outcome.reveal = change.any().then_some(cell);
        outcome
    }

    /// Release. A press that never became a drag reports a click.
    pub fn pointer_up(&mut self) -> Outcome {
        self.drag_enabled = false;
        match self.pointer.up().and_then(|target| target.position()) {
            Some(position) => Outcome::default().notice(Notice::Click(position)),
            None => Outcome::default(),
        }
    }

    pub fn double_click(&mut self, target: HitTarget) -> Outcome {
        match target {
            HitTarget::Cell(cell) => Outcome::default()
                .notice(Notice::DoubleClick(cell.to_position()))
                .notice(Notice::EditStart(cell)),
            other => match other.position() {
                Some(position) => Outcome::default().notice(Notice::DoubleClick(position)),
                None => Outcome::default(),
            },
        }
    }

    /// Right click. A cell outside the selection becomes the selection
    /// first, so the host's menu acts on what the user clicked.
    pub fn context_menu(&mut self, session: &mut SelectionSession, target: HitTarget) -> Outcome {
        let Some(position) = target.position() else {
            return Outcome::default();
        };
        let mut outcome = Outcome::default();
        if let HitTarget::Cell(cell) = target {
            if !session.selection().contains_cell(cell) {
                outcome.change = session.select_cell(cell, false, false);
            }
        }
        outcome.notice(Notice::ContextMenu(position))
    }

    pub fn key_down(&mut self, session: &mut SelectionSession, key: Key, mods: Modifiers) -> Outcome {
        if self.editing {
            return Outcome::default();
        }
        let Some(command) = key_command(key, mods, self.page_rows) else {
            return Outcome::default();
        };
        let (columns, rows) = session.bounds();
        match command {
            KeyCommand::Move(motion) => {
                let from = session.active_cell().unwrap_or(CellPoint::new(0, 0));
                let Some(target) = motion.apply(from, columns, rows) else {
                    return Outcome::default();
                };
                let mut outcome = Outcome::changed(session.move_active(target));
                outcome.reveal = Some(target);
                outcome
            }
            KeyCommand::Extend(motion) => {
                // Grow from the moving corner, not the anchor.
                let from = match session.selection() {
                    Selection::Cells([_, focus]) => *focus,
                    _ => session.active_cell().unwrap_or(CellPoint::new(0, 0)),
                };
                let Some(target) = motion.apply(from, columns, rows) else {
                    return Outcome::default();
                };
                let mut outcome = Outcome::changed(session.select_cell(target, true, false));
                outcome.reveal = Some(target);
                outcome
            }
            KeyCommand::Clear => Outcome::changed(session.clear()),
            KeyCommand::SelectAll => Outcome::changed(session.select_all()),
            KeyCommand::Edit => match session.active_cell() {
                Some(cell) => Outcome::default().notice(Notice::EditStart(cell)),
                None => Outcome::default(),
            },
        }
    }
}
