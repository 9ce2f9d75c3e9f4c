//! Selection session: the current [`Selection`] plus active cell and anchor.
//!
//! The session is the only mutable piece of selection state. Each mutation
//! swaps in a new `Selection` value and reports what changed so the caller
//! can notify the host.

use crate::types::{CellPoint, CellPosition, CellRange, Selection, SelectionRange};

/// What a session mutation changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionChange {
    pub selection: bool,
    pub active_cell: bool,
}

impl SessionChange {
    pub fn any(&self) -> bool {
        self.selection || self.active_cell
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionSession {
    selection: Selection,
    active_cell: Option<CellPoint>,
    /// Origin of extend gestures. Header anchors carry a negative index on
    /// the axis they do not span.
    anchor: Option<CellPosition>,
    columns: u32,
    rows: u32,
}

impl SelectionSession {
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn active_cell(&self) -> Option<CellPoint> {
        self.active_cell
    }

    pub fn anchor(&self) -> Option<CellPosition> {
        self.anchor
    }

    pub fn bounds(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Update grid bounds. Anything that no longer fits is cleared.
    pub fn set_bounds(&mut self, columns: u32, rows: u32) -> SessionChange {
        self.columns = columns;
        self.rows = rows;
        let out_of_bounds = self
            .active_cell
            .is_some_and(|p| p.col >= columns || p.row >= rows)
            || !self.selection.fits(columns, rows);
        if out_of_bounds {
            self.clear()
        } else {
            SessionChange::default()
        }
    }

    /// Select a body cell.
    ///
    /// `extend` grows a rectangle from the anchor to `cell`. `toggle` runs
    /// the cell through the algebra: a cell inside the rectangle merges out
    /// (the rectangle keeps its latest corner and the clicked cell), one
    /// outside expands it. Toggling the only selected cell clears. A plain
    /// click replaces the selection and resets the anchor.
    pub fn select_cell(&mut self, cell: CellPoint, extend: bool, toggle: bool) -> SessionChange {
        if extend {
            if let Some(anchor) = self.anchor.and_then(|a| a.cell()) {
                return self.commit(Selection::cells(anchor, cell), Some(cell), self.anchor);
            }
        }
        if toggle {
            let range = SelectionRange::cell(cell);
            if self.selection.cell_range() == Some(CellRange::single(cell)) {
                return self.commit(Selection::None, None, None);
            }
            let selection = self.toggle_range(range);
            let anchor = match &selection {
                Selection::Cells([first, _]) => Some(first.to_position()),
                _ => Some(cell.to_position()),
            };
            return self.commit(selection, Some(cell), anchor);
        }
        self.commit(Selection::cell(cell), Some(cell), Some(cell.to_position()))
    }

    pub fn select_row(&mut self, row: u32, extend: bool, toggle: bool) -> SessionChange {
        let anchor_row = self
            .anchor
            .filter(|a| a.is_row_header())
            .and_then(|a| u32::try_from(a.row).ok());
        let selection = match (extend, toggle, anchor_row) {
            (true, _, Some(from)) => {
                return self.commit(Selection::rows(from, row), self.active_cell, self.anchor)
            }
            (_, true, _) => self.toggle_range(SelectionRange::rows(row, row)),
            _ => Selection::rows(row, row),
        };
        if !selection.contains_row(row) {
            return self.commit_removal(selection);
        }
        let active = (self.columns > 0).then(|| CellPoint::new(0, row));
        self.commit(selection, active, Some(CellPosition::new(-1, to_signed(row))))
    }

    pub fn select_column(&mut self, col: u32, extend: bool, toggle: bool) -> SessionChange {
        let anchor_col = self
            .anchor
            .filter(|a| a.is_column_header())
            .and_then(|a| u32::try_from(a.col).ok());
        let selection = match (extend, toggle, anchor_col) {
            (true, _, Some(from)) => {
                return self.commit(Selection::columns(from, col), self.active_cell, self.anchor)
            }
            (_, true, _) => self.toggle_range(SelectionRange::columns(col, col)),
            _ => Selection::columns(col, col),
        };
        if !selection.contains_column(col) {
            return self.commit_removal(selection);
        }
        let active = (self.rows > 0).then(|| CellPoint::new(col, 0));
        self.commit(selection, active, Some(CellPosition::new(to_signed(col), -1)))
    }

    /// Select every cell as one rectangle. The active cell is kept if set.
    pub fn select_all(&mut self) -> SessionChange {
        if self.columns == 0 || self.rows == 0 {
            return self.clear();
        }
        let origin = CellPoint::new(0, 0);
        let selection = Selection::cells(
            origin,
            CellPoint::new(self.columns - 1, self.rows - 1),
        );
        let active = self.active_cell.or(Some(origin));
        self.commit(selection, active, Some(origin.to_position()))
    }

    /// Drop selection, active cell and anchor. Clearing twice is a no-op.
    pub fn clear(&mut self) -> SessionChange {
        self.commit(Selection::None, None, None)
    }

    /// Grow the current gesture to `cell`: a rectangle from a cell anchor,
    /// or a row/column span from a header anchor.
    pub fn extend_to(&mut self, cell: CellPoint) -> SessionChange {
        match self.anchor {
            Some(a) if a.is_row_header() => self.select_row(cell.row, true, false),
            Some(a) if a.is_column_header() => self.select_column(cell.col, true, false),
            Some(_) => self.select_cell(cell, true, false),
            None => self.select_cell(cell, false, false),
        }
    }

    /// Move the active cell and re-issue a single-cell selection there.
    pub fn move_active(&mut self, cell: CellPoint) -> SessionChange {
        self.select_cell(cell, false, false)
    }

    /// Replace the selection from the host. Ranges past the grid edge are
    /// clipped. The active cell is kept when it is still selected, otherwise
    /// it moves to the selection's first cell.
    pub fn set_selection(&mut self, selection: Selection) -> SessionChange {
        let selection = selection.clip(self.columns, self.rows).serialize();
        let keep_active = self
            .active_cell
            .filter(|p| selection.contains_cell(*p));
        let (active, anchor) = match &selection {
            Selection::None => (keep_active, None),
            Selection::Cells([a, _]) => (keep_active.or(Some(*a)), Some(a.to_position())),
            Selection::Rows(lines) => {
                let first = lines.first().map_or(0, |l| l.start);
                (
                    keep_active.or_else(|| (self.columns > 0).then(|| CellPoint::new(0, first))),
                    Some(CellPosition::new(-1, to_signed(first))),
                )
            }
            Selection::Columns(lines) => {
                let first = lines.first().map_or(0, |l| l.start);
                (
                    keep_active.or_else(|| (self.rows > 0).then(|| CellPoint::new(first, 0))),
                    Some(CellPosition::new(to_signed(first), -1)),
                )
            }
        };
        self.commit(selection, active, anchor)
    }

    /// Set the active cell without touching the selection.
    pub fn set_active_cell(&mut self, cell: Option<CellPoint>) -> SessionChange {
        let selection = self.selection.clone();
        self.commit(selection, cell, self.anchor)
    }

    fn toggle_range(&self, range: SelectionRange) -> Selection {
        if self.selection.includes(&range) {
            self.selection.merge(range)
        } else {
            self.selection.expand(range)
        }
    }

    /// Commit a toggle that took a unit out. The active cell survives only
    /// if it is still selected.
    fn commit_removal(&mut self, selection: Selection) -> SessionChange {
        let active = self.active_cell.filter(|p| selection.contains_cell(*p));
        let anchor = if selection.is_none() { None } else { self.anchor };
        self.commit(selection, active, anchor)
    }

    fn commit(
        &mut self,
        selection: Selection,
        active: Option<CellPoint>,
        anchor: Option<CellPosition>,
    ) -> SessionChange {
        let change = SessionChange {
            selection: selection.serialize() != self.selection.serialize(),
            active_cell: active != self.active_cell,
        };
        self.selection = selection;
        self.active_cell = active;
        self.anchor = anchor;
        if change.any() {
            log::trace!(
                "session: {:?} active={:?}",
                self.selection.kind(),
                self.active_cell
            );
        }
        change
    }
}

fn to_signed(index: u32) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}
