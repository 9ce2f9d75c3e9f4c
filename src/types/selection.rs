//! Selection algebra.
//!
//! A [`Selection`] is an immutable value: every operation returns a new
//! selection and leaves the receiver untouched. Row and column selections
//! keep a sorted list of disjoint, non-adjacent ranges; a cell selection is
//! always a single rectangle described by two corner points.

use serde::{Deserialize, Serialize};

use super::CellPoint;
use crate::error::{GridError, Result};

/// Inclusive range of rows or columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    /// Create a range, swapping the ends if needed so that `start <= end`.
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn single(index: u32) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    pub fn contains(&self, index: u32) -> bool {
        index >= self.start && index <= self.end
    }

    pub fn covers(&self, other: &LineRange) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    pub fn overlaps(&self, other: &LineRange) -> bool {
        !(self.end < other.start || self.start > other.end)
    }

    fn touches(&self, other: &LineRange) -> bool {
        self.overlaps(other)
            || self.end.checked_add(1) == Some(other.start)
            || other.end.checked_add(1) == Some(self.start)
    }

    fn union(&self, other: &LineRange) -> LineRange {
        LineRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The parts of `self` not covered by `other` (0, 1 or 2 ranges).
    fn subtract(&self, other: &LineRange) -> Vec<LineRange> {
        if !self.overlaps(other) {
            return vec![*self];
        }
        let mut parts = Vec::with_capacity(2);
        if other.start > self.start {
            parts.push(LineRange::new(self.start, other.start - 1));
        }
        if other.end < self.end {
            parts.push(LineRange::new(other.end + 1, self.end));
        }
        parts
    }
}

/// Inclusive rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    pub start_col: u32,
    pub start_row: u32,
    pub end_col: u32,
    pub end_row: u32,
}

impl CellRange {
    /// Normalized rectangle spanning two corners in any order.
    pub fn from_corners(a: CellPoint, b: CellPoint) -> Self {
        Self {
            start_col: a.col.min(b.col),
            start_row: a.row.min(b.row),
            end_col: a.col.max(b.col),
            end_row: a.row.max(b.row),
        }
    }

    pub fn single(p: CellPoint) -> Self {
        Self::from_corners(p, p)
    }

    pub fn top_left(&self) -> CellPoint {
        CellPoint::new(self.start_col, self.start_row)
    }

    pub fn bottom_right(&self) -> CellPoint {
        CellPoint::new(self.end_col, self.end_row)
    }

    pub fn cols(&self) -> LineRange {
        LineRange::new(self.start_col, self.end_col)
    }

    pub fn rows(&self) -> LineRange {
        LineRange::new(self.start_row, self.end_row)
    }

    pub fn contains(&self, p: CellPoint) -> bool {
        self.cols().contains(p.col) && self.rows().contains(p.row)
    }

    pub fn covers(&self, other: &CellRange) -> bool {
        self.cols().covers(&other.cols()) && self.rows().covers(&other.rows())
    }

    pub fn is_single_cell(&self) -> bool {
        self.start_col == self.end_col && self.start_row == self.end_row
    }
}

/// A single range as supplied to the algebra operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SelectionRange {
    Cells(CellRange),
    Rows(LineRange),
    Columns(LineRange),
}

impl SelectionRange {
    pub fn kind(&self) -> SelectionKind {
        match self {
            Self::Cells(_) => SelectionKind::Cells,
            Self::Rows(_) => SelectionKind::Rows,
            Self::Columns(_) => SelectionKind::Columns,
        }
    }

    pub fn cell(p: CellPoint) -> Self {
        Self::Cells(CellRange::single(p))
    }

    pub fn rows(a: u32, b: u32) -> Self {
        Self::Rows(LineRange::new(a, b))
    }

    pub fn columns(a: u32, b: u32) -> Self {
        Self::Columns(LineRange::new(a, b))
    }
}

/// Type tag of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionKind {
    None,
    Rows,
    Columns,
    Cells,
}

/// The current selection shape.
///
/// Deserializing goes through [`Selection::from_ranges`], so empty row or
/// column lists and inverted ranges are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "ranges",
    rename_all = "camelCase",
    try_from = "SelectionInput"
)]
pub enum Selection {
    #[default]
    None,
    /// Sorted, disjoint, non-adjacent row ranges (never empty).
    Rows(Vec<LineRange>),
    /// Sorted, disjoint, non-adjacent column ranges (never empty).
    Columns(Vec<LineRange>),
    /// Two corner points of a single rectangle, in gesture order.
    Cells([CellPoint; 2]),
}

/// Wire shape of [`Selection`] before validation.
#[derive(Deserialize)]
#[serde(tag = "type", content = "ranges", rename_all = "camelCase")]
enum SelectionInput {
    None,
    Rows(Vec<LineRange>),
    Columns(Vec<LineRange>),
    Cells([CellPoint; 2]),
}

impl TryFrom<SelectionInput> for Selection {
    type Error = GridError;

    fn try_from(input: SelectionInput) -> Result<Self> {
        let lines = |lines: &[LineRange], wrap: fn(LineRange) -> SelectionRange| {
            lines
                .iter()
                .map(|l| {
                    if l.start > l.end {
                        Err(GridError::InvalidSelection(format!(
                            "range start {} is after end {}",
                            l.start, l.end
                        )))
                    } else {
                        Ok(wrap(*l))
                    }
                })
                .collect::<Result<Vec<_>>>()
        };
        match input {
            SelectionInput::None => Self::from_ranges(SelectionKind::None, &[]),
            SelectionInput::Rows(l) => {
                Self::from_ranges(SelectionKind::Rows, &lines(&l, SelectionRange::Rows)?)
            }
            SelectionInput::Columns(l) => {
                Self::from_ranges(SelectionKind::Columns, &lines(&l, SelectionRange::Columns)?)
            }
            SelectionInput::Cells([a, b]) => Self::from_ranges(
                SelectionKind::Cells,
                &[SelectionRange::cell(a), SelectionRange::cell(b)],
            ),
        }
    }
}

impl Selection {
    /// Build a selection from a kind and a raw range list, validating shape.
    ///
    /// `Cells` requires exactly two single-cell ranges (the corners) or one
    /// rectangle; `Rows`/`Columns` require at least one range of the matching
    /// type; `None` requires an empty list.
    pub fn from_ranges(kind: SelectionKind, ranges: &[SelectionRange]) -> Result<Self> {
        match kind {
            SelectionKind::None => {
                if ranges.is_empty() {
                    Ok(Self::None)
                } else {
                    Err(GridError::InvalidSelection(format!(
                        "none selection cannot carry {} ranges",
                        ranges.len()
                    )))
                }
            }
            SelectionKind::Rows | SelectionKind::Columns => {
                if ranges.is_empty() {
                    return Err(GridError::InvalidSelection(format!(
                        "{kind:?} selection requires at least one range"
                    )));
                }
                let mut lines = Vec::with_capacity(ranges.len());
                for range in ranges {
                    match (kind, range) {
                        (SelectionKind::Rows, SelectionRange::Rows(r))
                        | (SelectionKind::Columns, SelectionRange::Columns(r)) => {
                            lines.push(LineRange::new(r.start, r.end));
                        }
                        _ => {
                            return Err(GridError::InvalidSelection(format!(
                                "{kind:?} selection cannot contain a {:?} range",
                                range.kind()
                            )))
                        }
                    }
                }
                let lines = normalize_lines(lines);
                Ok(if kind == SelectionKind::Rows {
                    Self::Rows(lines)
                } else {
                    Self::Columns(lines)
                })
            }
            SelectionKind::Cells => {
                let mut corners = Vec::with_capacity(2);
                for range in ranges {
                    match range {
                        SelectionRange::Cells(r) if ranges.len() == 1 => {
                            corners.push(r.top_left());
                            corners.push(r.bottom_right());
                        }
                        SelectionRange::Cells(r) if r.is_single_cell() => {
                            corners.push(r.top_left());
                        }
                        SelectionRange::Cells(_) => {
                            return Err(GridError::InvalidSelection(
                                "cells selection corners must be single cells".to_string(),
                            ))
                        }
                        other => {
                            return Err(GridError::InvalidSelection(format!(
                                "cells selection cannot contain a {:?} range",
                                other.kind()
                            )))
                        }
                    }
                }
                match corners.as_slice() {
                    [a, b] => Ok(Self::Cells([*a, *b])),
                    _ => Err(GridError::InvalidSelection(format!(
                        "cells selection requires exactly 2 corner points, got {}",
                        ranges.len()
                    ))),
                }
            }
        }
    }

    pub fn cell(p: CellPoint) -> Self {
        Self::Cells([p, p])
    }

    pub fn cells(anchor: CellPoint, focus: CellPoint) -> Self {
        Self::Cells([anchor, focus])
    }

    pub fn rows(a: u32, b: u32) -> Self {
        Self::Rows(vec![LineRange::new(a, b)])
    }

    pub fn columns(a: u32, b: u32) -> Self {
        Self::Columns(vec![LineRange::new(a, b)])
    }

    pub fn kind(&self) -> SelectionKind {
        match self {
            Self::None => SelectionKind::None,
            Self::Rows(_) => SelectionKind::Rows,
            Self::Columns(_) => SelectionKind::Columns,
            Self::Cells(_) => SelectionKind::Cells,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The normalized rectangle of a cell selection.
    pub fn cell_range(&self) -> Option<CellRange> {
        match self {
            Self::Cells([a, b]) => Some(CellRange::from_corners(*a, *b)),
            _ => None,
        }
    }

    /// Add `range` to the selection.
    ///
    /// Rows/columns: coalesce into an overlapping range if there is one,
    /// otherwise append; the list is re-serialized either way. Cells: keep the
    /// two most recent corner points. A range of a different kind starts a new
    /// selection of that kind.
    pub fn expand(&self, range: SelectionRange) -> Selection {
        match (self, range) {
            (Self::Rows(lines), SelectionRange::Rows(r)) => Self::Rows(expand_lines(lines, r)),
            (Self::Columns(lines), SelectionRange::Columns(r)) => {
                Self::Columns(expand_lines(lines, r))
            }
            (Self::Cells(corners), SelectionRange::Cells(r)) => {
                Self::Cells(latest_corners(corners, &r))
            }
            (_, range) => Self::from_range(range),
        }
    }

    /// Toggle `range` against the selection.
    ///
    /// Rows/columns: every existing range overlapping `range` is split into
    /// the parts outside it; if nothing overlapped, `range` is added. Removing
    /// the last range yields [`Selection::None`]. Cells: same corner collapse
    /// as [`Selection::expand`].
    pub fn merge(&self, range: SelectionRange) -> Selection {
        match (self, range) {
            (Self::Rows(lines), SelectionRange::Rows(r)) => {
                merge_lines(lines, r).map_or(Self::None, Self::Rows)
            }
            (Self::Columns(lines), SelectionRange::Columns(r)) => {
                merge_lines(lines, r).map_or(Self::None, Self::Columns)
            }
            (Self::Cells(corners), SelectionRange::Cells(r)) => {
                Self::Cells(latest_corners(corners, &r))
            }
            (_, range) => Self::from_range(range),
        }
    }

    /// Whether `range` is entirely inside the selection.
    pub fn includes(&self, range: &SelectionRange) -> bool {
        match (self, range) {
            (Self::Rows(lines), SelectionRange::Rows(r))
            | (Self::Columns(lines), SelectionRange::Columns(r)) => {
                lines.iter().any(|l| l.covers(r))
            }
            (Self::Cells([a, b]), SelectionRange::Cells(r)) => {
                CellRange::from_corners(*a, *b).covers(r)
            }
            _ => false,
        }
    }

    /// Whether the selection contains the given body cell. Row and column
    /// selections contain every cell of their lines.
    pub fn contains_cell(&self, p: CellPoint) -> bool {
        match self {
            Self::None => false,
            Self::Rows(lines) => lines.iter().any(|l| l.contains(p.row)),
            Self::Columns(lines) => lines.iter().any(|l| l.contains(p.col)),
            Self::Cells([a, b]) => CellRange::from_corners(*a, *b).contains(p),
        }
    }

    pub fn contains_row(&self, row: u32) -> bool {
        matches!(self, Self::Rows(lines) if lines.iter().any(|l| l.contains(row)))
    }

    pub fn contains_column(&self, col: u32) -> bool {
        matches!(self, Self::Columns(lines) if lines.iter().any(|l| l.contains(col)))
    }

    /// Whether every selected unit lies inside a grid of the given size.
    pub fn fits(&self, columns: u32, rows: u32) -> bool {
        let fits = |lines: &[LineRange], limit: u32| lines.iter().all(|l| l.end < limit);
        match self {
            Self::None => true,
            Self::Rows(lines) => fits(lines, rows),
            Self::Columns(lines) => fits(lines, columns),
            Self::Cells(corners) => corners.iter().all(|p| p.col < columns && p.row < rows),
        }
    }

    /// The part of the selection inside a grid of the given size. Ranges
    /// past the edge are cut; a selection left with nothing becomes `None`.
    pub fn clip(&self, columns: u32, rows: u32) -> Selection {
        let clip_lines = |lines: &[LineRange], limit: u32| -> Vec<LineRange> {
            lines
                .iter()
                .filter(|l| l.start < limit)
                .map(|l| LineRange::new(l.start, l.end.min(limit - 1)))
                .collect()
        };
        match self {
            Self::None => Self::None,
            Self::Rows(lines) => {
                let lines = clip_lines(lines, rows);
                if lines.is_empty() {
                    Self::None
                } else {
                    Self::Rows(lines)
                }
            }
            Self::Columns(lines) => {
                let lines = clip_lines(lines, columns);
                if lines.is_empty() {
                    Self::None
                } else {
                    Self::Columns(lines)
                }
            }
            Self::Cells([a, b]) => {
                let r = CellRange::from_corners(*a, *b);
                if r.start_col >= columns || r.start_row >= rows {
                    return Self::None;
                }
                let clamp = |p: &CellPoint| {
                    CellPoint::new(p.col.min(columns - 1), p.row.min(rows - 1))
                };
                Self::Cells([clamp(a), clamp(b)])
            }
        }
    }

    /// Canonical form: row/column ranges sorted and fused, cell corners
    /// normalized to top-left / bottom-right.
    pub fn serialize(&self) -> Selection {
        match self {
            Self::None => Self::None,
            Self::Rows(lines) => Self::Rows(normalize_lines(lines.clone())),
            Self::Columns(lines) => Self::Columns(normalize_lines(lines.clone())),
            Self::Cells([a, b]) => {
                let r = CellRange::from_corners(*a, *b);
                Self::Cells([r.top_left(), r.bottom_right()])
            }
        }
    }

    /// The canonical range list of this selection.
    pub fn ranges(&self) -> Vec<SelectionRange> {
        match self.serialize() {
            Self::None => Vec::new(),
            Self::Rows(lines) => lines.into_iter().map(SelectionRange::Rows).collect(),
            Self::Columns(lines) => lines.into_iter().map(SelectionRange::Columns).collect(),
            Self::Cells([a, b]) => vec![SelectionRange::Cells(CellRange::from_corners(a, b))],
        }
    }

    /// Every selected unit as its own single-unit range: one per row, one
    /// per column, or one per cell of the rectangle.
    pub fn flatten(&self) -> Vec<SelectionRange> {
        match self.serialize() {
            Self::None => Vec::new(),
            Self::Rows(lines) => lines
                .iter()
                .flat_map(|l| l.start..=l.end)
                .map(|i| SelectionRange::Rows(LineRange::single(i)))
                .collect(),
            Self::Columns(lines) => lines
                .iter()
                .flat_map(|l| l.start..=l.end)
                .map(|i| SelectionRange::Columns(LineRange::single(i)))
                .collect(),
            Self::Cells([a, b]) => {
                let r = CellRange::from_corners(a, b);
                (r.start_row..=r.end_row)
                    .flat_map(|row| {
                        (r.start_col..=r.end_col)
                            .map(move |col| SelectionRange::cell(CellPoint::new(col, row)))
                    })
                    .collect()
            }
        }
    }

    /// Compare against a range list after canonicalizing both sides.
    pub fn equals(&self, ranges: &[SelectionRange]) -> bool {
        let Some(first) = ranges.first() else {
            return self.is_none();
        };
        match Self::from_ranges(first.kind(), ranges) {
            Ok(other) => self.serialize() == other.serialize(),
            Err(_) => false,
        }
    }

    fn from_range(range: SelectionRange) -> Selection {
        match range {
            SelectionRange::Rows(r) => Self::Rows(vec![r]),
            SelectionRange::Columns(r) => Self::Columns(vec![r]),
            SelectionRange::Cells(r) => Self::Cells([r.top_left(), r.bottom_right()]),
        }
    }
}

fn expand_lines(lines: &[LineRange], range: LineRange) -> Vec<LineRange> {
    let range = LineRange::new(range.start, range.end);
    let mut out = lines.to_vec();
    match out.iter_mut().find(|l| l.overlaps(&range)) {
        Some(existing) => *existing = existing.union(&range),
        None => out.push(range),
    }
    normalize_lines(out)
}

fn merge_lines(lines: &[LineRange], range: LineRange) -> Option<Vec<LineRange>> {
    let range = LineRange::new(range.start, range.end);
    if !lines.iter().any(|l| l.overlaps(&range)) {
        let mut out = lines.to_vec();
        out.push(range);
        return Some(normalize_lines(out));
    }
    let out: Vec<LineRange> = lines.iter().flat_map(|l| l.subtract(&range)).collect();
    if out.is_empty() {
        None
    } else {
        Some(normalize_lines(out))
    }
}

fn latest_corners(corners: &[CellPoint; 2], range: &CellRange) -> [CellPoint; 2] {
    let [_, last] = *corners;
    if range.is_single_cell() {
        [last, range.top_left()]
    } else {
        [range.top_left(), range.bottom_right()]
    }
}

/// Sort and fuse overlapping or adjacent ranges.
fn normalize_lines(mut lines: Vec<LineRange>) -> Vec<LineRange> {
    if lines.len() <= 1 {
        return lines;
    }
    lines.sort_by_key(|r| (r.start, r.end));
    let mut merged: Vec<LineRange> = Vec::with_capacity(lines.len());
    for range in lines {
        if let Some(last) = merged.last_mut() {
            if last.touches(&range) {
                *last = last.union(&range);
                continue;
            }
        }
        merged.push(range);
    }
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use super::*;

    fn is_canonical(lines: &[LineRange]) -> bool {
        lines.windows(2).all(|w| w[0].end.saturating_add(1) < w[1].start)
            && lines.iter().all(|l| l.start <= l.end)
    }

    #[test]
    fn test_from_ranges_validates_shape() {
        assert!(Selection::from_ranges(SelectionKind::Rows, &[]).is_err());
        assert!(Selection::from_ranges(SelectionKind::Columns, &[]).is_err());
        assert!(Selection::from_ranges(
            SelectionKind::Cells,
            &[SelectionRange::cell(CellPoint::new(0, 0))]
        )
        .is_ok());
        assert!(Selection::from_ranges(
            SelectionKind::Cells,
            &[
                SelectionRange::cell(CellPoint::new(0, 0)),
                SelectionRange::cell(CellPoint::new(1, 1)),
                SelectionRange::cell(CellPoint::new(2, 2)),
            ]
        )
        .is_err());
        assert!(Selection::from_ranges(SelectionKind::Rows, &[SelectionRange::columns(0, 1)])
            .is_err());
        assert!(
            Selection::from_ranges(SelectionKind::None, &[SelectionRange::rows(0, 1)]).is_err()
        );
    }

    #[test]
    fn test_expand_coalesces_overlap() {
        let sel = Selection::rows(2, 5).expand(SelectionRange::rows(4, 8));
        assert_eq!(sel, Selection::Rows(vec![LineRange::new(2, 8)]));
    }

    #[test]
    fn test_expand_fuses_adjacent() {
        let sel = Selection::rows(2, 5)
            .expand(SelectionRange::rows(10, 12))
            .expand(SelectionRange::rows(6, 9));
        assert_eq!(sel, Selection::Rows(vec![LineRange::new(2, 12)]));
    }

    #[test]
    fn test_expand_appends_sorted() {
        let sel = Selection::columns(10, 12).expand(SelectionRange::columns(1, 2));
        assert_eq!(
            sel,
            Selection::Columns(vec![LineRange::new(1, 2), LineRange::new(10, 12)])
        );
    }

    #[test]
    fn test_merge_splits_middle() {
        let sel = Selection::rows(0, 10).merge(SelectionRange::rows(4, 4));
        assert_eq!(
            sel,
            Selection::Rows(vec![LineRange::new(0, 3), LineRange::new(5, 10)])
        );
    }

    #[test]
    fn test_merge_removes_last_range() {
        let sel = Selection::rows(3, 3).merge(SelectionRange::rows(3, 3));
        assert_eq!(sel, Selection::None);
    }

    #[test]
    fn test_merge_adds_when_disjoint() {
        let sel = Selection::rows(0, 1).merge(SelectionRange::rows(5, 6));
        assert!(sel.includes(&SelectionRange::rows(5, 6)));
        assert!(sel.includes(&SelectionRange::rows(0, 1)));
    }

    #[test]
    fn test_cells_keep_two_latest_corners() {
        let sel = Selection::cell(CellPoint::new(1, 1))
            .expand(SelectionRange::cell(CellPoint::new(4, 4)))
            .expand(SelectionRange::cell(CellPoint::new(6, 2)));
        assert_eq!(
            sel,
            Selection::Cells([CellPoint::new(4, 4), CellPoint::new(6, 2)])
        );
    }

    #[test]
    fn test_serialize_normalizes_drag_direction() {
        let sel = Selection::cells(CellPoint::new(5, 7), CellPoint::new(2, 3));
        assert_eq!(
            sel.serialize(),
            Selection::Cells([CellPoint::new(2, 3), CellPoint::new(5, 7)])
        );
        assert_eq!(sel.serialize(), sel.serialize().serialize());
    }

    #[test]
    fn test_includes_cells() {
        let sel = Selection::cells(CellPoint::new(0, 0), CellPoint::new(3, 3));
        assert!(sel.includes(&SelectionRange::cell(CellPoint::new(2, 2))));
        assert!(!sel.includes(&SelectionRange::cell(CellPoint::new(4, 2))));
        assert!(!sel.includes(&SelectionRange::rows(0, 0)));
    }

    #[test]
    fn test_flatten() {
        let sel = Selection::Rows(vec![LineRange::new(1, 2), LineRange::new(5, 5)]);
        assert_eq!(
            sel.flatten(),
            vec![
                SelectionRange::rows(1, 1),
                SelectionRange::rows(2, 2),
                SelectionRange::rows(5, 5)
            ]
        );
        let sel = Selection::cells(CellPoint::new(0, 0), CellPoint::new(1, 1));
        assert_eq!(sel.flatten().len(), 4);
    }

    #[test]
    fn test_equals_canonicalizes() {
        let sel = Selection::Rows(vec![LineRange::new(1, 4)]);
        assert!(sel.equals(&[SelectionRange::rows(1, 2), SelectionRange::rows(3, 4)]));
        assert!(!sel.equals(&[SelectionRange::rows(1, 3)]));
        assert!(Selection::None.equals(&[]));
    }

    #[test]
    fn test_random_sequences_stay_canonical() {
        // Deterministic pseudo-random walk over expand/merge.
        let mut seed: u32 = 0x2545_F491;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed
        };
        let mut sel = Selection::rows(0, 0);
        for _ in 0..500 {
            let a = next() % 60;
            let b = a + next() % 6;
            let range = SelectionRange::rows(a, b);
            if sel.is_none() {
                sel = Selection::rows(0, 0);
            }
            sel = if next() % 2 == 0 {
                let out = sel.expand(range);
                assert!(out.includes(&range));
                out
            } else {
                sel.merge(range)
            };
            match &sel {
                Selection::Rows(lines) => assert!(is_canonical(lines), "{lines:?}"),
                Selection::None => {}
                other => panic!("unexpected kind {other:?}"),
            }
        }
    }

    #[test]
    fn test_deserialize_rejects_malformed_payloads() {
        let empty = serde_json::from_str::<Selection>(r#"{"type":"rows","ranges":[]}"#);
        assert!(empty.is_err());
        let inverted = serde_json::from_str::<Selection>(
            r#"{"type":"rows","ranges":[{"start":5,"end":1},{"start":2,"end":3}]}"#,
        );
        assert!(inverted.is_err());
        let back: Selection = serde_json::from_str(
            r#"{"type":"columns","ranges":[{"start":4,"end":6},{"start":0,"end":5}]}"#,
        )
        .unwrap();
        assert_eq!(back, Selection::columns(0, 6));
        let none: Selection = serde_json::from_str(r#"{"type":"none"}"#).unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_clip_to_bounds() {
        assert_eq!(Selection::rows(0, u32::MAX).clip(5, 100), Selection::rows(0, 99));
        assert_eq!(Selection::columns(7, 9).clip(5, 100), Selection::None);
        assert_eq!(
            Selection::cells(CellPoint::new(2, 2), CellPoint::new(50, 50)).clip(5, 10),
            Selection::cells(CellPoint::new(2, 2), CellPoint::new(4, 9))
        );
        assert_eq!(
            Selection::cell(CellPoint::new(6, 0)).clip(5, 10),
            Selection::None
        );
        assert!(Selection::rows(0, 99).fits(1, 100));
        assert!(!Selection::rows(0, 100).fits(1, 100));
    }

    #[test]
    fn test_serde_shape() {
        let sel = Selection::rows(1, 2);
        let json = serde_json::to_string(&sel).unwrap();
        assert_eq!(json, r#"{"type":"rows","ranges":[{"start":1,"end":2}]}"#);
        let back: Selection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sel);
    }
}
