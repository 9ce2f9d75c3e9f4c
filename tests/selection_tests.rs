//! Selection algebra and session behaviour through the public API.
#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use gridcanvas::{
    CellPoint, CellPosition, CellRange, LineRange, Selection, SelectionKind, SelectionRange,
    SelectionSession,
};
use test_case::test_case;

fn p(col: u32, row: u32) -> CellPoint {
    CellPoint::new(col, row)
}

fn rows(ranges: &[(u32, u32)]) -> Selection {
    Selection::Rows(ranges.iter().map(|&(a, b)| LineRange::new(a, b)).collect())
}

#[test_case(&[(1, 3)], (2, 5), &[(1, 5)] ; "overlap coalesces")]
#[test_case(&[(1, 3)], (7, 8), &[(1, 3), (7, 8)] ; "disjoint appends")]
#[test_case(&[(7, 8)], (1, 3), &[(1, 3), (7, 8)] ; "result is sorted")]
#[test_case(&[(1, 3)], (4, 6), &[(1, 6)] ; "adjacent fuses")]
#[test_case(&[(1, 3), (7, 9)], (2, 8), &[(1, 9)] ; "bridge joins two")]
fn test_expand_rows(existing: &[(u32, u32)], added: (u32, u32), expected: &[(u32, u32)]) {
    let out = rows(existing).expand(SelectionRange::rows(added.0, added.1));
    assert_eq!(out.serialize(), rows(expected));
}

#[test_case(&[(1, 9)], (4, 5), Some(&[(1, 3), (6, 9)][..]) ; "split in the middle")]
#[test_case(&[(1, 9)], (1, 4), Some(&[(5, 9)][..]) ; "trim the front")]
#[test_case(&[(1, 3)], (6, 6), Some(&[(1, 3), (6, 6)][..]) ; "no overlap adds")]
#[test_case(&[(4, 4)], (4, 4), None ; "removing the last range clears")]
fn test_merge_rows(existing: &[(u32, u32)], toggled: (u32, u32), expected: Option<&[(u32, u32)]>) {
    let out = rows(existing).merge(SelectionRange::rows(toggled.0, toggled.1));
    match expected {
        Some(ranges) => assert_eq!(out.serialize(), rows(ranges)),
        None => assert!(out.is_none()),
    }
}

#[test]
fn test_operations_leave_receiver_untouched() {
    let original = rows(&[(1, 3)]);
    let snapshot = original.clone();
    let _ = original.expand(SelectionRange::rows(10, 12));
    let _ = original.merge(SelectionRange::rows(2, 2));
    assert_eq!(original, snapshot);
}

#[test]
fn test_different_kind_starts_over() {
    let out = rows(&[(1, 3)]).expand(SelectionRange::columns(2, 2));
    assert_eq!(out.kind(), SelectionKind::Columns);
    assert!(!out.contains_row(1));
}

#[test]
fn test_cells_keep_latest_corners() {
    let sel = Selection::cells(p(1, 1), p(2, 2));
    let out = sel.expand(SelectionRange::cell(p(5, 6)));
    assert_eq!(
        out.cell_range(),
        Some(CellRange::from_corners(p(2, 2), p(5, 6)))
    );
}

#[test]
fn test_includes_and_contains() {
    let sel = Selection::cells(p(4, 4), p(1, 1));
    assert!(sel.includes(&SelectionRange::cell(p(2, 3))));
    assert!(!sel.includes(&SelectionRange::Cells(CellRange::from_corners(p(0, 0), p(2, 2)))));
    assert!(sel.contains_cell(p(4, 1)));
    assert!(!sel.contains_cell(p(5, 1)));
    assert!(!sel.includes(&SelectionRange::rows(1, 1)));

    let cols = Selection::columns(3, 5);
    assert!(cols.contains_cell(p(4, 999)));
    assert!(cols.contains_column(5));
}

#[test]
fn test_serialize_normalizes_corners() {
    let sel = Selection::cells(p(5, 1), p(2, 8));
    assert_eq!(sel.serialize(), Selection::Cells([p(2, 1), p(5, 8)]));
}

#[test]
fn test_flatten_counts_units() {
    assert_eq!(rows(&[(1, 3), (6, 6)]).flatten().len(), 4);
    assert_eq!(Selection::cells(p(0, 0), p(2, 1)).flatten().len(), 6);
    assert!(Selection::None.flatten().is_empty());
}

#[test_case(SelectionKind::Cells, vec![SelectionRange::cell(p(0, 0)), SelectionRange::cell(p(3, 3))], true ; "two corners")]
#[test_case(SelectionKind::Cells, vec![SelectionRange::rows(0, 1)], false ; "cells with a row range")]
#[test_case(SelectionKind::Rows, vec![], false ; "rows without ranges")]
#[test_case(SelectionKind::Columns, vec![SelectionRange::columns(1, 2), SelectionRange::columns(5, 5)], true ; "several columns")]
#[test_case(SelectionKind::None, vec![SelectionRange::rows(0, 0)], false ; "none with ranges")]
fn test_from_ranges_validation(kind: SelectionKind, ranges: Vec<SelectionRange>, ok: bool) {
    assert_eq!(Selection::from_ranges(kind, &ranges).is_ok(), ok);
}

#[test]
fn test_serde_shape() {
    let json = serde_json::to_value(Selection::rows(2, 4)).unwrap();
    assert_eq!(json["type"], "rows");
    assert_eq!(json["ranges"][0]["start"], 2);
    let back: Selection = serde_json::from_value(json).unwrap();
    assert_eq!(back, Selection::rows(2, 4));
}

// ---- session ----

#[test]
fn test_plain_click_resets_anchor() {
    let mut s = SelectionSession::new(10, 10);
    s.select_cell(p(1, 1), false, false);
    s.select_cell(p(4, 4), false, false);
    s.select_cell(p(6, 5), true, false);
    assert_eq!(
        s.selection().cell_range(),
        Some(CellRange::from_corners(p(4, 4), p(6, 5)))
    );
}

#[test]
fn test_ctrl_click_on_selected_cell_clears() {
    let mut s = SelectionSession::new(10, 10);
    s.select_cell(p(3, 3), false, false);
    let change = s.select_cell(p(3, 3), false, true);
    assert!(change.selection);
    assert!(s.selection().is_none());
    assert_eq!(s.active_cell(), None);
}

#[test]
fn test_ctrl_click_rows_accumulates() {
    let mut s = SelectionSession::new(10, 20);
    s.select_row(2, false, false);
    s.select_row(8, false, true);
    s.select_row(3, false, true);
    assert_eq!(s.selection(), &rows(&[(2, 3), (8, 8)]));
    s.select_row(8, false, true);
    assert_eq!(s.selection(), &rows(&[(2, 3)]));
}

#[test]
fn test_ctrl_click_deselected_row_is_not_active() {
    let mut s = SelectionSession::new(10, 20);
    s.select_row(3, false, false);
    let change = s.select_row(3, false, true);
    assert!(change.selection && change.active_cell);
    assert!(s.selection().is_none());
    assert_eq!(s.active_cell(), None);
}

#[test]
fn test_ctrl_click_inside_rectangle_merges_through_algebra() {
    let mut s = SelectionSession::new(10, 10);
    s.select_cell(p(0, 0), false, false);
    s.select_cell(p(4, 4), true, false);
    let before = s.selection().clone();
    s.select_cell(p(2, 2), false, true);
    assert_eq!(
        s.selection(),
        &before.merge(SelectionRange::cell(p(2, 2)))
    );
    assert_eq!(
        s.selection().cell_range(),
        Some(CellRange::from_corners(p(2, 2), p(4, 4)))
    );
    assert_eq!(s.active_cell(), Some(p(2, 2)));
}

#[test]
fn test_ctrl_click_outside_rectangle_expands_it() {
    let mut s = SelectionSession::new(10, 10);
    s.select_cell(p(0, 0), false, false);
    s.select_cell(p(2, 2), true, false);
    s.select_cell(p(6, 6), false, true);
    assert_eq!(s.selection(), &Selection::Cells([p(2, 2), p(6, 6)]));
    assert_eq!(s.active_cell(), Some(p(6, 6)));
    assert_eq!(s.anchor(), Some(CellPosition::new(2, 2)));
}

#[test]
fn test_host_selection_is_clipped_to_grid() {
    let mut s = SelectionSession::new(3, 100);
    s.set_selection(Selection::rows(0, u32::MAX));
    assert_eq!(s.selection(), &Selection::rows(0, 99));
    assert_eq!(s.selection().flatten().len(), 100);
}

#[test]
fn test_deserialized_selection_is_validated() {
    assert!(serde_json::from_str::<Selection>(r#"{"type":"rows","ranges":[]}"#).is_err());
    assert!(serde_json::from_str::<Selection>(
        r#"{"type":"rows","ranges":[{"start":5,"end":1},{"start":2,"end":3}]}"#
    )
    .is_err());
    let sel: Selection = serde_json::from_str(
        r#"{"type":"rows","ranges":[{"start":2,"end":3},{"start":4,"end":4}]}"#,
    )
    .unwrap();
    assert_eq!(sel, rows(&[(2, 4)]));
}

#[test]
fn test_shift_column_header_extends_from_anchor() {
    let mut s = SelectionSession::new(10, 20);
    s.select_column(6, false, false);
    s.select_column(2, true, false);
    assert_eq!(s.selection(), &Selection::columns(2, 6));
    assert_eq!(s.anchor(), Some(CellPosition::new(6, -1)));
    assert_eq!(s.active_cell(), Some(p(6, 0)));
}

#[test]
fn test_select_all_is_one_rectangle() {
    let mut s = SelectionSession::new(4, 3);
    s.select_all();
    assert_eq!(s.selection(), &Selection::Cells([p(0, 0), p(3, 2)]));
    assert_eq!(s.active_cell(), Some(p(0, 0)));
}

#[test]
fn test_unchanged_mutation_reports_nothing() {
    let mut s = SelectionSession::new(4, 3);
    s.select_cell(p(1, 1), false, false);
    assert!(!s.select_cell(p(1, 1), false, false).any());
    s.clear();
    assert!(!s.clear().any());
}
