//! Pointer and keyboard flows driven through `GridEngine`.
//!
//! The fixture grid is 10 x 1000 cells of 120x40 under a 40px header,
//! sized 800x440, so cell (c, r) is centred at (c*120+60, r*40+60).
#![allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]

mod common;

use gridcanvas::{
    CellPoint, CellPosition, CellRange, GridConfig, Modifiers, PointerInput, Selection,
    SelectionKind,
};
use test_case::test_case;

use common::{engine, engine_with};

fn center(col: u32, row: u32) -> PointerInput {
    PointerInput::at(f64::from(col) * 120.0 + 60.0, f64::from(row) * 40.0 + 60.0)
}

const SHIFT: Modifiers = Modifiers {
    shift: true,
    ctrl: false,
    meta: false,
    alt: false,
};

const CTRL: Modifiers = Modifiers {
    shift: false,
    ctrl: true,
    meta: false,
    alt: false,
};

fn click(e: &mut common::TestEngine, input: PointerInput) {
    e.pointer_down(&input);
    e.pointer_up(&input);
}

#[test]
fn test_click_then_shift_click() {
    let mut e = engine();
    click(&mut e, center(1, 1));
    click(&mut e, center(3, 4).with_modifiers(SHIFT));
    let host = e.host();
    assert_eq!(host.selections.len(), 2);
    assert_eq!(
        host.selections[1].cell_range(),
        Some(CellRange::from_corners(CellPoint::new(1, 1), CellPoint::new(3, 4)))
    );
    assert_eq!(
        host.clicks,
        vec![CellPosition::new(1, 1), CellPosition::new(3, 4)]
    );
}

#[test]
fn test_drag_selects_rectangle_without_click() {
    let mut e = engine();
    e.pointer_down(&center(0, 0));
    e.pointer_move(&PointerInput::at(62.0, 62.0));
    assert_eq!(e.host().selections.len(), 1);
    e.pointer_move(&center(2, 2));
    e.pointer_up(&center(2, 2));
    assert_eq!(
        e.selection().cell_range(),
        Some(CellRange::from_corners(CellPoint::new(0, 0), CellPoint::new(2, 2)))
    );
    assert!(e.host().clicks.is_empty());
}

#[test]
fn test_moves_without_press_do_nothing() {
    let mut e = engine();
    e.pointer_move(&center(4, 4));
    assert!(e.selection().is_none());
    assert!(e.host().selections.is_empty());
}

#[test]
fn test_column_header_click() {
    let mut e = engine();
    click(&mut e, PointerInput::at(300.0, 20.0));
    assert_eq!(e.selection(), &Selection::columns(2, 2));
    assert_eq!(e.get_active_cell(), Some(CellPosition::new(2, 0)));
    assert_eq!(e.host().clicks, vec![CellPosition::new(2, -1)]);
}

#[test]
fn test_column_header_drag_extends() {
    let mut e = engine();
    e.pointer_down(&PointerInput::at(60.0, 20.0));
    e.pointer_move(&PointerInput::at(500.0, 20.0));
    assert_eq!(e.selection(), &Selection::columns(0, 4));
}

#[test]
fn test_ctrl_click_toggles_cell_off() {
    let mut e = engine();
    click(&mut e, center(5, 5));
    click(&mut e, center(5, 5).with_modifiers(CTRL));
    assert!(e.selection().is_none());
    assert_eq!(e.host().active.last(), Some(&None));
}

#[test]
fn test_ctrl_click_inside_rectangle_keeps_a_rectangle() {
    let mut e = engine();
    click(&mut e, center(0, 0));
    click(&mut e, center(4, 4).with_modifiers(SHIFT));
    click(&mut e, center(2, 2).with_modifiers(CTRL));
    assert_eq!(
        e.selection().cell_range(),
        Some(CellRange::from_corners(CellPoint::new(2, 2), CellPoint::new(4, 4)))
    );
    assert_eq!(e.host().active.last(), Some(&Some(CellPosition::new(2, 2))));
}

#[test]
fn test_ctrl_click_outside_rectangle_expands_it() {
    let mut e = engine();
    click(&mut e, center(0, 0));
    click(&mut e, center(2, 2).with_modifiers(SHIFT));
    click(&mut e, center(6, 6).with_modifiers(CTRL));
    assert_eq!(
        e.selection().cell_range(),
        Some(CellRange::from_corners(CellPoint::new(2, 2), CellPoint::new(6, 6)))
    );
}

#[test]
fn test_ctrl_click_row_header_off_clears_active_cell() {
    let mut config = GridConfig::new(10, 1_000);
    config.row_marker_width = 50.0;
    let mut e = engine_with(config);
    click(&mut e, PointerInput::at(10.0, 180.0).with_modifiers(CTRL));
    assert_eq!(e.selection(), &Selection::rows(3, 3));
    click(&mut e, PointerInput::at(10.0, 180.0).with_modifiers(CTRL));
    assert!(e.selection().is_none());
    assert_eq!(e.get_active_cell(), None);
    assert_eq!(e.host().active.last(), Some(&None));
}

#[test]
fn test_double_click_requests_edit() {
    let mut e = engine();
    e.double_click(&center(3, 2));
    assert_eq!(e.host().double_clicks, vec![CellPosition::new(3, 2)]);
    assert_eq!(e.host().edits, vec![CellPoint::new(3, 2)]);
}

#[test]
fn test_context_menu_selects_clicked_cell() {
    let mut e = engine();
    click(&mut e, center(0, 0));
    assert!(e.context_menu(&center(4, 6)));
    assert_eq!(e.selection(), &Selection::cell(CellPoint::new(4, 6)));
    assert_eq!(e.host().context_menus, vec![CellPosition::new(4, 6)]);

    // Inside the selection the selection is kept.
    e.key_down("a", CTRL);
    assert!(e.context_menu(&center(1, 1)));
    assert_eq!(e.selection().kind(), SelectionKind::Cells);
    assert!(e.selection().contains_cell(CellPoint::new(9, 999)));
}

#[test]
fn test_context_menu_outside_grid_is_ignored() {
    let mut e = engine();
    assert!(!e.context_menu(&PointerInput::at(900.0, 900.0)));
    assert!(e.host().context_menus.is_empty());
}

#[test_case("ArrowDown", Modifiers::default(), (4, 5) ; "down")]
#[test_case("ArrowLeft", Modifiers::default(), (3, 4) ; "left")]
#[test_case("PageDown", Modifiers::default(), (4, 14) ; "page down")]
#[test_case("PageUp", Modifiers::default(), (4, 0) ; "page up clamps")]
#[test_case("Home", Modifiers::default(), (0, 4) ; "home")]
#[test_case("End", Modifiers::default(), (9, 4) ; "end")]
#[test_case("End", CTRL, (9, 999) ; "ctrl end")]
#[test_case("Tab", Modifiers::default(), (5, 4) ; "tab")]
#[test_case("Tab", SHIFT, (3, 4) ; "shift tab")]
fn test_keyboard_moves_active_cell(key: &str, mods: Modifiers, expected: (u32, u32)) {
    let mut e = engine();
    click(&mut e, center(4, 4));
    assert!(e.key_down(key, mods));
    let target = CellPoint::new(expected.0, expected.1);
    assert_eq!(e.get_active_cell(), Some(target.to_position()));
    assert_eq!(e.selection(), &Selection::cell(target));
}

#[test]
fn test_navigation_scrolls_into_view() {
    let mut e = engine();
    click(&mut e, center(0, 0));
    e.key_down("End", CTRL);
    assert_eq!(e.viewport().scroll_top, 40_000.0 - 400.0);
    assert_eq!(e.viewport().scroll_left, 1_200.0 - 800.0);
    e.key_down("Home", CTRL);
    assert_eq!(e.viewport().scroll_top, 0.0);
    assert_eq!(e.viewport().scroll_left, 0.0);
}

#[test]
fn test_shift_arrows_grow_rectangle() {
    let mut e = engine();
    click(&mut e, center(2, 2));
    e.key_down("ArrowRight", SHIFT);
    e.key_down("ArrowRight", SHIFT);
    e.key_down("ArrowDown", SHIFT);
    assert_eq!(
        e.selection().cell_range(),
        Some(CellRange::from_corners(CellPoint::new(2, 2), CellPoint::new(4, 3)))
    );
}

#[test]
fn test_escape_clears_everything() {
    let mut e = engine();
    click(&mut e, center(2, 2));
    assert!(e.key_down("Escape", Modifiers::default()));
    assert!(e.selection().is_none());
    assert_eq!(e.get_active_cell(), None);
    assert_eq!(e.host().active.last(), Some(&None));
}

#[test]
fn test_keys_ignored_while_editing() {
    let mut e = engine();
    click(&mut e, center(2, 2));
    e.set_editing(true);
    assert!(e.is_editing());
    assert!(!e.key_down("ArrowDown", Modifiers::default()));
    assert_eq!(e.get_active_cell(), Some(CellPosition::new(2, 2)));
    e.set_editing(false);
    assert!(e.key_down("ArrowDown", Modifiers::default()));
}

#[test]
fn test_unbound_keys_are_not_consumed() {
    let mut e = engine();
    assert!(!e.key_down("x", Modifiers::default()));
    assert!(!e.key_down("F5", Modifiers::default()));
}
