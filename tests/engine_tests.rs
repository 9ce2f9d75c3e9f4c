//! The imperative control surface of `GridEngine`.
#![allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]

mod common;

use gridcanvas::render::DrawOp;
use gridcanvas::search::SearchOptions;
use gridcanvas::{
    CellPoint, CellPosition, GridConfig, GridError, PointerInput, RecordingSurface, Rect,
    ScrollAlign, Selection, SelectionKind, SelectionRange, ThemeMode, ThemeOverride,
};

use common::{engine, engine_with};

fn surface() -> RecordingSurface {
    RecordingSurface::new(800.0, 440.0)
}

#[test]
fn test_render_paints_only_the_window() {
    let mut e = engine();
    let mut s = surface();
    let stats = e.render(&mut s, 0.0);
    assert_eq!(stats.rows, Some((0, 15)));
    assert_eq!(stats.columns, Some((0, 9)));
    // Overscan rows and columns fall outside the 800x400 body and are skipped.
    assert_eq!(stats.cells_painted, 7 * 10);
    let texts = s.texts();
    assert!(texts.contains(&"r0c0"));
    assert!(texts.contains(&"A"));
    assert!(!texts.contains(&"r16c0"));
}

#[test]
fn test_render_after_scroll() {
    let mut e = engine();
    assert!(e.scroll_to(0.0, 4_000.0));
    let mut s = surface();
    let stats = e.render(&mut s, 0.0);
    assert_eq!(stats.rows, Some((95, 115)));
    let texts = s.texts();
    assert!(texts.contains(&"r100c3"));
    assert!(!texts.contains(&"r90c3"));
}

#[test]
fn test_frozen_columns_are_painted_separately() {
    let mut e = engine();
    e.set_frozen_columns(2);
    e.scroll_to(400.0, 0.0);
    let mut s = surface();
    let stats = e.render(&mut s, 0.0);
    assert_eq!(stats.frozen_columns, 2);
    let (first, _) = stats.columns.unwrap();
    assert!(first >= 2);
    assert!(s.texts().contains(&"r0c0"));
}

#[test]
fn test_dark_mode_changes_background() {
    let mut e = engine();
    e.set_theme_mode(ThemeMode::Dark);
    assert!(e.needs_redraw());
    let mut s = surface();
    e.render(&mut s, 0.0);
    assert_eq!(s.ops()[0], DrawOp::Clear("#16161A".to_string()));
}

#[test]
fn test_auto_theme_follows_preference() {
    let mut e = engine();
    e.set_theme_mode(ThemeMode::Auto);
    assert_eq!(e.theme().cell_bg, "#FFFFFF");
    e.set_prefers_dark(true);
    assert_eq!(e.theme().cell_bg, "#16161A");
}

#[test]
fn test_theme_override_merges() {
    let mut e = engine();
    e.set_theme_override(Some(ThemeOverride {
        accent_color: Some("#FF0000".to_string()),
        ..ThemeOverride::default()
    }));
    assert_eq!(e.theme().accent_color, "#FF0000");
    assert_eq!(e.theme().cell_bg, "#FFFFFF");
    assert_eq!(
        e.theme().css_variables().get("--gc-accent-color").map(String::as_str),
        Some("#FF0000")
    );
}

#[test]
fn test_reset_state() {
    let mut e = engine();
    let input = PointerInput::at(130.0, 60.0);
    e.pointer_down(&input);
    e.pointer_up(&input);
    e.scroll_by(100.0, 100.0);
    e.reset_state();
    assert!(e.selection().is_none());
    assert_eq!(e.get_active_cell(), None);
    assert_eq!(e.viewport().scroll_top, 0.0);
    assert_eq!(e.host().selections.last(), Some(&Selection::None));
}

#[test]
fn test_set_selection_from_ranges() {
    let mut e = engine();
    e.set_selection_ranges(
        SelectionKind::Rows,
        &[SelectionRange::rows(7, 9), SelectionRange::rows(3, 3)],
    )
    .unwrap();
    assert!(e.selection().contains_row(8));
    assert!(e.selection().contains_row(3));
    // The host set it, so it is not echoed; the active cell move is.
    assert!(e.host().selections.is_empty());
    assert_eq!(e.host().active, vec![Some(CellPosition::new(0, 3))]);
    assert!(e.needs_redraw());
}

#[test]
fn test_invalid_selection_is_an_error() {
    let mut e = engine();
    let err = e
        .set_selection_ranges(SelectionKind::Cells, &[SelectionRange::cell(CellPoint::new(0, 0))])
        .unwrap_err();
    assert!(matches!(err, GridError::InvalidSelection(_)));
}

#[test]
fn test_cell_bounds() {
    let e = engine();
    assert_eq!(
        e.get_cell_bounds(CellPosition::new(2, -1)),
        Some(Rect::new(240.0, 0.0, 120.0, 40.0))
    );
    assert_eq!(
        e.get_cell_bounds(CellPosition::new(1, 2)),
        Some(Rect::new(120.0, 120.0, 120.0, 40.0))
    );
    assert_eq!(e.get_cell_bounds(CellPosition::new(10, 0)), None);
}

#[test]
fn test_cell_indices_at_position() {
    let mut e = engine();
    assert_eq!(
        e.get_cell_indices_at_position(250.0, 10.0),
        Some(CellPosition::new(2, -1))
    );
    assert_eq!(e.get_cell_indices_at_position(900.0, 10.0), None);
    e.scroll_to_item(CellPosition::new(0, 500), ScrollAlign::Start);
    assert_eq!(
        e.get_cell_indices_at_position(10.0, 45.0),
        Some(CellPosition::new(0, 500))
    );
}

#[test]
fn test_shrinking_counts_clamps_scroll() {
    let mut e = engine();
    e.scroll_to(0.0, 39_600.0);
    e.set_counts(10, 20);
    assert_eq!(e.viewport().scroll_top, 20.0 * 40.0 - 400.0);
}

#[test]
fn test_column_width_override() {
    let mut e = engine();
    e.set_column_width(0, 300.0);
    assert_eq!(e.get_cell_bounds(CellPosition::new(1, 0)).unwrap().x, 300.0);
    assert_eq!(e.config().column_widths.get(&0), Some(&300.0));
}

#[test]
fn test_bad_config_is_rejected() {
    let mut e = engine();
    let mut config = GridConfig::new(2, 10);
    config.frozen_columns = 3;
    assert!(e.set_config(config).is_err());
    assert_eq!(e.geometry().column_count(), 10);
    assert!(GridConfig::from_json("{\"defaultRowHeight\": 0}").is_err());
}

#[test]
fn test_set_config_rebuilds_geometry() {
    let mut e = engine();
    let mut config = GridConfig::new(4, 50);
    config.default_row_height = 20.0;
    e.set_config(config).unwrap();
    assert_eq!(e.geometry().column_count(), 4);
    assert_eq!(
        e.get_cell_bounds(CellPosition::new(0, 1)).unwrap().y,
        40.0 + 20.0
    );
}

#[test]
fn test_find() {
    let e = engine_with(GridConfig::new(5, 20));
    let found = e.find("^r1c[23]$", SearchOptions::default());
    assert_eq!(found, vec![CellPoint::new(2, 1), CellPoint::new(3, 1)]);
    assert!(e.find("(", SearchOptions::default()).is_empty());
}

#[test]
fn test_force_redraw_matches_render() {
    let mut e = engine();
    let mut s = surface();
    let first = e.render(&mut s, 0.0);
    let mut s = surface();
    assert_eq!(e.force_redraw(&mut s, 0.0), first);
    assert!(!e.needs_redraw());
}
