//! Shared fixtures for the integration tests.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use gridcanvas::interaction::{GridHost, PointerInput};
use gridcanvas::render::{CellProvider, NoResources};
use gridcanvas::resources::{Completer, Drawable, ResourceFetcher};
use gridcanvas::{CellContent, CellPoint, CellPosition, GridConfig, GridEngine, GridGeometry, Selection};

/// A 10 x 1000 grid with 120x40 cells and a 40px header, sized 800x440.
pub fn geometry() -> GridGeometry {
    geometry_with(GridConfig::new(10, 1_000))
}

pub fn geometry_with(config: GridConfig) -> GridGeometry {
    let mut g = GridGeometry::new(&config);
    g.resize(800.0, 440.0);
    g
}

/// Records every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub selections: Vec<Selection>,
    pub active: Vec<Option<CellPosition>>,
    pub clicks: Vec<CellPosition>,
    pub double_clicks: Vec<CellPosition>,
    pub context_menus: Vec<CellPosition>,
    pub edits: Vec<CellPoint>,
}

impl CellProvider for RecordingHost {
    fn cell_content(&self, cell: CellPoint) -> CellContent {
        CellContent::text(format!("r{}c{}", cell.row, cell.col))
    }
}

impl GridHost for RecordingHost {
    fn on_selection_change(&mut self, selection: &Selection) {
        self.selections.push(selection.clone());
    }

    fn on_active_cell_change(&mut self, cell: Option<CellPosition>) {
        self.active.push(cell);
    }

    fn on_cell_click(&mut self, position: CellPosition, _input: &PointerInput) {
        self.clicks.push(position);
    }

    fn on_cell_double_click(&mut self, position: CellPosition, _input: &PointerInput) {
        self.double_clicks.push(position);
    }

    fn on_context_menu(&mut self, position: CellPosition, _input: &PointerInput) {
        self.context_menus.push(position);
    }

    fn on_edit_start(&mut self, cell: CellPoint) {
        self.edits.push(cell);
    }
}

pub type TestEngine = GridEngine<RecordingHost, NoResources>;

/// Engine over a 10 x 1000 grid sized 800x440.
pub fn engine() -> TestEngine {
    engine_with(GridConfig::new(10, 1_000))
}

pub fn engine_with(config: GridConfig) -> TestEngine {
    let mut e = GridEngine::new(config, RecordingHost::default(), NoResources).unwrap();
    e.resize(800.0, 440.0);
    e
}

/// Fetcher that parks completers until the test settles them by hand.
#[derive(Clone, Default)]
pub struct ManualFetcher {
    pub pending: Rc<RefCell<Vec<Completer<Drawable>>>>,
    pub fetches: Rc<RefCell<Vec<String>>>,
}

impl ManualFetcher {
    pub fn fetch_count(&self) -> usize {
        self.fetches.borrow().len()
    }

    /// Resolve every parked load with a 16x16 drawable.
    pub fn resolve_all(&self) {
        for completer in self.pending.borrow_mut().drain(..) {
            completer.resolve(Drawable::sized(16.0, 16.0));
        }
    }

    pub fn reject_all(&self, reason: &str) {
        for completer in self.pending.borrow_mut().drain(..) {
            completer.reject(reason);
        }
    }
}

impl ResourceFetcher<Drawable> for ManualFetcher {
    fn fetch(&self, key: &str, completer: Completer<Drawable>) {
        self.fetches.borrow_mut().push(key.to_string());
        self.pending.borrow_mut().push(completer);
    }
}
