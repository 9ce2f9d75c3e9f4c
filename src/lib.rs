//! gridcanvas - virtualized data grid for the web
//!
//! Draws a large two-dimensional grid onto a single Canvas 2D surface via
//! WebAssembly:
//! - Only the visible window of rows and columns is painted
//! - Frozen leading columns, row markers, column headers
//! - Row, column and rectangular cell selection with keyboard navigation
//! - Pluggable per-kind cell painters (text, numbers, ratings, images, ...)
//! - Deduplicated, timed-out image and sprite loading
//!
//! The core is platform independent and renders into any [`render::Surface`];
//! the `viewer` module (wasm32 only) binds it to an `HtmlCanvasElement`.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { CanvasGrid } from 'gridcanvas';
//! await init();
//! const grid = new CanvasGrid(canvas, getCellContent, { columns: 20, rows: 1e6 });
//! grid.setCallbacks({ onSelectionChange: console.log });
//! grid.render();
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod render;
pub mod resources;
pub mod search;
pub mod session;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use config::GridConfig;
pub use engine::GridEngine;
pub use error::{GridError, Result};
pub use interaction::{GridHost, HitTarget, Modifiers, PointerInput};
pub use layout::{GridGeometry, ScrollAlign, Viewport};
pub use render::{CellProvider, FrameStats, GridRenderer, RecordingSurface, Surface};
pub use session::SelectionSession;
#[cfg(target_arch = "wasm32")]
pub use viewer::CanvasGrid;

pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
