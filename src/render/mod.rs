//! Paint pipeline.
//!
//! Everything here draws through the [`Surface`] trait. On wasm32 the
//! surface is a Canvas 2D context; natively (and in tests) it is a
//! [`RecordingSurface`] that records the draw calls of a frame.

pub mod cache;
pub mod colors;
pub mod frame;
pub mod headers;
pub mod painters;
pub mod selection;
pub mod surface;
pub mod text;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use cache::LruCache;
pub use colors::{parse_color_rgba, translucent, CssColor, Rgb};
pub use frame::{CellProvider, FrameInput, FrameStats, GridRenderer};
pub use headers::col_to_letter;
pub use painters::{
    CellPainter, CellState, NoResources, PaintContext, PainterRegistry, ResourceLookup,
};
pub use selection::{selection_rects, SelectionRect};
pub use surface::{DrawOp, RecordingSurface, Surface, TextAlign};
pub use text::{TextMeasurer, ELLIPSIS};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
