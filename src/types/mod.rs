//! Data types shared by the grid engine.

mod content;
mod position;
mod selection;
mod theme;

pub use content::*;
pub use position::*;
pub use selection::*;
pub use theme::*;
