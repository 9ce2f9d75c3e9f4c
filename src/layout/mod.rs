//! Layout engine: cell geometry, viewport scrolling and windowing.
//!
//! This module handles:
//! - Lazily computing cell offsets from default sizes and sparse overrides
//! - Resolving pixel offsets back to indices (binary search over the cache)
//! - Managing viewport state (scroll position, clamping, scroll-into-view)
//! - Computing the window of items to materialize for a scroll position

mod geometry;
mod viewport;
mod window;

pub use geometry::{Axis, AxisGeometry, GridGeometry, MIN_SIZE};
pub use viewport::{ScrollAlign, Viewport};
pub use window::{VirtualItem, VirtualWindow, WindowCalculator};
