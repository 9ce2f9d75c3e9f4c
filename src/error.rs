//! Structured error types for gridcanvas.
//!
//! Three families of failure exist in the engine:
//! - configuration errors (malformed selections or grid config) are returned
//!   synchronously and abort the calling mutation
//! - resource errors (image/sprite load failure or timeout) reject the pending
//!   load and drop the cache entry; painting degrades instead of failing
//! - search input errors never surface here (see [`crate::search`])

/// All errors that can occur in the grid engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// A selection was constructed with the wrong number or type of ranges.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Grid configuration failed validation.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// An image or sprite failed to load.
    #[error("Resource '{key}' failed to load: {reason}")]
    ResourceLoad { key: String, reason: String },

    /// An image or sprite did not load within the configured timeout.
    #[error("Resource '{key}' timed out after {timeout_ms}ms")]
    ResourceTimeout { key: String, timeout_ms: u64 },

    /// Rendering error.
    #[error("Render error: {0}")]
    Render(String),

    /// Catch-all for string errors coming across the JS boundary.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
