//! Host-facing grid configuration.
//!
//! The host passes this as a JS object (via `serde-wasm-bindgen`) or as JSON
//! text. Every field has a default so partial objects are accepted.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::types::{ThemeMode, ThemeOverride};

pub const DEFAULT_ROW_HEIGHT: f64 = 40.0;
pub const DEFAULT_COLUMN_WIDTH: f64 = 120.0;
pub const DEFAULT_HEADER_HEIGHT: f64 = 40.0;
pub const DEFAULT_OVERSCAN: u32 = 5;
pub const DEFAULT_DRAG_THRESHOLD: f64 = 5.0;
pub const DEFAULT_PAGE_ROWS: u32 = 10;
pub const DEFAULT_RESOURCE_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    pub rows: u32,
    pub columns: u32,
    pub default_row_height: f64,
    pub default_column_width: f64,
    /// Sparse per-row height overrides
    pub row_heights: BTreeMap<u32, f64>,
    /// Sparse per-column width overrides
    pub column_widths: BTreeMap<u32, f64>,
    pub header_height: f64,
    /// Width of the row-number column; 0 hides it.
    pub row_marker_width: f64,
    pub frozen_columns: u32,
    pub overscan: u32,
    /// Pointer travel (px) before a press becomes a drag
    pub drag_threshold: f64,
    /// Rows moved by PageUp/PageDown
    pub page_rows: u32,
    pub theme_mode: ThemeMode,
    pub theme: Option<ThemeOverride>,
    /// Sprite name -> resource URL
    pub custom_icons: HashMap<String, String>,
    pub image_cache_capacity: usize,
    pub sprite_cache_capacity: usize,
    pub resource_timeout_ms: u64,
    pub draw_grid_lines: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 0,
            columns: 0,
            default_row_height: DEFAULT_ROW_HEIGHT,
            default_column_width: DEFAULT_COLUMN_WIDTH,
            row_heights: BTreeMap::new(),
            column_widths: BTreeMap::new(),
            header_height: DEFAULT_HEADER_HEIGHT,
            row_marker_width: 0.0,
            frozen_columns: 0,
            overscan: DEFAULT_OVERSCAN,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            page_rows: DEFAULT_PAGE_ROWS,
            theme_mode: ThemeMode::default(),
            theme: None,
            custom_icons: HashMap::new(),
            image_cache_capacity: 256,
            sprite_cache_capacity: 64,
            resource_timeout_ms: DEFAULT_RESOURCE_TIMEOUT_MS,
            draw_grid_lines: true,
        }
    }
}

impl GridConfig {
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            rows,
            columns,
            ..Self::default()
        }
    }

    /// Parse from JSON text and validate.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| GridError::InvalidConfig(format!("JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.default_row_height > 0.0) {
            return Err(GridError::InvalidConfig(format!(
                "defaultRowHeight must be positive, got {}",
                self.default_row_height
            )));
        }
        if !(self.default_column_width > 0.0) {
            return Err(GridError::InvalidConfig(format!(
                "defaultColumnWidth must be positive, got {}",
                self.default_column_width
            )));
        }
        if self.header_height < 0.0 || self.row_marker_width < 0.0 {
            return Err(GridError::InvalidConfig(
                "header sizes must not be negative".to_string(),
            ));
        }
        if self.frozen_columns > self.columns {
            return Err(GridError::InvalidConfig(format!(
                "frozenColumns ({}) exceeds columns ({})",
                self.frozen_columns, self.columns
            )));
        }
        if let Some((index, size)) = self
            .row_heights
            .iter()
            .chain(self.column_widths.iter())
            .find(|(_, size)| !(**size >= 0.0))
        {
            return Err(GridError::InvalidConfig(format!(
                "size override for index {index} is invalid: {size}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            GridConfig::from_json(r#"{"rows": 100, "columns": 5, "columnWidths": {"0": 200}}"#)
                .unwrap();
        assert_eq!(config.rows, 100);
        assert_eq!(config.default_row_height, DEFAULT_ROW_HEIGHT);
        assert_eq!(config.column_widths.get(&0), Some(&200.0));
        assert_eq!(config.overscan, DEFAULT_OVERSCAN);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = GridConfig::new(3, 10);
        config.frozen_columns = 4;
        assert!(matches!(
            config.validate(),
            Err(GridError::InvalidConfig(_))
        ));

        let mut config = GridConfig::new(3, 10);
        config.default_row_height = 0.0;
        assert!(config.validate().is_err());

        let mut config = GridConfig::new(3, 10);
        config.row_heights.insert(2, -5.0);
        assert!(config.validate().is_err());
    }
}
