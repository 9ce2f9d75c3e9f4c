//! Uniform-size window calculator for row-virtualized lists and tables.
//!
//! Unlike [`super::GridGeometry`] this has no per-index overrides: every
//! item has the same estimated size, so all lookups are O(1) arithmetic.

use serde::{Deserialize, Serialize};

use super::ScrollAlign;

/// Placement of one materialized item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VirtualItem {
    pub index: u32,
    pub start: f64,
    pub size: f64,
}

impl VirtualItem {
    pub fn end(&self) -> f64 {
        self.start + self.size
    }
}

/// Result of a window computation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualWindow {
    /// First index to render (inclusive, overscan applied)
    pub start_index: u32,
    /// Last index to render (inclusive, overscan applied)
    pub end_index: u32,
    pub items: Vec<VirtualItem>,
    pub total_size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowCalculator {
    pub count: u32,
    pub estimated_size: f64,
    pub overscan: u32,
}

impl WindowCalculator {
    pub fn new(count: u32, estimated_size: f64, overscan: u32) -> Self {
        Self {
            count,
            estimated_size: estimated_size.max(f64::MIN_POSITIVE),
            overscan,
        }
    }

    pub fn total_size(&self) -> f64 {
        f64::from(self.count) * self.estimated_size
    }

    pub fn offset_for_index(&self, index: u32) -> f64 {
        f64::from(index.min(self.count)) * self.estimated_size
    }

    /// Index containing `offset`, clamped to the list. `None` for an empty list.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn index_at_offset(&self, offset: f64) -> Option<u32> {
        let last = self.count.checked_sub(1)?;
        if !(offset > 0.0) {
            return Some(0);
        }
        // Saturating float->int cast; clamped right after.
        let raw = (offset / self.estimated_size).floor() as u64;
        Some(u32::try_from(raw).unwrap_or(u32::MAX).min(last))
    }

    /// Visible items for the given scroll position, with overscan.
    pub fn window(&self, scroll_offset: f64, viewport_size: f64) -> VirtualWindow {
        let total_size = self.total_size();
        let (Some(first), Some(last)) = (
            self.index_at_offset(scroll_offset),
            self.index_at_offset(scroll_offset + viewport_size.max(0.0) - f64::EPSILON),
        ) else {
            return VirtualWindow {
                total_size,
                ..VirtualWindow::default()
            };
        };
        let start_index = first.saturating_sub(self.overscan);
        let end_index = last
            .saturating_add(self.overscan)
            .min(self.count.saturating_sub(1));
        let items = (start_index..=end_index)
            .map(|index| VirtualItem {
                index,
                start: self.offset_for_index(index),
                size: self.estimated_size,
            })
            .collect();
        VirtualWindow {
            start_index,
            end_index,
            items,
            total_size,
        }
    }

    /// Scroll offset that brings `index` into view with `align`, clamped to
    /// the scrollable range.
    pub fn scroll_offset_for_index(
        &self,
        index: u32,
        align: ScrollAlign,
        current_offset: f64,
        viewport_size: f64,
    ) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let index = index.min(self.count - 1);
        let start = self.offset_for_index(index);
        let end = start + self.estimated_size;
        let target = match align {
            ScrollAlign::Start => start,
            ScrollAlign::End => end - viewport_size,
            ScrollAlign::Center => start + self.estimated_size / 2.0 - viewport_size / 2.0,
            ScrollAlign::Auto => {
                if start >= current_offset && end <= current_offset + viewport_size {
                    current_offset
                } else if start < current_offset {
                    start
                } else {
                    end - viewport_size
                }
            }
        };
        target.clamp(0.0, (self.total_size() - viewport_size).max(0.0))
    }
}
