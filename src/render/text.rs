//! Cached text measurement and ellipsis truncation.

use std::borrow::Cow;

use super::cache::LruCache;
use super::surface::Surface;

pub const ELLIPSIS: &str = "\u{2026}";

/// Text widths keyed by (font, text). Cell strings repeat heavily while
/// scrolling, so most frames measure almost nothing.
#[derive(Debug)]
pub struct TextMeasurer {
    widths: LruCache<(String, String), f64>,
    font: String,
}

impl TextMeasurer {
    pub fn new(capacity: usize) -> Self {
        Self {
            widths: LruCache::new(capacity),
            font: String::new(),
        }
    }

    /// Select the font on the surface and for subsequent lookups.
    pub fn set_font(&mut self, surface: &mut dyn Surface, font: &str) {
        surface.set_font(font);
        if self.font != font {
            self.font = font.to_string();
        }
    }

    pub fn measure(&mut self, surface: &mut dyn Surface, text: &str) -> f64 {
        let key = (self.font.clone(), text.to_string());
        self.widths
            .get_or_insert_with(&key, || surface.measure_text(text))
    }

    /// Shorten `text` to fit `max_width`, appending an ellipsis when cut.
    ///
    /// Drops one trailing char at a time while the remainder (plus the
    /// ellipsis) is too wide. Cell strings are short, so the linear walk is
    /// cheaper than it looks.
    pub fn truncate<'a>(
        &mut self,
        surface: &mut dyn Surface,
        text: &'a str,
        max_width: f64,
    ) -> Cow<'a, str> {
        if self.measure(surface, text) <= max_width {
            return Cow::Borrowed(text);
        }
        let available = max_width - self.measure(surface, ELLIPSIS);
        if available <= 0.0 {
            return Cow::Borrowed("");
        }
        let mut end = text.len();
        for (idx, _) in text.char_indices().rev() {
            end = idx;
            let head = text.get(..end).unwrap_or("");
            if self.measure(surface, head) <= available {
                break;
            }
        }
        let head = text.get(..end).unwrap_or("").trim_end();
        if head.is_empty() {
            return Cow::Borrowed(ELLIPSIS);
        }
        Cow::Owned(format!("{head}{ELLIPSIS}"))
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    pub fn clear(&mut self) {
        self.widths.clear();
    }
}

impl Default for TextMeasurer {
    fn default() -> Self {
        Self::new(4096)
    }
}
