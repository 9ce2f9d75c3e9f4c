//! Per-kind cell painters and their registry.
//!
//! The frame renderer resolves a painter by [`CellKind`] for every visible
//! cell. Kinds without a registered painter fall back to the text painter,
//! which is always present.

mod media;
mod text;
mod widgets;

pub use media::{IconPainter, ImagePainter};
pub use text::{format_number, LinkPainter, NumberPainter, TextPainter};
pub use widgets::{BooleanPainter, LoadingPainter, RatingPainter, MAX_RATING};

use std::collections::HashMap;

use super::surface::{Surface, TextAlign};
use super::text::TextMeasurer;
use crate::resources::Drawable;
use crate::types::{CellContent, CellKind, Rect, Theme};

/// Synchronous access to loaded images. A miss should start a load and
/// return `None`; the cell is then painted as a placeholder.
pub trait ResourceLookup {
    fn image(&mut self, url: &str, now_ms: f64) -> Option<Drawable>;
    fn icon(&mut self, name: &str, now_ms: f64) -> Option<Drawable>;

    /// Called once at the start of every frame. Returns the number of loads
    /// that timed out.
    fn expire_stale(&mut self, _now_ms: f64) -> usize {
        0
    }
}

/// Lookup that never has anything loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResources;

impl ResourceLookup for NoResources {
    fn image(&mut self, _url: &str, _now_ms: f64) -> Option<Drawable> {
        None
    }

    fn icon(&mut self, _name: &str, _now_ms: f64) -> Option<Drawable> {
        None
    }
}

/// Everything a painter may draw with.
pub struct PaintContext<'a> {
    pub surface: &'a mut dyn Surface,
    pub text: &'a mut TextMeasurer,
    pub resources: &'a mut dyn ResourceLookup,
    pub theme: &'a Theme,
    /// Host clock for animations and resource timeouts
    pub now_ms: f64,
}

impl PaintContext<'_> {
    pub fn set_font(&mut self, font: &str) {
        self.text.set_font(self.surface, font);
    }

    pub fn measure(&mut self, text: &str) -> f64 {
        self.text.measure(self.surface, text)
    }

    /// Draw `text` inside `rect` (padding applied), truncated with an
    /// ellipsis. Returns the drawn width.
    pub fn draw_text(&mut self, text: &str, rect: Rect, align: TextAlign, color: &str) -> f64 {
        let padding = self.theme.cell_padding;
        let available = rect.width - padding * 2.0;
        if available <= 0.0 || text.is_empty() {
            return 0.0;
        }
        let shown = self.text.truncate(self.surface, text, available);
        if shown.is_empty() {
            return 0.0;
        }
        let width = self.text.measure(self.surface, &shown);
        let x = match align {
            TextAlign::Left => rect.x + padding,
            TextAlign::Center => rect.x + rect.width / 2.0,
            TextAlign::Right => rect.right() - padding,
        };
        self.surface
            .fill_text(&shown, x, rect.y + rect.height / 2.0, align, color);
        width
    }
}

/// Per-cell interaction state used for background selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellState {
    pub selected: bool,
    pub active: bool,
}

pub trait CellPainter {
    /// Paint foreground content into `rect`. The background has already
    /// been drawn by [`CellPainter::render_background`].
    fn render(&self, cx: &mut PaintContext<'_>, content: &CellContent, rect: Rect);

    fn render_background(&self, cx: &mut PaintContext<'_>, rect: Rect, state: CellState) {
        paint_background(cx, rect, state);
    }

    /// Width this content would like, used for auto-sizing columns.
    fn preferred_width(&self, _cx: &mut PaintContext<'_>, _content: &CellContent) -> Option<f64> {
        None
    }

    fn preferred_height(&self, _cx: &mut PaintContext<'_>, _content: &CellContent) -> Option<f64> {
        None
    }
}

/// Default cell background: selected and active cells use the selection
/// tint, everything else the plain cell color.
pub fn paint_background(cx: &mut PaintContext<'_>, rect: Rect, state: CellState) {
    let color = if state.selected || state.active {
        &cx.theme.selected_cell_bg
    } else {
        &cx.theme.cell_bg
    };
    cx.surface.fill_rect(rect, color);
}

/// Painters keyed by content kind, with a mandatory fallback.
pub struct PainterRegistry {
    painters: HashMap<CellKind, Box<dyn CellPainter>>,
    fallback: Box<dyn CellPainter>,
}

impl PainterRegistry {
    /// Empty registry; every kind resolves to `fallback`.
    pub fn new(fallback: Box<dyn CellPainter>) -> Self {
        Self {
            painters: HashMap::new(),
            fallback,
        }
    }

    /// Registry with every built-in painter.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new(Box::new(TextPainter));
        registry.register(CellKind::Text, Box::new(TextPainter));
        registry.register(CellKind::Number, Box::new(NumberPainter));
        registry.register(CellKind::Boolean, Box::new(BooleanPainter));
        registry.register(CellKind::Rating, Box::new(RatingPainter));
        registry.register(CellKind::Link, Box::new(LinkPainter));
        registry.register(CellKind::Loading, Box::new(LoadingPainter));
        registry.register(CellKind::Image, Box::new(ImagePainter));
        registry.register(CellKind::Icon, Box::new(IconPainter));
        registry
    }

    /// Register a painter, returning the one it replaced.
    pub fn register(
        &mut self,
        kind: CellKind,
        painter: Box<dyn CellPainter>,
    ) -> Option<Box<dyn CellPainter>> {
        self.painters.insert(kind, painter)
    }

    pub fn contains(&self, kind: CellKind) -> bool {
        self.painters.contains_key(&kind)
    }

    pub fn get(&self, kind: CellKind) -> &dyn CellPainter {
        match self.painters.get(&kind) {
            Some(painter) => painter.as_ref(),
            None => self.fallback.as_ref(),
        }
    }
}

impl Default for PainterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
