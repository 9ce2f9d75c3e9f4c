//! Drawing surface abstraction.
//!
//! The paint pipeline only talks to a [`Surface`]. The Canvas 2D
//! implementation lives in [`super::canvas`]; [`RecordingSurface`] records
//! every call so frames can be inspected natively.

use crate::resources::Drawable;
use crate::types::Rect;

/// Horizontal text alignment relative to the `x` passed to `fill_text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Pixel-addressable output target in CSS pixels.
pub trait Surface {
    /// Logical size (width, height).
    fn size(&self) -> (f64, f64);

    fn clear(&mut self, color: &str);

    fn fill_rect(&mut self, rect: Rect, color: &str);

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f64);

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, line_width: f64);

    fn set_font(&mut self, font: &str);

    /// Width of `text` in the current font.
    fn measure_text(&mut self, text: &str) -> f64;

    /// Draw `text` with its vertical middle at `y`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, align: TextAlign, color: &str);

    fn draw_image(&mut self, image: &Drawable, rect: Rect);

    fn save(&mut self);

    fn restore(&mut self);

    /// Intersect the clip region with `rect` until the matching `restore`.
    fn clip_rect(&mut self, rect: Rect);

    /// Multiply subsequent drawing by `alpha` until the matching `restore`.
    fn set_alpha(&mut self, alpha: f64);
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(String),
    FillRect { rect: Rect, color: String },
    StrokeRect { rect: Rect, color: String, width: f64 },
    Line { from: (f64, f64), to: (f64, f64), color: String, width: f64 },
    Font(String),
    Text { text: String, x: f64, y: f64, align: TextAlign, color: String },
    Image { rect: Rect },
    Save,
    Restore,
    Clip(Rect),
    Alpha(f64),
}

/// Surface that records calls instead of drawing.
///
/// Text metrics are deterministic: every char is `char_width` wide.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    pub char_width: f64,
    font: String,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            char_width: 7.0,
            font: String::new(),
            ops: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// All text drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn current_font(&self) -> &str {
        &self.font
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: &str) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear(color.to_string()));
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ops.push(DrawOp::FillRect {
            rect,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f64) {
        self.ops.push(DrawOp::StrokeRect {
            rect,
            color: color.to_string(),
            width: line_width,
        });
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, line_width: f64) {
        self.ops.push(DrawOp::Line {
            from: (x1, y1),
            to: (x2, y2),
            color: color.to_string(),
            width: line_width,
        });
    }

    fn set_font(&mut self, font: &str) {
        if self.font != font {
            self.font = font.to_string();
            self.ops.push(DrawOp::Font(self.font.clone()));
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn measure_text(&mut self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, align: TextAlign, color: &str) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            align,
            color: color.to_string(),
        });
    }

    fn draw_image(&mut self, _image: &Drawable, rect: Rect) {
        self.ops.push(DrawOp::Image { rect });
    }

    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::Clip(rect));
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.ops.push(DrawOp::Alpha(alpha));
    }
}
