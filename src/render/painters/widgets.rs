use super::{CellPainter, PaintContext};
use crate::render::colors::Rgb;
use crate::render::surface::TextAlign;
use crate::types::{CellContent, Rect};

/// Number of star glyphs a rating cell shows.
pub const MAX_RATING: u32 = 5;

const CHECKBOX_SIZE: f64 = 16.0;
const BOOLEAN_WIDTH: f64 = 60.0;
const STAR_FILLED: &str = "\u{2605}";
const STAR_EMPTY: &str = "\u{2606}";

/// Centered checkbox.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanPainter;

impl CellPainter for BooleanPainter {
    fn render(&self, cx: &mut PaintContext<'_>, content: &CellContent, rect: Rect) {
        let size = CHECKBOX_SIZE.min(rect.width - 2.0).min(rect.height - 2.0);
        if size <= 0.0 {
            return;
        }
        let x = (rect.x + (rect.width - size) / 2.0).round();
        let y = (rect.y + (rect.height - size) / 2.0).round();
        let boxed = Rect::new(x, y, size, size);
        let checked = content.value.as_bool().unwrap_or(false);

        if checked {
            cx.surface.fill_rect(boxed, &cx.theme.accent_color);
            // Check mark
            let color = &cx.theme.cell_bg;
            let (l, t) = (boxed.x, boxed.y);
            cx.surface
                .line(l + size * 0.25, t + size * 0.5, l + size * 0.45, t + size * 0.7, color, 2.0);
            cx.surface
                .line(l + size * 0.45, t + size * 0.7, l + size * 0.75, t + size * 0.3, color, 2.0);
        } else {
            let color = if content.readonly {
                &cx.theme.text_light
            } else {
                &cx.theme.text_medium
            };
            cx.surface.stroke_rect(boxed.inset(0.5), color, 1.0);
        }
    }

    fn preferred_width(&self, _cx: &mut PaintContext<'_>, _content: &CellContent) -> Option<f64> {
        Some(BOOLEAN_WIDTH)
    }
}

/// Row of filled and empty stars.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingPainter;

impl RatingPainter {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn stars(content: &CellContent) -> u32 {
        // Clamped to [0, MAX_RATING] before the cast.
        let value = content.value.as_f64().unwrap_or(0.0);
        value.round().clamp(0.0, f64::from(MAX_RATING)) as u32
    }
}

impl CellPainter for RatingPainter {
    fn render(&self, cx: &mut PaintContext<'_>, content: &CellContent, rect: Rect) {
        let font = cx.theme.cell_font();
        cx.set_font(&font);
        let filled = Self::stars(content);
        let glyph_width = cx.measure(STAR_FILLED);
        let mut x = rect.x + cx.theme.cell_padding;
        let y = rect.y + rect.height / 2.0;
        let star = cx.theme.star_color.clone();
        let empty = cx.theme.text_light.clone();
        for i in 0..MAX_RATING {
            if x + glyph_width > rect.right() - cx.theme.cell_padding {
                break;
            }
            let (glyph, color) = if i < filled {
                (STAR_FILLED, &star)
            } else {
                (STAR_EMPTY, &empty)
            };
            cx.surface.fill_text(glyph, x, y, TextAlign::Left, color);
            x += glyph_width;
        }
    }

    fn preferred_width(&self, cx: &mut PaintContext<'_>, _content: &CellContent) -> Option<f64> {
        let font = cx.theme.cell_font();
        cx.set_font(&font);
        let glyph_width = cx.measure(STAR_FILLED);
        Some(glyph_width * f64::from(MAX_RATING) + cx.theme.cell_padding * 2.0)
    }
}

/// Pulsing placeholder bar.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadingPainter;

impl LoadingPainter {
    /// Opacity in [0.4, 1.0], one full pulse every 1.2s.
    pub fn pulse(now_ms: f64) -> f64 {
        let phase = (now_ms / 1200.0).fract() * std::f64::consts::TAU;
        0.7 + 0.3 * phase.sin()
    }
}

impl CellPainter for LoadingPainter {
    fn render(&self, cx: &mut PaintContext<'_>, _content: &CellContent, rect: Rect) {
        let padding = cx.theme.cell_padding;
        let bar_height = (cx.theme.font_size).min(rect.height - padding);
        let bar_width = (rect.width - padding * 2.0) * 0.6;
        if bar_height <= 0.0 || bar_width <= 0.0 {
            return;
        }
        let bar = Rect::new(
            rect.x + padding,
            rect.y + (rect.height - bar_height) / 2.0,
            bar_width,
            bar_height,
        );
        let base = Rgb::parse(&cx.theme.loading_color).unwrap_or_default();
        let bg = Rgb::parse(&cx.theme.cell_bg).unwrap_or_default();
        let color = bg.mix(base, Self::pulse(cx.now_ms)).to_hex();
        cx.surface.fill_rect(bar, &color);
    }
}
