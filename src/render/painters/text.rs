use super::{CellPainter, PaintContext};
use crate::render::surface::TextAlign;
use crate::types::{CellContent, Rect};

/// Left-aligned, ellipsis-truncated text. Also the fallback painter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextPainter;

impl CellPainter for TextPainter {
    fn render(&self, cx: &mut PaintContext<'_>, content: &CellContent, rect: Rect) {
        let font = cx.theme.cell_font();
        cx.set_font(&font);
        let color = if content.error.is_some() {
            cx.theme.error_color.clone()
        } else {
            cx.theme.text_dark.clone()
        };
        cx.draw_text(&content.display_text(), rect, TextAlign::Left, &color);
    }

    fn preferred_width(&self, cx: &mut PaintContext<'_>, content: &CellContent) -> Option<f64> {
        let font = cx.theme.cell_font();
        cx.set_font(&font);
        Some(cx.measure(&content.display_text()) + cx.theme.cell_padding * 2.0)
    }
}

/// Right-aligned number with thousands grouping.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberPainter;

impl NumberPainter {
    fn label(content: &CellContent) -> String {
        match (&content.display, content.value.as_f64()) {
            (Some(display), _) => display.clone(),
            (None, Some(n)) => format_number(n),
            (None, None) => content.display_text(),
        }
    }
}

impl CellPainter for NumberPainter {
    fn render(&self, cx: &mut PaintContext<'_>, content: &CellContent, rect: Rect) {
        let font = cx.theme.cell_font();
        cx.set_font(&font);
        let color = if content.error.is_some() {
            cx.theme.error_color.clone()
        } else {
            cx.theme.text_dark.clone()
        };
        cx.draw_text(&Self::label(content), rect, TextAlign::Right, &color);
    }

    fn preferred_width(&self, cx: &mut PaintContext<'_>, content: &CellContent) -> Option<f64> {
        let font = cx.theme.cell_font();
        cx.set_font(&font);
        Some(cx.measure(&Self::label(content)) + cx.theme.cell_padding * 2.0)
    }
}

/// Underlined text in the link color.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkPainter;

impl CellPainter for LinkPainter {
    fn render(&self, cx: &mut PaintContext<'_>, content: &CellContent, rect: Rect) {
        let font = cx.theme.cell_font();
        cx.set_font(&font);
        let color = cx.theme.link_color.clone();
        let width = cx.draw_text(&content.display_text(), rect, TextAlign::Left, &color);
        if width > 0.0 {
            let x = rect.x + cx.theme.cell_padding;
            let y = (rect.y + rect.height / 2.0 + cx.theme.font_size / 2.0 + 1.0).floor() + 0.5;
            cx.surface.line(x, y, x + width, y, &color, 1.0);
        }
    }

    fn preferred_width(&self, cx: &mut PaintContext<'_>, content: &CellContent) -> Option<f64> {
        TextPainter.preferred_width(cx, content)
    }
}

/// Format with `,` thousands separators and at most two decimals.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let digits = int_part.len();
    let mut grouped = String::with_capacity(digits + digits / 3 + 4);
    if value < 0.0 && fixed.bytes().any(|b| b != b'0' && b != b'.') {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if !frac.is_empty() {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
