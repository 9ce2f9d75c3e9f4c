use super::{CellPainter, PaintContext};
use crate::types::{CellContent, CellValue, Rect};

const ICON_SIZE: f64 = 20.0;
const IMAGE_GAP: f64 = 4.0;

/// Images laid out left to right, scaled to the row height. Images that
/// are not loaded yet are drawn as placeholder boxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagePainter;

impl ImagePainter {
    fn urls(content: &CellContent) -> Vec<&str> {
        match &content.value {
            CellValue::List(items) => items.iter().map(String::as_str).collect(),
            CellValue::Text(url) if !url.is_empty() => vec![url.as_str()],
            _ => Vec::new(),
        }
    }
}

impl CellPainter for ImagePainter {
    fn render(&self, cx: &mut PaintContext<'_>, content: &CellContent, rect: Rect) {
        let padding = cx.theme.cell_padding;
        let max_h = (rect.height - padding).max(0.0);
        let right = rect.right() - padding;
        let mut x = rect.x + padding;
        for url in Self::urls(content) {
            if x >= right || max_h <= 0.0 {
                break;
            }
            let y = rect.y + (rect.height - max_h) / 2.0;
            match cx.resources.image(url, cx.now_ms) {
                Some(image) => {
                    let scale = image.fit_scale(right - x, max_h);
                    let (w, h) = (image.width * scale, image.height * scale);
                    if w <= 0.0 {
                        continue;
                    }
                    let target = Rect::new(x, rect.y + (rect.height - h) / 2.0, w, h);
                    cx.surface.draw_image(&image, target);
                    x += w + IMAGE_GAP;
                }
                None => {
                    let w = max_h.min(right - x);
                    cx.surface
                        .fill_rect(Rect::new(x, y, w, max_h), &cx.theme.loading_color);
                    x += w + IMAGE_GAP;
                }
            }
        }
    }

    /// Tallest loaded image plus padding. Unloaded images have no opinion.
    fn preferred_height(&self, cx: &mut PaintContext<'_>, content: &CellContent) -> Option<f64> {
        let now_ms = cx.now_ms;
        Self::urls(content)
            .into_iter()
            .filter_map(|url| cx.resources.image(url, now_ms))
            .map(|image| image.height)
            .reduce(f64::max)
            .map(|h| h + cx.theme.cell_padding)
    }
}

/// Named sprite icon, left-aligned and vertically centered.
#[derive(Debug, Clone, Copy, Default)]
pub struct IconPainter;

impl CellPainter for IconPainter {
    fn render(&self, cx: &mut PaintContext<'_>, content: &CellContent, rect: Rect) {
        let Some(name) = content.value.as_str() else {
            return;
        };
        let size = ICON_SIZE.min(rect.height - cx.theme.cell_padding);
        if size <= 0.0 {
            return;
        }
        let target = Rect::new(
            rect.x + cx.theme.cell_padding,
            rect.y + (rect.height - size) / 2.0,
            size,
            size,
        );
        // Unknown or unloaded icons are skipped.
        if let Some(icon) = cx.resources.icon(name, cx.now_ms) {
            cx.surface.draw_image(&icon, target);
        }
    }

    fn preferred_width(&self, cx: &mut PaintContext<'_>, _content: &CellContent) -> Option<f64> {
        Some(ICON_SIZE + cx.theme.cell_padding * 2.0)
    }
}
