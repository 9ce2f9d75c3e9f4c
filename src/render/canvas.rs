//! Canvas 2D [`Surface`].
//!
//! The backing store is sized in physical pixels and the context is scaled
//! by the device pixel ratio, so every caller works in CSS pixels.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::surface::{Surface, TextAlign};
use crate::error::Result;
use crate::resources::Drawable;
use crate::types::Rect;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Size in CSS pixels
    width: f64,
    height: f64,
    dpr: f64,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| "Failed to get 2d context")?
            .ok_or("No 2d context available")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "Failed to cast to CanvasRenderingContext2d")?;
        ctx.set_text_baseline("middle");

        let width = f64::from(canvas.width());
        let height = f64::from(canvas.height());
        Ok(Self {
            canvas,
            ctx,
            width,
            height,
            dpr: 1.0,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    /// Resize to `width` x `height` CSS pixels at device pixel ratio `dpr`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };

        // Rounded and at least 1, so the casts are exact.
        let w_px = (self.width * self.dpr).round().max(1.0) as u32;
        let h_px = (self.height * self.dpr).round().max(1.0) as u32;
        self.canvas.set_width(w_px);
        self.canvas.set_height(h_px);

        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", self.width));
        let _ = style.set_property("height", &format!("{}px", self.height));

        // Resizing the backing store resets all context state.
        let _ = self.ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
        self.ctx.set_text_baseline("middle");
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: &str) {
        let _ = self.ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
        self.ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, line_width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
        self.ctx.begin_path();
        self.ctx.move_to(x1, y1);
        self.ctx.line_to(x2, y2);
        self.ctx.stroke();
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        self.ctx
            .measure_text(text)
            .map(|m| m.width())
            .unwrap_or(0.0)
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, align: TextAlign, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.set_text_align(align.as_css());
        let _ = self.ctx.fill_text(text, x, y);
    }

    fn draw_image(&mut self, image: &Drawable, rect: Rect) {
        if let Some(element) = &image.image {
            let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                element,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
            );
        }
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.ctx.begin_path();
        self.ctx.rect(rect.x, rect.y, rect.width, rect.height);
        self.ctx.clip();
    }

    fn set_alpha(&mut self, alpha: f64) {
        let current = self.ctx.global_alpha();
        self.ctx.set_global_alpha(current * alpha.clamp(0.0, 1.0));
    }
}
