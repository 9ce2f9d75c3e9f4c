//! Color helpers for theme strings.
//!
//! Theme colors are CSS strings so they pass straight to Canvas 2D. [`Rgb`]
//! is used when the pipeline needs to derive a color (translucent overlays,
//! pulsing placeholders).

/// A CSS color string (e.g., "#FF0000", "rgba(255, 0, 0, 0.5)")
pub type CssColor = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`, `RRGGBB`, `rgb(...)` or `rgba(...)`; alpha is dropped.
    pub fn parse(s: &str) -> Option<Self> {
        parse_color_rgba(s).map(|(r, g, b, _)| Self { r, g, b })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn with_alpha(self, alpha: f64) -> CssColor {
        format!(
            "rgba({}, {}, {}, {:.2})",
            self.r,
            self.g,
            self.b,
            alpha.clamp(0.0, 1.0)
        )
    }

    /// Blend toward `other`. 0.0 = self, 1.0 = other.
    pub fn mix(self, other: Rgb, factor: f64) -> Self {
        Self {
            r: blend_component(self.r, other.r, factor),
            g: blend_component(self.g, other.g, factor),
            b: blend_component(self.b, other.b, factor),
        }
    }
}

// Clamped to [0, 255] before the cast.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend_component(from: u8, to: u8, factor: f64) -> u8 {
    let from = f64::from(from);
    let to = f64::from(to);
    let blended = from + (to - from) * factor.clamp(0.0, 1.0);
    blended.clamp(0.0, 255.0).round() as u8
}

/// `color` with its alpha replaced. Unparseable colors are returned as-is.
pub fn translucent(color: &str, alpha: f64) -> CssColor {
    Rgb::parse(color).map_or_else(|| color.to_string(), |c| c.with_alpha(alpha))
}

/// Parse a CSS color into RGBA components (alpha 0.0-1.0).
pub fn parse_color_rgba(s: &str) -> Option<(u8, u8, u8, f64)> {
    let s = s.trim();
    if let Some(inner) = s.strip_prefix("rgba(").and_then(|r| r.strip_suffix(')')) {
        let mut parts = inner.split(',').map(str::trim);
        let r = parts.next()?.parse().ok()?;
        let g = parts.next()?.parse().ok()?;
        let b = parts.next()?.parse().ok()?;
        let a: f64 = parts.next()?.parse().ok()?;
        return parts.next().is_none().then_some((r, g, b, a));
    }
    if let Some(inner) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        let mut parts = inner.split(',').map(str::trim);
        let r = parts.next()?.parse().ok()?;
        let g = parts.next()?.parse().ok()?;
        let b = parts.next()?.parse().ok()?;
        return parts.next().is_none().then_some((r, g, b, 1.0));
    }
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
    Some((r, g, b, 1.0))
}
