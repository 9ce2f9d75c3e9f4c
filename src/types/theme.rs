//! Grid theme: colors, typography and spacing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::render::translucent;

/// Alpha of the selection overlay derived from an overridden accent.
const ACCENT_FILL_ALPHA: f64 = 0.12;

/// Which base theme to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the host's system color-scheme preference.
    #[default]
    Auto,
}

/// Fully resolved theme used by the paint pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub accent_color: String,
    /// Translucent fill used for selection overlays
    pub accent_fill: String,
    pub text_dark: String,
    pub text_medium: String,
    pub text_light: String,
    pub link_color: String,
    pub header_bg: String,
    pub header_text: String,
    pub header_selected_bg: String,
    pub cell_bg: String,
    pub selected_cell_bg: String,
    pub grid_line_color: String,
    pub border_color: String,
    pub star_color: String,
    pub loading_color: String,
    pub error_color: String,
    pub font_family: String,
    pub font_size: f64,
    pub header_font_weight: String,
    pub cell_padding: f64,
    pub row_height: f64,
    pub header_height: f64,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            accent_color: "#4F5DFF".to_string(),
            accent_fill: "rgba(79, 93, 255, 0.12)".to_string(),
            text_dark: "#313139".to_string(),
            text_medium: "#737383".to_string(),
            text_light: "#B2B2C0".to_string(),
            link_color: "#4F5DFF".to_string(),
            header_bg: "#F7F7F8".to_string(),
            header_text: "#313139".to_string(),
            header_selected_bg: "#E9EBFF".to_string(),
            cell_bg: "#FFFFFF".to_string(),
            selected_cell_bg: "#F1F2FF".to_string(),
            grid_line_color: "#E1E2E5".to_string(),
            border_color: "#D0D1D6".to_string(),
            star_color: "#F5B300".to_string(),
            loading_color: "#E6E6EB".to_string(),
            error_color: "#D93025".to_string(),
            font_family: "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif"
                .to_string(),
            font_size: 13.0,
            header_font_weight: "600".to_string(),
            cell_padding: 8.0,
            row_height: 40.0,
            header_height: 40.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            accent_color: "#8C96FF".to_string(),
            accent_fill: "rgba(140, 150, 255, 0.18)".to_string(),
            text_dark: "#EDEDF0".to_string(),
            text_medium: "#B8B8C4".to_string(),
            text_light: "#7E7E8C".to_string(),
            link_color: "#A4ACFF".to_string(),
            header_bg: "#212126".to_string(),
            header_text: "#EDEDF0".to_string(),
            header_selected_bg: "#2E3160".to_string(),
            cell_bg: "#16161A".to_string(),
            selected_cell_bg: "#23254A".to_string(),
            grid_line_color: "#2E2E35".to_string(),
            border_color: "#3A3A44".to_string(),
            star_color: "#FFC933".to_string(),
            loading_color: "#2A2A31".to_string(),
            error_color: "#FF6B60".to_string(),
            ..Self::light()
        }
    }

    /// Resolve the base theme for `mode` and merge `overrides` on top.
    pub fn resolve(mode: ThemeMode, prefers_dark: bool, overrides: Option<&ThemeOverride>) -> Self {
        let mut theme = match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Auto if prefers_dark => Self::dark(),
            ThemeMode::Auto => Self::light(),
        };
        if let Some(overrides) = overrides {
            theme.apply(overrides);
        }
        theme
    }

    /// CSS font shorthand for body cells.
    pub fn cell_font(&self) -> String {
        format!("{}px {}", self.font_size, self.font_family)
    }

    /// CSS font shorthand for header labels.
    pub fn header_font(&self) -> String {
        format!(
            "{} {}px {}",
            self.header_font_weight, self.font_size, self.font_family
        )
    }

    /// Flat `--gc-*` variable map for the host's styling system.
    pub fn css_variables(&self) -> BTreeMap<String, String> {
        let pairs: [(&str, String); 22] = [
            ("accent-color", self.accent_color.clone()),
            ("accent-fill", self.accent_fill.clone()),
            ("text-dark", self.text_dark.clone()),
            ("text-medium", self.text_medium.clone()),
            ("text-light", self.text_light.clone()),
            ("link-color", self.link_color.clone()),
            ("header-bg", self.header_bg.clone()),
            ("header-text", self.header_text.clone()),
            ("header-selected-bg", self.header_selected_bg.clone()),
            ("cell-bg", self.cell_bg.clone()),
            ("selected-cell-bg", self.selected_cell_bg.clone()),
            ("grid-line-color", self.grid_line_color.clone()),
            ("border-color", self.border_color.clone()),
            ("star-color", self.star_color.clone()),
            ("loading-color", self.loading_color.clone()),
            ("error-color", self.error_color.clone()),
            ("font-family", self.font_family.clone()),
            ("font-size", format!("{}px", self.font_size)),
            ("header-font-weight", self.header_font_weight.clone()),
            ("cell-padding", format!("{}px", self.cell_padding)),
            ("row-height", format!("{}px", self.row_height)),
            ("header-height", format!("{}px", self.header_height)),
        ];
        pairs
            .into_iter()
            .map(|(k, v)| (format!("--gc-{k}"), v))
            .collect()
    }

    fn apply(&mut self, o: &ThemeOverride) {
        fn set<T: Clone>(slot: &mut T, value: Option<&T>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }
        set(&mut self.accent_color, o.accent_color.as_ref());
        if o.accent_color.is_some() && o.accent_fill.is_none() {
            self.accent_fill = translucent(&self.accent_color, ACCENT_FILL_ALPHA);
        }
        set(&mut self.accent_fill, o.accent_fill.as_ref());
        set(&mut self.text_dark, o.text_dark.as_ref());
        set(&mut self.text_medium, o.text_medium.as_ref());
        set(&mut self.text_light, o.text_light.as_ref());
        set(&mut self.link_color, o.link_color.as_ref());
        set(&mut self.header_bg, o.header_bg.as_ref());
        set(&mut self.header_text, o.header_text.as_ref());
        set(&mut self.header_selected_bg, o.header_selected_bg.as_ref());
        set(&mut self.cell_bg, o.cell_bg.as_ref());
        set(&mut self.selected_cell_bg, o.selected_cell_bg.as_ref());
        set(&mut self.grid_line_color, o.grid_line_color.as_ref());
        set(&mut self.border_color, o.border_color.as_ref());
        set(&mut self.star_color, o.star_color.as_ref());
        set(&mut self.loading_color, o.loading_color.as_ref());
        set(&mut self.error_color, o.error_color.as_ref());
        set(&mut self.font_family, o.font_family.as_ref());
        set(&mut self.font_size, o.font_size.as_ref());
        set(&mut self.header_font_weight, o.header_font_weight.as_ref());
        set(&mut self.cell_padding, o.cell_padding.as_ref());
        set(&mut self.row_height, o.row_height.as_ref());
        set(&mut self.header_height, o.header_height.as_ref());
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

/// Partial theme supplied by the host; `None` keeps the base value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeOverride {
    pub accent_color: Option<String>,
    pub accent_fill: Option<String>,
    pub text_dark: Option<String>,
    pub text_medium: Option<String>,
    pub text_light: Option<String>,
    pub link_color: Option<String>,
    pub header_bg: Option<String>,
    pub header_text: Option<String>,
    pub header_selected_bg: Option<String>,
    pub cell_bg: Option<String>,
    pub selected_cell_bg: Option<String>,
    pub grid_line_color: Option<String>,
    pub border_color: Option<String>,
    pub star_color: Option<String>,
    pub loading_color: Option<String>,
    pub error_color: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub header_font_weight: Option<String>,
    pub cell_padding: Option<f64>,
    pub row_height: Option<f64>,
    pub header_height: Option<f64>,
}
