use serde::{Deserialize, Serialize};

/// Content kind, used to pick a cell painter.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum CellKind {
    #[default]
    Text,
    Number,
    Boolean,
    Rating,
    Link,
    Loading,
    Image,
    Icon,
    /// Any kind the engine does not know; painted as text.
    #[serde(other)]
    Unknown,
}

/// Raw cell value as handed over by the host.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Multiple strings, e.g. image URLs
    List(Vec<String>),
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Number(n) => Some(*n != 0.0),
            Self::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::List(items) => items.first().map(String::as_str),
            _ => None,
        }
    }
}

/// Content of one cell, produced by the host for each visible position.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CellContent {
    #[serde(rename = "type")]
    pub kind: CellKind,
    pub value: CellValue,
    /// Pre-formatted text; painters prefer this over formatting `value`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    pub readonly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CellContent {
    pub fn text(s: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Text,
            value: CellValue::Text(s.into()),
            ..Self::default()
        }
    }

    pub fn number(n: f64) -> Self {
        Self {
            kind: CellKind::Number,
            value: CellValue::Number(n),
            ..Self::default()
        }
    }

    pub fn boolean(b: bool) -> Self {
        Self {
            kind: CellKind::Boolean,
            value: CellValue::Bool(b),
            ..Self::default()
        }
    }

    pub fn rating(stars: u8) -> Self {
        Self {
            kind: CellKind::Rating,
            value: CellValue::Number(f64::from(stars)),
            ..Self::default()
        }
    }

    pub fn link(url: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Link,
            value: CellValue::Text(url.into()),
            ..Self::default()
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Image,
            value: CellValue::List(vec![url.into()]),
            ..Self::default()
        }
    }

    pub fn icon(name: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Icon,
            value: CellValue::Text(name.into()),
            ..Self::default()
        }
    }

    pub fn loading() -> Self {
        Self {
            kind: CellKind::Loading,
            ..Self::default()
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Text shown for this cell: the display override, else the raw value.
    pub fn display_text(&self) -> String {
        if let Some(display) = &self.display {
            return display.clone();
        }
        match &self.value {
            CellValue::Empty => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::List(items) => items.join(", "),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_host_payload() {
        let json = r#"{"type":"number","value":12.5,"display":"12.50"}"#;
        let content: CellContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.kind, CellKind::Number);
        assert_eq!(content.value, CellValue::Number(12.5));
        assert_eq!(content.display_text(), "12.50");
        assert!(!content.readonly);
    }

    #[test]
    fn test_unknown_kind_falls_back() {
        let json = r#"{"type":"sparkline","value":"x"}"#;
        let content: CellContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.kind, CellKind::Unknown);
        assert_eq!(content.display_text(), "x");
    }

    #[test]
    fn test_value_coercions() {
        assert_eq!(CellValue::Text(" 3 ".into()).as_f64(), Some(3.0));
        assert_eq!(CellValue::Text("yes".into()).as_bool(), Some(true));
        assert_eq!(CellValue::Empty.as_bool(), None);
    }
}
