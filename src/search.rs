//! Find cells whose display text matches a user-typed pattern.
//!
//! Patterns come straight from a search box, so a malformed pattern is not
//! an error: it matches nothing.

use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::render::CellProvider;
use crate::types::CellPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    /// Match the pattern as plain text instead of a regular expression
    pub literal: bool,
    /// Stop after this many matches
    pub limit: Option<usize>,
}

/// Compile `pattern`, or `None` when it is empty or invalid.
pub fn compile(pattern: &str, options: SearchOptions) -> Option<Regex> {
    if pattern.is_empty() {
        return None;
    }
    let source = if options.literal {
        regex::escape(pattern)
    } else {
        pattern.to_string()
    };
    match RegexBuilder::new(&source)
        .case_insensitive(!options.case_sensitive)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            log::debug!("search: invalid pattern {pattern:?}: {e}");
            None
        }
    }
}

/// Cells in row-major order whose display text matches `pattern`.
/// `bounds` is `(columns, rows)`.
pub fn find_cells(
    provider: &dyn CellProvider,
    bounds: (u32, u32),
    pattern: &str,
    options: SearchOptions,
) -> Vec<CellPoint> {
    let Some(re) = compile(pattern, options) else {
        return Vec::new();
    };
    let (columns, rows) = bounds;
    let limit = options.limit.unwrap_or(usize::MAX);
    let mut found = Vec::new();
    for row in 0..rows {
        for col in 0..columns {
            if found.len() >= limit {
                return found;
            }
            let cell = CellPoint::new(col, row);
            if re.is_match(&provider.cell_content(cell).display_text()) {
                found.push(cell);
            }
        }
    }
    found
}
