//! JSON renderer implementation.

use crate::error::{Error, Result};
use crate::model::ParseResult;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert a ParseResult to JSON.
pub fn to_json(result: &ParseResult, format: JsonFormat) -> Result<String> {
    match format {
        JsonFormat::Compact => serde_json::to_string(result),
        JsonFormat::Pretty => serde_json::to_string_pretty(result),
    }
    .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Convert a ParseResult to pretty JSON.
pub fn to_json_default(result: &ParseResult) -> Result<String> {
    to_json(result, JsonFormat::Pretty)
}
