//! Text cell sanitization.
//!
//! Cell text is untrusted and may be written back into spreadsheets later,
//! so leading formula triggers are removed along with control characters.

use crate::model::CellValue;

/// Hard cap on cell text length, applied before any other cleaning.
pub const MAX_CELL_CHARS: usize = 500;

/// Characters that make spreadsheet software treat a cell as a formula.
const FORMULA_TRIGGERS: [char; 6] = ['=', '+', '-', '@', '\t', '\r'];

/// Sanitize a cell for use as account code or name.
///
/// # Example
///
/// ```
/// use balanta::{sanitize, CellValue};
///
/// assert_eq!(sanitize(&CellValue::text("=SUM(A1:A10)")), "SUM(A1:A10)");
/// assert_eq!(sanitize(&CellValue::Number(401.0)), "401");
/// ```
pub fn sanitize(cell: &CellValue) -> String {
    sanitize_str(&cell.to_text())
}

/// Sanitize raw text.
pub fn sanitize_str(text: &str) -> String {
    let truncated = match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    };

    truncated
        .trim_start_matches(FORMULA_TRIGGERS)
        .chars()
        .filter(|c| !is_stripped_control(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// C0 controls and DEL, except tab, line feed and carriage return.
fn is_stripped_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}')
}
