//! Upload filename policy.
//!
//! Uploaded workbooks are stored under `{owner_id}/{normalized_filename}`.
//! Names are folded to ASCII so storage keys stay portable.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Accepted workbook extensions, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 2] = [".xlsx", ".xls"];

/// Fold a filename to the storage alphabet.
///
/// Diacritics are removed by canonical decomposition; anything outside
/// `[A-Za-z0-9._\- ]` that remains becomes `_`.
///
/// # Example
///
/// ```
/// assert_eq!(balanta::normalize_filename("Balanță martie.xlsx"), "Balanta martie.xlsx");
/// assert_eq!(balanta::normalize_filename("a/b:c.xls"), "a_b_c.xls");
/// ```
pub fn normalize_filename(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if is_storage_char(c) { c } else { '_' })
        .collect()
}

fn is_storage_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | ' ')
}

/// Whether the filename carries an accepted workbook extension.
pub fn is_allowed_extension(name: &str) -> bool {
    let lower = name.to_lowercase();
    ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Storage key for an upload.
pub fn storage_path(owner_id: &str, filename: &str) -> String {
    format!("{}/{}", owner_id, normalize_filename(filename))
}
