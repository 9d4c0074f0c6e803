//! # balanta
//!
//! Trial-balance ingestion from untrusted XLSX and legacy XLS workbooks.
//!
//! The first worksheet of a workbook is read as a grid. Row 0 is the
//! header; every other row is sanitized, validated and turned into a
//! [`ParsedAccount`] with six monetary columns. Amounts written in
//! Romanian (`1.234,56`) or international (`1,234.56`) notation are both
//! understood. The result carries the accepted accounts, their rounded
//! [`Totals`] and, on failure, a user-facing message.
//!
//! ## Quick Start
//!
//! ```no_run
//! use balanta::{parse_file, render};
//!
//! let result = parse_file("balanta.xlsx");
//! if result.success {
//!     println!("{} accounts", result.accounts_count);
//!     println!("{}", render::to_text(&result));
//! } else {
//!     eprintln!("{}", result.error.as_deref().unwrap_or_default());
//! }
//! ```
//!
//! ## Building Blocks
//!
//! ```
//! use balanta::{parse_number, sanitize, CellValue};
//! use rust_decimal::Decimal;
//!
//! assert_eq!(parse_number(&CellValue::text("1.234,56")), Decimal::new(123456, 2));
//! assert_eq!(parse_number(&CellValue::text("1,234.56")), Decimal::new(123456, 2));
//! assert_eq!(sanitize(&CellValue::text("@cmd")), "cmd");
//! ```

pub mod container;
pub mod detect;
pub mod error;
pub mod ingest;
pub mod model;
pub mod number;
pub mod options;
pub mod render;
pub mod sanitize;
pub mod status;
pub mod upload;
pub mod xls;
pub mod xlsx;

// Re-exports
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use detect::{detect_format_from_bytes, detect_format_from_path, FormatType};
pub use error::{Error, ImportError, Result};
pub use ingest::{is_valid_account_code, parse_bytes, TrialBalanceParser};
pub use model::{
    CellValue, Grid, ImportRow, ParseResult, ParsedAccount, Sheet, SkipReason, SkippedRow, Totals,
};
pub use number::parse_number;
pub use options::ParseOptions;
pub use sanitize::sanitize;
pub use status::{ImportStatus, InvalidTransition};
pub use upload::{is_allowed_extension, normalize_filename, storage_path};
pub use xls::XlsReader;
pub use xlsx::XlsxReader;

use std::path::Path;

/// Parse a workbook file with the default limits.
///
/// An unreadable path is reported like any other decode failure.
///
/// # Example
///
/// ```no_run
/// use balanta::parse_file;
///
/// let result = parse_file("balanta.xlsx");
/// println!("Accounts: {}", result.accounts_count);
/// ```
pub fn parse_file(path: impl AsRef<Path>) -> ParseResult {
    parse_file_with_options(path, &ParseOptions::default())
}

/// Parse a workbook file with custom options.
///
/// # Example
///
/// ```no_run
/// use balanta::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().with_diagnostics(true);
/// let result = parse_file_with_options("balanta.xlsx", &options);
/// for skipped in &result.skipped {
///     println!("row {} skipped: {:?}", skipped.row, skipped.reason);
/// }
/// ```
pub fn parse_file_with_options(path: impl AsRef<Path>, options: &ParseOptions) -> ParseResult {
    let path = path.as_ref();
    match std::fs::read(path) {
        Ok(data) => TrialBalanceParser::with_options(options.clone()).parse(&data),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "cannot read workbook");
            ParseResult::failed(&ImportError::from(Error::Io(err)))
        }
    }
}
