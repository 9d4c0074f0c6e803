//! Trial-balance ingestion pipeline.
//!
//! Bytes are decoded into the first sheet's grid, every data row is
//! sanitized and validated, accepted rows become [`ParsedAccount`]s, and the
//! totals are folded over the accepted sequence. Row-level problems never
//! fail an import; only whole-file conditions do.

use once_cell::sync::Lazy;
use regex::Regex;
use std::panic::{self, AssertUnwindSafe};

use crate::detect::{detect_format_from_bytes, FormatType};
use crate::error::ImportError;
use crate::model::{CellValue, Grid, ParseResult, ParsedAccount, SkipReason, SkippedRow, Totals};
use crate::number::parse_number;
use crate::options::ParseOptions;
use crate::sanitize::sanitize;
use crate::xls::XlsReader;
use crate::xlsx::XlsxReader;

/// Columns read from each row: code, name and six amounts.
pub const ACCOUNT_COLUMNS: usize = 8;

/// Account codes are 3 to 6 ASCII digits.
static ACCOUNT_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{3,6}$").unwrap());

/// Check an (already sanitized) account code.
pub fn is_valid_account_code(code: &str) -> bool {
    ACCOUNT_CODE.is_match(code)
}

/// Parser for trial-balance workbooks.
///
/// Holds only immutable options, so one instance can serve concurrent
/// callers.
///
/// # Example
///
/// ```no_run
/// use balanta::{ParseOptions, TrialBalanceParser};
///
/// let parser = TrialBalanceParser::with_options(ParseOptions::new().with_diagnostics(true));
/// let result = parser.parse(&std::fs::read("balanta.xlsx")?);
/// if result.success {
///     println!("{} accounts", result.accounts_count);
/// } else {
///     eprintln!("{}", result.error.unwrap_or_default());
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TrialBalanceParser {
    options: ParseOptions,
}

impl TrialBalanceParser {
    /// Create a parser with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// The options in effect.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse workbook bytes. Never panics or returns an error: every failure
    /// is reported through [`ParseResult::error`].
    pub fn parse(&self, data: &[u8]) -> ParseResult {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.decode_first_sheet(data)));

        match outcome {
            Ok(Ok(grid)) => self.parse_grid(&grid),
            Ok(Err(err)) => {
                tracing::debug!(kind = err.kind(), error = %err, "workbook rejected");
                ParseResult::failed(&err)
            }
            Err(_) => {
                let err = ImportError::DecodeFailure("internal decoder error".to_string());
                tracing::error!(error = %err, "workbook decoder panicked");
                ParseResult::failed(&err)
            }
        }
    }

    /// Decode the first worksheet into a grid of the account columns.
    ///
    /// XLSX and legacy XLS bytes are told apart by their signature, never by
    /// file name.
    pub fn decode_first_sheet(&self, data: &[u8]) -> Result<Grid, ImportError> {
        let limit = self.options.max_part_bytes;
        let sheet = match detect_format_from_bytes(data)? {
            FormatType::Xlsx => {
                XlsxReader::with_limit(data.to_vec(), limit)?.first_sheet(ACCOUNT_COLUMNS)?
            }
            FormatType::Xls => {
                XlsReader::with_limit(data.to_vec(), limit)?.first_sheet(ACCOUNT_COLUMNS)?
            }
        };
        Ok(sheet.ok_or(ImportError::NoSheets)?.grid)
    }

    /// Run the row pipeline over an already decoded grid.
    ///
    /// Row 0 is the header and is never validated.
    pub fn parse_grid(&self, grid: &Grid) -> ParseResult {
        if grid.len() < 2 {
            return ParseResult::failed(&ImportError::InsufficientData);
        }

        let collect = self.options.collect_diagnostics;
        let mut accounts = Vec::new();
        let mut skipped = Vec::new();

        for (index, row) in grid.rows().enumerate().skip(1) {
            if accounts.len() >= self.options.max_accounts {
                tracing::warn!(
                    max_accounts = self.options.max_accounts,
                    remaining_rows = grid.len() - index,
                    "account limit reached, ignoring remaining rows"
                );
                if collect {
                    skipped.push(SkippedRow {
                        row: index,
                        reason: SkipReason::RowCapReached,
                    });
                }
                break;
            }

            match self.read_row(row) {
                Ok(account) => accounts.push(account),
                Err(reason) if collect => skipped.push(SkippedRow { row: index, reason }),
                Err(_) => {}
            }
        }

        tracing::debug!(
            accepted = accounts.len(),
            rows = grid.len() - 1,
            "trial balance rows processed"
        );

        if accounts.is_empty() {
            return ParseResult::failed(&ImportError::NoValidAccounts).with_skipped(skipped);
        }

        let totals = Totals::from_accounts(&accounts);
        ParseResult::completed(accounts, totals).with_skipped(skipped)
    }

    /// Validate one data row.
    fn read_row(&self, row: &[CellValue]) -> Result<ParsedAccount, SkipReason> {
        let first = row.first().unwrap_or(&CellValue::Empty);
        if first.is_falsy() {
            return Err(SkipReason::EmptyRow);
        }

        let account_code = sanitize(first);
        if !is_valid_account_code(&account_code) {
            return Err(SkipReason::InvalidAccountCode { code: account_code });
        }

        let account_name = sanitize(column(row, 1));
        let chars = account_name.chars().count();
        if chars > self.options.max_name_chars {
            return Err(SkipReason::NameTooLong { chars });
        }

        Ok(ParsedAccount {
            account_code,
            account_name,
            opening_debit: parse_number(column(row, 2)),
            opening_credit: parse_number(column(row, 3)),
            debit_turnover: parse_number(column(row, 4)),
            credit_turnover: parse_number(column(row, 5)),
            closing_debit: parse_number(column(row, 6)),
            closing_credit: parse_number(column(row, 7)),
        })
    }
}

fn column(row: &[CellValue], index: usize) -> &CellValue {
    const BLANK: &CellValue = &CellValue::Empty;
    row.get(index).unwrap_or(BLANK)
}

/// Parse workbook bytes with the default limits.
///
/// # Example
///
/// ```no_run
/// let result = balanta::parse_bytes(&std::fs::read("balanta.xlsx")?);
/// println!("success: {}, accounts: {}", result.success, result.accounts_count);
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn parse_bytes(data: &[u8]) -> ParseResult {
    TrialBalanceParser::new().parse(data)
}
