//! Outcome of one ingestion call.

use serde::{Deserialize, Serialize};

use super::{ImportRow, ParsedAccount, Totals};
use crate::error::ImportError;

/// Why a data row was not turned into an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The row is blank or its first cell is empty.
    EmptyRow,
    /// The sanitized first cell is not 3 to 6 ASCII digits.
    InvalidAccountCode { code: String },
    /// The sanitized name is longer than the allowed maximum.
    NameTooLong { chars: usize },
    /// The account cap was reached before this row.
    RowCapReached,
}

/// A dropped row, identified by its 0-based index in the sheet grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row: usize,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Result of parsing one trial-balance workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub success: bool,
    /// Accepted accounts in sheet order
    pub accounts: Vec<ParsedAccount>,
    pub totals: Totals,
    pub accounts_count: usize,
    /// User-facing failure message when `success` is false
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    /// Dropped rows, only collected when diagnostics are enabled
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub skipped: Vec<SkippedRow>,
}

impl ParseResult {
    /// A successful result over the accepted accounts.
    pub fn completed(accounts: Vec<ParsedAccount>, totals: Totals) -> Self {
        Self {
            success: true,
            accounts_count: accounts.len(),
            accounts,
            totals,
            error: None,
            skipped: Vec::new(),
        }
    }

    /// A failed result. Totals are still present, zeroed.
    pub fn failed(error: &ImportError) -> Self {
        Self {
            success: false,
            accounts: Vec::new(),
            totals: Totals::default(),
            accounts_count: 0,
            error: Some(error.to_string()),
            skipped: Vec::new(),
        }
    }

    /// Attach skipped-row diagnostics.
    pub fn with_skipped(mut self, skipped: Vec<SkippedRow>) -> Self {
        self.skipped = skipped;
        self
    }

    /// Tag every account with `import_id`, preserving order.
    pub fn import_rows(&self, import_id: &str) -> Vec<ImportRow> {
        self.accounts
            .iter()
            .map(|account| ImportRow {
                import_id: import_id.to_string(),
                account: account.clone(),
            })
            .collect()
    }
}
