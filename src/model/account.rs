//! Ledger account lines and their totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::number::round2;

/// One accepted trial-balance line.
///
/// Every field is sanitized and bounded before construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAccount {
    /// Account code, 3 to 6 ASCII digits
    pub account_code: String,
    /// Account name, at most 200 characters
    pub account_name: String,
    pub opening_debit: Decimal,
    pub opening_credit: Decimal,
    pub debit_turnover: Decimal,
    pub credit_turnover: Decimal,
    pub closing_debit: Decimal,
    pub closing_credit: Decimal,
}

impl ParsedAccount {
    /// The six monetary fields in column order.
    pub fn amounts(&self) -> [Decimal; 6] {
        [
            self.opening_debit,
            self.opening_credit,
            self.debit_turnover,
            self.credit_turnover,
            self.closing_debit,
            self.closing_credit,
        ]
    }
}

/// Column-wise sums of the monetary fields of all accepted accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub opening_debit: Decimal,
    pub opening_credit: Decimal,
    pub debit_turnover: Decimal,
    pub credit_turnover: Decimal,
    pub closing_debit: Decimal,
    pub closing_credit: Decimal,
}

impl Totals {
    /// Fold step: these totals plus one account.
    pub fn add(self, account: &ParsedAccount) -> Self {
        Self {
            opening_debit: self.opening_debit + account.opening_debit,
            opening_credit: self.opening_credit + account.opening_credit,
            debit_turnover: self.debit_turnover + account.debit_turnover,
            credit_turnover: self.credit_turnover + account.credit_turnover,
            closing_debit: self.closing_debit + account.closing_debit,
            closing_credit: self.closing_credit + account.closing_credit,
        }
    }

    /// Sum a sequence of accounts and round each total to 2 decimals.
    pub fn from_accounts<'a>(accounts: impl IntoIterator<Item = &'a ParsedAccount>) -> Self {
        accounts
            .into_iter()
            .fold(Totals::default(), Totals::add)
            .rounded()
    }

    /// Round every field to 2 decimals.
    pub fn rounded(self) -> Self {
        Self {
            opening_debit: round2(self.opening_debit),
            opening_credit: round2(self.opening_credit),
            debit_turnover: round2(self.debit_turnover),
            credit_turnover: round2(self.credit_turnover),
            closing_debit: round2(self.closing_debit),
            closing_credit: round2(self.closing_credit),
        }
    }

    /// The six totals in column order.
    pub fn amounts(&self) -> [Decimal; 6] {
        [
            self.opening_debit,
            self.opening_credit,
            self.debit_turnover,
            self.credit_turnover,
            self.closing_debit,
            self.closing_credit,
        ]
    }

    /// Whether opening and closing balances (and turnovers) balance debit
    /// against credit.
    pub fn is_balanced(&self) -> bool {
        self.opening_debit == self.opening_credit
            && self.debit_turnover == self.credit_turnover
            && self.closing_debit == self.closing_credit
    }
}

/// An account tagged with the import it belongs to, ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRow {
    /// Caller-supplied import identifier
    pub import_id: String,
    #[serde(flatten)]
    pub account: ParsedAccount,
}
