//! Plain text renderer implementation.

use rust_decimal::Decimal;
use std::fmt::Write;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::{ParseResult, SkipReason, Totals};

const CODE_WIDTH: usize = 8;
const NAME_WIDTH: usize = 32;
const AMOUNT_WIDTH: usize = 16;

const AMOUNT_HEADERS: [&str; 6] = [
    "SI Debit",
    "SI Credit",
    "Rulaj Debit",
    "Rulaj Credit",
    "SF Debit",
    "SF Credit",
];

/// Render a ParseResult as a terminal summary.
pub fn to_text(result: &ParseResult) -> String {
    let mut output = String::new();

    if let Some(ref error) = result.error {
        let _ = writeln!(output, "Error: {}", error);
    } else {
        render_table(&mut output, result);
    }

    if !result.skipped.is_empty() {
        let _ = writeln!(output, "\nSkipped rows: {}", result.skipped.len());
        for skipped in &result.skipped {
            let _ = writeln!(output, "  row {}: {}", skipped.row + 1, describe(&skipped.reason));
        }
    }

    output.trim_end().to_string()
}

fn render_table(output: &mut String, result: &ParseResult) {
    let _ = write!(output, "{:<CODE_WIDTH$} {:<NAME_WIDTH$}", "Cont", "Denumire");
    for header in AMOUNT_HEADERS {
        let _ = write!(output, " {:>AMOUNT_WIDTH$}", header);
    }
    output.push('\n');

    let rule_width = CODE_WIDTH + NAME_WIDTH + 1 + (AMOUNT_WIDTH + 1) * AMOUNT_HEADERS.len();
    let rule = "-".repeat(rule_width);
    output.push_str(&rule);
    output.push('\n');

    for account in &result.accounts {
        render_line(
            output,
            &account.account_code,
            &account.account_name,
            account.amounts(),
        );
    }

    output.push_str(&rule);
    output.push('\n');
    render_line(output, "", "Total", result.totals.amounts());

    let _ = writeln!(output, "\nAccounts: {}", result.accounts_count);
    let _ = writeln!(output, "Balanced: {}", balance_label(&result.totals));
}

fn render_line(output: &mut String, code: &str, name: &str, amounts: [Decimal; 6]) {
    let _ = write!(output, "{:<CODE_WIDTH$} {}", code, fit(name, NAME_WIDTH));
    for amount in amounts {
        let _ = write!(output, " {:>AMOUNT_WIDTH$.2}", amount);
    }
    output.push('\n');
}

/// Pad or cut to exactly `width` terminal columns, marking a cut with `~`.
fn fit(text: &str, width: usize) -> String {
    let mut fitted = String::new();
    let mut used = 0;

    if text.width() <= width {
        fitted.push_str(text);
        used = text.width();
    } else {
        for c in text.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > width.saturating_sub(1) {
                break;
            }
            fitted.push(c);
            used += w;
        }
        fitted.push('~');
        used += 1;
    }

    fitted.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    fitted
}

fn balance_label(totals: &Totals) -> &'static str {
    if totals.is_balanced() {
        "yes"
    } else {
        "no"
    }
}

fn describe(reason: &SkipReason) -> String {
    match reason {
        SkipReason::EmptyRow => "empty".to_string(),
        SkipReason::InvalidAccountCode { code } => format!("invalid account code {:?}", code),
        SkipReason::NameTooLong { chars } => format!("name too long ({} characters)", chars),
        SkipReason::RowCapReached => "account limit reached".to_string(),
    }
}
