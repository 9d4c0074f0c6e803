//! Localized amount parsing.
//!
//! Trial balances arrive both with Romanian formatting (`1.234,56`) and
//! international formatting (`1,234.56`). When both separators appear, the
//! one occurring last is the decimal separator. A lone comma is a decimal
//! comma. Anything that cannot be read as an in-range amount becomes zero.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::model::CellValue;

/// Largest accepted absolute amount: 999,999,999,999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Same bound as a float, for native numeric cells.
const MAX_AMOUNT_F64: f64 = 999_999_999_999.99;

/// Textual amounts longer than this are rejected.
pub const MAX_NUMBER_CHARS: usize = 50;

/// Fractional digits kept before rounding; enough to decide the 2-digit rounding.
const MAX_FRACTION_DIGITS: usize = 10;

/// Round to 2 decimals, midpoints away from zero. Negative zero becomes zero.
pub fn round2(value: Decimal) -> Decimal {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

/// Check the amount bound.
pub fn in_bounds(value: Decimal) -> bool {
    value.abs() <= MAX_AMOUNT
}

/// Parse a monetary cell. Never fails: rejected input yields zero.
///
/// # Example
///
/// ```
/// use balanta::{parse_number, CellValue};
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_number(&CellValue::text("1.234,56")), Decimal::new(123456, 2));
/// assert_eq!(parse_number(&CellValue::text("1,234.56")), Decimal::new(123456, 2));
/// assert_eq!(parse_number(&CellValue::Number(1e15)), Decimal::ZERO);
/// ```
pub fn parse_number(cell: &CellValue) -> Decimal {
    match cell {
        CellValue::Number(n) => parse_native(*n),
        CellValue::Text(s) => parse_amount(s),
        CellValue::Empty | CellValue::Bool(_) => Decimal::ZERO,
    }
}

fn parse_native(value: f64) -> Decimal {
    if !value.is_finite() || value.abs() > MAX_AMOUNT_F64 {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).map(round2).unwrap_or(Decimal::ZERO)
}

/// Parse a textual amount with locale disambiguation.
pub fn parse_amount(text: &str) -> Decimal {
    if text.chars().count() > MAX_NUMBER_CHARS || !text.chars().all(is_amount_char) {
        return Decimal::ZERO;
    }

    let normalized = normalize_separators(text);
    let Some(literal) = leading_decimal(&normalized) else {
        return Decimal::ZERO;
    };

    match Decimal::from_str(&literal) {
        Ok(value) if in_bounds(value) => round2(value),
        _ => Decimal::ZERO,
    }
}

/// Rewrite `text` so that `.` is the only (decimal) separator.
pub fn normalize_separators(text: &str) -> String {
    let compact: String = text.chars().filter(|c| !is_space(*c)).collect();

    let last_comma = compact.rfind(',');
    let last_dot = compact.rfind('.');

    match (last_comma, last_dot) {
        // Romanian: dots group thousands, the last comma is the decimal point
        (Some(comma), Some(dot)) if comma > dot => compact.replace('.', "").replace(',', "."),
        // International: commas group thousands
        (Some(_), Some(_)) => compact.replace(',', ""),
        (Some(_), None) => compact.replace(',', "."),
        _ => compact,
    }
}

/// A decimal literal at the start of normalized text.
static LEADING_DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?)([0-9]*)(?:\.([0-9]*))?").unwrap());

/// Longest prefix that reads as a decimal literal (`-?digits[.digits]`),
/// mirroring how lenient float readers stop at the first unexpected
/// character. `"1.234.567"` reads as `1.234`.
fn leading_decimal(s: &str) -> Option<String> {
    let caps = LEADING_DECIMAL.captures(s)?;
    let negative = !caps[1].is_empty();
    let int_digits = &caps[2];
    let frac_digits = caps.get(3).map_or("", |m| m.as_str());

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut literal = String::with_capacity(int_digits.len() + MAX_FRACTION_DIGITS + 3);
    if negative {
        literal.push('-');
    }
    literal.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        literal.push('.');
        literal.push_str(&frac_digits[..frac_digits.len().min(MAX_FRACTION_DIGITS)]);
    }
    Some(literal)
}

fn is_amount_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == ',' || c == '-' || is_space(c)
}

/// Whitespace as understood by spreadsheet exports, including the no-break
/// spaces used as thousands separators.
fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}
