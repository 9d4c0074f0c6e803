//! End-to-end ingestion of generated workbooks.

mod common;

use balanta::{
    parse_bytes, parse_file_with_options, ImportStatus, ParseOptions, SkipReason, TrialBalanceParser,
};
use common::*;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn sample_rows() -> Vec<Vec<Cell>> {
    vec![
        header_row(),
        account_row("401", "Furnizori", [0.0, 1500.5, 200.0, 300.25, 0.0, 1600.75]),
        account_row("5121", "Conturi la bănci în lei", [10000.0, 0.0, 2500.0, 1200.4, 11299.6, 0.0]),
        text_row("4111", "Clienți", ["1.234,56", "0", "1,000.00", "500", "1734,56", ""]),
        account_row("12", "Cod prea scurt", [1e6, 1e6, 1e6, 1e6, 1e6, 1e6]),
    ]
}

#[test]
fn test_valid_rows_with_one_malformed_code() {
    let result = parse_bytes(&workbook(sample_rows()));

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.accounts_count, 3);
    assert_eq!(result.accounts.len(), 3);

    let codes: Vec<&str> = result.accounts.iter().map(|a| a.account_code.as_str()).collect();
    assert_eq!(codes, ["401", "5121", "4111"]);
    assert_eq!(result.accounts[1].account_name, "Conturi la bănci în lei");

    assert_eq!(result.accounts[2].opening_debit, dec("1234.56"));
    assert_eq!(result.accounts[2].debit_turnover, dec("1000"));
    assert_eq!(result.accounts[2].closing_debit, dec("1734.56"));

    assert_eq!(result.totals.opening_debit, dec("11234.56"));
    assert_eq!(result.totals.opening_credit, dec("1500.50"));
    assert_eq!(result.totals.debit_turnover, dec("3700"));
    assert_eq!(result.totals.credit_turnover, dec("2000.65"));
    assert_eq!(result.totals.closing_debit, dec("13034.16"));
    assert_eq!(result.totals.closing_credit, dec("1600.75"));
}

#[test]
fn test_header_only_workbook() {
    let result = parse_bytes(&workbook(vec![header_row()]));

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Fișierul nu conține date suficiente"));
    assert!(result.accounts.is_empty());
}

#[test]
fn test_empty_sheet_is_insufficient() {
    let result = parse_bytes(&workbook(vec![]));
    assert_eq!(result.error.as_deref(), Some("Fișierul nu conține date suficiente"));
}

#[test]
fn test_workbook_without_sheets() {
    let data = WorkbookBuilder::new().build();
    let result = parse_bytes(&data);

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Fișierul Excel nu conține foi de lucru"));
}

#[test]
fn test_no_valid_accounts() {
    let result = parse_bytes(&workbook(vec![
        header_row(),
        account_row("TOTAL", "", [1.0; 6]),
        account_row("40", "x", [1.0; 6]),
    ]));

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Nu s-au găsit conturi valide în fișier"));
    assert!(result.totals.amounts().iter().all(|d| d.is_zero()));
}

#[test]
fn test_unreadable_bytes_never_panic() {
    let inputs: Vec<Vec<u8>> = vec![
        Vec::new(),
        b"not a workbook".to_vec(),
        b"PK\x03\x04\x14\x00\x00\x00".to_vec(),
        {
            let mut truncated = workbook(sample_rows());
            truncated.truncate(truncated.len() / 2);
            truncated
        },
    ];

    for data in inputs {
        let result = parse_bytes(&data);
        assert!(!result.success);
        assert_eq!(result.accounts_count, 0);
        assert!(result
            .error
            .as_deref()
            .unwrap()
            .starts_with("Eroare la procesarea fișierului: "));
    }
}

/// BIFF8 workbook holding `sample_rows()` plus one formula-trigger row on its
/// first sheet, and a second sheet that must be ignored.
const LEGACY_WORKBOOK: &[u8] = include_bytes!("fixtures/balanta.xls");

fn legacy_rows() -> Vec<Vec<Cell>> {
    let mut rows = sample_rows();
    rows.push(vec![text("=5121"), text("@Casa"), num(7.5)]);
    rows
}

#[test]
fn test_legacy_xls_workbook() {
    let result = parse_bytes(LEGACY_WORKBOOK);

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.accounts_count, 4);

    let codes: Vec<&str> = result.accounts.iter().map(|a| a.account_code.as_str()).collect();
    assert_eq!(codes, ["401", "5121", "4111", "5121"]);
    assert_eq!(result.accounts[1].account_name, "Conturi la bănci în lei");
    assert_eq!(result.accounts[2].opening_debit, dec("1234.56"));
    assert_eq!(result.accounts[3].account_name, "Casa");

    assert_eq!(result.totals.opening_debit, dec("11242.06"));
    assert_eq!(result.totals.opening_credit, dec("1500.50"));
    assert_eq!(result.totals.debit_turnover, dec("3700"));
    assert_eq!(result.totals.credit_turnover, dec("2000.65"));
    assert_eq!(result.totals.closing_debit, dec("13034.16"));
    assert_eq!(result.totals.closing_credit, dec("1600.75"));
}

#[test]
fn test_legacy_xls_matches_xlsx() {
    let options = ParseOptions::new().with_diagnostics(true);
    let parser = TrialBalanceParser::with_options(options);

    let legacy = parser.parse(LEGACY_WORKBOOK);
    let modern = parser.parse(&workbook(legacy_rows()));

    assert_eq!(legacy.accounts, modern.accounts);
    assert_eq!(legacy.totals, modern.totals);
    assert_eq!(legacy.skipped, modern.skipped);
}

#[test]
fn test_legacy_xls_detected_by_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("balanta.xlsx");
    std::fs::write(&path, LEGACY_WORKBOOK).unwrap();

    let result = parse_file_with_options(&path, &ParseOptions::new());
    assert!(result.success);
    assert_eq!(result.accounts_count, 4);
}

#[test]
fn test_legacy_xls_size_limit() {
    let parser = TrialBalanceParser::with_options(ParseOptions::new().with_max_part_bytes(4096));
    let result = parser.parse(LEGACY_WORKBOOK);

    assert!(!result.success);
    assert_eq!(
        result.error.as_deref(),
        Some("Eroare la procesarea fișierului: Part Workbook exceeds the size limit of 4096 bytes")
    );
}

#[test]
fn test_corrupt_legacy_xls() {
    let mut blank = LEGACY_WORKBOOK[..8].to_vec();
    blank.resize(1024, 0);

    let result = parse_bytes(&blank);
    assert!(!result.success);
    assert!(result
        .error
        .as_deref()
        .unwrap()
        .starts_with("Eroare la procesarea fișierului: XLS workbook error"));

    // A well-formed compound file without a workbook stream
    let mut renamed = LEGACY_WORKBOOK.to_vec();
    let stream: Vec<u8> = "Workbook".encode_utf16().flat_map(u16::to_le_bytes).collect();
    let at = renamed.windows(stream.len()).position(|w| w == stream.as_slice()).unwrap();
    renamed[at] = b'X';

    let result = parse_bytes(&renamed);
    assert!(!result.success);
    assert_eq!(result.accounts_count, 0);
    assert!(result
        .error
        .as_deref()
        .unwrap()
        .starts_with("Eroare la procesarea fișierului: XLS workbook error"));
}

#[test]
fn test_account_cap() {
    let mut rows = vec![header_row()];
    for i in 0..10_050 {
        rows.push(account_row(&format!("{}", 100_000 + i), "Cont analitic", [1.0, 0.0, 0.0, 0.0, 0.0, 0.0]));
    }

    let result = parse_bytes(&workbook(rows));
    assert!(result.success);
    assert_eq!(result.accounts_count, 10_000);
    assert_eq!(result.totals.opening_debit, dec("10000"));
    assert_eq!(result.accounts.last().unwrap().account_code, "109999");
}

#[test]
fn test_parsing_is_deterministic() {
    let data = workbook(sample_rows());
    let parser = TrialBalanceParser::new();
    assert_eq!(parser.parse(&data), parser.parse(&data));
}

#[test]
fn test_only_first_sheet_is_read() {
    let data = WorkbookBuilder::new()
        .sheet("Balanta", vec![header_row(), account_row("401", "Furnizori", [1.0; 6])])
        .sheet("Alta", vec![header_row(), account_row("5121", "Banca", [2.0; 6])])
        .build();

    let result = parse_bytes(&data);
    assert_eq!(result.accounts_count, 1);
    assert_eq!(result.accounts[0].account_code, "401");
}

#[test]
fn test_cached_formula_values_used() {
    let result = parse_bytes(&workbook(vec![
        header_row(),
        vec![
            Cell::Formula("300+101".to_string(), 401.0),
            text("Furnizori"),
            Cell::Formula("SUM(C3:C9)".to_string(), 1234.565),
            Cell::Blank,
            num(-0.001),
        ],
    ]));

    assert!(result.success);
    let account = &result.accounts[0];
    assert_eq!(account.account_code, "401");
    assert_eq!(account.opening_debit, dec("1234.57"));
    assert_eq!(account.opening_credit, Decimal::ZERO);
    assert_eq!(account.debit_turnover, Decimal::ZERO);
    assert!(!account.debit_turnover.is_sign_negative());
}

#[test]
fn test_hostile_text_is_sanitized() {
    let result = parse_bytes(&workbook(vec![
        header_row(),
        vec![
            Cell::Inline(" 401 ".to_string()),
            text("=HYPERLINK(\"http://x\",\"Furnizori\")"),
            text("1e3"),
            text("12-3"),
            text("Infinity"),
            text(&"9".repeat(60)),
        ],
        vec![text("@5121"), text("+Banca"), num(f64::MAX)],
    ]));

    assert!(result.success);
    assert_eq!(result.accounts_count, 2);

    let first = &result.accounts[0];
    assert_eq!(first.account_code, "401");
    assert_eq!(first.account_name, "HYPERLINK(\"http://x\",\"Furnizori\")");
    assert_eq!(first.opening_credit, dec("12"));
    assert_eq!(first.credit_turnover, Decimal::ZERO);
    assert_eq!(first.closing_debit, Decimal::ZERO);

    let second = &result.accounts[1];
    assert_eq!(second.account_code, "5121");
    assert_eq!(second.account_name, "Banca");
    assert_eq!(second.opening_debit, Decimal::ZERO);
}

#[test]
fn test_used_range_offset() {
    let data = WorkbookBuilder::new()
        .offset(2, 1)
        .sheet("Balanta", vec![header_row(), account_row("401", "Furnizori", [5.0; 6])])
        .build();

    let result = parse_bytes(&data);
    assert!(result.success);
    assert_eq!(result.accounts[0].account_code, "401");
    assert_eq!(result.totals.closing_credit, dec("5"));
}

#[test]
fn test_blank_rows_inside_data() {
    let result = parse_bytes(&workbook(vec![
        header_row(),
        vec![],
        account_row("401", "Furnizori", [1.0; 6]),
        vec![Cell::Blank, text("fara cod"), num(3.0)],
        account_row("512", "Banca", [2.0; 6]),
    ]));

    assert_eq!(result.accounts_count, 2);
    assert_eq!(result.totals.closing_debit, dec("3"));
}

#[test]
fn test_diagnostics_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("balanta.xlsx");
    std::fs::write(&path, workbook(sample_rows())).unwrap();

    let options = ParseOptions::new().with_diagnostics(true);
    let result = parse_file_with_options(&path, &options);

    assert_eq!(result.accounts_count, 3);
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].row, 4);
    assert_eq!(
        result.skipped[0].reason,
        SkipReason::InvalidAccountCode {
            code: "12".to_string()
        }
    );
}

#[test]
fn test_import_hand_off() {
    let result = parse_bytes(&workbook(sample_rows()));

    let status = ImportStatus::Pending.transition(ImportStatus::Processing).unwrap();
    let status = status.transition(ImportStatus::from_result(&result)).unwrap();
    assert_eq!(status, ImportStatus::Completed);

    let rows = result.import_rows("import-2024-03");
    assert_eq!(rows.len(), result.accounts_count);
    assert!(rows.iter().all(|r| r.import_id == "import-2024-03"));

    let json = serde_json::to_value(&rows[0]).unwrap();
    assert_eq!(json["import_id"], "import-2024-03");
    assert_eq!(json["account_code"], "401");
}
