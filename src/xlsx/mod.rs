//! XLSX (Excel) workbook decoding.
//!
//! Workbooks are decoded into raw cell grids; nothing is interpreted here
//! beyond the cell type declared in the sheet XML. Formulas are never
//! evaluated: a formula cell surfaces only the value Excel cached for it.
//!
//! # Example
//!
//! ```no_run
//! use balanta::xlsx::XlsxReader;
//!
//! let reader = XlsxReader::from_bytes(std::fs::read("balanta.xlsx")?)?;
//! if let Some(sheet) = reader.first_sheet(8)? {
//!     println!("{}: {} rows", sheet.name, sheet.grid.len());
//! }
//! # Ok::<(), balanta::Error>(())
//! ```

mod parser;
mod shared_strings;

pub use parser::XlsxReader;
