//! Legacy `.xls` (BIFF8 in an OLE2 compound file) workbook decoding.
//!
//! The compound file and BIFF records are read by `calamine`; its cells are
//! mapped onto the same [`CellValue`] grid the XLSX reader produces, so both
//! formats go through one row pipeline. As with XLSX, formulas surface only
//! their cached result.

use calamine::{Data, Range, Reader, Xls};
use std::io::Cursor;

use crate::container::DEFAULT_MAX_PART_BYTES;
use crate::error::{Error, Result};
use crate::model::{CellValue, Grid, Sheet};

/// Name reported when the whole compound file is over the size limit.
const WORKBOOK_STREAM: &str = "Workbook";

/// Reader for legacy BIFF workbooks.
pub struct XlsReader {
    workbook: Xls<Cursor<Vec<u8>>>,
    sheet_names: Vec<String>,
}

impl XlsReader {
    /// Open a workbook from bytes with the default size limit.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::with_limit(data, DEFAULT_MAX_PART_BYTES)
    }

    /// Open a workbook from bytes, rejecting compound files over `max_bytes`.
    ///
    /// BIFF streams are stored uncompressed, so the file size bounds every
    /// record the reader will buffer.
    pub fn with_limit(data: Vec<u8>, max_bytes: u64) -> Result<Self> {
        if data.len() as u64 > max_bytes {
            return Err(Error::LimitExceeded {
                part: WORKBOOK_STREAM.to_string(),
                limit: max_bytes,
            });
        }

        let workbook = Xls::new(Cursor::new(data))?;
        let sheet_names = workbook.sheet_names();

        tracing::debug!(sheets = sheet_names.len(), "opened xls workbook");

        Ok(Self {
            workbook,
            sheet_names,
        })
    }

    /// Get the number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheet_names.len()
    }

    /// Get sheet names in declared order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheet_names.iter().map(String::as_str).collect()
    }

    /// Decode the first sheet in declared order, if the workbook has any.
    pub fn first_sheet(&mut self, max_columns: usize) -> Result<Option<Sheet>> {
        let Some(name) = self.sheet_names.first().cloned() else {
            return Ok(None);
        };

        let range = match self.workbook.worksheet_range_at(0) {
            Some(range) => range?,
            None => return Ok(None),
        };
        let grid = range_grid(&range, max_columns);

        tracing::debug!(
            sheet = %name,
            rows = grid.len(),
            columns = grid.width(),
            "decoded worksheet"
        );

        Ok(Some(Sheet { name, grid }))
    }
}

/// Lay a decoded range out as a grid anchored at its first occupied cell.
///
/// Trailing blanks are dropped so blank rows come out empty, matching the
/// XLSX grid.
fn range_grid(range: &Range<Data>, max_columns: usize) -> Grid {
    let rows = range
        .rows()
        .map(|row| {
            let mut cells: Vec<CellValue> = row.iter().take(max_columns).map(cell_value).collect();
            while cells.last().is_some_and(CellValue::is_empty) {
                cells.pop();
            }
            cells
        })
        .collect();

    Grid::from_rows(rows)
}

/// Map a BIFF cell onto the untyped grid cell.
fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Float(n) => CellValue::Number(*n),
        Data::String(s) => CellValue::text(s.as_str()),
        Data::Bool(b) => CellValue::Bool(*b),
        // Dates stay serial numbers, as in XLSX
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s.as_str()),
        Data::Error(e) => CellValue::text(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}
