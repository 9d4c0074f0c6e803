//! XLSX workbook decoding into raw cell grids.

use crate::container::{OoxmlContainer, Relationships, DEFAULT_MAX_PART_BYTES, OFFICE_DOCUMENT_REL};
use crate::error::{Error, Result};
use crate::model::{CellValue, Grid, Sheet};
use quick_xml::events::{BytesStart, Event};

use super::shared_strings::SharedStrings;

/// Row limit of the XLSX format; references beyond it are ignored.
const MAX_SHEET_ROWS: u32 = 1_048_576;

/// Fallback location of the workbook part.
const DEFAULT_WORKBOOK_PATH: &str = "xl/workbook.xml";

/// Sheet info from workbook.xml.
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    rel_id: String,
}

/// A cell with its absolute 0-based position.
#[derive(Debug)]
struct PlacedCell {
    row: u32,
    col: u32,
    value: CellValue,
}

/// Reader for XLSX workbooks.
///
/// Only cached cell values are read. Formula text is skipped entirely and
/// never evaluated.
pub struct XlsxReader {
    container: OoxmlContainer,
    shared_strings: SharedStrings,
    workbook_path: String,
    sheets: Vec<SheetInfo>,
    relationships: Relationships,
}

impl XlsxReader {
    /// Open a workbook from bytes with the default part size limit.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::with_limit(data, DEFAULT_MAX_PART_BYTES)
    }

    /// Open a workbook from bytes, bounding the decompressed size of each part.
    pub fn with_limit(data: Vec<u8>, max_part_bytes: u64) -> Result<Self> {
        let container = OoxmlContainer::with_limit(data, max_part_bytes)?;
        Self::from_container(container)
    }

    fn from_container(container: OoxmlContainer) -> Result<Self> {
        let workbook_path = container
            .read_package_relationships()?
            .first_of_type(OFFICE_DOCUMENT_REL)
            .map(|rel| OoxmlContainer::resolve_path("", &rel.target))
            .unwrap_or_else(|| DEFAULT_WORKBOOK_PATH.to_string());

        let workbook_xml = container.read_xml(&workbook_path)?;
        let sheets = parse_workbook(&workbook_xml)?;
        let relationships = container.read_relationships(&workbook_path)?;

        let shared_strings_path = relationships
            .first_of_type(SHARED_STRINGS_REL)
            .map(|rel| OoxmlContainer::resolve_path(&workbook_path, &rel.target))
            .unwrap_or_else(|| "xl/sharedStrings.xml".to_string());
        // Workbooks with only inline or numeric cells may omit the table
        let shared_strings = if container.exists(&shared_strings_path) {
            SharedStrings::parse(&container.read_xml(&shared_strings_path)?)?
        } else {
            SharedStrings::default()
        };

        if relationships.is_empty() {
            tracing::debug!(
                workbook = %workbook_path,
                "no workbook relationships, using default part paths"
            );
        }
        tracing::debug!(
            workbook = %workbook_path,
            sheets = sheets.len(),
            relationships = relationships.len(),
            shared_strings = shared_strings.len(),
            "opened xlsx workbook"
        );

        Ok(Self {
            container,
            shared_strings,
            workbook_path,
            sheets,
            relationships,
        })
    }

    /// Get the number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Get sheet names in declared order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Decode the first sheet in declared order, if the workbook has any.
    pub fn first_sheet(&self, max_columns: usize) -> Result<Option<Sheet>> {
        if self.sheets.is_empty() {
            return Ok(None);
        }
        self.sheet(0, max_columns).map(Some)
    }

    /// Decode a sheet by index, keeping at most `max_columns` columns per row.
    pub fn sheet(&self, index: usize, max_columns: usize) -> Result<Sheet> {
        let info = self
            .sheets
            .get(index)
            .ok_or_else(|| Error::MissingComponent(format!("sheet #{}", index)))?;

        let sheet_path = match self.relationships.get(&info.rel_id) {
            Some(rel) => OoxmlContainer::resolve_path(&self.workbook_path, &rel.target),
            None => format!("xl/worksheets/sheet{}.xml", index + 1),
        };

        let xml = self.container.read_xml(&sheet_path)?;
        let grid = parse_sheet_xml(&xml, &self.shared_strings, max_columns)?;

        tracing::debug!(
            sheet = %info.name,
            rows = grid.len(),
            columns = grid.width(),
            "decoded worksheet"
        );

        Ok(Sheet {
            name: info.name.clone(),
            grid,
        })
    }
}

/// Parse worksheet XML into a grid anchored at the used range's top-left cell.
fn parse_sheet_xml(xml: &str, shared_strings: &SharedStrings, max_columns: usize) -> Result<Grid> {
    let mut reader = quick_xml::Reader::from_str(xml);

    let mut buf = Vec::new();
    let mut dimension: Option<(u32, u32)> = None;
    let mut cells: Vec<PlacedCell> = Vec::new();

    let mut row_index: u32 = 0;
    let mut next_row: u32 = 0;
    let mut next_col: u32 = 0;

    let mut cell: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_inline = false;
    let mut phonetic_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"row" => {
                    row_index = row_attr(e)?.unwrap_or(next_row);
                    next_row = row_index + 1;
                    next_col = 0;
                }
                b"c" => {
                    let pending = PendingCell::start(e, row_index, next_col);
                    next_col = pending.col + 1;
                    cell = Some(pending);
                }
                b"v" if cell.is_some() => in_value = true,
                b"is" if cell.is_some() => in_inline = true,
                b"rPh" if in_inline => phonetic_depth += 1,
                b"t" if in_inline && phonetic_depth == 0 => in_value = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"dimension" => dimension = dimension_attr(e),
                b"row" => {
                    row_index = row_attr(e)?.unwrap_or(next_row);
                    next_row = row_index + 1;
                }
                b"c" => {
                    let pending = PendingCell::start(e, row_index, next_col);
                    next_col = pending.col + 1;
                    cells.push(pending.finish(shared_strings));
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_value => {
                if let Some(ref mut pending) = cell {
                    let text = e.unescape().map_err(|err| Error::XmlParse(err.to_string()))?;
                    pending.raw.push_str(&text);
                    pending.has_value = true;
                }
            }
            Ok(Event::CData(ref e)) if in_value => {
                if let Some(ref mut pending) = cell {
                    pending.raw.push_str(&String::from_utf8_lossy(e));
                    pending.has_value = true;
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"c" => {
                    if let Some(pending) = cell.take() {
                        cells.push(pending.finish(shared_strings));
                    }
                    in_value = false;
                    in_inline = false;
                    phonetic_depth = 0;
                }
                b"v" | b"t" => {
                    in_value = false;
                    if let Some(ref mut pending) = cell {
                        // An explicit empty element still counts as a value
                        pending.has_value = true;
                    }
                }
                b"is" => in_inline = false,
                b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(build_grid(cells, dimension, max_columns))
}

/// Relationship type of the shared strings part.
const SHARED_STRINGS_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";

/// A cell being read; resolved into a [`PlacedCell`] at its end tag.
#[derive(Debug)]
struct PendingCell {
    row: u32,
    col: u32,
    cell_type: Option<String>,
    raw: String,
    has_value: bool,
}

impl PendingCell {
    fn start(e: &BytesStart<'_>, row: u32, default_col: u32) -> Self {
        let mut position = None;
        let mut cell_type = None;

        for attr in e.attributes().flatten() {
            match attr.key.local_name().as_ref() {
                b"r" => position = parse_cell_ref(&String::from_utf8_lossy(&attr.value)),
                b"t" => cell_type = Some(String::from_utf8_lossy(&attr.value).to_string()),
                _ => {}
            }
        }

        let (row, col) = position.unwrap_or((row, default_col));
        Self {
            row,
            col,
            cell_type,
            raw: String::new(),
            has_value: false,
        }
    }

    fn finish(self, shared_strings: &SharedStrings) -> PlacedCell {
        let value = if self.has_value {
            resolve_cell_value(&self.raw, self.cell_type.as_deref(), shared_strings)
        } else {
            CellValue::Empty
        };
        PlacedCell {
            row: self.row,
            col: self.col,
            value,
        }
    }
}

/// Resolve a cached cell value based on its type attribute.
fn resolve_cell_value(raw: &str, cell_type: Option<&str>, shared_strings: &SharedStrings) -> CellValue {
    match cell_type {
        Some("s") => raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|idx| shared_strings.get(idx))
            .map(CellValue::text)
            .unwrap_or(CellValue::Empty),
        Some("b") => CellValue::Bool(raw.trim() == "1"),
        // Formula strings, inline strings, ISO dates and error codes stay text
        Some("str") | Some("inlineStr") | Some("d") | Some("e") => CellValue::text(raw),
        _ => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                CellValue::Empty
            } else {
                match trimmed.parse::<f64>() {
                    Ok(n) => CellValue::Number(n),
                    Err(_) => CellValue::text(raw),
                }
            }
        }
    }
}

/// Place cells into a grid anchored at the dimension's top-left corner (or
/// the smallest occupied row/column when the sheet declares none).
fn build_grid(cells: Vec<PlacedCell>, dimension: Option<(u32, u32)>, max_columns: usize) -> Grid {
    if cells.is_empty() {
        return Grid::new();
    }

    let (origin_row, origin_col) = dimension.unwrap_or_else(|| {
        let row = cells.iter().map(|c| c.row).min().unwrap_or(0);
        let col = cells.iter().map(|c| c.col).min().unwrap_or(0);
        (row, col)
    });

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for cell in cells {
        if cell.row >= MAX_SHEET_ROWS || cell.row < origin_row || cell.col < origin_col {
            continue;
        }
        let r = (cell.row - origin_row) as usize;
        let c = (cell.col - origin_col) as usize;
        if c >= max_columns {
            continue;
        }

        if rows.len() <= r {
            rows.resize_with(r + 1, Vec::new);
        }
        let row = &mut rows[r];
        if row.len() <= c {
            row.resize(c + 1, CellValue::Empty);
        }
        row[c] = cell.value;
    }

    Grid::from_rows(rows)
}

/// Read the 1-based `r` attribute of a `<row>` as a 0-based index.
fn row_attr(e: &BytesStart<'_>) -> Result<Option<u32>> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == b"r" {
            let value = String::from_utf8_lossy(&attr.value);
            let n: u32 = value
                .trim()
                .parse()
                .map_err(|_| Error::InvalidData(format!("row number '{}'", value)))?;
            return Ok(n.checked_sub(1));
        }
    }
    Ok(None)
}

/// Top-left corner of `<dimension ref="A1:H20"/>`.
fn dimension_attr(e: &BytesStart<'_>) -> Option<(u32, u32)> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == b"ref")
        .and_then(|attr| {
            let value = String::from_utf8_lossy(&attr.value).to_string();
            let start = value.split(':').next().unwrap_or_default().to_string();
            parse_cell_ref(&start)
        })
}

/// Parse an A1-style reference (`$` markers allowed) into 0-based (row, col).
pub(crate) fn parse_cell_ref(reference: &str) -> Option<(u32, u32)> {
    let reference = reference.trim().replace('$', "");
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() || letters.len() > 3 || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let col = letters
        .chars()
        .fold(0u32, |acc, c| acc * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1))
        - 1;
    let row = digits.parse::<u32>().ok()?.checked_sub(1)?;
    Some((row, col))
}

/// Parse workbook.xml for sheet info in declared order.
fn parse_workbook(xml: &str) -> Result<Vec<SheetInfo>> {
    let mut sheets = Vec::new();
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sheet" => {
                let mut name = String::new();
                let mut rel_id = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.local_name().as_ref() {
                        b"name" => name = String::from_utf8_lossy(&attr.value).to_string(),
                        b"id" => rel_id = String::from_utf8_lossy(&attr.value).to_string(),
                        _ => {}
                    }
                }

                sheets.push(SheetInfo { name, rel_id });
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}
