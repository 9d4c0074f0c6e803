//! Spreadsheet format detection from magic bytes.

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use std::io::{Cursor, Read};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// OLE2 compound file magic, used by legacy BIFF `.xls` workbooks.
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Content type for the XLSX workbook part.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Content type for the macro-enabled workbook part.
const XLSM_CONTENT_TYPE: &str = "application/vnd.ms-excel.sheet.macroEnabled.main+xml";

/// Detected spreadsheet format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Office Open XML workbook (.xlsx / .xlsm)
    Xlsx,
    /// Legacy binary workbook in an OLE2 compound file (.xls)
    Xls,
}

impl FormatType {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Xlsx => "xlsx",
            FormatType::Xls => "xls",
        }
    }

    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            FormatType::Xlsx => "Excel Workbook",
            FormatType::Xls => "Excel 97-2003 Workbook",
        }
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the format type from a file path.
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<FormatType> {
    let data = std::fs::read(path.as_ref())?;
    detect_format_from_bytes(&data)
}

/// Detect the format type from a byte slice.
///
/// The file name is never consulted; an `.xlsx` name on OLE bytes is
/// reported as [`FormatType::Xls`].
///
/// # Example
///
/// ```no_run
/// use balanta::detect::{detect_format_from_bytes, FormatType};
///
/// let data = std::fs::read("balanta.xlsx")?;
/// assert_eq!(detect_format_from_bytes(&data)?, FormatType::Xlsx);
/// # Ok::<(), balanta::Error>(())
/// ```
pub fn detect_format_from_bytes(data: &[u8]) -> Result<FormatType> {
    if is_ole_file(data) {
        return Ok(FormatType::Xls);
    }
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }

    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;

    let content_types = match archive.by_name("[Content_Types].xml") {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            // Content types are tiny; anything larger is not a real package
            file.by_ref().take(1024 * 1024).read_to_end(&mut bytes)?;
            Some(decode_xml_bytes(&bytes)?)
        }
        Err(_) => None,
    };

    match content_types {
        Some(types) if types.contains(XLSX_CONTENT_TYPE) || types.contains(XLSM_CONTENT_TYPE) => {
            Ok(FormatType::Xlsx)
        }
        _ => detect_by_folder_structure(&archive),
    }
}

/// Fallback detection by checking folder structure.
fn detect_by_folder_structure<R: Read + std::io::Seek>(
    archive: &zip::ZipArchive<R>,
) -> Result<FormatType> {
    if archive.file_names().any(|n| n == "xl/workbook.xml") {
        Ok(FormatType::Xlsx)
    } else if archive.file_names().any(|n| n.starts_with("word/") || n.starts_with("ppt/")) {
        Err(Error::UnsupportedFormat(
            "Office document is not a workbook".to_string(),
        ))
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

/// Check if data starts with the OLE2 compound file signature.
pub fn is_ole_file(data: &[u8]) -> bool {
    data.len() >= 8 && data[..8] == OLE_MAGIC
}
