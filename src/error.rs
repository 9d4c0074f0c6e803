//! Error types for the balanta library.

use std::io;
use thiserror::Error;

/// Result type alias for balanta operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding a workbook.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format could not be determined.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The file format is recognized but not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Error reading a legacy BIFF workbook.
    #[error("XLS workbook error: {0}")]
    XlsWorkbook(String),

    /// Invalid or malformed data in the workbook.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required workbook component is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// A part of the archive is larger than the configured limit.
    #[error("Part {part} exceeds the size limit of {limit} bytes")]
    LimitExceeded {
        /// Archive path of the offending part
        part: String,
        /// Configured limit in bytes
        limit: u64,
    },

    /// Error during rendering.
    #[error("Render error: {0}")]
    Render(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<calamine::XlsError> for Error {
    fn from(err: calamine::XlsError) -> Self {
        Error::XlsWorkbook(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

/// Whole-file import failures.
///
/// The `Display` text is the user-facing message stored in
/// [`ParseResult::error`](crate::ParseResult::error).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The workbook declares no worksheets.
    #[error("Fișierul Excel nu conține foi de lucru")]
    NoSheets,

    /// The first sheet has fewer than two rows.
    #[error("Fișierul nu conține date suficiente")]
    InsufficientData,

    /// No row passed account validation.
    #[error("Nu s-au găsit conturi valide în fișier")]
    NoValidAccounts,

    /// The bytes could not be read as a workbook at all.
    #[error("Eroare la procesarea fișierului: {0}")]
    DecodeFailure(String),
}

impl ImportError {
    /// Stable machine-readable code for this failure.
    pub fn kind(&self) -> &'static str {
        match self {
            ImportError::NoSheets => "no_sheets",
            ImportError::InsufficientData => "insufficient_data",
            ImportError::NoValidAccounts => "no_valid_accounts",
            ImportError::DecodeFailure(_) => "decode_failure",
        }
    }
}

impl From<Error> for ImportError {
    fn from(err: Error) -> Self {
        ImportError::DecodeFailure(err.to_string())
    }
}
