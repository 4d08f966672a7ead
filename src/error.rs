//! Error types for the cellstream library

use thiserror::Error;

/// Result type alias for cellstream operations
pub type Result<T> = std::result::Result<T, ExcelError>;

/// Main error type for all workbook operations
#[derive(Error, Debug)]
pub enum ExcelError {
    /// The output document could not be created
    #[error("Failed to create document '{path}': {source}")]
    DocumentCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// `close()` was called on a writer whose document is already closed
    #[error("Document already closed")]
    DoubleClose,

    /// A write was attempted after the document was closed
    #[error("Cannot write to a closed document")]
    Closed,

    /// An external resource (e.g. an image file) could not be embedded
    #[error("Failed to embed resource '{path}': {reason}")]
    Resource { path: String, reason: String },

    /// A sheet with this name is already registered
    #[error("Sheet '{0}' already exists")]
    DuplicateSheet(String),

    /// Invalid sheet name or sheet not found
    #[error("Sheet '{sheet}' not found. Available sheets: {available}")]
    SheetNotFound { sheet: String, available: String },

    /// No format registered under this name
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    /// Cursor position outside the limits of the document
    #[error("Cell (row {row}, col {col}) is outside the worksheet limits")]
    CellOutOfRange { row: u32, col: u32 },

    /// Error occurred while reading Excel file
    #[error("Failed to read Excel file: {0}")]
    ReadError(String),

    /// Error occurred while writing Excel file
    #[error("Failed to write Excel file: {0}")]
    WriteError(String),

    /// IO error wrapper
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Calamine error wrapper
    #[error("Calamine error: {0}")]
    CalamineError(String),
}

impl From<calamine::Error> for ExcelError {
    fn from(err: calamine::Error) -> Self {
        ExcelError::CalamineError(err.to_string())
    }
}

impl From<calamine::XlsxError> for ExcelError {
    fn from(err: calamine::XlsxError) -> Self {
        ExcelError::CalamineError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ExcelError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        match err {
            rust_xlsxwriter::XlsxError::IoError(e) => ExcelError::IoError(e),
            other => ExcelError::WriteError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ExcelError::SheetNotFound {
            sheet: "Missing".to_string(),
            available: "Sheet1, Data".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Sheet 'Missing' not found. Available sheets: Sheet1, Data"
        );

        let err = ExcelError::Resource {
            path: "logo.png".to_string(),
            reason: "file not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to embed resource 'logo.png': file not found"
        );
    }

    #[test]
    fn test_xlsx_io_error_is_unwrapped() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ExcelError::from(rust_xlsxwriter::XlsxError::IoError(io));
        assert!(matches!(err, ExcelError::IoError(_)));
    }
}
