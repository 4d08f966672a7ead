//! Backing documents for the cell-stream writer
//!
//! The writer only ever talks to a document through the [`Document`] trait:
//! register a sheet, register a format, commit a value or an image at an
//! absolute position, and close. Everything about the container format lives
//! behind it.
//!
//! - [`XlsxDocument`] writes a real `.xlsx` file through `rust_xlsxwriter`.
//! - [`MemoryDocument`] records the grid in memory for inspection.

pub mod memory;
pub mod xlsx;

use crate::error::Result;
use crate::types::{CellFormat, CellValue, Cursor, Image};

pub use memory::{MemoryDocument, MemorySheet, RecordedCell};
pub use xlsx::XlsxDocument;

/// Handle to a sheet registered in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetId(pub(crate) usize);

impl SheetId {
    /// Zero-based position of the sheet in the document
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a format registered in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatId(pub(crate) usize);

impl FormatId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A writable grid-shaped document
pub trait Document {
    /// Create a sheet at the end of the document
    fn add_sheet(&mut self, name: &str) -> Result<SheetId>;

    /// Create a format descriptor usable by later writes
    fn add_format(&mut self, format: &CellFormat) -> Result<FormatId>;

    /// Commit `value` at `at`. `None` means the document default format.
    fn write_value(
        &mut self,
        sheet: SheetId,
        at: Cursor,
        value: &CellValue,
        format: Option<FormatId>,
    ) -> Result<()>;

    /// Embed the referenced image with its top-left corner in cell `at`
    fn insert_image(&mut self, sheet: SheetId, at: Cursor, image: &Image) -> Result<()>;

    /// Flush and finalize. A second call returns `DoubleClose`.
    fn close(&mut self) -> Result<()>;
}
