//! In-memory document that records every committed cell

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{Document, FormatId, SheetId};
use crate::error::{ExcelError, Result};
use crate::types::{CellFormat, CellValue, Cursor, Image};

/// What a cell holds after a write
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCell {
    Value {
        value: CellValue,
        format: Option<FormatId>,
    },
    Image(PathBuf),
}

impl RecordedCell {
    pub fn value(&self) -> Option<&CellValue> {
        match self {
            RecordedCell::Value { value, .. } => Some(value),
            RecordedCell::Image(_) => None,
        }
    }

    pub fn image_path(&self) -> Option<&Path> {
        match self {
            RecordedCell::Image(path) => Some(path),
            RecordedCell::Value { .. } => None,
        }
    }
}

/// A named grid of recorded cells, keyed by (row, col)
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    name: String,
    cells: BTreeMap<(u32, u32), RecordedCell>,
}

impl MemorySheet {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cell at zero-based `(col, row)`
    pub fn get(&self, col: u32, row: u32) -> Option<&RecordedCell> {
        self.cells.get(&(row, col))
    }

    /// Value at zero-based `(col, row)`, ignoring images
    pub fn value(&self, col: u32, row: u32) -> Option<&CellValue> {
        self.get(col, row).and_then(RecordedCell::value)
    }

    /// Number of non-empty cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in row-major order as `(cursor, cell)`
    pub fn cells(&self) -> impl Iterator<Item = (Cursor, &RecordedCell)> {
        self.cells
            .iter()
            .map(|(&(row, col), cell)| (Cursor::new(col, row), cell))
    }
}

/// Document that keeps the grid in memory
///
/// Behaves like a file-backed document: images must exist to be inserted,
/// and closing twice fails.
///
/// # Examples
///
/// ```
/// use cellstream::document::MemoryDocument;
/// use cellstream::types::CellValue;
/// use cellstream::CellStreamWriter;
///
/// let mut writer = CellStreamWriter::with_document(MemoryDocument::new(), "Demo").unwrap();
/// writer.write("hello").unwrap().write(42).unwrap();
/// writer.close().unwrap();
///
/// let sheet = writer.document().sheet("Demo").unwrap();
/// assert_eq!(sheet.value(1, 0), Some(&CellValue::Int(42)));
/// ```
#[derive(Debug, Default)]
pub struct MemoryDocument {
    sheets: Vec<MemorySheet>,
    formats: Vec<CellFormat>,
    closed: bool,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sheet by name
    pub fn sheet(&self, name: &str) -> Option<&MemorySheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheets(&self) -> &[MemorySheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    /// Format descriptor behind a handle
    pub fn format(&self, id: FormatId) -> Option<&CellFormat> {
        self.formats.get(id.index())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn sheet_mut(&mut self, sheet: SheetId) -> Result<&mut MemorySheet> {
        let count = self.sheets.len();
        self.sheets.get_mut(sheet.index()).ok_or_else(|| {
            ExcelError::WriteError(format!(
                "Sheet #{} does not exist ({} registered)",
                sheet.index(),
                count
            ))
        })
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(ExcelError::Closed);
        }
        Ok(())
    }
}

impl Document for MemoryDocument {
    fn add_sheet(&mut self, name: &str) -> Result<SheetId> {
        self.ensure_open()?;
        if self.sheet(name).is_some() {
            return Err(ExcelError::DuplicateSheet(name.to_string()));
        }
        self.sheets.push(MemorySheet {
            name: name.to_string(),
            cells: BTreeMap::new(),
        });
        Ok(SheetId(self.sheets.len() - 1))
    }

    fn add_format(&mut self, format: &CellFormat) -> Result<FormatId> {
        self.ensure_open()?;
        self.formats.push(format.clone());
        Ok(FormatId(self.formats.len() - 1))
    }

    fn write_value(
        &mut self,
        sheet: SheetId,
        at: Cursor,
        value: &CellValue,
        format: Option<FormatId>,
    ) -> Result<()> {
        self.ensure_open()?;
        if let Some(id) = format {
            if self.format(id).is_none() {
                return Err(ExcelError::FormatNotFound(format!("#{}", id.index())));
            }
        }

        let cells = &mut self.sheet_mut(sheet)?.cells;
        if value.is_empty() {
            cells.remove(&(at.row, at.col));
        } else {
            cells.insert(
                (at.row, at.col),
                RecordedCell::Value {
                    value: value.clone(),
                    format,
                },
            );
        }
        Ok(())
    }

    fn insert_image(&mut self, sheet: SheetId, at: Cursor, image: &Image) -> Result<()> {
        self.ensure_open()?;
        if !image.exists() {
            return Err(ExcelError::Resource {
                path: image.path().display().to_string(),
                reason: "file not found".to_string(),
            });
        }

        self.sheet_mut(sheet)?
            .cells
            .insert((at.row, at.col), RecordedCell::Image(image.path().to_path_buf()));
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(ExcelError::DoubleClose);
        }
        self.closed = true;
        Ok(())
    }
}
