//! Excel file reading
//!
//! [`ExcelReader`] reports failures as typed errors. The free functions
//! [`list_sheet_names`] and [`read_sheet`] are the lenient variants: they log
//! the failure and hand back an empty result.

use crate::error::{ExcelError, Result};
use crate::types::{CellValue, Row};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::path::Path;

/// Longest cell text returned by the grid readers, in characters
pub const MAX_CELL_TEXT_LEN: usize = 1024;

/// Excel file reader
pub struct ExcelReader {
    workbook: Sheets<std::io::BufReader<std::fs::File>>,
}

impl ExcelReader {
    /// Open an Excel file for reading
    ///
    /// Supports XLSX, XLS, and ODS formats. Format is auto-detected from file extension.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cellstream::reader::ExcelReader;
    ///
    /// let reader = ExcelReader::open("data.xlsx").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let workbook =
            open_workbook_auto(path).map_err(|e| ExcelError::ReadError(e.to_string()))?;

        Ok(ExcelReader { workbook })
    }

    /// Get list of sheet names in the workbook
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// Get the number of sheets in the workbook
    pub fn sheet_count(&self) -> usize {
        self.workbook.sheet_names().len()
    }

    /// Read a sheet as rows of cell text
    ///
    /// `None` selects the first sheet. Fully empty rows are skipped, columns
    /// start at column A, and each cell is cut to [`MAX_CELL_TEXT_LEN`]
    /// characters.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cellstream::reader::ExcelReader;
    ///
    /// let mut reader = ExcelReader::open("liste.xlsx").unwrap();
    /// for row in reader.read_grid(Some("liste")).unwrap() {
    ///     println!("{}", row.join("\t"));
    /// }
    /// ```
    pub fn read_grid(&mut self, sheet_name: Option<&str>) -> Result<Vec<Vec<String>>> {
        let name = match sheet_name {
            Some(name) => name.to_string(),
            None => self.first_sheet_name()?,
        };
        let range = self.range(&name)?;

        let mut grid = Vec::new();
        for row in RowIterator::new(range) {
            let row = row?;
            if row.is_empty() {
                continue;
            }
            grid.push(row.to_strings().into_iter().map(truncate_text).collect());
        }

        Ok(grid)
    }

    /// Read all rows from a specific sheet
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cellstream::reader::ExcelReader;
    ///
    /// let mut reader = ExcelReader::open("data.xlsx").unwrap();
    /// for row_result in reader.rows("Sheet1").unwrap() {
    ///     let row = row_result.unwrap();
    ///     println!("Row {}: {:?}", row.index, row.cells);
    /// }
    /// ```
    pub fn rows(&mut self, sheet_name: &str) -> Result<RowIterator> {
        let range = self.range(sheet_name)?;
        Ok(RowIterator::new(range))
    }

    /// Read all rows from a sheet by index (0-based)
    pub fn rows_by_index(&mut self, index: usize) -> Result<RowIterator> {
        let sheet_names = self.sheet_names();
        let sheet_name = sheet_names.get(index).ok_or_else(|| {
            let available = sheet_names.join(", ");
            ExcelError::SheetNotFound {
                sheet: format!("index {}", index),
                available,
            }
        })?;

        self.rows(sheet_name)
    }

    /// Read a specific cell value at zero-based (row, col)
    pub fn read_cell(&mut self, sheet_name: &str, row: u32, col: u32) -> Result<CellValue> {
        let range = self.range(sheet_name)?;

        let cell = range
            .get_value((row, col))
            .map(datatype_to_cellvalue)
            .unwrap_or(CellValue::Empty);

        Ok(cell)
    }

    /// Get the dimensions of a sheet (rows, cols)
    pub fn dimensions(&mut self, sheet_name: &str) -> Result<(u32, u32)> {
        let range = self.range(sheet_name)?;
        let (rows, cols) = range.get_size();
        Ok((rows as u32, cols as u32))
    }

    fn first_sheet_name(&self) -> Result<String> {
        self.sheet_names()
            .into_iter()
            .next()
            .ok_or_else(|| ExcelError::ReadError("Workbook has no sheets".to_string()))
    }

    fn range(&mut self, sheet_name: &str) -> Result<Range<Data>> {
        if !self.sheet_names().iter().any(|s| s == sheet_name) {
            return Err(ExcelError::SheetNotFound {
                sheet: sheet_name.to_string(),
                available: self.sheet_names().join(", "),
            });
        }

        Ok(self.workbook.worksheet_range(sheet_name)?)
    }
}

/// List the sheet names of a workbook
///
/// Logs and returns an empty list if the file cannot be opened.
pub fn list_sheet_names<P: AsRef<Path>>(path: P) -> Vec<String> {
    match ExcelReader::open(path.as_ref()) {
        Ok(reader) => reader.sheet_names(),
        Err(e) => {
            log::error!("Error opening {}: {}", path.as_ref().display(), e);
            Vec::new()
        }
    }
}

/// Read a sheet (or the first one) as rows of cell text
///
/// Logs and returns an empty grid on any failure. See
/// [`ExcelReader::read_grid`] for the row and cell rules.
pub fn read_sheet<P: AsRef<Path>>(path: P, sheet_name: Option<&str>) -> Vec<Vec<String>> {
    let result = ExcelReader::open(path.as_ref()).and_then(|mut r| r.read_grid(sheet_name));
    match result {
        Ok(grid) => grid,
        Err(e) => {
            log::error!("Error reading {}: {}", path.as_ref().display(), e);
            Vec::new()
        }
    }
}

fn truncate_text(text: String) -> String {
    match text.char_indices().nth(MAX_CELL_TEXT_LEN) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text,
    }
}

/// Iterator over rows in an Excel sheet
pub struct RowIterator {
    range: Range<Data>,
    current_row: u32,
    max_row: u32,
}

impl RowIterator {
    fn new(range: Range<Data>) -> Self {
        let (rows, _) = range.get_size();
        let start = range.start().map(|(r, _)| r).unwrap_or(0);

        RowIterator {
            range,
            current_row: start,
            max_row: start + rows as u32,
        }
    }
}

impl Iterator for RowIterator {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row >= self.max_row {
            return None;
        }

        let row_idx = self.current_row;
        self.current_row += 1;

        // Absolute column span, so cells line up with the sheet's columns
        let end_col = self.range.end().map(|(_, c)| c + 1).unwrap_or(0);
        let mut cells = Vec::with_capacity(end_col as usize);

        for col in 0..end_col {
            let cell_value = self
                .range
                .get_value((row_idx, col))
                .map(datatype_to_cellvalue)
                .unwrap_or(CellValue::Empty);

            cells.push(cell_value);
        }

        Some(Ok(Row::new(row_idx, cells)))
    }
}

/// Convert calamine Data to our CellValue
fn datatype_to_cellvalue(dt: &Data) -> CellValue {
    match dt {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Float(f) => CellValue::Float(*f),
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(d) => CellValue::DateTime(d.as_f64()),
        Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
    }
}
