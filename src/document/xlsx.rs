//! XLSX document backed by `rust_xlsxwriter`
//!
//! The workbook is assembled in memory and serialized on [`Document::close`].
//! The output file is opened when the document is, so an unwritable path
//! fails at construction instead of at the very end. An existing file keeps
//! its contents until the workbook is saved over it.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatUnderline, Image as XlsxImage, Workbook,
    Worksheet,
};

use super::{Document, FormatId, SheetId};
use crate::error::{ExcelError, Result};
use crate::types::{CellFormat, CellValue, Cursor, HorizontalAlign, Image};

/// Rows per worksheet
pub const MAX_ROWS: u32 = 1_048_576;
/// Columns per worksheet
pub const MAX_COLS: u32 = 16_384;

const DEFAULT_DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// `.xlsx` file under construction
pub struct XlsxDocument {
    path: PathBuf,
    output: Option<File>,
    workbook: Workbook,
    sheet_names: Vec<String>,
    formats: Vec<XlsxFormat>,
    datetime_format: Format,
}

/// A registered format and the variant used for date/time cells
struct XlsxFormat {
    cell: Format,
    datetime: Format,
}

impl XlsxFormat {
    fn new(format: &CellFormat) -> Self {
        let cell = to_xlsx_format(format);
        let datetime = match format.num_format_code() {
            Some(_) => cell.clone(),
            None => cell.clone().set_num_format(DEFAULT_DATETIME_FORMAT),
        };
        XlsxFormat { cell, datetime }
    }
}

impl XlsxDocument {
    /// Create the output file and an empty workbook
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cellstream::document::{Document, XlsxDocument};
    ///
    /// let mut doc = XlsxDocument::create("report.xlsx").unwrap();
    /// doc.add_sheet("Data").unwrap();
    /// doc.close().unwrap();
    /// ```
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let output = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| ExcelError::DocumentCreation {
                path: path.display().to_string(),
                source,
            })?;

        Ok(XlsxDocument {
            path,
            output: Some(output),
            workbook: Workbook::new(),
            sheet_names: Vec::new(),
            formats: Vec::new(),
            datetime_format: Format::new().set_num_format(DEFAULT_DATETIME_FORMAT),
        })
    }

    /// Check a worksheet name against the container's naming rules
    ///
    /// Names must be 1 to 31 characters, must not contain `[ ] : * ? / \`
    /// and must not start or end with an apostrophe.
    pub fn validate_sheet_name(name: &str) -> Result<()> {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(name)?;
        Ok(())
    }

    /// Destination path of the workbook
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.output.is_none()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(ExcelError::Closed);
        }
        Ok(())
    }

    /// Validate a cursor against the worksheet limits
    fn cell_position(at: Cursor) -> Result<(u32, u16)> {
        if at.row >= MAX_ROWS || at.col >= MAX_COLS {
            return Err(ExcelError::CellOutOfRange {
                row: at.row,
                col: at.col,
            });
        }
        // MAX_COLS fits in u16
        Ok((at.row, at.col as u16))
    }

    fn worksheet(workbook: &mut Workbook, sheet: SheetId) -> Result<&mut Worksheet> {
        Ok(workbook.worksheet_from_index(sheet.index())?)
    }
}

/// Translate a backend-neutral format into a `rust_xlsxwriter` one
fn to_xlsx_format(format: &CellFormat) -> Format {
    let mut xlsx = Format::new();
    if format.is_bold() {
        xlsx = xlsx.set_bold();
    }
    if format.is_italic() {
        xlsx = xlsx.set_italic();
    }
    if format.is_underline() {
        xlsx = xlsx.set_underline(FormatUnderline::Single);
    }
    if let Some(rgb) = format.font_color_rgb() {
        xlsx = xlsx.set_font_color(Color::RGB(rgb));
    }
    if let Some(rgb) = format.background_rgb() {
        xlsx = xlsx.set_background_color(Color::RGB(rgb));
    }
    if let Some(code) = format.num_format_code() {
        xlsx = xlsx.set_num_format(code);
    }
    if let Some(align) = format.alignment() {
        xlsx = xlsx.set_align(match align {
            HorizontalAlign::Left => FormatAlign::Left,
            HorizontalAlign::Center => FormatAlign::Center,
            HorizontalAlign::Right => FormatAlign::Right,
        });
    }
    if format.is_wrapped() {
        xlsx = xlsx.set_text_wrap();
    }
    if format.has_border() {
        xlsx = xlsx.set_border(FormatBorder::Thin);
    }
    xlsx
}

impl Document for XlsxDocument {
    fn add_sheet(&mut self, name: &str) -> Result<SheetId> {
        self.ensure_open()?;

        // Excel compares sheet names case-insensitively
        let lowered = name.to_lowercase();
        if self.sheet_names.iter().any(|n| n.to_lowercase() == lowered) {
            return Err(ExcelError::DuplicateSheet(name.to_string()));
        }

        let mut worksheet = Worksheet::new();
        worksheet.set_name(name)?;
        self.workbook.push_worksheet(worksheet);
        self.sheet_names.push(name.to_string());

        Ok(SheetId(self.sheet_names.len() - 1))
    }

    fn add_format(&mut self, format: &CellFormat) -> Result<FormatId> {
        self.ensure_open()?;
        self.formats.push(XlsxFormat::new(format));
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
        let (row, col) = Self::cell_position(at)?;
        let registered = match format {
            Some(id) => Some(
                self.formats
                    .get(id.index())
                    .ok_or_else(|| ExcelError::FormatNotFound(format!("#{}", id.index())))?,
            ),
            None => None,
        };
        let format = registered.map(|f| &f.cell);
        let worksheet = Self::worksheet(&mut self.workbook, sheet)?;

        match (value, format) {
            (CellValue::Empty, _) => {}
            (CellValue::String(s), Some(f)) | (CellValue::Error(s), Some(f)) => {
                worksheet.write_string_with_format(row, col, s, f)?;
            }
            (CellValue::String(s), None) | (CellValue::Error(s), None) => {
                worksheet.write_string(row, col, s)?;
            }
            (CellValue::Int(i), Some(f)) => {
                worksheet.write_number_with_format(row, col, *i as f64, f)?;
            }
            (CellValue::Int(i), None) => {
                worksheet.write_number(row, col, *i as f64)?;
            }
            (CellValue::Float(x), Some(f)) => {
                worksheet.write_number_with_format(row, col, *x, f)?;
            }
            (CellValue::Float(x), None) => {
                worksheet.write_number(row, col, *x)?;
            }
            (CellValue::Bool(b), Some(f)) => {
                worksheet.write_boolean_with_format(row, col, *b, f)?;
            }
            (CellValue::Bool(b), None) => {
                worksheet.write_boolean(row, col, *b)?;
            }
            (CellValue::DateTime(serial), _) => {
                // A serial without a number format would display as a plain number
                let f = registered
                    .map(|f| &f.datetime)
                    .unwrap_or(&self.datetime_format);
                worksheet.write_number_with_format(row, col, *serial, f)?;
            }
            (CellValue::Formula(formula), Some(f)) => {
                worksheet.write_formula_with_format(row, col, formula.as_str(), f)?;
            }
            (CellValue::Formula(formula), None) => {
                worksheet.write_formula(row, col, formula.as_str())?;
            }
        }

        Ok(())
    }

    fn insert_image(&mut self, sheet: SheetId, at: Cursor, image: &Image) -> Result<()> {
        self.ensure_open()?;
        let (row, col) = Self::cell_position(at)?;

        let picture = XlsxImage::new(image.path()).map_err(|e| ExcelError::Resource {
            path: image.path().display().to_string(),
            reason: e.to_string(),
        })?;

        let worksheet = Self::worksheet(&mut self.workbook, sheet)?;
        worksheet.insert_image(row, col, &picture)?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        // Release our handle before the workbook rewrites the file
        let output = self.output.take().ok_or(ExcelError::DoubleClose)?;
        drop(output);

        self.workbook.save(&self.path)?;
        log::debug!(
            "saved {} with {} sheet(s)",
            self.path.display(),
            self.sheet_names.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_and_close() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("test.xlsx");

        let mut doc = XlsxDocument::create(&path)?;
        assert!(path.exists());

        let sheet = doc.add_sheet("Sheet1")?;
        doc.write_value(sheet, Cursor::new(0, 0), &CellValue::from("Name"), None)?;
        doc.close()?;

        assert!(doc.is_closed());
        assert!(std::fs::metadata(&path)?.len() > 0);
        Ok(())
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("out.xlsx");

        let err = XlsxDocument::create(&path).err().unwrap();
        assert!(matches!(err, ExcelError::DocumentCreation { .. }));
    }

    #[test]
    fn test_double_close() {
        let dir = tempdir().unwrap();
        let mut doc = XlsxDocument::create(dir.path().join("twice.xlsx")).unwrap();
        doc.add_sheet("Sheet1").unwrap();

        assert!(doc.close().is_ok());
        assert!(matches!(doc.close(), Err(ExcelError::DoubleClose)));
    }

    #[test]
    fn test_duplicate_sheet_is_case_insensitive() {
        let dir = tempdir().unwrap();
        let mut doc = XlsxDocument::create(dir.path().join("dup.xlsx")).unwrap();
        doc.add_sheet("Data").unwrap();

        let err = doc.add_sheet("DATA").unwrap_err();
        assert!(matches!(err, ExcelError::DuplicateSheet(name) if name == "DATA"));
    }

    #[test]
    fn test_out_of_range_cell() {
        let dir = tempdir().unwrap();
        let mut doc = XlsxDocument::create(dir.path().join("range.xlsx")).unwrap();
        let sheet = doc.add_sheet("Sheet1").unwrap();

        let err = doc
            .write_value(sheet, Cursor::new(MAX_COLS, 0), &CellValue::Int(1), None)
            .unwrap_err();
        assert!(matches!(err, ExcelError::CellOutOfRange { col: 16_384, .. }));
    }

    #[test]
    fn test_missing_image_is_resource_error() {
        let dir = tempdir().unwrap();
        let mut doc = XlsxDocument::create(dir.path().join("img.xlsx")).unwrap();
        let sheet = doc.add_sheet("Sheet1").unwrap();

        let image = Image::new(dir.path().join("missing.png"));
        let err = doc.insert_image(sheet, Cursor::new(0, 0), &image).unwrap_err();
        assert!(matches!(err, ExcelError::Resource { .. }));
    }

    #[test]
    fn test_formatted_values() -> Result<()> {
        let dir = tempdir()?;
        let mut doc = XlsxDocument::create(dir.path().join("fmt.xlsx"))?;
        let sheet = doc.add_sheet("Sheet1")?;
        let bold = doc.add_format(&CellFormat::new().bold().num_format("0.00"))?;

        doc.write_value(sheet, Cursor::new(0, 0), &CellValue::Float(1.5), Some(bold))?;
        doc.write_value(sheet, Cursor::new(1, 0), &CellValue::DateTime(45292.5), None)?;

        let err = doc
            .write_value(sheet, Cursor::new(2, 0), &CellValue::Int(1), Some(FormatId(9)))
            .unwrap_err();
        assert!(matches!(err, ExcelError::FormatNotFound(_)));

        doc.close()
    }

    #[test]
    fn test_validate_sheet_name() {
        assert!(XlsxDocument::validate_sheet_name("démo").is_ok());
        assert!(XlsxDocument::validate_sheet_name("a/b").is_err());
        assert!(XlsxDocument::validate_sheet_name("").is_err());
        assert!(XlsxDocument::validate_sheet_name(&"x".repeat(32)).is_err());
    }

    #[test]
    fn test_create_keeps_existing_contents() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("existing.xlsx");
        std::fs::write(&path, b"previous")?;

        let doc = XlsxDocument::create(&path)?;
        drop(doc);

        assert_eq!(std::fs::read(&path)?, b"previous");
        Ok(())
    }

    #[test]
    fn test_datetime_under_plain_format_keeps_date_display() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("dates.xlsx");

        let mut doc = XlsxDocument::create(&path)?;
        let sheet = doc.add_sheet("Sheet1")?;
        let bold = doc.add_format(&CellFormat::new().bold())?;
        doc.write_value(sheet, Cursor::new(0, 0), &CellValue::DateTime(45292.5), Some(bold))?;
        doc.write_value(sheet, Cursor::new(1, 0), &CellValue::Float(45292.5), Some(bold))?;
        doc.close()?;

        let mut reader = crate::reader::ExcelReader::open(&path)?;
        assert!(matches!(
            reader.read_cell("Sheet1", 0, 0)?,
            CellValue::DateTime(d) if d == 45292.5
        ));
        assert_eq!(reader.read_cell("Sheet1", 0, 1)?, CellValue::Float(45292.5));
        Ok(())
    }
}
