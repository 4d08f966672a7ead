//! Cell-stream writing
//!
//! A [`CellStreamWriter`] keeps a cursor into the current sheet and turns a
//! sequence of values into absolute cell writes:
//!
//! - [`write`](CellStreamWriter::write) commits at the cursor and moves one column right;
//! - [`write_line`](CellStreamWriter::write_line) commits and moves one row down;
//! - [`end_row`](CellStreamWriter::end_row) returns to column 0 of the next row.
//!
//! Sequences (slices, `Vec`, arrays) are written element by element in the
//! chosen direction.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;

use crate::document::{Document, FormatId, SheetId, XlsxDocument};
use crate::error::{ExcelError, Result};
use crate::types::{CellFormat, CellValue, Cursor, Image};

/// Sheet name used when none is given
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Registry name of the unset format every writer starts with
pub const DEFAULT_FORMAT_NAME: &str = "default";

/// Which way the cursor moves after a value is committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Next column, same row
    Horizontal,
    /// Next row, same column
    Vertical,
}

/// How image writes treat a file that does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImagePolicy {
    /// `write` reports a `Resource` error, `write_line` skips the cell
    #[default]
    Strict,
    /// Both directions skip the cell and still advance
    SkipMissing,
}

/// A value that can be streamed into a writer
///
/// Implemented for text, numbers, booleans, dates, [`CellValue`], [`Image`],
/// and sequences of any of these.
pub trait Streamable {
    fn stream_into<D: Document>(
        &self,
        writer: &mut CellStreamWriter<D>,
        direction: Direction,
    ) -> Result<()>;
}

/// Stream-style writer over a grid document
///
/// # Examples
///
/// ```no_run
/// use cellstream::CellStreamWriter;
///
/// let mut writer = CellStreamWriter::open("demo_file.xlsx", "Demo")?;
/// writer.set_cursor(0, 1);
/// writer.write("hello")?.write("world")?.end_row();
/// writer.write(3.1415)?;
/// writer.write_line([1.2, 3.5, -6.0])?;
/// writer.close()?;
/// # Ok::<(), cellstream::ExcelError>(())
/// ```
pub struct CellStreamWriter<D: Document = XlsxDocument> {
    document: D,
    sheets: IndexMap<String, SheetId>,
    formats: IndexMap<String, Option<FormatId>>,
    current_sheet: usize,
    current_format: usize,
    cursor: Cursor,
    image_policy: ImagePolicy,
    closed: bool,
}

impl CellStreamWriter<XlsxDocument> {
    /// Create an `.xlsx` file and start writing on `sheet_name`
    ///
    /// Fails with `DocumentCreation` if the file cannot be created. An
    /// invalid sheet name is rejected before the file is touched.
    pub fn open<P: AsRef<Path>>(path: P, sheet_name: &str) -> Result<Self> {
        XlsxDocument::validate_sheet_name(sheet_name)?;
        let document = XlsxDocument::create(path)?;
        Self::with_document(document, sheet_name)
    }
}

impl<D: Document> CellStreamWriter<D> {
    /// Start writing on `sheet_name` of an already created document
    pub fn with_document(mut document: D, sheet_name: &str) -> Result<Self> {
        let sheet = document.add_sheet(sheet_name)?;

        let mut sheets = IndexMap::new();
        sheets.insert(sheet_name.to_string(), sheet);
        let mut formats = IndexMap::new();
        formats.insert(DEFAULT_FORMAT_NAME.to_string(), None);

        Ok(CellStreamWriter {
            document,
            sheets,
            formats,
            current_sheet: 0,
            current_format: 0,
            cursor: Cursor::default(),
            image_policy: ImagePolicy::default(),
            closed: false,
        })
    }

    /// Add a sheet and make it current
    ///
    /// The cursor is left where it is.
    ///
    /// # Examples
    ///
    /// ```
    /// use cellstream::document::MemoryDocument;
    /// use cellstream::CellStreamWriter;
    ///
    /// let mut writer = CellStreamWriter::with_document(MemoryDocument::new(), "First").unwrap();
    /// writer.add_sheet("Second").unwrap();
    /// assert_eq!(writer.current_sheet(), "Second");
    /// ```
    pub fn add_sheet(&mut self, name: &str) -> Result<&mut Self> {
        self.ensure_open()?;
        if self.sheets.contains_key(name) {
            return Err(ExcelError::DuplicateSheet(name.to_string()));
        }

        let sheet = self.document.add_sheet(name)?;
        let (index, _) = self.sheets.insert_full(name.to_string(), sheet);
        self.current_sheet = index;
        log::debug!("added sheet '{}' (#{})", name, sheet.index());
        Ok(self)
    }

    /// Switch to a previously added sheet
    pub fn use_sheet(&mut self, name: &str) -> Result<&mut Self> {
        self.ensure_open()?;
        self.current_sheet =
            self.sheets
                .get_index_of(name)
                .ok_or_else(|| ExcelError::SheetNotFound {
                    sheet: name.to_string(),
                    available: self.sheet_names().join(", "),
                })?;
        Ok(self)
    }

    /// Register an unset format under `name` and make it current
    pub fn add_format(&mut self, name: &str) -> Result<&mut Self> {
        self.add_format_with(name, CellFormat::new())
    }

    /// Register a configured format under `name` and make it current
    ///
    /// Registering a name twice replaces the earlier entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use cellstream::document::MemoryDocument;
    /// use cellstream::types::{CellFormat, CellStyle};
    /// use cellstream::CellStreamWriter;
    ///
    /// let mut writer = CellStreamWriter::with_document(MemoryDocument::new(), "Sheet1").unwrap();
    /// writer.add_format_with("header", CellFormat::new().bold()).unwrap();
    /// writer.add_format_with("money", CellStyle::NumberCurrency).unwrap();
    /// assert_eq!(writer.current_format(), "money");
    /// ```
    pub fn add_format_with(
        &mut self,
        name: &str,
        format: impl Into<CellFormat>,
    ) -> Result<&mut Self> {
        self.ensure_open()?;
        let id = self.document.add_format(&format.into())?;
        let (index, previous) = self.formats.insert_full(name.to_string(), Some(id));
        if previous.is_some() {
            log::debug!("format '{}' replaced", name);
        }
        self.current_format = index;
        Ok(self)
    }

    /// Switch to a previously registered format (`"default"` resets styling)
    pub fn use_format(&mut self, name: &str) -> Result<&mut Self> {
        self.ensure_open()?;
        self.current_format = self
            .formats
            .get_index_of(name)
            .ok_or_else(|| ExcelError::FormatNotFound(name.to_string()))?;
        Ok(self)
    }

    /// Move the cursor to zero-based `(col, row)`
    pub fn set_cursor(&mut self, col: u32, row: u32) -> &mut Self {
        self.cursor = Cursor::new(col, row);
        self
    }

    /// Write at the cursor, then move one column right per value
    ///
    /// # Examples
    ///
    /// ```
    /// use cellstream::document::MemoryDocument;
    /// use cellstream::types::Cursor;
    /// use cellstream::CellStreamWriter;
    ///
    /// let mut writer = CellStreamWriter::with_document(MemoryDocument::new(), "Sheet1").unwrap();
    /// writer.write("Total").unwrap().write(vec![1, 2, 3]).unwrap();
    /// assert_eq!(writer.cursor(), Cursor::new(4, 0));
    /// ```
    pub fn write<T: Streamable>(&mut self, value: T) -> Result<&mut Self> {
        value.stream_into(self, Direction::Horizontal)?;
        Ok(self)
    }

    /// Write at the cursor, then move one row down per value
    ///
    /// A missing image file is skipped silently; the row still advances.
    pub fn write_line<T: Streamable>(&mut self, value: T) -> Result<&mut Self> {
        value.stream_into(self, Direction::Vertical)?;
        Ok(self)
    }

    /// Row-advance marker: back to column 0 of the next row
    pub fn end_row(&mut self) -> &mut Self {
        self.cursor.col = 0;
        self.cursor.row = self.cursor.row.saturating_add(1);
        self
    }

    /// Flush and finalize the document
    ///
    /// Calling this a second time returns `DoubleClose`. A writer that is
    /// dropped without being closed closes itself.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            log::error!("close() called on an already closed document");
            return Err(ExcelError::DoubleClose);
        }
        self.closed = true;
        self.document.close()
    }

    /// Set how missing image files are handled
    pub fn set_image_policy(&mut self, policy: ImagePolicy) -> &mut Self {
        self.image_policy = policy;
        self
    }

    pub fn image_policy(&self) -> ImagePolicy {
        self.image_policy
    }

    /// Position of the next write
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Name of the sheet receiving writes
    pub fn current_sheet(&self) -> &str {
        self.sheets
            .get_index(self.current_sheet)
            .map(|(name, _)| name.as_str())
            .unwrap_or_default()
    }

    /// Name of the format applied to writes
    pub fn current_format(&self) -> &str {
        self.formats
            .get_index(self.current_format)
            .map(|(name, _)| name.as_str())
            .unwrap_or(DEFAULT_FORMAT_NAME)
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    pub fn has_format(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// Registered sheet names in creation order
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.keys().cloned().collect()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Backing document
    pub fn document(&self) -> &D {
        &self.document
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(ExcelError::Closed);
        }
        Ok(())
    }

    fn sheet_id(&self) -> Result<SheetId> {
        self.sheets
            .get_index(self.current_sheet)
            .map(|(_, id)| *id)
            .ok_or_else(|| ExcelError::WriteError("No active worksheet".to_string()))
    }

    fn format_id(&self) -> Option<FormatId> {
        self.formats
            .get_index(self.current_format)
            .and_then(|(_, id)| *id)
    }

    fn advance(&mut self, direction: Direction) {
        match direction {
            Direction::Horizontal => self.cursor.col = self.cursor.col.saturating_add(1),
            Direction::Vertical => self.cursor.row = self.cursor.row.saturating_add(1),
        }
    }

    /// Commit one value at the cursor and advance
    ///
    /// `Empty` leaves the cell untouched but still advances.
    pub(crate) fn put_value(&mut self, value: &CellValue, direction: Direction) -> Result<()> {
        self.ensure_open()?;
        if !value.is_empty() {
            let sheet = self.sheet_id()?;
            let format = self.format_id();
            self.document
                .write_value(sheet, self.cursor, value, format)?;
        }
        self.advance(direction);
        Ok(())
    }

    /// Insert one image at the cursor and advance
    pub(crate) fn put_image(&mut self, image: &Image, direction: Direction) -> Result<()> {
        self.ensure_open()?;
        let skip_missing = match direction {
            Direction::Vertical => true,
            Direction::Horizontal => self.image_policy == ImagePolicy::SkipMissing,
        };

        if skip_missing && !image.exists() {
            log::debug!(
                "image {} not found, leaving {} empty",
                image.path().display(),
                self.cursor.reference()
            );
        } else {
            let sheet = self.sheet_id()?;
            self.document.insert_image(sheet, self.cursor, image)?;
        }
        self.advance(direction);
        Ok(())
    }
}

impl<D: Document> Drop for CellStreamWriter<D> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.close() {
                log::error!("failed to close document on drop: {}", e);
            }
        }
    }
}

impl Streamable for str {
    fn stream_into<D: Document>(
        &self,
        writer: &mut CellStreamWriter<D>,
        direction: Direction,
    ) -> Result<()> {
        writer.put_value(&CellValue::from(self), direction)
    }
}

impl Streamable for String {
    fn stream_into<D: Document>(
        &self,
        writer: &mut CellStreamWriter<D>,
        direction: Direction,
    ) -> Result<()> {
        self.as_str().stream_into(writer, direction)
    }
}

impl Streamable for CellValue {
    fn stream_into<D: Document>(
        &self,
        writer: &mut CellStreamWriter<D>,
        direction: Direction,
    ) -> Result<()> {
        writer.put_value(self, direction)
    }
}

impl Streamable for Image {
    fn stream_into<D: Document>(
        &self,
        writer: &mut CellStreamWriter<D>,
        direction: Direction,
    ) -> Result<()> {
        writer.put_image(self, direction)
    }
}

macro_rules! impl_streamable_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Streamable for $ty {
                fn stream_into<D: Document>(
                    &self,
                    writer: &mut CellStreamWriter<D>,
                    direction: Direction,
                ) -> Result<()> {
                    writer.put_value(&CellValue::from(*self), direction)
                }
            }
        )*
    };
}

impl_streamable_scalar!(f64, f32, i64, i32, u32, bool, NaiveDateTime, NaiveDate);

impl<T: Streamable + ?Sized> Streamable for &T {
    fn stream_into<D: Document>(
        &self,
        writer: &mut CellStreamWriter<D>,
        direction: Direction,
    ) -> Result<()> {
        (**self).stream_into(writer, direction)
    }
}

impl<T: Streamable> Streamable for [T] {
    fn stream_into<D: Document>(
        &self,
        writer: &mut CellStreamWriter<D>,
        direction: Direction,
    ) -> Result<()> {
        for item in self {
            item.stream_into(writer, direction)?;
        }
        Ok(())
    }
}

impl<T: Streamable> Streamable for Vec<T> {
    fn stream_into<D: Document>(
        &self,
        writer: &mut CellStreamWriter<D>,
        direction: Direction,
    ) -> Result<()> {
        self.as_slice().stream_into(writer, direction)
    }
}

impl<T: Streamable, const N: usize> Streamable for [T; N] {
    fn stream_into<D: Document>(
        &self,
        writer: &mut CellStreamWriter<D>,
        direction: Direction,
    ) -> Result<()> {
        self.as_slice().stream_into(writer, direction)
    }
}

/// Builder for creating configured cell-stream writers
pub struct CellStreamWriterBuilder {
    path: PathBuf,
    sheet_name: Option<String>,
    image_policy: ImagePolicy,
}

impl CellStreamWriterBuilder {
    /// Create a new builder
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        CellStreamWriterBuilder {
            path: path.as_ref().to_path_buf(),
            sheet_name: None,
            image_policy: ImagePolicy::default(),
        }
    }

    /// Set the initial sheet name
    pub fn with_sheet_name(mut self, name: &str) -> Self {
        self.sheet_name = Some(name.to_string());
        self
    }

    /// Set how missing image files are handled
    pub fn with_image_policy(mut self, policy: ImagePolicy) -> Self {
        self.image_policy = policy;
        self
    }

    /// Build the writer
    pub fn build(self) -> Result<CellStreamWriter<XlsxDocument>> {
        let sheet_name = self
            .sheet_name
            .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string());

        let mut writer = CellStreamWriter::open(&self.path, &sheet_name)?;
        writer.set_image_policy(self.image_policy);
        Ok(writer)
    }
}
