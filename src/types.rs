//! Type definitions for cell-stream data

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Excel serial number of 1970-01-01 (the Unix epoch)
const UNIX_EPOCH_SERIAL: f64 = 25569.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Cell style presets for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CellStyle {
    /// Default style - no formatting
    Default,
    /// Bold text for headers
    HeaderBold,
    /// Integer format with thousand separator (#,##0)
    NumberInteger,
    /// Decimal format with 2 places (#,##0.00)
    NumberDecimal,
    /// Currency format ($#,##0.00)
    NumberCurrency,
    /// Percentage format (0.00%)
    NumberPercentage,
    /// Date format (MM/DD/YYYY)
    DateDefault,
    /// DateTime format (MM/DD/YYYY HH:MM:SS)
    DateTimestamp,
    /// Bold text for emphasis
    TextBold,
    /// Italic text for notes
    TextItalic,
    /// Yellow background highlight
    HighlightYellow,
    /// Green background highlight
    HighlightGreen,
    /// Red background highlight
    HighlightRed,
    /// Thin borders on all sides
    BorderThin,
}

/// Horizontal alignment of cell content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

/// Backend-neutral description of a cell format
///
/// Built with chained setters and registered on a writer under a name:
///
/// ```
/// use cellstream::types::CellFormat;
///
/// let header = CellFormat::new().bold().background(0xDDEBF7);
/// assert!(header.is_bold());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellFormat {
    bold: bool,
    italic: bool,
    underline: bool,
    font_color: Option<u32>,
    background: Option<u32>,
    num_format: Option<String>,
    align: Option<HorizontalAlign>,
    wrap: bool,
    border: bool,
}

impl CellFormat {
    /// An unset format (renders like the document default)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Font color as 0xRRGGBB
    pub fn font_color(mut self, rgb: u32) -> Self {
        self.font_color = Some(rgb & 0xFF_FFFF);
        self
    }

    /// Solid background fill as 0xRRGGBB
    pub fn background(mut self, rgb: u32) -> Self {
        self.background = Some(rgb & 0xFF_FFFF);
        self
    }

    /// Excel number format code, e.g. `"#,##0.00"` or `"yyyy-mm-dd"`
    pub fn num_format(mut self, code: impl Into<String>) -> Self {
        self.num_format = Some(code.into());
        self
    }

    pub fn align(mut self, align: HorizontalAlign) -> Self {
        self.align = Some(align);
        self
    }

    pub fn wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    /// Thin border on all four sides
    pub fn border(mut self) -> Self {
        self.border = true;
        self
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    pub fn is_underline(&self) -> bool {
        self.underline
    }

    pub fn font_color_rgb(&self) -> Option<u32> {
        self.font_color
    }

    pub fn background_rgb(&self) -> Option<u32> {
        self.background
    }

    pub fn num_format_code(&self) -> Option<&str> {
        self.num_format.as_deref()
    }

    pub fn alignment(&self) -> Option<HorizontalAlign> {
        self.align
    }

    pub fn is_wrapped(&self) -> bool {
        self.wrap
    }

    pub fn has_border(&self) -> bool {
        self.border
    }

    /// True when no property has been set
    pub fn is_unset(&self) -> bool {
        *self == CellFormat::default()
    }
}

impl From<CellStyle> for CellFormat {
    fn from(style: CellStyle) -> Self {
        let format = CellFormat::new();
        match style {
            CellStyle::Default => format,
            CellStyle::HeaderBold | CellStyle::TextBold => format.bold(),
            CellStyle::NumberInteger => format.num_format("#,##0"),
            CellStyle::NumberDecimal => format.num_format("#,##0.00"),
            CellStyle::NumberCurrency => format.num_format("$#,##0.00"),
            CellStyle::NumberPercentage => format.num_format("0.00%"),
            CellStyle::DateDefault => format.num_format("mm/dd/yyyy"),
            CellStyle::DateTimestamp => format.num_format("mm/dd/yyyy hh:mm:ss"),
            CellStyle::TextItalic => format.italic(),
            CellStyle::HighlightYellow => format.background(0xFFFF00),
            CellStyle::HighlightGreen => format.background(0x00FF00),
            CellStyle::HighlightRed => format.background(0xFF0000),
            CellStyle::BorderThin => format.border(),
        }
    }
}

/// Represents a single cell value in an Excel worksheet
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CellValue {
    /// Empty cell
    Empty,
    /// String value
    String(String),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// DateTime value (Excel serial date number)
    DateTime(f64),
    /// Error value
    Error(String),
    /// Formula value (e.g., "=SUM(A1:A10)")
    Formula(String),
}

impl CellValue {
    /// Convert a calendar date-time to an Excel serial date value
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        let millis = dt.and_utc().timestamp_millis() as f64;
        CellValue::DateTime(UNIX_EPOCH_SERIAL + millis / MILLIS_PER_DAY)
    }

    /// Convert cell value to string
    pub fn as_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::String(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(d) => d.to_string(),
            CellValue::Error(e) => format!("ERROR: {}", e),
            CellValue::Formula(f) => f.clone(),
        }
    }

    /// Check if cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Try to convert to integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(i) => Some(*i),
            CellValue::Float(f) => Some(*f as i64),
            CellValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Try to convert to float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(f) => Some(*f),
            CellValue::Int(i) => Some(*i as f64),
            CellValue::DateTime(d) => Some(*d),
            CellValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Try to convert to boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            CellValue::Int(i) => Some(*i != 0),
            CellValue::String(s) => match s.to_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Interpret an Excel serial date value as a calendar date-time
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        let serial = match self {
            CellValue::DateTime(d) | CellValue::Float(d) => *d,
            _ => return None,
        };
        let millis = ((serial - UNIX_EPOCH_SERIAL) * MILLIS_PER_DAY).round() as i64;
        DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Int(i64::from(i))
    }
}

impl From<u32> for CellValue {
    fn from(i: u32) -> Self {
        CellValue::Int(i64::from(i))
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<f32> for CellValue {
    fn from(f: f32) -> Self {
        CellValue::Float(f64::from(f))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::from_datetime(dt)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(date: NaiveDate) -> Self {
        CellValue::from_datetime(date.and_time(NaiveTime::MIN))
    }
}

/// Reference to an image file to embed in a cell
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Image {
    path: PathBuf,
}

impl Image {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Image {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the referenced file is present on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// Position of the next write, zero-based
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cursor {
    pub col: u32,
    pub row: u32,
}

impl Cursor {
    pub fn new(col: u32, row: u32) -> Self {
        Cursor { col, row }
    }

    /// Excel-style reference of the cursor cell (e.g. "B3")
    pub fn reference(&self) -> String {
        cell_reference(self.row, self.col)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Build an A1-style reference from zero-based coordinates
pub fn cell_reference(row: u32, col: u32) -> String {
    let mut result = col_to_letter(col);
    let mut buffer = itoa::Buffer::new();
    result.push_str(buffer.format(u64::from(row) + 1));
    result
}

/// Convert column index to Excel letter (0 -> A, 25 -> Z, 26 -> AA)
fn col_to_letter(col: u32) -> String {
    let mut result = String::new();
    let mut col = u64::from(col) + 1;

    while col > 0 {
        col -= 1;
        result.insert(0, (b'A' + (col % 26) as u8) as char);
        col /= 26;
    }

    result
}

/// Represents a row of cells
#[derive(Debug, Clone)]
pub struct Row {
    /// Row index (0-based)
    pub index: u32,
    /// Cells in this row
    pub cells: Vec<CellValue>,
}

impl Row {
    /// Create a new row
    pub fn new(index: u32, cells: Vec<CellValue>) -> Self {
        Row { index, cells }
    }

    /// Get cell at column index
    pub fn get(&self, col: usize) -> Option<&CellValue> {
        self.cells.get(col)
    }

    /// Check if row is empty
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() || self.cells.iter().all(|c| c.is_empty())
    }

    /// Convert row to vector of strings
    pub fn to_strings(&self) -> Vec<String> {
        self.cells.iter().map(|c| c.as_string()).collect()
    }
}
