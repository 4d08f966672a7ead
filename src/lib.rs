//! # cellstream
//!
//! Stream-style writing of Excel workbooks, cell by cell.
//!
//! ## Features
//!
//! - **Cursor Writes**: `write` fills left to right, `write_line` top to bottom
//! - **Row Marker**: `end_row` returns to column A of the next row
//! - **Sequences**: slices, vectors and arrays are written element by element
//! - **Named Sheets & Formats**: switch targets and styling by name
//! - **Images**: embed picture files at the cursor
//! - **Pluggable Documents**: write `.xlsx` files or record into memory
//! - **Reading**: list sheets and read a sheet back as a grid of text
//!
//! ## Quick Start
//!
//! ### Writing
//!
//! ```rust,no_run
//! use cellstream::types::Image;
//! use cellstream::CellStreamWriter;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut writer = CellStreamWriter::open("demo_file.xlsx", "Demo")?;
//!
//! writer.set_cursor(0, 1);
//! writer.write("hello")?.write("to everybody")?.end_row();
//! writer.write(3.1415)?;
//!
//! let v = vec![1.2, 3.5, -6.0, 7.2, 12.22];
//! writer.write_line(&v)?; // downwards
//! writer.set_cursor(0, 5);
//! writer.write(&v)?; // across
//! writer.write(Image::new("image.jpg"))?;
//!
//! writer.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Reading
//!
//! ```rust,no_run
//! use cellstream::reader::{list_sheet_names, read_sheet};
//!
//! for name in list_sheet_names("liste.xlsx") {
//!     println!("{}", name);
//! }
//! for row in read_sheet("liste.xlsx", Some("liste")) {
//!     println!("{}", row.join("\t"));
//! }
//! ```

pub mod document;
pub mod error;
pub mod reader;
pub mod types;
pub mod writer;

pub use document::{Document, MemoryDocument, XlsxDocument};
pub use error::{ExcelError, Result};
pub use reader::{list_sheet_names, read_sheet, ExcelReader};
pub use types::{CellFormat, CellStyle, CellValue, Cursor, Image, Row};
pub use writer::{CellStreamWriter, CellStreamWriterBuilder, ImagePolicy, Streamable};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_imports() {
        // Test that all public types are accessible
        let _ = std::marker::PhantomData::<ExcelError>;
        let _ = std::marker::PhantomData::<ExcelReader>;
        let _ = std::marker::PhantomData::<CellStreamWriter>;
        let _ = std::marker::PhantomData::<CellStreamWriter<MemoryDocument>>;
    }
}
