//! Integration tests for cellstream

use cellstream::types::{CellFormat, CellStyle, CellValue, Cursor, Image};
use cellstream::{
    list_sheet_names, read_sheet, CellStreamWriter, CellStreamWriterBuilder, ExcelError,
    ExcelReader, ImagePolicy,
};
use tempfile::{tempdir, NamedTempFile};

// 1x1 transparent PNG
const PNG_PIXEL: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0xDA, 0x63, 0x64,
    0x60, 0xF8, 0x5F, 0x0F, 0x00, 0x02, 0x87, 0x01, 0x80, 0xEB, 0x47, 0xBA, 0x92, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[test]
fn test_demo_scenario_roundtrip() {
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path().to_string_lossy().to_string();

    // Write data
    {
        let mut writer = CellStreamWriter::open(&path, "Demo").unwrap();
        writer.set_cursor(0, 1);
        writer.write("hello").unwrap().write("world").unwrap().end_row();
        writer.write(3.1415).unwrap();
        writer.write_line([1.2, 3.5, -6.0]).unwrap();
        writer.set_cursor(0, 5);
        writer.write([1.2, 3.5, -6.0]).unwrap();

        assert_eq!(writer.cursor(), Cursor::new(3, 5));
        writer.close().unwrap();
    }

    // Read data back
    {
        let mut reader = ExcelReader::open(&path).unwrap();
        assert_eq!(reader.sheet_names(), vec!["Demo"]);

        assert_eq!(
            reader.read_cell("Demo", 1, 0).unwrap().as_string(),
            "hello"
        );
        assert_eq!(
            reader.read_cell("Demo", 1, 1).unwrap().as_string(),
            "world"
        );
        assert_eq!(reader.read_cell("Demo", 2, 0).unwrap().as_f64(), Some(3.1415));
        assert_eq!(reader.read_cell("Demo", 2, 1).unwrap().as_f64(), Some(1.2));
        assert_eq!(reader.read_cell("Demo", 3, 1).unwrap().as_f64(), Some(3.5));
        assert_eq!(reader.read_cell("Demo", 4, 1).unwrap().as_f64(), Some(-6.0));
        assert_eq!(reader.read_cell("Demo", 5, 0).unwrap().as_f64(), Some(1.2));
        assert_eq!(reader.read_cell("Demo", 5, 1).unwrap().as_f64(), Some(3.5));
        assert_eq!(reader.read_cell("Demo", 5, 2).unwrap().as_f64(), Some(-6.0));
        assert!(reader.read_cell("Demo", 0, 0).unwrap().is_empty());
    }
}

#[test]
fn test_read_sheet_grid() {
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path().to_string_lossy().to_string();

    {
        let mut writer = CellStreamWriter::open(&path, "liste").unwrap();
        writer.set_cursor(0, 1);
        writer.write(["Name", "Age"]).unwrap().end_row();
        // row 2 left empty on purpose
        writer.end_row();
        writer.write("Alice").unwrap().write(30).unwrap();
        writer.close().unwrap();
    }

    let grid = read_sheet(&path, Some("liste"));
    assert_eq!(
        grid,
        vec![
            vec!["Name".to_string(), "Age".to_string()],
            vec!["Alice".to_string(), "30".to_string()],
        ]
    );

    // First sheet when no name is given
    assert_eq!(read_sheet(&path, None), grid);
}

#[test]
fn test_read_sheet_keeps_left_margin() {
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path().to_string_lossy().to_string();

    {
        let mut writer = CellStreamWriter::open(&path, "Sheet1").unwrap();
        writer.set_cursor(2, 0);
        writer.write("C1").unwrap();
        writer.close().unwrap();
    }

    let grid = read_sheet(&path, None);
    assert_eq!(
        grid,
        vec![vec![String::new(), String::new(), "C1".to_string()]]
    );
}

#[test]
fn test_read_sheet_truncates_long_text() {
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path().to_string_lossy().to_string();

    {
        let mut writer = CellStreamWriter::open(&path, "Sheet1").unwrap();
        writer.write("x".repeat(2000)).unwrap();
        writer.close().unwrap();
    }

    let grid = read_sheet(&path, None);
    assert_eq!(grid[0][0].len(), cellstream::reader::MAX_CELL_TEXT_LEN);
}

#[test]
fn test_multi_sheet() {
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path().to_string_lossy().to_string();

    {
        let mut writer = CellStreamWriter::open(&path, "First").unwrap();
        writer.write("Sheet1 Data").unwrap();

        writer.add_sheet("Second").unwrap();
        writer.end_row();
        writer.write("Sheet2 Data").unwrap();

        writer.close().unwrap();
    }

    assert_eq!(list_sheet_names(&path), vec!["First", "Second"]);

    let mut reader = ExcelReader::open(&path).unwrap();
    assert_eq!(reader.sheet_count(), 2);
    assert_eq!(
        reader.read_cell("Second", 1, 0).unwrap().as_string(),
        "Sheet2 Data"
    );
    assert!(matches!(
        reader.rows("Third"),
        Err(ExcelError::SheetNotFound { .. })
    ));
}

#[test]
fn test_typed_cells() {
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path().to_string_lossy().to_string();

    {
        let mut writer = CellStreamWriter::open(&path, "Sheet1").unwrap();
        writer
            .write(vec![
                CellValue::String("Alice".to_string()),
                CellValue::Int(30),
                CellValue::Float(1234.56),
                CellValue::Bool(true),
            ])
            .unwrap();
        writer.close().unwrap();
    }

    let mut reader = ExcelReader::open(&path).unwrap();
    let rows: Vec<_> = reader
        .rows_by_index(0)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(rows.len(), 1);
    let row = &rows[0];

    assert_eq!(row.get(0).unwrap().as_string(), "Alice");
    assert_eq!(row.get(1).unwrap().as_i64(), Some(30));
    assert_eq!(row.get(2).unwrap().as_f64(), Some(1234.56));
    assert_eq!(row.get(3).unwrap().as_bool(), Some(true));
}

#[test]
fn test_formats_applied() {
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path().to_string_lossy().to_string();

    {
        let mut writer = CellStreamWriter::open(&path, "Sheet1").unwrap();
        writer
            .add_format_with("header", CellFormat::new().bold())
            .unwrap();
        writer.write(["Item", "Price"]).unwrap().end_row();
        writer
            .add_format_with("money", CellStyle::NumberCurrency)
            .unwrap();
        writer.use_format("default").unwrap();
        writer.set_cursor(0, 1);
        writer.write("Coffee").unwrap();
        writer.use_format("money").unwrap();
        writer.write(3.5).unwrap();
        writer.close().unwrap();
    }

    let grid = read_sheet(&path, None);
    assert_eq!(grid[0], vec!["Item", "Price"]);
    assert_eq!(grid[1], vec!["Coffee", "3.5"]);
}

#[test]
fn test_image_embedding() {
    let dir = tempdir().unwrap();
    let image_path = dir.path().join("pixel.png");
    std::fs::write(&image_path, PNG_PIXEL).unwrap();
    let path = dir.path().join("images.xlsx");

    let mut writer = CellStreamWriter::open(&path, "Sheet1").unwrap();
    writer.write(Image::new(&image_path)).unwrap();
    writer
        .write_line(Image::new(dir.path().join("missing.png")))
        .unwrap();
    assert_eq!(writer.cursor(), Cursor::new(1, 1));

    let err = writer
        .write(Image::new(dir.path().join("missing.png")))
        .err()
        .unwrap();
    assert!(matches!(err, ExcelError::Resource { .. }));

    writer.close().unwrap();
    assert!(path.exists());
}

#[test]
fn test_skip_missing_images_policy() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lenient.xlsx");

    let mut writer = CellStreamWriterBuilder::new(&path)
        .with_sheet_name("Pictures")
        .with_image_policy(ImagePolicy::SkipMissing)
        .build()
        .unwrap();

    writer.write(Image::new("nonexistent.png")).unwrap();
    assert_eq!(writer.cursor(), Cursor::new(1, 0));
    writer.close().unwrap();

    assert_eq!(list_sheet_names(&path), vec!["Pictures"]);
}

#[test]
fn test_drop_closes_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dropped.xlsx");

    {
        let mut writer = CellStreamWriter::open(&path, "Sheet1").unwrap();
        writer.write("kept").unwrap();
    }

    assert_eq!(read_sheet(&path, None), vec![vec!["kept".to_string()]]);
}

#[test]
fn test_double_close() {
    let temp = NamedTempFile::new().unwrap();
    let mut writer = CellStreamWriter::open(temp.path(), "Sheet1").unwrap();
    writer.write("once").unwrap();

    assert!(writer.close().is_ok());
    assert!(matches!(writer.close(), Err(ExcelError::DoubleClose)));

    drop(writer);
    assert_eq!(
        read_sheet(temp.path(), None),
        vec![vec!["once".to_string()]]
    );
}

#[test]
fn test_large_dataset() {
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path().to_string_lossy().to_string();

    let num_rows = 1000;

    {
        let mut writer = CellStreamWriter::open(&path, "Sheet1").unwrap();
        writer.write(["ID", "Value"]).unwrap().end_row();

        for i in 0..num_rows {
            writer.write(i).unwrap().write(i * 2).unwrap().end_row();
        }

        writer.close().unwrap();
    }

    let mut reader = ExcelReader::open(&path).unwrap();
    let row_count = reader.rows_by_index(0).unwrap().count();
    assert_eq!(row_count, num_rows as usize + 1);
    assert_eq!(reader.dimensions("Sheet1").unwrap(), (num_rows + 1, 2));
}

#[test]
fn test_sheet_not_found() {
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path().to_string_lossy().to_string();

    {
        let mut writer = CellStreamWriter::open(&path, "Sheet1").unwrap();
        writer.write("x").unwrap();
        writer.close().unwrap();
    }

    assert!(read_sheet(&path, Some("Missing")).is_empty());

    let mut reader = ExcelReader::open(&path).unwrap();
    let err = reader.read_grid(Some("Missing")).unwrap_err();
    assert!(matches!(
        err,
        ExcelError::SheetNotFound { ref available, .. } if available == "Sheet1"
    ));
}
