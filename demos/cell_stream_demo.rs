//! Reads `liste.xlsx` and writes `demo_file.xlsx` in the working directory

use cellstream::types::Image;
use cellstream::{list_sheet_names, read_sheet, CellStreamWriterBuilder, ImagePolicy};

fn write_demo(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = CellStreamWriterBuilder::new(path)
        .with_sheet_name("démo")
        .with_image_policy(ImagePolicy::SkipMissing)
        .build()?;

    writer.set_cursor(0, 1);
    writer.write("hello")?.write("to everybody")?.end_row();
    writer.end_row();
    writer.write(3.1415)?;

    let v = vec![1.2, 3.5, -6.0, 7.2, 12.22];
    writer.write_line(&v)?; // downwards
    writer.set_cursor(0, 5);
    writer.write(&v)?; // across
    writer.write(Image::new("image.jpg"))?;

    writer.close()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("current path={}", std::env::current_dir()?.display());

    let input = "liste.xlsx";

    println!("Sheets in {}:", input);
    for name in list_sheet_names(input) {
        println!("  {}", name);
    }

    let rows = read_sheet(input, Some("liste"));
    println!("Read {} rows from sheet 'liste'", rows.len());
    for row in &rows {
        println!("{}", row.join("\t"));
    }

    let output = "demo_file.xlsx";
    write_demo(output)?;
    println!("Excel file created successfully: {}", output);

    Ok(())
}
