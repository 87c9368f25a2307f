use std::path::Path;

use rust_xlsxwriter::{Format as CellFormat, Workbook, Worksheet};
use tracing::debug;

use crate::io::Format;
use crate::io::error::Error;
use crate::io::sheet::Cell;
use crate::io::util::extension;
use crate::model::document::{OutputDocument, OutputSheet};

const LABEL_COLUMN_WIDTH: f64 = 24.0;
const VALUE_COLUMN_WIDTH: f64 = 14.0;

/// Writes `document` as an `.xlsx` workbook at `path`.
///
/// Any other extension is refused before a file is created.
pub fn write_document(document: &OutputDocument, path: &Path) -> Result<(), Error> {
    match Format::from_path(path) {
        Some(format) if format.is_writable() => {}
        Some(format) => return Err(Error::UnsupportedWriteFormat(format)),
        None => return Err(Error::UnsupportedWriteExtension(extension(path))),
    }

    let mut workbook = Workbook::new();
    let heading = CellFormat::new().set_bold();

    for sheet in &document.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_sheet(worksheet, sheet, &heading)?;
        debug!(sheet = %sheet.name, rows = sheet.rows.len(), "wrote worksheet");
    }

    workbook.save(path)?;
    Ok(())
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &OutputSheet,
    heading: &CellFormat,
) -> Result<(), Error> {
    worksheet.set_column_width(0, LABEL_COLUMN_WIDTH)?;
    for col in 1..sheet.column_count() {
        worksheet.set_column_width(col as u16, VALUE_COLUMN_WIDTH)?;
    }

    for (r, row) in sheet.rows.iter().enumerate() {
        let bold = sheet.is_heading(r);
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32, c as u16);
            match (cell, bold) {
                (Cell::Empty, _) => {}
                (Cell::Number(n), false) => {
                    worksheet.write_number(r, c, *n)?;
                }
                (Cell::Number(n), true) => {
                    worksheet.write_number_with_format(r, c, *n, heading)?;
                }
                (Cell::Text(s), false) => {
                    worksheet.write_string(r, c, s)?;
                }
                (Cell::Text(s), true) => {
                    worksheet.write_string_with_format(r, c, s, heading)?;
                }
            }
        }
    }

    Ok(())
}
