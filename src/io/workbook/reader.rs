use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use tracing::debug;

use crate::io::error::Error;
use crate::io::sheet::{Cell, RawSheet, RawWorkbook};
use crate::io::util::extension;
use crate::io::Format;

/// Reads every worksheet of the workbook at `path`, in workbook order.
pub fn read_workbook(path: &Path) -> Result<RawWorkbook, Error> {
    if Format::from_path(path).is_none() {
        return Err(Error::UnsupportedReadFormat(extension(path)));
    }
    std::fs::metadata(path)?;

    let mut workbook = open_workbook_auto(path)?;
    let mut raw = RawWorkbook::new();

    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| Error::worksheet(name.as_str(), e))?;
        let sheet = from_range(&name, &range);
        debug!(
            sheet = %name,
            rows = sheet.row_count(),
            columns = sheet.column_count(),
            "read worksheet"
        );
        raw.sheets.push(sheet);
    }

    Ok(raw)
}

/// Converts a calamine range into a sheet anchored at A1.
///
/// calamine trims leading empty rows and columns; they are restored here
/// so cell references in diagnostics match what the user sees.
fn from_range(name: &str, range: &Range<Data>) -> RawSheet {
    let Some((start_row, start_col)) = range.start() else {
        return RawSheet::new(name);
    };

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); start_row as usize];
    for data_row in range.rows() {
        let mut row = vec![Cell::Empty; start_col as usize];
        row.extend(data_row.iter().map(to_cell));
        rows.push(row);
    }

    RawSheet::new(name).with_rows(rows)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(b.to_string().to_uppercase()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_offset_is_restored() {
        let mut range = Range::new((1, 2), (2, 3));
        range.set_value((1, 2), Data::String("Element".into()));
        range.set_value((1, 3), Data::String("Kd".into()));
        range.set_value((2, 2), Data::String("La".into()));
        range.set_value((2, 3), Data::Float(0.0044));

        let sheet = from_range("Kd", &range);
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.cell(0, 0), &Cell::Empty);
        assert_eq!(sheet.cell(1, 2), &Cell::text("Element"));
        assert_eq!(sheet.cell(2, 3), &Cell::Number(0.0044));
    }

    #[test]
    fn empty_range_gives_empty_sheet() {
        let range: Range<Data> = Range::empty();
        let sheet = from_range("Blank", &range);
        assert_eq!(sheet.row_count(), 0);
        assert_eq!(sheet.name, "Blank");
    }

    #[test]
    fn cells_convert_to_numbers_or_text() {
        assert_eq!(to_cell(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(to_cell(&Data::Float(2.12)), Cell::Number(2.12));
        assert_eq!(to_cell(&Data::String("n.d.".into())), Cell::text("n.d."));
        assert_eq!(to_cell(&Data::String("  ".into())), Cell::Empty);
        assert_eq!(to_cell(&Data::Bool(true)), Cell::text("TRUE"));
        assert_eq!(to_cell(&Data::Empty), Cell::Empty);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = read_workbook(Path::new("input.csv")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedReadFormat(ext) if ext == "csv"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_workbook(&dir.path().join("absent.xlsx")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
