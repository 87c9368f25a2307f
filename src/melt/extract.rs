use std::collections::HashSet;

use super::classify::Grid;
use super::rules::ClassifierRules;
use crate::io::sheet::Cell;
use crate::io::util::column_letters;
use crate::model::diagnostic::Diagnostic;
use crate::model::table::{CoefficientTable, ElementMatrix, StudyTable};
use crate::model::types::{CoefficientKind, Element};

/// Table plus the cell-level diagnostics found while reading it.
pub(super) type Extracted<T> = (T, Vec<Diagnostic>);

/// `true` for cells that hold a finite number, directly or as text.
pub(super) fn is_numeric(cell: &Cell) -> bool {
    match cell {
        Cell::Number(n) => n.is_finite(),
        Cell::Text(s) => parse_number(s).is_some(),
        Cell::Empty => false,
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

struct CellReader<'g, 'a> {
    grid: &'g Grid<'a>,
    rules: &'g ClassifierRules,
    diagnostics: Vec<Diagnostic>,
}

impl<'g, 'a> CellReader<'g, 'a> {
    fn new(grid: &'g Grid<'a>, rules: &'g ClassifierRules) -> Self {
        Self {
            grid,
            rules,
            diagnostics: Vec::new(),
        }
    }

    /// Reads a numeric cell. Blanks and missing markers are `None`; other
    /// text is `None` plus a diagnostic.
    fn value(&mut self, row: usize, col: usize) -> Option<f64> {
        match self.grid.cell(row, col) {
            Cell::Empty => None,
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Number(n) => {
                self.non_numeric(row, col, n.to_string());
                None
            }
            Cell::Text(s) => {
                if s.trim().is_empty() || self.rules.cells.is_missing_marker(s) {
                    return None;
                }
                let parsed = parse_number(s);
                if parsed.is_none() {
                    self.non_numeric(row, col, s.trim().to_string());
                }
                parsed
            }
        }
    }

    fn non_numeric(&mut self, row: usize, col: usize, value: String) {
        self.diagnostics.push(Diagnostic::NonNumericCell {
            sheet: self.grid.sheet.name.clone(),
            cell: self.grid.reference(row, col),
            value,
        });
    }

    fn element(&self, row: usize) -> Result<Option<Element>, String> {
        let label = self.grid.cell(row, 0).as_label();
        if label.is_empty() {
            return Ok(None);
        }
        self.rules
            .element
            .parse(&label)
            .map(Some)
            .map_err(|e| format!("row {}: {e}", self.grid.reference(row, 0)))
    }

    fn row_has_data(&self, row: usize) -> bool {
        (1..self.grid.width()).any(|c| !self.grid.cell(row, c).is_blank())
    }
}

/// Reads a study sheet into a [`StudyTable`] named after the sheet.
pub(super) fn study_table(
    grid: &Grid<'_>,
    rules: &ClassifierRules,
) -> Result<Extracted<StudyTable>, String> {
    let mut reader = CellReader::new(grid, rules);

    let mut samples = Vec::with_capacity(grid.width().saturating_sub(1));
    let mut seen_samples = HashSet::new();
    for col in 1..grid.width() {
        let name = grid.cell(0, col).as_label();
        if name.is_empty() {
            return Err(format!(
                "column {} holds data but has no sample name",
                column_letters(col)
            ));
        }
        if !seen_samples.insert(name.clone()) {
            return Err(format!("duplicate sample name '{name}'"));
        }
        samples.push(name);
    }

    let mut matrix = ElementMatrix::new(samples);
    let mut seen_elements = HashSet::new();
    for row in 1..grid.height() {
        let Some(element) = reader.element(row)? else {
            if reader.row_has_data(row) {
                return Err(format!(
                    "row {} holds values but no element",
                    grid.reference(row, 0)
                ));
            }
            continue;
        };
        if !seen_elements.insert(element.clone()) {
            return Err(format!("element '{element}' is listed twice"));
        }
        let values = (1..grid.width()).map(|col| reader.value(row, col)).collect();
        matrix.push_row(element, values);
    }

    if matrix.element_count() == 0 {
        return Err("no element rows".into());
    }

    Ok((
        StudyTable::new(grid.sheet.name.clone(), matrix),
        reader.diagnostics,
    ))
}

/// Reads a single-column Kd or normalizing sheet.
///
/// Elements with a blank value are left out of the table.
pub(super) fn coefficient_table(
    grid: &Grid<'_>,
    kind: CoefficientKind,
    rules: &ClassifierRules,
) -> Result<Extracted<CoefficientTable>, String> {
    let mut reader = CellReader::new(grid, rules);

    let header = grid.cell(0, 1).as_label();
    let label = rules.source_label(&header);
    let mut table = CoefficientTable::new(kind, grid.sheet.name.clone(), header, label);

    let mut seen = HashSet::new();
    for row in 1..grid.height() {
        let Some(element) = reader.element(row)? else {
            continue;
        };
        if !seen.insert(element.clone()) {
            return Err(format!("element '{element}' is listed twice"));
        }
        if let Some(value) = reader.value(row, 1) {
            table.insert(element, value);
        }
    }

    if table.is_empty() {
        return Err(format!("{} has no numeric values", kind.sheet_kind()));
    }

    Ok((table, reader.diagnostics))
}
