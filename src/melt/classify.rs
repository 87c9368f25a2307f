use super::extract;
use super::rules::ClassifierRules;
use crate::io::sheet::{Cell, RawSheet, RawWorkbook};
use crate::io::util::cell_reference;
use crate::model::diagnostic::Diagnostic;
use crate::model::table::{CoefficientTable, StudyTable};
use crate::model::types::{CoefficientKind, SheetKind};
use tracing::{debug, warn};

/// Role assigned to a worksheet from its structure alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRole {
    StudyData,
    KdTable,
    NormalizingTable,
    /// No recognized shape; carries a human-readable reason.
    Unrecognized(String),
}

impl SheetRole {
    pub fn kind(&self) -> Option<SheetKind> {
        match self {
            SheetRole::StudyData => Some(SheetKind::StudyData),
            SheetRole::KdTable => Some(SheetKind::KdTable),
            SheetRole::NormalizingTable => Some(SheetKind::NormalizingTable),
            SheetRole::Unrecognized(_) => None,
        }
    }
}

/// Structural description of a worksheet after blank rows and columns are
/// dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetShape {
    /// Header of the label (first) column.
    pub label_header: String,
    /// Headers of every data column, in column order.
    pub data_headers: Vec<String>,
    /// Non-blank labels below the header row.
    pub label_count: usize,
    /// `true` when every non-blank label is element-like.
    pub element_labels: bool,
    /// Numeric cells found in the data columns below the header row.
    pub numeric_cells: usize,
}

impl SheetShape {
    pub fn describe(sheet: &RawSheet, rules: &ClassifierRules) -> Self {
        Grid::new(sheet).shape(rules)
    }

    #[inline]
    pub fn data_column_count(&self) -> usize {
        self.data_headers.len()
    }
}

/// Assigns a role to a sheet shape.
///
/// Single-data-column sheets are only ever Kd or normalizing tables. The
/// header matches by keyword or by a known source of that kind; one that
/// matches neither (or both) is unrecognized rather than read as a
/// one-sample study.
pub fn classify(shape: &SheetShape, rules: &ClassifierRules) -> SheetRole {
    if shape.data_headers.is_empty() {
        return SheetRole::Unrecognized("no data columns".into());
    }
    if shape.label_count == 0 {
        return SheetRole::Unrecognized("no rows below the header".into());
    }
    if !shape.element_labels {
        return SheetRole::Unrecognized(
            "first column does not hold element identifiers".into(),
        );
    }
    if shape.numeric_cells == 0 {
        return SheetRole::Unrecognized("no numeric data".into());
    }

    if let [header] = shape.data_headers.as_slice() {
        let kd = rules.matches_kind(header, CoefficientKind::Kd);
        let normalizing = rules.matches_kind(header, CoefficientKind::Normalizing);
        return match (kd, normalizing) {
            (true, false) => SheetRole::KdTable,
            (false, true) => SheetRole::NormalizingTable,
            (true, true) => SheetRole::Unrecognized(format!(
                "header '{header}' matches both Kd and normalizing keywords"
            )),
            (false, false) => SheetRole::Unrecognized(format!(
                "single data column '{header}' matches neither Kd nor normalizing keywords"
            )),
        };
    }

    SheetRole::StudyData
}

/// Name, role and fate of one input worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedSheet {
    pub name: String,
    pub role: SheetRole,
    /// `false` when the sheet was skipped after classification.
    pub used: bool,
}

/// Typed tables extracted from one workbook, ready for calculation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassifiedWorkbook {
    pub sheets: Vec<ClassifiedSheet>,
    pub studies: Vec<StudyTable>,
    pub kd: Option<CoefficientTable>,
    pub normalizing: Option<CoefficientTable>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ClassifiedWorkbook {
    pub fn study(&self, name: &str) -> Option<&StudyTable> {
        self.studies.iter().find(|s| s.name == name)
    }
}

pub fn classify_workbook(workbook: &RawWorkbook, rules: &ClassifierRules) -> ClassifiedWorkbook {
    let mut out = ClassifiedWorkbook::default();

    for sheet in &workbook.sheets {
        let grid = Grid::new(sheet);
        let shape = grid.shape(rules);
        let role = classify(&shape, rules);
        debug!(sheet = %sheet.name, role = ?role, columns = shape.data_column_count(), "classified sheet");

        let used = match &role {
            SheetRole::StudyData => match extract::study_table(&grid, rules) {
                Ok((table, cell_diagnostics)) => {
                    record_all(&mut out.diagnostics, cell_diagnostics);
                    out.studies.push(table);
                    true
                }
                Err(detail) => malformed(&mut out.diagnostics, sheet, detail),
            },
            SheetRole::KdTable => {
                take_coefficients(&mut out, &grid, CoefficientKind::Kd, rules)
            }
            SheetRole::NormalizingTable => {
                take_coefficients(&mut out, &grid, CoefficientKind::Normalizing, rules)
            }
            SheetRole::Unrecognized(reason) => {
                record(
                    &mut out.diagnostics,
                    Diagnostic::UnclassifiableSheet {
                        sheet: sheet.name.clone(),
                        reason: reason.clone(),
                    },
                );
                false
            }
        };

        out.sheets.push(ClassifiedSheet {
            name: sheet.name.clone(),
            role,
            used,
        });
    }

    out
}

fn take_coefficients(
    out: &mut ClassifiedWorkbook,
    grid: &Grid<'_>,
    kind: CoefficientKind,
    rules: &ClassifierRules,
) -> bool {
    let slot = match kind {
        CoefficientKind::Kd => &out.kd,
        CoefficientKind::Normalizing => &out.normalizing,
    };
    if let Some(existing) = slot {
        let diagnostic = Diagnostic::DuplicateTable {
            sheet: grid.sheet.name.clone(),
            kind: kind.sheet_kind(),
            kept: existing.sheet.clone(),
        };
        record(&mut out.diagnostics, diagnostic);
        return false;
    }

    match extract::coefficient_table(grid, kind, rules) {
        Ok((table, cell_diagnostics)) => {
            record_all(&mut out.diagnostics, cell_diagnostics);
            match kind {
                CoefficientKind::Kd => out.kd = Some(table),
                CoefficientKind::Normalizing => out.normalizing = Some(table),
            }
            true
        }
        Err(detail) => malformed(&mut out.diagnostics, grid.sheet, detail),
    }
}

fn malformed(diagnostics: &mut Vec<Diagnostic>, sheet: &RawSheet, detail: String) -> bool {
    record(
        diagnostics,
        Diagnostic::MalformedTable {
            sheet: sheet.name.clone(),
            detail,
        },
    );
    false
}

pub(super) fn record(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    warn!(kind = diagnostic.kind(), "{diagnostic}");
    diagnostics.push(diagnostic);
}

fn record_all(diagnostics: &mut Vec<Diagnostic>, items: Vec<Diagnostic>) {
    for d in items {
        record(diagnostics, d);
    }
}

/// A view of a sheet with fully blank rows and columns removed.
pub(super) struct Grid<'a> {
    pub(super) sheet: &'a RawSheet,
    rows: Vec<usize>,
    cols: Vec<usize>,
}

impl<'a> Grid<'a> {
    pub(super) fn new(sheet: &'a RawSheet) -> Self {
        let width = sheet.column_count();
        let rows = (0..sheet.row_count())
            .filter(|&r| (0..width).any(|c| !sheet.cell(r, c).is_blank()))
            .collect::<Vec<_>>();
        let cols = (0..width)
            .filter(|&c| rows.iter().any(|&r| !sheet.cell(r, c).is_blank()))
            .collect();
        Self { sheet, rows, cols }
    }

    #[inline]
    pub(super) fn height(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub(super) fn width(&self) -> usize {
        self.cols.len()
    }

    pub(super) fn cell(&self, row: usize, col: usize) -> &'a Cell {
        self.sheet.cell(self.rows[row], self.cols[col])
    }

    /// A1 reference of a grid cell in the original sheet.
    pub(super) fn reference(&self, row: usize, col: usize) -> String {
        cell_reference(self.rows[row], self.cols[col])
    }

    fn shape(&self, rules: &ClassifierRules) -> SheetShape {
        if self.height() == 0 || self.width() == 0 {
            return SheetShape::default();
        }

        let labels: Vec<String> = (1..self.height())
            .map(|r| self.cell(r, 0).as_label())
            .filter(|l| !l.is_empty())
            .collect();

        let numeric_cells = (1..self.height())
            .flat_map(|r| (1..self.width()).map(move |c| (r, c)))
            .filter(|&(r, c)| extract::is_numeric(self.cell(r, c)))
            .count();

        SheetShape {
            label_header: self.cell(0, 0).as_label(),
            data_headers: (1..self.width())
                .map(|c| self.cell(0, c).as_label())
                .collect(),
            label_count: labels.len(),
            element_labels: !labels.is_empty()
                && labels.iter().all(|l| rules.element.is_element_like(l)),
            numeric_cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::melt::rules::get_default_rules;

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells
            .iter()
            .map(|s| match s.parse::<f64>() {
                Ok(n) => Cell::Number(n),
                Err(_) => Cell::from(*s),
            })
            .collect()
    }

    fn sheet(name: &str, rows: &[&[&str]]) -> RawSheet {
        RawSheet::new(name).with_rows(rows.iter().map(|r| row(r)).collect())
    }

    fn role_of(s: &RawSheet) -> SheetRole {
        let rules = get_default_rules();
        classify(&SheetShape::describe(s, rules), rules)
    }

    #[test]
    fn kd_sheet_is_recognized_from_header() {
        let s = sheet(
            "whatever",
            &[&["Element", "Kd (Grassi et al. 2012)"], &["La", "0.0044"], &["Ce", "0.0092"]],
        );
        assert_eq!(role_of(&s), SheetRole::KdTable);
    }

    #[test]
    fn normalizing_sheet_is_recognized_from_header() {
        let s = sheet(
            "Sheet3",
            &[&["Element", "Primitive Mantle"], &["La", "0.648"]],
        );
        assert_eq!(role_of(&s), SheetRole::NormalizingTable);
    }

    #[test]
    fn citation_only_headers_are_recognized() {
        let kd = sheet(
            "Sheet2",
            &[&["Element", "Grassi et al. (2012)"], &["La", "0.0044"]],
        );
        assert_eq!(role_of(&kd), SheetRole::KdTable);

        let pm = sheet(
            "Sheet3",
            &[&["Element", "McDonough & Sun (1995)"], &["La", "0.648"]],
        );
        assert_eq!(role_of(&pm), SheetRole::NormalizingTable);

        let wb = RawWorkbook::new()
            .with_sheet(sheet(
                "Present Study",
                &[&["Element", "S1", "S2"], &["La", "2.12", "1.0"]],
            ))
            .with_sheet(kd)
            .with_sheet(pm);
        let wb = classify_workbook(&wb, get_default_rules());
        assert_eq!(wb.kd.as_ref().unwrap().label, "Grassi et al. (2012)");
        assert_eq!(
            wb.normalizing.as_ref().unwrap().label,
            "McDonough & Sun (1995)"
        );
        assert!(wb.diagnostics.is_empty());
    }

    #[test]
    fn study_sheet_has_several_sample_columns() {
        let s = sheet(
            "Present Study",
            &[&["Element", "S1", "S2"], &["La", "2.12", "1.8"], &["Ce", "6.5", ""]],
        );
        assert_eq!(role_of(&s), SheetRole::StudyData);
    }

    #[test]
    fn sheet_name_is_not_a_signal() {
        let s = sheet("Kd values", &[&["Element", "S1", "S2"], &["La", "1", "2"]]);
        assert_eq!(role_of(&s), SheetRole::StudyData);
    }

    #[test]
    fn single_unmatched_column_is_unrecognized() {
        let s = sheet("One sample", &[&["Element", "S1"], &["La", "2.0"]]);
        assert!(matches!(role_of(&s), SheetRole::Unrecognized(_)));
    }

    #[test]
    fn header_matching_both_keyword_sets_is_unrecognized() {
        let s = sheet("Mixed", &[&["Element", "Kd / PM"], &["La", "2.0"]]);
        match role_of(&s) {
            SheetRole::Unrecognized(reason) => assert!(reason.contains("both")),
            other => panic!("unexpected role {other:?}"),
        }
    }

    #[test]
    fn notes_sheet_is_unrecognized() {
        let s = sheet(
            "Notes",
            &[&["Data compiled from three papers; see references."], &["Check La values."]],
        );
        assert!(matches!(role_of(&s), SheetRole::Unrecognized(_)));
    }

    #[test]
    fn text_only_table_is_unrecognized() {
        let s = sheet(
            "References",
            &[&["Study", "Citation", "Year"], &["A", "Smith et al.", "n/a"]],
        );
        assert_eq!(
            role_of(&s),
            SheetRole::Unrecognized("no numeric data".into())
        );
    }

    #[test]
    fn non_element_labels_are_unrecognized() {
        let s = sheet(
            "Stats",
            &[&["Statistic", "S1", "S2"], &["mean value", "1", "2"]],
        );
        assert_eq!(
            role_of(&s),
            SheetRole::Unrecognized("first column does not hold element identifiers".into())
        );
    }

    #[test]
    fn blank_rows_and_columns_are_dropped_before_shaping() {
        let s = sheet(
            "Offset",
            &[
                &["", "", "", ""],
                &["", "Element", "", "Kd"],
                &["", "", "", ""],
                &["", "La", "", "0.0044"],
            ],
        );
        let shape = SheetShape::describe(&s, get_default_rules());
        assert_eq!(shape.label_header, "Element");
        assert_eq!(shape.data_headers, ["Kd"]);
        assert_eq!(shape.label_count, 1);
        assert_eq!(role_of(&s), SheetRole::KdTable);
    }

    #[test]
    fn empty_sheet_is_unrecognized() {
        let s = RawSheet::new("Empty");
        assert_eq!(
            role_of(&s),
            SheetRole::Unrecognized("no data columns".into())
        );
    }

    fn scenario_workbook() -> RawWorkbook {
        RawWorkbook::new()
            .with_sheet(sheet(
                "Present Study",
                &[&["Element", "S1", "S2"], &["La", "2.12", "1.0"], &["Ce", "5", "4"]],
            ))
            .with_sheet(sheet(
                "Kd",
                &[&["Element", "Kd Grassi"], &["La", "0.0044"], &["Ce", "0.009"]],
            ))
            .with_sheet(sheet(
                "PM",
                &[&["Element", "PM McDonough"], &["La", "0.648"], &["Ce", "1.675"]],
            ))
            .with_sheet(sheet("Notes", &[&["free text only"]]))
    }

    #[test]
    fn workbook_with_notes_sheet_classifies_with_warning() {
        let wb = classify_workbook(&scenario_workbook(), get_default_rules());
        assert_eq!(wb.studies.len(), 1);
        assert_eq!(wb.kd.as_ref().unwrap().label, "Grassi et al. (2012)");
        assert_eq!(
            wb.normalizing.as_ref().unwrap().label,
            "McDonough & Sun (1995)"
        );
        assert_eq!(wb.diagnostics.len(), 1);
        assert_eq!(wb.diagnostics[0].kind(), "UnclassifiableSheet");
        assert_eq!(wb.diagnostics[0].subject(), "Notes");

        let roles: Vec<_> = wb.sheets.iter().map(|s| (s.name.as_str(), s.used)).collect();
        assert_eq!(
            roles,
            [("Present Study", true), ("Kd", true), ("PM", true), ("Notes", false)]
        );
    }

    #[test]
    fn second_kd_sheet_is_reported_and_ignored() {
        let wb = scenario_workbook().with_sheet(sheet(
            "Kd alt",
            &[&["Element", "Partition coefficient"], &["La", "0.01"]],
        ));
        let wb = classify_workbook(&wb, get_default_rules());
        assert_eq!(wb.kd.as_ref().unwrap().sheet, "Kd");
        assert!(wb.diagnostics.iter().any(|d| matches!(
            d,
            Diagnostic::DuplicateTable { sheet, kept, .. } if sheet == "Kd alt" && kept == "Kd"
        )));
    }

    #[test]
    fn malformed_study_is_skipped_without_aborting() {
        let wb = scenario_workbook().with_sheet(sheet(
            "Twice",
            &[&["Element", "S1", "S1"], &["La", "1", "2"]],
        ));
        let wb = classify_workbook(&wb, get_default_rules());
        assert_eq!(wb.studies.len(), 1);
        assert!(wb.diagnostics.iter().any(|d| matches!(
            d,
            Diagnostic::MalformedTable { sheet, .. } if sheet == "Twice"
        )));
        let twice = wb.sheets.iter().find(|s| s.name == "Twice").unwrap();
        assert_eq!(twice.role, SheetRole::StudyData);
        assert!(!twice.used);
    }
}
