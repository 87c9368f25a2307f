use std::collections::HashSet;

use crate::io::sheet::Cell;
use crate::model::document::{OutputDocument, OutputSheet};
use crate::model::results::{MeltResults, StudyResult, SummaryRecord};
use crate::model::table::ElementMatrix;

pub const SUMMARY_SHEET: &str = "Summary";
pub const DETAILED_SHEET: &str = "Detailed Results";

const MAX_SHEET_NAME: usize = 31;
const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

const MELT_TITLE: &str = "Calculated melt composition (ppm)";
const NORMALIZED_TITLE: &str = "Normalized values";
const DETAILED_HEADERS: [&str; 8] = [
    "Study",
    "Sample",
    "Element",
    "Cpx Concentration",
    "Kd",
    "Melt Concentration",
    "Normalizing Value",
    "Normalized",
];

/// Lays out `results` as an output workbook.
///
/// One sheet per study (melt section above normalized section), then the
/// `Summary` sheet, then `Detailed Results` when `detailed` is set.
pub fn assemble(results: &MeltResults, detailed: bool) -> OutputDocument {
    let mut names = SheetNames::new();
    let mut sheets: Vec<OutputSheet> = results
        .studies
        .iter()
        .map(|study| study_sheet(study, names.claim(study.name())))
        .collect();

    sheets.push(summary_sheet(results.summary()));
    if detailed {
        sheets.push(detailed_sheet(results));
    }

    OutputDocument { sheets }
}

fn study_sheet(study: &StudyResult, name: String) -> OutputSheet {
    let mut sheet = OutputSheet::new(name);

    sheet.push_heading(vec![Cell::text(MELT_TITLE)]);
    push_matrix(&mut sheet, &study.melt.values);

    sheet.push_blank();
    sheet.push_blank();

    sheet.push_heading(vec![Cell::text(format!(
        "{NORMALIZED_TITLE} ({})",
        study.normalized.standard
    ))]);
    push_matrix(&mut sheet, &study.normalized.values);

    sheet
}

fn push_matrix(sheet: &mut OutputSheet, matrix: &ElementMatrix) {
    let header = std::iter::once(Cell::text("Element"))
        .chain(matrix.samples().iter().map(|s| Cell::text(s.as_str())))
        .collect();
    sheet.push_heading(header);

    for (element, values) in matrix.rows() {
        let row = std::iter::once(Cell::text(element.symbol()))
            .chain(values.iter().map(|v| number_or_blank(*v)))
            .collect();
        sheet.push_row(row);
    }
}

fn summary_sheet(summary: &SummaryRecord) -> OutputSheet {
    let mut sheet = OutputSheet::new(SUMMARY_SHEET);

    sheet.push_heading(vec![Cell::text("Parameter"), Cell::text("Value")]);
    let elements = summary
        .elements
        .iter()
        .map(|e| e.symbol())
        .collect::<Vec<_>>()
        .join(", ");
    sheet.push_row(vec![
        Cell::text("Number of Studies"),
        Cell::Number(summary.studies_processed as f64),
    ]);
    sheet.push_row(vec![
        Cell::text("Total Samples"),
        Cell::Number(summary.total_samples as f64),
    ]);
    sheet.push_row(vec![
        Cell::text("Element Count"),
        Cell::Number(summary.elements.len() as f64),
    ]);
    sheet.push_row(vec![Cell::text("Elements Included"), Cell::text(elements)]);
    sheet.push_row(vec![
        Cell::text("Kd Source"),
        Cell::text(summary.kd_label.as_str()),
    ]);
    sheet.push_row(vec![
        Cell::text("Normalizing Standard"),
        Cell::text(summary.normalizing_label.as_str()),
    ]);

    sheet.push_blank();
    sheet.push_heading(vec![
        Cell::text("Diagnostic"),
        Cell::text("Subject"),
        Cell::text("Detail"),
    ]);
    if summary.diagnostics.is_empty() {
        sheet.push_row(vec![Cell::text("None")]);
    }
    for diagnostic in &summary.diagnostics {
        sheet.push_row(vec![
            Cell::text(diagnostic.kind()),
            Cell::text(diagnostic.subject()),
            Cell::text(diagnostic.to_string()),
        ]);
    }

    sheet
}

fn detailed_sheet(results: &MeltResults) -> OutputSheet {
    let mut sheet = OutputSheet::new(DETAILED_SHEET);
    sheet.push_heading(DETAILED_HEADERS.iter().map(|h| Cell::text(*h)).collect());

    for study in &results.studies {
        let melt = &study.melt.values;
        let normalized = &study.normalized.values;
        for sample in study.samples() {
            for element in melt.elements() {
                let symbol = element.symbol();
                let Some(concentration) = study.input.concentrations.value(symbol, sample) else {
                    continue;
                };
                sheet.push_row(vec![
                    Cell::text(study.name()),
                    Cell::text(sample.as_str()),
                    Cell::text(symbol),
                    Cell::Number(concentration),
                    number_or_blank(results.kd.get(symbol)),
                    number_or_blank(melt.value(symbol, sample)),
                    number_or_blank(results.normalizing.get(symbol)),
                    number_or_blank(normalized.value(symbol, sample)),
                ]);
            }
        }
    }

    sheet
}

#[inline]
fn number_or_blank(value: Option<f64>) -> Cell {
    value.map_or(Cell::Empty, Cell::Number)
}

/// Hands out unique, spreadsheet-safe sheet names.
///
/// Names are compared case-insensitively, as spreadsheet applications do.
struct SheetNames {
    taken: HashSet<String>,
}

impl SheetNames {
    fn new() -> Self {
        let taken = [SUMMARY_SHEET, DETAILED_SHEET]
            .iter()
            .map(|s| s.to_lowercase())
            .collect();
        Self { taken }
    }

    fn claim(&mut self, study: &str) -> String {
        let base = sanitize_sheet_name(study);
        let mut candidate = base.clone();
        let mut n = 2;
        while self.taken.contains(&candidate.to_lowercase()) {
            let suffix = format!(" ({n})");
            let keep = MAX_SHEET_NAME - suffix.chars().count();
            candidate = format!("{}{suffix}", trim_name_edges(truncate_chars(&base, keep)));
            n += 1;
        }
        self.taken.insert(candidate.to_lowercase());
        candidate
    }
}

/// Replaces characters spreadsheet formats forbid in sheet names and
/// applies the 31-character limit.
pub fn sanitize_sheet_name(name: &str) -> String {
    let replaced: String = name
        .trim()
        .chars()
        .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let truncated = trim_name_edges(truncate_chars(trim_name_edges(&replaced), MAX_SHEET_NAME));
    if truncated.is_empty() {
        "Study".to_string()
    } else {
        truncated.to_string()
    }
}

/// Sheet names may not start or end with an apostrophe.
fn trim_name_edges(name: &str) -> &str {
    name.trim_matches(|c: char| c == '\'' || c.is_whitespace())
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::melt::aggregate::calculate_equilibrium_melts;
    use crate::melt::classify::ClassifiedWorkbook;
    use crate::model::table::{CoefficientTable, StudyTable};
    use crate::model::types::{CoefficientKind, Element};

    fn el(s: &str) -> Element {
        s.parse().unwrap()
    }

    fn study(name: &str, samples: &[&str], rows: &[(&str, Vec<Option<f64>>)]) -> StudyTable {
        let mut m = ElementMatrix::new(samples.iter().map(|s| s.to_string()).collect());
        for (e, v) in rows {
            m.push_row(el(e), v.clone());
        }
        StudyTable::new(name, m)
    }

    fn results(studies: Vec<StudyTable>) -> MeltResults {
        let wb = ClassifiedWorkbook {
            studies,
            kd: Some(
                CoefficientTable::new(CoefficientKind::Kd, "Kd", "Kd Grassi", "Grassi et al. (2012)")
                    .with_entries([(el("La"), 0.0044), (el("Ce"), 0.0092), (el("Nd"), 0.035)]),
            ),
            normalizing: Some(
                CoefficientTable::new(
                    CoefficientKind::Normalizing,
                    "PM",
                    "PM McDonough",
                    "McDonough & Sun (1995)",
                )
                .with_entries([(el("La"), 0.648), (el("Ce"), 1.675), (el("Nd"), 1.25)]),
            ),
            ..ClassifiedWorkbook::default()
        };
        calculate_equilibrium_melts(&wb).unwrap()
    }

    fn text(cell: &Cell) -> &str {
        match cell {
            Cell::Text(s) => s,
            _ => "",
        }
    }

    #[test]
    fn study_sheet_has_melt_then_normalized_section() {
        let r = results(vec![study(
            "Present Study",
            &["S1", "S2"],
            &[("Ce", vec![Some(6.0), None]), ("La", vec![Some(2.12), Some(1.0)])],
        )]);
        let doc = assemble(&r, false);
        let names: Vec<_> = doc.sheet_names().collect();
        assert_eq!(names, ["Present Study", "Summary"]);

        let sheet = doc.sheet("Present Study").unwrap();
        assert_eq!(text(&sheet.rows[0][0]), MELT_TITLE);
        let header: Vec<_> = sheet.rows[1].iter().map(text).collect();
        assert_eq!(header, ["Element", "S1", "S2"]);
        assert_eq!(text(&sheet.rows[2][0]), "Ce");
        assert_eq!(sheet.rows[2][2], Cell::Empty);
        assert_eq!(text(&sheet.rows[3][0]), "La");
        assert!(sheet.rows[4].is_empty() && sheet.rows[5].is_empty());
        assert_eq!(
            text(&sheet.rows[6][0]),
            "Normalized values (McDonough & Sun (1995))"
        );
        assert_eq!(text(&sheet.rows[7][0]), "Element");
        assert!(matches!(sheet.rows[9][1], Cell::Number(n) if (n - 743.54).abs() < 0.01));
        assert_eq!(sheet.headings, [0, 1, 6, 7]);
    }

    #[test]
    fn summary_sheet_lists_totals_and_diagnostics() {
        let r = results(vec![
            study("A", &["S1"], &[("La", vec![Some(1.0)]), ("Pb", vec![Some(2.0)])]),
            study("B", &["S1", "S2"], &[("Nd", vec![Some(1.0), Some(1.0)])]),
        ]);
        let doc = assemble(&r, false);
        let summary = doc.sheet(SUMMARY_SHEET).unwrap();
        assert_eq!(summary.rows[1][1], Cell::Number(2.0));
        assert_eq!(summary.rows[2][1], Cell::Number(3.0));
        assert_eq!(summary.rows[3][1], Cell::Number(3.0));
        assert_eq!(text(&summary.rows[4][1]), "La, Pb, Nd");
        assert_eq!(text(&summary.rows[5][1]), "Grassi et al. (2012)");
        assert_eq!(text(&summary.rows[6][1]), "McDonough & Sun (1995)");

        let kinds: Vec<_> = summary.rows[9..].iter().map(|r| text(&r[0])).collect();
        assert_eq!(kinds, ["MissingCoefficient", "MissingCoefficient"]);
        assert_eq!(text(&summary.rows[9][1]), "A");
    }

    #[test]
    fn summary_without_diagnostics_says_none() {
        let r = results(vec![study("A", &["S1"], &[("La", vec![Some(1.0)])])]);
        let doc = assemble(&r, false);
        let summary = doc.sheet(SUMMARY_SHEET).unwrap();
        assert_eq!(text(&summary.rows.last().unwrap()[0]), "None");
    }

    #[test]
    fn detailed_sheet_skips_blank_concentrations() {
        let r = results(vec![
            study(
                "A",
                &["S1", "S2"],
                &[("Ce", vec![Some(1.0), None]), ("La", vec![Some(2.12), Some(1.0)])],
            ),
            study("B", &["X"], &[("W", vec![Some(3.0)])]),
        ]);
        let doc = assemble(&r, true);
        let detailed = doc.sheet(DETAILED_SHEET).unwrap();
        let keys: Vec<_> = detailed.rows[1..]
            .iter()
            .map(|r| (text(&r[0]), text(&r[1]), text(&r[2])))
            .collect();
        assert_eq!(
            keys,
            [
                ("A", "S1", "Ce"),
                ("A", "S1", "La"),
                ("A", "S2", "La"),
                ("B", "X", "W"),
            ]
        );
        let w = &detailed.rows[4];
        assert_eq!(w[3], Cell::Number(3.0));
        assert_eq!(w[4], Cell::Empty);
        assert_eq!(w[5], Cell::Empty);
        assert_eq!(w[7], Cell::Empty);
    }

    #[test]
    fn sheet_names_are_sanitized() {
        assert_eq!(sanitize_sheet_name("Smith [2019]: cpx/melt"), "Smith _2019__ cpx_melt");
        assert_eq!(
            sanitize_sheet_name("A very long study name that exceeds the limit"),
            "A very long study name that exc"
        );
        assert_eq!(sanitize_sheet_name("  "), "Study");
        assert_eq!(sanitize_sheet_name("' quoted '"), "quoted");
    }

    #[test]
    fn apostrophe_left_by_truncation_is_dropped() {
        let name = format!("{}'s cpx data", "a".repeat(30));
        assert_eq!(sanitize_sheet_name(&name), "a".repeat(30));

        let mut names = SheetNames::new();
        let base = format!("{}'bcd", "b".repeat(26));
        assert_eq!(names.claim(&base), base);
        assert_eq!(names.claim(&base), format!("{} (2)", "b".repeat(26)));
    }

    #[test]
    fn colliding_names_get_suffixes() {
        let mut names = SheetNames::new();
        assert_eq!(names.claim("summary"), "summary (2)");
        assert_eq!(names.claim("Data/1"), "Data_1");
        assert_eq!(names.claim("Data:1"), "Data_1 (2)");
        assert_eq!(names.claim("Data?1"), "Data_1 (3)");
        let long = "x".repeat(40);
        assert_eq!(names.claim(&long), "x".repeat(31));
        assert_eq!(names.claim(&long), format!("{} (2)", "x".repeat(27)));
    }
}
