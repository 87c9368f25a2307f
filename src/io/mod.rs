//! Workbook input and output.
//!
//! Reading goes through `calamine`, so every format it understands can be
//! used as input. Results are always written as `.xlsx` with
//! `rust_xlsxwriter`.

use std::fmt;
use std::path::Path;

pub mod error;
pub mod sheet;
pub mod util;

mod workbook;

pub use error::Error;
pub use sheet::{Cell, RawSheet, RawWorkbook};
pub use workbook::reader::read_workbook;
pub use workbook::writer::write_document;

use crate::melt::{CalcConfig, ClassifiedWorkbook, ClassifierRules, classify_workbook};
use crate::melt::{assemble, get_default_rules};
use crate::model::results::MeltResults;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Xlsx,
    Xlsm,
    Xlsb,
    Xls,
    Ods,
}

impl Format {
    /// Format implied by the extension of `path`, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Some(Format::Xlsx),
            "xlsm" => Some(Format::Xlsm),
            "xlsb" => Some(Format::Xlsb),
            "xls" => Some(Format::Xls),
            "ods" => Some(Format::Ods),
            _ => None,
        }
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        matches!(self, Format::Xlsx)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Xlsx => write!(f, "XLSX"),
            Format::Xlsm => write!(f, "XLSM"),
            Format::Xlsb => write!(f, "XLSB"),
            Format::Xls => write!(f, "XLS"),
            Format::Ods => write!(f, "ODS"),
        }
    }
}

/// Reads and classifies a workbook with the embedded classifier rules.
pub fn load(path: impl AsRef<Path>) -> Result<ClassifiedWorkbook, Error> {
    load_with_rules(path, get_default_rules())
}

pub fn load_with_rules(
    path: impl AsRef<Path>,
    rules: &ClassifierRules,
) -> Result<ClassifiedWorkbook, Error> {
    let raw = read_workbook(path.as_ref())?;
    Ok(classify_workbook(&raw, rules))
}

/// Writes per-study, summary and (optionally) detailed sheets to `path`.
pub fn export_results(results: &MeltResults, path: impl AsRef<Path>) -> Result<(), Error> {
    export_results_with(results, path, &CalcConfig::default())
}

pub fn export_results_with(
    results: &MeltResults,
    path: impl AsRef<Path>,
    config: &CalcConfig,
) -> Result<(), Error> {
    let document = assemble(results, config.detailed);
    write_document(&document, path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::melt::calculate_equilibrium_melts;
    use crate::model::diagnostic::Diagnostic;
    use crate::model::document::{OutputDocument, OutputSheet};
    use approx::assert_relative_eq;

    fn sheet(name: &str, rows: &[&[&str]]) -> OutputSheet {
        let mut sheet = OutputSheet::new(name);
        for row in rows {
            sheet.push_row(
                row.iter()
                    .map(|s| match s.parse::<f64>() {
                        Ok(n) => Cell::Number(n),
                        Err(_) => Cell::from(*s),
                    })
                    .collect(),
            );
        }
        sheet
    }

    fn input_document() -> OutputDocument {
        OutputDocument {
            sheets: vec![
                sheet(
                    "Present Study",
                    &[
                        &["Element", "S1", "S2"],
                        &["La", "2.12", "1.0"],
                        &["Ce", "6.0", ""],
                        &["Pb", "3.0", "4.0"],
                    ],
                ),
                sheet(
                    "Literature",
                    &[&["Element", "A", "B"], &["La", "1.5", "1.2"], &["Nd", "4.0", "3.0"]],
                ),
                sheet(
                    "Sheet3",
                    &[
                        &["Element", "Kd (Grassi et al. 2012)"],
                        &["La", "0.0044"],
                        &["Ce", "0.0092"],
                        &["Nd", "0.035"],
                    ],
                ),
                sheet(
                    "Sheet4",
                    &[
                        &["Element", "PM McDonough & Sun"],
                        &["La", "0.648"],
                        &["Ce", "1.675"],
                        &["Nd", "1.25"],
                        &["Pb", "0.15"],
                    ],
                ),
                sheet("Notes", &[&["Compiled from three papers."]]),
            ],
        }
    }

    #[test]
    fn workbook_pipeline_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.xlsx");
        let output = dir.path().join("results.xlsx");
        write_document(&input_document(), &input).unwrap();

        let workbook = load(&input).unwrap();
        assert_eq!(workbook.studies.len(), 2);
        assert_eq!(workbook.kd.as_ref().unwrap().label, "Grassi et al. (2012)");

        let results = calculate_equilibrium_melts(&workbook).unwrap();
        let summary = results.summary();
        let order: Vec<_> = summary.elements.iter().map(|e| e.symbol()).collect();
        assert_eq!(order, ["La", "Ce", "Pb", "Nd"]);
        assert_eq!(summary.total_samples, 4);
        assert_eq!(summary.normalizing_label, "McDonough & Sun (1995)");
        let kinds: Vec<_> = summary.diagnostics.iter().map(Diagnostic::kind).collect();
        assert_eq!(kinds, ["UnclassifiableSheet", "MissingCoefficient"]);

        export_results(&results, &output).unwrap();
        let written = read_workbook(&output).unwrap();
        let names: Vec<_> = written.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Present Study", "Literature", "Summary"]);

        let study = written.sheet("Present Study").unwrap();
        assert_eq!(study.cell(2, 0), &Cell::text("La"));
        assert_eq!(study.cell(3, 2), &Cell::Empty);
        assert_eq!(study.cell(4, 0), &Cell::text("Pb"));
        assert_eq!(study.cell(4, 1), &Cell::Empty);
        match study.cell(9, 1) {
            Cell::Number(n) => assert_relative_eq!(*n, 2.12 / 0.0044 / 0.648, max_relative = 1e-9),
            other => panic!("expected a number, got {other:?}"),
        }
    }

    #[test]
    fn detailed_export_adds_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.xlsx");
        let output = dir.path().join("results.xlsx");
        write_document(&input_document(), &input).unwrap();

        let results = calculate_equilibrium_melts(&load(&input).unwrap()).unwrap();
        let config = CalcConfig {
            detailed: true,
            ..CalcConfig::default()
        };
        export_results_with(&results, &output, &config).unwrap();

        let written = read_workbook(&output).unwrap();
        assert!(written.sheet(crate::melt::DETAILED_SHEET).is_some());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("in.XLSX")), Some(Format::Xlsx));
        assert_eq!(Format::from_path(Path::new("a/b.ods")), Some(Format::Ods));
        assert_eq!(Format::from_path(Path::new("data.csv")), None);
        assert_eq!(Format::from_path(Path::new("noext")), None);
        assert!(Format::Xlsx.is_writable());
        assert!(!Format::Xls.is_writable());
    }
}
