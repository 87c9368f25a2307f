//! Equilibrium melt compositions and primitive-mantle normalization from
//! clinopyroxene (cpx) trace-element data.
//!
//! A single workbook holds any number of study sheets (cpx concentrations,
//! one column per sample), one partition-coefficient (Kd) sheet and one
//! normalizing sheet. Sheets are recognized from their structure and
//! headers, never from their names.
//!
//! # Features
//!
//! - **Sheet classification** — Study, Kd and normalizing tables detected
//!   from header keywords and column layout; anything else is skipped with
//!   a diagnostic
//! - **Element registry** — One element order shared by every output table,
//!   in first-seen order across studies
//! - **Equilibrium melts** — `melt = cpx / Kd` for every element and sample
//! - **Normalization** — `normalized = melt / reference` against the
//!   normalizing standard
//! - **Workbook output** — Per-study melt and normalized tables, a summary
//!   sheet and an optional long-format detail sheet
//!
//! # Quick Start
//!
//! ```
//! use cpx_melt::{ClassifiedWorkbook, CoefficientKind, CoefficientTable, Element};
//! use cpx_melt::{ElementMatrix, StudyTable, calculate_equilibrium_melts};
//!
//! let la: Element = "La".parse()?;
//!
//! let mut concentrations = ElementMatrix::new(vec!["S1".to_string()]);
//! concentrations.push_row(la.clone(), vec![Some(2.12)]);
//!
//! let workbook = ClassifiedWorkbook {
//!     studies: vec![StudyTable::new("Present Study", concentrations)],
//!     kd: Some(
//!         CoefficientTable::new(CoefficientKind::Kd, "Kd", "Kd", "Grassi et al. (2012)")
//!             .with_entries([(la.clone(), 0.0044)]),
//!     ),
//!     normalizing: Some(
//!         CoefficientTable::new(
//!             CoefficientKind::Normalizing,
//!             "PM",
//!             "PM",
//!             "McDonough & Sun (1995)",
//!         )
//!         .with_entries([(la, 0.648)]),
//!     ),
//!     ..ClassifiedWorkbook::default()
//! };
//!
//! let results = calculate_equilibrium_melts(&workbook)?;
//! let study = results.study("Present Study").unwrap();
//!
//! let melt = study.melt.values.value("La", "S1").unwrap();
//! assert!((melt - 481.818).abs() < 1e-3);
//!
//! let normalized = study.normalized.values.value("La", "S1").unwrap();
//! assert!((normalized - 743.54).abs() < 1e-2);
//!
//! assert_eq!(results.summary().studies_processed, 1);
//! assert_eq!(results.summary().normalizing_label, "McDonough & Sun (1995)");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Reading and writing workbooks goes through [`load`] and
//! [`export_results`].
//!
//! # Module Organization
//!
//! - [`io`] — Workbook reading (`calamine`) and writing (`rust_xlsxwriter`)
//! - [`calculate_equilibrium_melts`] — Per-study melt and normalized values
//!   plus the run summary
//! - [`ClassifierRules`] — Header keywords, element token limits and
//!   missing-value markers
//!
//! # Data Types
//!
//! - [`ClassifiedWorkbook`] — Typed tables and diagnostics from one workbook
//! - [`StudyTable`] — Cpx concentrations of one study
//! - [`CoefficientTable`] — Kd or normalizing values with their source label
//! - [`ElementRegistry`] — First-seen element order across studies
//! - [`MeltResults`] — Per-study [`StudyResult`]s and the [`SummaryRecord`]
//! - [`Diagnostic`] — A recovered problem, listed in the summary
//! - [`OutputDocument`] — Sheet/row/cell layout of the results workbook

mod melt;
mod model;

pub mod io;

pub use model::diagnostic::Diagnostic;
pub use model::document::{OutputDocument, OutputSheet};
pub use model::registry::ElementRegistry;
pub use model::results::{MeltResult, MeltResults, NormalizedResult, StudyResult, SummaryRecord};
pub use model::table::{CoefficientTable, ElementMatrix, StudyTable};
pub use model::types::{CoefficientKind, Element, ParseElementError, SheetKind};

pub use melt::{
    CalcConfig, CellRules, ClassifiedSheet, ClassifiedWorkbook, ClassifierRules, DETAILED_SHEET,
    ElementRules, KeywordSet, KnownSource, SUMMARY_SHEET, SheetRole, SheetShape, assemble,
    calculate_equilibrium_melts, classify, classify_workbook, compute_melt, get_default_rules,
    load_rules, melt_concentration, normalize, normalized_value, sanitize_sheet_name,
};

pub use melt::Error as MeltError;

pub use io::{export_results, export_results_with, load, load_with_rules};
