use std::fmt;

use super::types::{CoefficientKind, Element, SheetKind};

/// A recovered, non-fatal problem found while loading or calculating.
///
/// Diagnostics never abort a run. Each one is listed in the summary so
/// that every skipped sheet and every blank output cell has a visible
/// explanation.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A worksheet matched none of the recognized shapes and was skipped.
    UnclassifiableSheet { sheet: String, reason: String },

    /// A recognized worksheet could not be parsed and was skipped.
    MalformedTable { sheet: String, detail: String },

    /// A second Kd or normalizing sheet was found and ignored.
    DuplicateTable {
        sheet: String,
        kind: SheetKind,
        kept: String,
    },

    /// A numeric cell held text that is not a number or a missing marker.
    NonNumericCell {
        sheet: String,
        cell: String,
        value: String,
    },

    /// An element of a study has no usable Kd or normalizing value.
    MissingCoefficient {
        study: String,
        element: Element,
        kind: CoefficientKind,
    },

    /// A study produced no computable element at all.
    EmptyStudy { study: String },
}

impl Diagnostic {
    /// Short stable name of the diagnostic kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::UnclassifiableSheet { .. } => "UnclassifiableSheet",
            Diagnostic::MalformedTable { .. } => "MalformedTable",
            Diagnostic::DuplicateTable { .. } => "DuplicateTable",
            Diagnostic::NonNumericCell { .. } => "NonNumericCell",
            Diagnostic::MissingCoefficient { .. } => "MissingCoefficient",
            Diagnostic::EmptyStudy { .. } => "EmptyStudy",
        }
    }

    /// Sheet or study the diagnostic refers to.
    pub fn subject(&self) -> &str {
        match self {
            Diagnostic::UnclassifiableSheet { sheet, .. }
            | Diagnostic::MalformedTable { sheet, .. }
            | Diagnostic::DuplicateTable { sheet, .. }
            | Diagnostic::NonNumericCell { sheet, .. } => sheet,
            Diagnostic::MissingCoefficient { study, .. } | Diagnostic::EmptyStudy { study } => {
                study
            }
        }
    }

    /// `true` for diagnostics that caused a whole sheet to be skipped.
    pub fn skips_sheet(&self) -> bool {
        matches!(
            self,
            Diagnostic::UnclassifiableSheet { .. }
                | Diagnostic::MalformedTable { .. }
                | Diagnostic::DuplicateTable { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnclassifiableSheet { sheet, reason } => {
                write!(f, "sheet '{sheet}' skipped: {reason}")
            }
            Diagnostic::MalformedTable { sheet, detail } => {
                write!(f, "sheet '{sheet}' skipped, malformed table: {detail}")
            }
            Diagnostic::DuplicateTable { sheet, kind, kept } => {
                write!(f, "sheet '{sheet}' ignored: {kind} already read from '{kept}'")
            }
            Diagnostic::NonNumericCell { sheet, cell, value } => {
                write!(f, "sheet '{sheet}' cell {cell}: '{value}' is not a number, left blank")
            }
            Diagnostic::MissingCoefficient {
                study,
                element,
                kind,
            } => write!(
                f,
                "study '{study}': no usable {kind} for {element}, cells left blank"
            ),
            Diagnostic::EmptyStudy { study } => {
                write!(f, "study '{study}': no element could be computed")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_coefficient_names_element_and_study() {
        let d = Diagnostic::MissingCoefficient {
            study: "Present Study".into(),
            element: "Pb".parse().unwrap(),
            kind: CoefficientKind::Kd,
        };
        assert_eq!(
            d.to_string(),
            "study 'Present Study': no usable Kd for Pb, cells left blank"
        );
        assert_eq!(d.kind(), "MissingCoefficient");
        assert_eq!(d.subject(), "Present Study");
        assert!(!d.skips_sheet());
    }

    #[test]
    fn sheet_level_diagnostics_skip_sheet() {
        let d = Diagnostic::UnclassifiableSheet {
            sheet: "Notes".into(),
            reason: "no numeric data".into(),
        };
        assert!(d.skips_sheet());
        assert_eq!(d.subject(), "Notes");
    }
}
