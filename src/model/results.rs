use super::diagnostic::Diagnostic;
use super::registry::ElementRegistry;
use super::table::{CoefficientTable, ElementMatrix, StudyTable};
use super::types::Element;

/// Melt concentrations for one study, rows in registry order.
#[derive(Debug, Clone, PartialEq)]
pub struct MeltResult {
    pub values: ElementMatrix,
}

/// Normalized melt concentrations for one study.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResult {
    pub values: ElementMatrix,
    /// Label of the reference standard the values were divided by.
    pub standard: String,
}

/// Everything computed for one study.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyResult {
    pub input: StudyTable,
    pub melt: MeltResult,
    pub normalized: NormalizedResult,
    /// Elements whose cells are blank because a coefficient was unusable.
    pub skipped_elements: Vec<Element>,
}

impl StudyResult {
    #[inline]
    pub fn name(&self) -> &str {
        &self.input.name
    }

    #[inline]
    pub fn samples(&self) -> &[String] {
        self.input.samples()
    }

    /// Number of elements with at least one computed normalized value.
    pub fn computed_element_count(&self) -> usize {
        self.normalized
            .values
            .rows()
            .filter(|(_, row)| row.iter().any(Option::is_some))
            .count()
    }
}

/// Run-level totals reported in the summary sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryRecord {
    pub studies_processed: usize,
    /// Samples summed over studies; equal names in different studies count twice.
    pub total_samples: usize,
    pub elements: Vec<Element>,
    pub kd_label: String,
    pub normalizing_label: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Output of [`calculate_equilibrium_melts`](crate::calculate_equilibrium_melts).
#[derive(Debug, Clone, PartialEq)]
pub struct MeltResults {
    pub studies: Vec<StudyResult>,
    pub registry: ElementRegistry,
    pub kd: CoefficientTable,
    pub normalizing: CoefficientTable,
    pub(crate) summary: SummaryRecord,
}

impl MeltResults {
    pub fn summary(&self) -> &SummaryRecord {
        &self.summary
    }

    pub fn study(&self, name: &str) -> Option<&StudyResult> {
        self.studies.iter().find(|s| s.name() == name)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.summary.diagnostics
    }
}
