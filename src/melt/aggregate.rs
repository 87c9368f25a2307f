use super::classify::{ClassifiedWorkbook, record};
use super::equilibrium::compute_melt;
use super::error::Error;
use super::normalize::normalize;
use crate::model::diagnostic::Diagnostic;
use crate::model::registry::ElementRegistry;
use crate::model::results::{MeltResults, StudyResult, SummaryRecord};
use crate::model::table::{CoefficientTable, StudyTable};
use crate::model::types::{CoefficientKind, Element, SheetKind};
use tracing::{debug, info};

pub fn calculate_equilibrium_melts(workbook: &ClassifiedWorkbook) -> Result<MeltResults, Error> {
    if workbook.studies.is_empty() {
        return Err(Error::EmptyInput(SheetKind::StudyData));
    }
    let kd = workbook
        .kd
        .as_ref()
        .ok_or(Error::EmptyInput(SheetKind::KdTable))?;
    let normalizing = workbook
        .normalizing
        .as_ref()
        .ok_or(Error::EmptyInput(SheetKind::NormalizingTable))?;

    let registry = ElementRegistry::from_studies(&workbook.studies);
    let mut diagnostics = workbook.diagnostics.clone();

    let studies: Vec<StudyResult> = workbook
        .studies
        .iter()
        .map(|study| calculate_study(study, &registry, kd, normalizing, &mut diagnostics))
        .collect();

    let summary = SummaryRecord {
        studies_processed: studies.len(),
        total_samples: studies.iter().map(|s| s.samples().len()).sum(),
        elements: registry.elements().to_vec(),
        kd_label: kd.label.clone(),
        normalizing_label: normalizing.label.clone(),
        diagnostics,
    };

    info!(
        studies = summary.studies_processed,
        samples = summary.total_samples,
        elements = summary.elements.len(),
        diagnostics = summary.diagnostics.len(),
        "equilibrium melts calculated"
    );

    Ok(MeltResults {
        studies,
        registry,
        kd: kd.clone(),
        normalizing: normalizing.clone(),
        summary,
    })
}

fn calculate_study(
    study: &StudyTable,
    registry: &ElementRegistry,
    kd: &CoefficientTable,
    normalizing: &CoefficientTable,
    diagnostics: &mut Vec<Diagnostic>,
) -> StudyResult {
    let order = registry.ordered_for(study);
    let (melt, missing_kd) = compute_melt(study, &order, kd);
    let (normalized, missing_reference) = normalize(&melt, normalizing);

    for element in &missing_kd {
        missing_coefficient(diagnostics, study, element, CoefficientKind::Kd);
    }
    for element in &missing_reference {
        missing_coefficient(diagnostics, study, element, CoefficientKind::Normalizing);
    }

    let mut skipped_elements = missing_kd;
    for element in missing_reference {
        if !skipped_elements.contains(&element) {
            skipped_elements.push(element);
        }
    }
    skipped_elements.sort_by_key(|e| registry.position(e.symbol()));

    let result = StudyResult {
        input: study.clone(),
        melt,
        normalized,
        skipped_elements,
    };

    if result.computed_element_count() == 0 {
        record(
            diagnostics,
            Diagnostic::EmptyStudy {
                study: study.name.clone(),
            },
        );
    }

    debug!(
        study = %study.name,
        elements = order.len(),
        computed = result.computed_element_count(),
        samples = study.samples().len(),
        "study processed"
    );

    result
}

fn missing_coefficient(
    diagnostics: &mut Vec<Diagnostic>,
    study: &StudyTable,
    element: &Element,
    kind: CoefficientKind,
) {
    record(
        diagnostics,
        Diagnostic::MissingCoefficient {
            study: study.name.clone(),
            element: element.clone(),
            kind,
        },
    );
}
