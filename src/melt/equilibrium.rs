use crate::model::results::MeltResult;
use crate::model::table::{CoefficientTable, ElementMatrix, StudyTable};
use crate::model::types::Element;

/// `concentration / kd`, or `None` when either side is unusable.
#[inline]
pub fn melt_concentration(concentration: Option<f64>, kd: Option<f64>) -> Option<f64> {
    let kd = kd.filter(|k| k.is_finite() && *k > 0.0)?;
    concentration.map(|c| c / kd)
}

/// Divides every concentration of `study` by its element's Kd.
///
/// Rows follow `order`. Elements without a usable Kd get a blank row and
/// are returned in the second tuple field.
pub fn compute_melt(
    study: &StudyTable,
    order: &[&Element],
    kd: &CoefficientTable,
) -> (MeltResult, Vec<Element>) {
    let mut values = ElementMatrix::new(study.samples().to_vec());
    let mut missing = Vec::new();

    for &element in order {
        let Some(row) = study.concentrations.row(element.symbol()) else {
            continue;
        };
        match kd.coefficient(element.symbol()) {
            Some(k) => {
                let melt = row.iter().map(|&c| melt_concentration(c, Some(k))).collect();
                values.push_row(element.clone(), melt);
            }
            None => {
                values.push_blank_row(element.clone());
                missing.push(element.clone());
            }
        }
    }

    (MeltResult { values }, missing)
}
