use crate::model::results::{MeltResult, NormalizedResult};
use crate::model::table::{CoefficientTable, ElementMatrix};
use crate::model::types::Element;

/// `melt / reference`, or `None` when either side is unusable.
#[inline]
pub fn normalized_value(melt: Option<f64>, reference: Option<f64>) -> Option<f64> {
    let reference = reference.filter(|r| r.is_finite() && *r > 0.0)?;
    melt.map(|m| m / reference)
}

/// Divides every melt value by the element's reference concentration.
///
/// Row and column order are those of `melt`. Elements without a usable
/// reference get a blank row and are returned in the second tuple field.
pub fn normalize(melt: &MeltResult, reference: &CoefficientTable) -> (NormalizedResult, Vec<Element>) {
    let mut values = ElementMatrix::new(melt.values.samples().to_vec());
    let mut missing = Vec::new();

    for (element, row) in melt.values.rows() {
        match reference.coefficient(element.symbol()) {
            Some(r) => {
                let normalized = row.iter().map(|&m| normalized_value(m, Some(r))).collect();
                values.push_row(element.clone(), normalized);
            }
            None => {
                values.push_blank_row(element.clone());
                missing.push(element.clone());
            }
        }
    }

    (
        NormalizedResult {
            values,
            standard: reference.label.clone(),
        },
        missing,
    )
}
