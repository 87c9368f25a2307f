//! Error types for the melt calculation.
//!
//! Only conditions that stop a run are errors. Problems scoped to one
//! sheet, study or element are recovered and recorded as
//! [`Diagnostic`](crate::Diagnostic) values instead.

use crate::model::types::SheetKind;
use thiserror::Error;

/// Errors that abort a melt calculation.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to parse classifier rules TOML.
    #[error("failed to parse classifier rules: {0}")]
    RuleParse(#[from] toml::de::Error),

    /// Classifier rules parsed but are unusable.
    #[error("invalid classifier rules: {0}")]
    InvalidRules(String),

    /// The workbook holds no usable sheet of a required kind.
    ///
    /// A run needs at least one study sheet, one Kd table and one
    /// normalizing table.
    #[error("no usable {0} sheet found in the input workbook")]
    EmptyInput(SheetKind),
}
