mod aggregate;
mod assemble;
mod classify;
mod config;
mod equilibrium;
mod error;
mod extract;
mod normalize;
mod rules;

pub use aggregate::calculate_equilibrium_melts;
pub use assemble::{DETAILED_SHEET, SUMMARY_SHEET, assemble, sanitize_sheet_name};
pub use classify::{
    ClassifiedSheet, ClassifiedWorkbook, SheetRole, SheetShape, classify, classify_workbook,
};
pub use config::CalcConfig;
pub use equilibrium::{compute_melt, melt_concentration};
pub use error::Error;
pub use normalize::{normalize, normalized_value};
pub use rules::{
    CellRules, ClassifierRules, ElementRules, KeywordSet, KnownSource, get_default_rules,
    load_rules,
};
