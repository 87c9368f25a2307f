//! Core data structures flowing through the melt calculation.
//!
//! - [`types`] – Element identifiers and sheet/coefficient kinds.
//! - [`table`] – Ordered element × sample grids and single-column reference tables.
//! - [`registry`] – First-seen element ordering shared by every output table.
//! - [`diagnostic`] – Recovered problems reported in the run summary.
//! - [`results`] – Per-study melt and normalized results plus the summary record.
//! - [`document`] – Sheet/row/cell layout handed to the workbook writer.
//!
//! Input tables ([`StudyTable`], [`CoefficientTable`]) are immutable once
//! parsed; [`MeltResults`] is derived from them by
//! [`crate::calculate_equilibrium_melts`] without touching them.
//!
//! [`StudyTable`]: table::StudyTable
//! [`CoefficientTable`]: table::CoefficientTable
//! [`MeltResults`]: results::MeltResults

pub mod diagnostic;
pub mod document;
pub mod registry;
pub mod results;
pub mod table;
pub mod types;
