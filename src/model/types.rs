use serde::Deserialize;
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Longest token accepted as an element identifier unless the classifier
/// rules say otherwise.
pub const DEFAULT_MAX_SYMBOL_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid element identifier: '{0}'")]
pub struct ParseElementError(String);

/// An element identifier as written in the input workbook.
///
/// Identifiers are compared case-sensitively and carry no numeric state.
/// Any token made of ASCII letters and digits that starts with a letter is
/// accepted, so oxide labels and isotope-free symbols (`La`, `TiO2`) both
/// work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(String);

impl Element {
    pub fn parse_with_limit(token: &str, max_len: usize) -> Result<Self, ParseElementError> {
        let trimmed = token.trim();
        if is_element_like(trimmed, max_len) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ParseElementError(token.to_string()))
        }
    }

    pub fn symbol(&self) -> &str {
        &self.0
    }
}

/// Returns `true` if `token` looks like an element identifier.
pub fn is_element_like(token: &str, max_len: usize) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    token.len() <= max_len && chars.all(|c| c.is_ascii_alphanumeric())
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_limit(s, DEFAULT_MAX_SYMBOL_LEN)
    }
}

impl AsRef<str> for Element {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Element {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Role of a worksheet once it has been recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetKind {
    StudyData,
    KdTable,
    NormalizingTable,
}

impl fmt::Display for SheetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetKind::StudyData => write!(f, "study data"),
            SheetKind::KdTable => write!(f, "Kd table"),
            SheetKind::NormalizingTable => write!(f, "normalizing table"),
        }
    }
}

/// Which per-element reference column a coefficient comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoefficientKind {
    /// Cpx/melt partition coefficient.
    Kd,
    /// Reference-standard concentration used for normalization.
    Normalizing,
}

impl CoefficientKind {
    pub fn sheet_kind(&self) -> SheetKind {
        match self {
            CoefficientKind::Kd => SheetKind::KdTable,
            CoefficientKind::Normalizing => SheetKind::NormalizingTable,
        }
    }
}

impl fmt::Display for CoefficientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoefficientKind::Kd => write!(f, "Kd"),
            CoefficientKind::Normalizing => write!(f, "normalizing value"),
        }
    }
}
