use super::error::Error;
use crate::model::types::{CoefficientKind, DEFAULT_MAX_SYMBOL_LEN, Element, ParseElementError};
use serde::Deserialize;
use std::sync::OnceLock;

const DEFAULT_RULES_TOML: &str = include_str!("../../resources/default.rules.toml");

static DEFAULT_RULES: OnceLock<ClassifierRules> = OnceLock::new();

/// Keyword and token rules used to classify worksheets.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierRules {
    #[serde(default = "default_kd_keywords")]
    pub kd: KeywordSet,
    #[serde(default = "default_normalizing_keywords")]
    pub normalizing: KeywordSet,
    #[serde(default)]
    pub element: ElementRules,
    #[serde(default)]
    pub cells: CellRules,
    #[serde(default)]
    pub sources: Vec<KnownSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeywordSet {
    pub keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new<S: Into<String>>(keywords: impl IntoIterator<Item = S>) -> Self {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    /// `true` if any keyword matches a word of `header`.
    pub fn matches(&self, header: &str) -> bool {
        let words = header_words(header);
        self.keywords
            .iter()
            .map(|k| k.to_lowercase())
            .any(|k| words.iter().any(|w| keyword_matches_word(&k, w)))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementRules {
    #[serde(default = "default_max_len")]
    pub max_len: usize,
}

impl ElementRules {
    pub fn parse(&self, token: &str) -> Result<Element, ParseElementError> {
        Element::parse_with_limit(token, self.max_len)
    }

    pub fn is_element_like(&self, token: &str) -> bool {
        crate::model::types::is_element_like(token.trim(), self.max_len)
    }
}

impl Default for ElementRules {
    fn default() -> Self {
        Self {
            max_len: default_max_len(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CellRules {
    /// Text values read as a blank cell without a diagnostic.
    #[serde(default = "default_missing_markers")]
    pub missing_markers: Vec<String>,
}

impl Default for CellRules {
    fn default() -> Self {
        Self {
            missing_markers: default_missing_markers(),
        }
    }
}

impl CellRules {
    pub fn is_missing_marker(&self, text: &str) -> bool {
        let t = text.trim();
        self.missing_markers
            .iter()
            .any(|m| m.eq_ignore_ascii_case(t))
    }
}

/// Maps a header alias to a canonical citation for the summary.
///
/// A source with a `kind` also identifies the column it heads, so a header
/// holding only the citation is classified like a keyword match.
#[derive(Debug, Clone, Deserialize)]
pub struct KnownSource {
    pub alias: String,
    pub citation: String,
    #[serde(default)]
    pub kind: Option<CoefficientKind>,
}

impl KnownSource {
    fn matches_words(&self, words: &[String]) -> bool {
        let alias = self.alias.to_lowercase();
        words.iter().any(|w| keyword_matches_word(&alias, w))
    }
}

fn default_kd_keywords() -> KeywordSet {
    KeywordSet::new(["kd", "partition", "coefficient"])
}

fn default_normalizing_keywords() -> KeywordSet {
    KeywordSet::new([
        "normalizing",
        "normalising",
        "normalization",
        "normalisation",
        "primitive",
        "mantle",
        "chondrite",
        "pm",
    ])
}

fn default_missing_markers() -> Vec<String> {
    ["-", "--", "n.d.", "nd", "b.d.l.", "bdl", "<ld", "n/a", "na"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_max_len() -> usize {
    DEFAULT_MAX_SYMBOL_LEN
}

impl ClassifierRules {
    /// Parses rules from TOML, falling back to field defaults.
    pub fn from_toml(toml: &str) -> Result<Self, Error> {
        let rules: ClassifierRules = toml::from_str(toml)?;
        rules.validate()?;
        Ok(rules)
    }

    /// `true` if `header` names a `kind` column, by keyword or by a
    /// known source of that kind.
    pub fn matches_kind(&self, header: &str, kind: CoefficientKind) -> bool {
        let keywords = match kind {
            CoefficientKind::Kd => &self.kd,
            CoefficientKind::Normalizing => &self.normalizing,
        };
        if keywords.matches(header) {
            return true;
        }
        let words = header_words(header);
        self.sources
            .iter()
            .filter(|s| s.kind == Some(kind))
            .any(|s| s.matches_words(&words))
    }

    /// Label reported for a reference column with the given header.
    pub fn source_label(&self, header: &str) -> String {
        let words = header_words(header);
        self.sources
            .iter()
            .find(|s| s.matches_words(&words))
            .map(|s| s.citation.clone())
            .unwrap_or_else(|| header.trim().to_string())
    }

    fn validate(&self) -> Result<(), Error> {
        if self.kd.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(Error::InvalidRules("[kd] needs at least one keyword".into()));
        }
        if self.normalizing.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(Error::InvalidRules(
                "[normalizing] needs at least one keyword".into(),
            ));
        }
        if self.element.max_len == 0 {
            return Err(Error::InvalidRules(
                "[element] max_len must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ClassifierRules {
    fn default() -> Self {
        get_default_rules().clone()
    }
}

pub fn load_rules(custom_toml: Option<&str>) -> Result<ClassifierRules, Error> {
    match custom_toml {
        Some(toml) => ClassifierRules::from_toml(toml),
        None => Ok(get_default_rules().clone()),
    }
}

pub fn get_default_rules() -> &'static ClassifierRules {
    DEFAULT_RULES.get_or_init(|| {
        toml::from_str(DEFAULT_RULES_TOML)
            .expect("Failed to parse embedded classifier rules. This is a library bug.")
    })
}

fn header_words(header: &str) -> Vec<String> {
    header
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn keyword_matches_word(keyword: &str, word: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    if keyword.chars().count() <= 3 {
        word == keyword
    } else {
        word.starts_with(keyword)
    }
}
