use std::collections::HashMap;

use super::table::StudyTable;
use super::types::Element;

/// Union of element identifiers in first-seen order.
///
/// The registry is append-only: registering an element that is already
/// known leaves its position unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementRegistry {
    order: Vec<Element>,
    index: HashMap<Element, usize>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry from every study, in workbook order.
    pub fn from_studies<'a>(studies: impl IntoIterator<Item = &'a StudyTable>) -> Self {
        let mut registry = Self::new();
        for study in studies {
            registry.extend(study.elements());
        }
        registry
    }

    /// Adds `element` if unseen. Returns `true` when it was new.
    pub fn register(&mut self, element: &Element) -> bool {
        if self.index.contains_key(element) {
            return false;
        }
        self.index.insert(element.clone(), self.order.len());
        self.order.push(element.clone());
        true
    }

    pub fn extend<'a>(&mut self, elements: impl IntoIterator<Item = &'a Element>) {
        for element in elements {
            self.register(element);
        }
    }

    pub fn position(&self, element: &str) -> Option<usize> {
        self.index.get(element).copied()
    }

    pub fn contains(&self, element: &str) -> bool {
        self.index.contains_key(element)
    }

    #[inline]
    pub fn elements(&self) -> &[Element] {
        &self.order
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Registry-ordered subset of the elements that `study` contains.
    pub fn ordered_for<'a>(&'a self, study: &StudyTable) -> Vec<&'a Element> {
        self.order
            .iter()
            .filter(|e| study.concentrations.contains_element(e.symbol()))
            .collect()
    }
}
