use super::types::{CoefficientKind, Element};

/// Ordered element × sample grid of optional values.
///
/// Rows keep their insertion order and columns keep the sample order they
/// were created with. A `None` cell is a blank, never a zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementMatrix {
    samples: Vec<String>,
    elements: Vec<Element>,
    values: Vec<Vec<Option<f64>>>,
}

impl ElementMatrix {
    pub fn new(samples: Vec<String>) -> Self {
        Self {
            samples,
            elements: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Appends a row, padding or truncating `values` to the sample count.
    pub fn push_row(&mut self, element: Element, mut values: Vec<Option<f64>>) {
        values.resize(self.samples.len(), None);
        self.elements.push(element);
        self.values.push(values);
    }

    pub fn push_blank_row(&mut self, element: Element) {
        self.push_row(element, Vec::new());
    }

    #[inline]
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    #[inline]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[inline]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn contains_element(&self, element: &str) -> bool {
        self.element_index(element).is_some()
    }

    pub fn row(&self, element: &str) -> Option<&[Option<f64>]> {
        self.element_index(element).map(|i| self.values[i].as_slice())
    }

    pub fn value(&self, element: &str, sample: &str) -> Option<f64> {
        let row = self.element_index(element)?;
        let col = self.samples.iter().position(|s| s == sample)?;
        self.values[row][col]
    }

    pub fn rows(&self) -> impl Iterator<Item = (&Element, &[Option<f64>])> {
        self.elements
            .iter()
            .zip(self.values.iter().map(|row| row.as_slice()))
    }

    /// Number of blank cells in the grid.
    pub fn blank_count(&self) -> usize {
        self.values.iter().flatten().filter(|v| v.is_none()).count()
    }

    fn element_index(&self, element: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.symbol() == element)
    }
}

/// One study worksheet: cpx concentrations per element and sample.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyTable {
    pub name: String,
    pub concentrations: ElementMatrix,
}

impl StudyTable {
    pub fn new(name: impl Into<String>, concentrations: ElementMatrix) -> Self {
        Self {
            name: name.into(),
            concentrations,
        }
    }

    #[inline]
    pub fn elements(&self) -> &[Element] {
        self.concentrations.elements()
    }

    #[inline]
    pub fn samples(&self) -> &[String] {
        self.concentrations.samples()
    }
}

/// A single-column per-element reference table (Kd or normalizing values).
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientTable {
    pub kind: CoefficientKind,
    /// Worksheet the table was read from.
    pub sheet: String,
    /// Data column header, verbatim.
    pub header: String,
    /// Source label reported in the summary.
    pub label: String,
    entries: Vec<(Element, f64)>,
}

impl CoefficientTable {
    pub fn new(
        kind: CoefficientKind,
        sheet: impl Into<String>,
        header: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            sheet: sheet.into(),
            header: header.into(),
            label: label.into(),
            entries: Vec::new(),
        }
    }

    pub fn with_entries(mut self, entries: impl IntoIterator<Item = (Element, f64)>) -> Self {
        self.entries.extend(entries);
        self
    }

    pub fn insert(&mut self, element: Element, value: f64) {
        self.entries.push((element, value));
    }

    /// Raw value stored for `element`, usable or not.
    pub fn get(&self, element: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(e, _)| e.symbol() == element)
            .map(|(_, v)| *v)
    }

    /// Value for `element` if it is finite and strictly positive.
    pub fn coefficient(&self, element: &str) -> Option<f64> {
        self.get(element).filter(|v| v.is_finite() && *v > 0.0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
