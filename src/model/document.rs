use crate::io::sheet::Cell;

/// One worksheet of the output workbook, anchored at cell A1.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputSheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
    /// Rows rendered as headings (titles and column headers).
    pub headings: Vec<usize>,
}

impl OutputSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            headings: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn push_heading(&mut self, row: Vec<Cell>) {
        self.headings.push(self.rows.len());
        self.rows.push(row);
    }

    pub fn push_blank(&mut self) {
        self.rows.push(Vec::new());
    }

    #[inline]
    pub fn is_heading(&self, row: usize) -> bool {
        self.headings.contains(&row)
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// In-memory shape of the results workbook, ready to be written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputDocument {
    pub sheets: Vec<OutputSheet>,
}

impl OutputDocument {
    pub fn sheet(&self, name: &str) -> Option<&OutputSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }
}
