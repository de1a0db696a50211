//! Raw Table Module
//! Untyped, header-plus-rows view of a CSV before any cleaning.

/// Every cell is kept as text; `None` marks an empty/null cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build from string literals; empty strings become missing cells.
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        let mut table = Self::new(headers.iter().map(|h| h.to_string()).collect());
        for row in rows {
            table.push_row(row.iter().map(|c| Some(c.to_string())).collect());
        }
        table
    }

    /// Append a row, normalising blank cells to `None` and padding/truncating
    /// to the header width.
    pub fn push_row(&mut self, mut cells: Vec<Option<String>>) {
        cells.resize(self.headers.len(), None);
        let cells = cells
            .into_iter()
            .map(|cell| {
                cell.map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
            })
            .collect();
        self.rows.push(cells);
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(idx).and_then(|c| c.as_deref()))
    }
}
