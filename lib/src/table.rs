//! The table surface the core reads rows from and writes rows to.
//!
//! `TableStore` stands in for whatever grid owns the cells (an editor widget, a file on
//! disk, a test fixture). The core only ever replaces the whole table or sets single
//! cells; it never edits incrementally otherwise.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// One table row: six fixed cells followed by one cell per custom predicate.
pub type Row = Vec<String>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnDef {
    Text,
    Dropdown { source: Vec<String>, strict: bool },
}

pub trait TableStore {
    fn all_rows(&self) -> Vec<Row>;

    fn column_headers(&self) -> Vec<String>;

    fn column_defs(&self) -> Vec<ColumnDef>;

    /// Replaces rows, headers and column definitions in one step.
    fn replace_all(&mut self, rows: Vec<Row>, headers: Vec<String>, columns: Vec<ColumnDef>);

    fn set_cell(&mut self, row: usize, col: usize, value: &str) -> Result<()>;

    fn cell(&self, row: usize, col: usize) -> Option<String>;

    fn count_rows(&self) -> usize;
}

/// Pads `row` with empty cells or truncates it so it has exactly `width` cells.
pub fn normalize_row(mut row: Row, width: usize) -> Row {
    row.resize(width, String::new());
    row
}

/// A blank row of the given width.
pub fn empty_row(width: usize) -> Row {
    vec![String::new(); width]
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTable {
    rows: Vec<Row>,
    headers: Vec<String>,
    columns: Vec<ColumnDef>,
}

impl MemoryTable {
    pub fn new(rows: Vec<Row>, headers: Vec<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            rows,
            headers,
            columns,
        }
    }
}

impl TableStore for MemoryTable {
    fn all_rows(&self) -> Vec<Row> {
        self.rows.clone()
    }

    fn column_headers(&self) -> Vec<String> {
        self.headers.clone()
    }

    fn column_defs(&self) -> Vec<ColumnDef> {
        self.columns.clone()
    }

    fn replace_all(&mut self, rows: Vec<Row>, headers: Vec<String>, columns: Vec<ColumnDef>) {
        self.rows = rows;
        self.headers = headers;
        self.columns = columns;
    }

    fn set_cell(&mut self, row: usize, col: usize, value: &str) -> Result<()> {
        let width = self.headers.len();
        let cells = self
            .rows
            .get_mut(row)
            .ok_or_else(|| anyhow!("Row {} is out of range", row))?;
        if col >= width.max(cells.len()) {
            return Err(anyhow!("Column {} is out of range", col));
        }
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        cells[col] = value.to_string();
        Ok(())
    }

    fn cell(&self, row: usize, col: usize) -> Option<String> {
        self.rows.get(row).and_then(|r| r.get(col)).cloned()
    }

    fn count_rows(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        vec!["iri".to_string(), "label".to_string()]
    }

    #[test]
    fn test_normalize_row() {
        let row = vec!["a".to_string()];
        assert_eq!(normalize_row(row, 3), vec!["a", "", ""]);
        let row = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(normalize_row(row, 2), vec!["a", "b"]);
    }

    #[test]
    fn test_set_cell() {
        let mut table = MemoryTable::new(
            vec![vec!["ex:A".to_string()]],
            headers(),
            vec![ColumnDef::Text, ColumnDef::Text],
        );
        table.set_cell(0, 1, "A").unwrap();
        assert_eq!(table.cell(0, 1).as_deref(), Some("A"));
        assert!(table.set_cell(1, 0, "x").is_err());
        assert!(table.set_cell(0, 5, "x").is_err());
        assert_eq!(table.count_rows(), 1);
    }
}
