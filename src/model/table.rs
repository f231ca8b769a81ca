//! Extracted table grid.

use serde::{Deserialize, Serialize};

use super::geometry::BBox;

/// How a table was found on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    /// Columns inferred from whitespace alignment
    Stream,
    /// Cells bounded by painted ruling lines
    Lattice,
}

/// One extracted table.
///
/// Rows are not required to have the same length; consumers pad as needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// 1-based page the table was found on
    pub page: u32,

    /// Region on the page covered by the table
    pub region: BBox,

    /// Detector that produced the table
    pub method: DetectionMethod,

    /// Cell text, row by row
    pub rows: Vec<Vec<String>>,

    /// Number of header rows (0 = no header)
    pub header_rows: u8,
}

impl Table {
    /// Create an empty table.
    pub fn new(page: u32, region: BBox, method: DetectionMethod) -> Self {
        Self {
            page,
            region,
            method,
            rows: Vec::new(),
            header_rows: 0,
        }
    }

    /// Add a row to the table.
    pub fn add_row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row length.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether rows differ in length.
    pub fn is_ragged(&self) -> bool {
        let width = self.column_count();
        self.rows.iter().any(|r| r.len() != width)
    }

    /// Cell text, or `None` past the end of a short row.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Header rows.
    pub fn header(&self) -> &[Vec<String>] {
        let n = (self.header_rows as usize).min(self.rows.len());
        &self.rows[..n]
    }

    /// Body rows (non-header).
    pub fn body(&self) -> &[Vec<String>] {
        let n = (self.header_rows as usize).min(self.rows.len());
        &self.rows[n..]
    }

    /// Rows padded with empty cells to the full column count.
    pub fn padded_rows(&self) -> Vec<Vec<&str>> {
        let width = self.column_count();
        self.rows
            .iter()
            .map(|row| {
                let mut cells: Vec<&str> = row.iter().map(String::as_str).collect();
                cells.resize(width, "");
                cells
            })
            .collect()
    }
}
