// src/table/mod.rs

use std::collections::BTreeSet;

/// An in-memory snapshot of one spreadsheet tab.
///
/// Every cell is kept as raw text. The sources carry identifiers with leading
/// zeros and inconsistently formatted numbers, so numeric interpretation only
/// happens where a consumer explicitly asks for it. A missing cell is an
/// empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Column names, from the header row of the CSV source.
    pub headers: Vec<String>,
    /// Data rows, each padded to exactly one cell per column.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column with the given header, if present.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (row, column); empty string when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Distinct non-missing values of a column, sorted ascending.
    ///
    /// This is what the selector widgets offer, computed over the unfiltered
    /// table. An absent column yields an empty list.
    pub fn distinct_values(&self, column: &str) -> Vec<String> {
        let Some(idx) = self.column(column) else {
            return Vec::new();
        };
        let values: BTreeSet<&str> = self
            .rows
            .iter()
            .filter_map(|row| row.get(idx))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
            .collect();
        values.into_iter().map(str::to_string).collect()
    }
}
