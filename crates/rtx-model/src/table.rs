//! Rectangular text tables.
//!
//! Every input export and every produced frame crosses the I/O boundary as a
//! [`Table`]: a header row naming the columns followed by data rows whose
//! cells are plain text. Rows are kept exactly as wide as the header.

use crate::error::{ModelError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Name used in error messages and logs (e.g. "responses").
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn with_columns(name: impl Into<String>, columns: &[&str]) -> Self {
        Self::new(name, columns.iter().map(|c| (*c).to_string()).collect())
    }

    /// Build a table whose first record is the header row.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingHeader`] when `records` is empty.
    pub fn from_records(name: impl Into<String>, records: Vec<Vec<String>>) -> Result<Self> {
        let name = name.into();
        let mut records = records.into_iter();
        let Some(headers) = records.next() else {
            return Err(ModelError::MissingHeader { table: name });
        };
        let mut table = Self::new(name, headers);
        for record in records {
            table.push_row(record);
        }
        Ok(table)
    }

    /// Append a row, padding short rows with blanks and truncating long ones.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Index of a column the caller cannot proceed without.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingColumn`] when no header matches `name`.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.find_column(name)
            .ok_or_else(|| ModelError::MissingColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    /// Cell text at `row`/`col`, or an empty string when out of range.
    pub fn value(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Number of data rows (the header is not counted).
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// True when the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
