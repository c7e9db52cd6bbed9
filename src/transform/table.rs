use std::collections::HashMap;
use std::path::Path;

use super::flatten::StatRecord;
use crate::error::{EtlError, Result};
use crate::layout::ensure_parent;

/// Rows of one category, with columns in first-encounter order
#[derive(Debug, Clone, Default)]
pub struct StatTable {
    pub name: String,
    columns: Vec<String>,
    positions: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl StatTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, record: StatRecord) {
        let mut row = vec![String::new(); self.columns.len()];
        for (field, value) in record.fields {
            let idx = match self.positions.get(&field) {
                Some(&idx) => idx,
                None => {
                    let idx = self.columns.len();
                    self.positions.insert(field.clone(), idx);
                    self.columns.push(field);
                    row.push(String::new());
                    idx
                }
            };
            row[idx] = value;
        }
        self.rows.push(row);
    }

    /// Cell by row index and column name; absent cells read as empty
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = *self.positions.get(column)?;
        let row = self.rows.get(row)?;
        Some(row.get(idx).map(String::as_str).unwrap_or(""))
    }

    /// Write the table as CSV with a header row, replacing any existing file
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        if self.columns.is_empty() {
            return std::fs::write(path, "").map_err(|e| EtlError::io(path, e));
        }

        let csv_err = |source: csv::Error| EtlError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
        writer.write_record(&self.columns).map_err(csv_err)?;

        let width = self.columns.len();
        for row in &self.rows {
            // Earlier rows are shorter when later rows introduced new columns
            let padded = row
                .iter()
                .map(String::as_str)
                .chain(std::iter::repeat("").take(width - row.len()));
            writer.write_record(padded).map_err(csv_err)?;
        }

        writer
            .flush()
            .map_err(|e| EtlError::io(path, e))
    }
}
