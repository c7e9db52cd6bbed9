//! Column type inference over full CSV columns

use std::path::Path;

use super::types::ColumnType;
use crate::error::{EtlError, Result};

/// Running classification of one column
#[derive(Debug, Clone, Copy)]
pub struct TypeInference {
    numeric: bool,
    integral: bool,
}

impl Default for TypeInference {
    fn default() -> Self {
        Self {
            numeric: true,
            integral: true,
        }
    }
}

impl TypeInference {
    /// Feed one cell; empty cells are null and do not affect the result
    pub fn observe(&mut self, cell: &str) {
        let cell = cell.trim();
        if cell.is_empty() || !self.numeric {
            return;
        }

        match parse_number(cell) {
            Some(n) => {
                if n.fract() != 0.0 {
                    self.integral = false;
                }
            }
            None => self.numeric = false,
        }
    }

    /// An all-null column is INTEGER: the integrality check holds vacuously
    pub fn result(&self) -> ColumnType {
        match (self.numeric, self.integral) {
            (true, true) => ColumnType::Integer,
            (true, false) => ColumnType::Float,
            (false, _) => ColumnType::Text,
        }
    }
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Infer a type for a column of values
pub fn infer_column<'a>(values: impl IntoIterator<Item = &'a str>) -> ColumnType {
    let mut inference = TypeInference::default();
    for value in values {
        inference.observe(value);
    }
    inference.result()
}

/// Header and inferred type of every column of a CSV file, in header order
pub fn infer_csv(path: &Path) -> Result<Vec<(String, ColumnType)>> {
    let csv_err = |source: csv::Error| EtlError::Csv {
        path: path.to_path_buf(),
        source,
    };

    if !path.exists() {
        return Err(EtlError::NotFound(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut columns = vec![TypeInference::default(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        for (inference, cell) in columns.iter_mut().zip(record.iter()) {
            inference.observe(cell);
        }
    }

    Ok(headers
        .into_iter()
        .zip(columns.iter().map(TypeInference::result))
        .collect())
}
