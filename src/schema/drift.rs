//! Differences between an existing table and a freshly inferred schema.
//!
//! Tables are never altered; drift is only reported.

use super::types::{ColumnType, TableSchema};

/// Existing column as reported by the database
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingColumn {
    pub name: String,
    pub declared_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnDrift {
    /// Inferred now, absent from the existing table
    Added { name: String, col_type: ColumnType },
    /// Present in the existing table, no longer produced
    Removed { name: String },
    /// Present in both with different types
    Retyped {
        name: String,
        existing: String,
        inferred: ColumnType,
    },
}

impl std::fmt::Display for ColumnDrift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnDrift::Added { name, col_type } => write!(f, "+{} {}", name, col_type),
            ColumnDrift::Removed { name } => write!(f, "-{}", name),
            ColumnDrift::Retyped {
                name,
                existing,
                inferred,
            } => write!(f, "~{} {} -> {}", name, existing, inferred),
        }
    }
}

pub fn diff_columns(existing: &[ExistingColumn], schema: &TableSchema) -> Vec<ColumnDrift> {
    let mut drift = Vec::new();

    for col in &schema.columns {
        match existing.iter().find(|e| e.name == col.name) {
            None => drift.push(ColumnDrift::Added {
                name: col.name.clone(),
                col_type: col.col_type,
            }),
            Some(e) => {
                let same = match ColumnType::from_declared(&e.declared_type) {
                    Some(ty) => ty == col.col_type,
                    None => e.declared_type.eq_ignore_ascii_case(col.col_type.sql()),
                };
                if !same {
                    drift.push(ColumnDrift::Retyped {
                        name: col.name.clone(),
                        existing: e.declared_type.clone(),
                        inferred: col.col_type,
                    });
                }
            }
        }
    }

    for e in existing {
        if schema.get_column(&e.name).is_none() {
            drift.push(ColumnDrift::Removed {
                name: e.name.clone(),
            });
        }
    }

    drift
}
