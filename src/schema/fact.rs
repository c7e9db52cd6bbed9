//! Per-category fact tables derived from processed CSVs

use std::path::Path;

use super::infer::infer_csv;
use super::types::*;
use crate::error::{EtlError, Result};
use crate::transform::EntityKind;

/// Build a fact table from a CSV header with inferred types.
///
/// Identity and key fields of `kind` are dropped from the stat columns; the key
/// columns are always emitted first as `TEXT NOT NULL`.
pub fn fact_table_schema(
    name: impl Into<String>,
    kind: EntityKind,
    inferred: &[(String, ColumnType)],
) -> TableSchema {
    let mut schema = TableSchema::new(name);

    for key in kind.key_columns() {
        schema = schema.column(Column::required(*key, ColumnType::Text));
    }

    for (field, col_type) in inferred {
        if kind.is_reserved_field(field) || schema.get_column(field).is_some() {
            continue;
        }
        schema = schema.column(Column::new(field.clone(), *col_type));
    }

    match kind {
        EntityKind::Team => schema
            .primary_key(&["team_id", "league_id", "season_id"])
            .foreign_key(ForeignKey::same_columns(
                &["team_id", "league_id", "season_id"],
                "teams",
            )),
        EntityKind::Player => schema
            .primary_key(&["player_id", "league_id", "season_id"])
            .foreign_key(ForeignKey::same_columns(
                &["player_id", "league_id", "season_id"],
                "players",
            ))
            .foreign_key(ForeignKey::same_columns(
                &["team_id", "league_id", "season_id"],
                "teams",
            )),
    }
}

/// Fact table for a processed CSV; the table is named after the file
pub fn fact_table_from_csv(path: &Path, kind: EntityKind) -> Result<TableSchema> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| EtlError::NotFound(path.to_path_buf()))?;

    let inferred = infer_csv(path)?;
    Ok(fact_table_schema(name, kind, &inferred))
}
