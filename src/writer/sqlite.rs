use std::path::{Path, PathBuf};

use rusqlite::Connection;

use super::schema_gen::{generate_create_table, quote_ident};
use crate::error::{EtlError, Result};
use crate::layout::{ensure_parent, DataLayout};
use crate::schema::{
    diff_columns, fact_table_from_csv, reference_tables, ColumnDrift, ExistingColumn, TableSchema,
    SCHEMA_NAME,
};
use crate::transform::EntityKind;
use crate::ui::{Phase, Ui};

/// A processed CSV and the kind of entity its rows describe
#[derive(Debug, Clone)]
pub struct FactSource {
    pub path: PathBuf,
    pub kind: EntityKind,
}

/// Team CSVs first, then player CSVs, each sorted by file name
pub fn fact_sources(layout: &DataLayout) -> Result<Vec<FactSource>> {
    let mut sources = Vec::new();
    for (dir, kind) in [
        (layout.processed_dir(), EntityKind::Team),
        (layout.player_processed_dir(), EntityKind::Player),
    ] {
        for path in DataLayout::csv_files(&dir)? {
            sources.push(FactSource { path, kind });
        }
    }
    Ok(sources)
}

/// What happened to one table during a load run
#[derive(Debug)]
pub enum TableOutcome {
    Created,
    /// Left untouched; drift lists how the new inference differs
    Existing { drift: Vec<ColumnDrift> },
}

/// Result of a schema creation run
#[derive(Debug, Default)]
pub struct LoadSummary {
    pub tables: Vec<(String, TableOutcome)>,
    pub failures: Vec<(String, EtlError)>,
}

impl LoadSummary {
    pub fn created(&self) -> usize {
        self.tables
            .iter()
            .filter(|(_, o)| matches!(o, TableOutcome::Created))
            .count()
    }

    pub fn drifted(&self) -> impl Iterator<Item = (&str, &[ColumnDrift])> {
        self.tables.iter().filter_map(|(name, outcome)| match outcome {
            TableOutcome::Existing { drift } if !drift.is_empty() => {
                Some((name.as_str(), drift.as_slice()))
            }
            _ => None,
        })
    }
}

/// SQLite connection with the database file attached as the `football` schema
pub struct SchemaWriter {
    conn: Connection,
}

impl SchemaWriter {
    pub fn open(db_path: &Path) -> Result<Self> {
        ensure_parent(db_path)?;

        let conn = Connection::open_in_memory()?;
        let path = db_path.to_string_lossy().into_owned();
        conn.execute(
            &format!("ATTACH DATABASE ?1 AS {}", SCHEMA_NAME),
            [path.as_str()],
        )?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        Ok(Self { conn })
    }

    /// Throwaway writer whose `football` schema lives in memory
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(&format!(
            "ATTACH DATABASE ':memory:' AS {}; PRAGMA foreign_keys = ON;",
            SCHEMA_NAME
        ))?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create reference tables, then one fact table per source, in one transaction.
    ///
    /// A failing fact table is rolled back to its savepoint and recorded; reference
    /// table and connection failures abort the whole run.
    pub fn create_schema(
        &mut self,
        sources: &[FactSource],
        ui: &mut impl Ui,
    ) -> Result<LoadSummary> {
        let mut tx = self.conn.transaction()?;
        let mut summary = LoadSummary::default();

        for schema in reference_tables() {
            let outcome = create_table(&tx, &schema)?;
            summary.tables.push((schema.name.clone(), outcome));
        }
        ui.log("Reference tables ready");

        if sources.is_empty() {
            ui.log("No processed CSV files found");
        }

        let total = sources.len() as u64;
        for (idx, source) in sources.iter().enumerate() {
            let name = table_label(&source.path);
            ui.set_progress(idx as u64, total, name.clone());

            let sp = tx.savepoint()?;
            let result = fact_table_from_csv(&source.path, source.kind)
                .and_then(|schema| create_table(&sp, &schema).map(|o| (schema.name, o)));

            match result {
                Ok((table, outcome)) => {
                    sp.commit()?;
                    if let TableOutcome::Existing { drift } = &outcome {
                        if !drift.is_empty() {
                            let changes: Vec<String> = drift.iter().map(|d| d.to_string()).collect();
                            tracing::warn!(
                                table = %table,
                                changes = %changes.join(", "),
                                "existing table differs from inferred schema; left unchanged"
                            );
                        }
                    }
                    summary.tables.push((table, outcome));
                }
                Err(error) => {
                    // Dropping the savepoint rolls back anything this table did
                    drop(sp);
                    tracing::warn!(table = %name, %error, "table creation failed");
                    ui.log(format!("Error processing {}: {}", source.path.display(), error));
                    summary.failures.push((name, error));
                }
            }
        }

        tx.commit()?;
        ui.clear_progress();
        ui.log(format!(
            "{} tables created, {} already present, {} failed",
            summary.created(),
            summary.tables.len() - summary.created(),
            summary.failures.len()
        ));

        Ok(summary)
    }

    /// Names of all tables in the `football` schema
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT name FROM {}.sqlite_master WHERE type = 'table' ORDER BY name",
            SCHEMA_NAME
        ))?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Columns of an existing table, or `None` if it does not exist
    pub fn existing_columns(&self, table: &str) -> Result<Option<Vec<ExistingColumn>>> {
        existing_columns(&self.conn, table)
    }
}

/// Run the DDL for `schema`, reporting whether the table was already there
fn create_table(conn: &Connection, schema: &TableSchema) -> Result<TableOutcome> {
    let schema_err = |source: rusqlite::Error| EtlError::Schema {
        table: schema.name.clone(),
        source,
    };

    let existing = existing_columns(conn, &schema.name).map_err(|e| match e {
        EtlError::Database(source) => schema_err(source),
        other => other,
    })?;

    conn.execute_batch(&generate_create_table(schema))
        .map_err(schema_err)?;

    Ok(match existing {
        None => TableOutcome::Created,
        Some(columns) => TableOutcome::Existing {
            drift: diff_columns(&columns, schema),
        },
    })
}

fn existing_columns(conn: &Connection, table: &str) -> Result<Option<Vec<ExistingColumn>>> {
    let mut stmt = conn.prepare(&format!(
        "PRAGMA {}.table_info({})",
        SCHEMA_NAME,
        quote_ident(table)
    ))?;
    let columns = stmt
        .query_map([], |row| {
            Ok(ExistingColumn {
                name: row.get(1)?,
                declared_type: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(if columns.is_empty() { None } else { Some(columns) })
}

fn table_label(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Generated DDL for every table a load run would create, without touching a database
pub fn preview_ddl(sources: &[FactSource]) -> Vec<(String, Result<String>)> {
    let mut statements: Vec<(String, Result<String>)> = reference_tables()
        .iter()
        .map(|schema| (schema.name.clone(), Ok(generate_create_table(schema))))
        .collect();

    for source in sources {
        let ddl = fact_table_from_csv(&source.path, source.kind)
            .map(|schema| generate_create_table(&schema));
        statements.push((table_label(&source.path), ddl));
    }

    statements
}

/// Create the full schema for the processed CSVs under `layout` in `db_path`
pub fn load_schema(layout: &DataLayout, db_path: &Path, ui: &mut impl Ui) -> Result<LoadSummary> {
    ui.set_phase(Phase::Loading);
    let sources = fact_sources(layout)?;
    let mut writer = SchemaWriter::open(db_path)?;
    writer.create_schema(&sources, ui)
}
