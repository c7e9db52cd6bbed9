//! Transform stage: flatten raw stats documents into one CSV per category.
//!
//! Every input is parsed and flattened before anything is written, so a run that
//! fails on a missing file, invalid JSON or a missing category key leaves the
//! previous processed output untouched.

pub mod categories;
pub mod flatten;
pub mod table;

pub use categories::*;
pub use flatten::*;
pub use table::*;

use std::path::PathBuf;

use crate::error::{EtlError, Result};
use crate::layout::DataLayout;
use crate::model::StatsDocument;
use crate::ui::{Phase, Ui};

/// Files produced by a transform run
#[derive(Debug, Default)]
pub struct TransformOutcome {
    pub files: Vec<PathBuf>,
    pub entities: usize,
}

/// A parsed stats document and, for player files, the team it was fetched for
pub struct SourceDocument {
    pub team_name: Option<String>,
    pub document: StatsDocument,
}

/// Flatten every entity of every document into one table per category
pub fn build_tables(kind: EntityKind, sources: &[SourceDocument]) -> Result<Vec<StatTable>> {
    let categories = kind.categories();
    let mut tables: Vec<StatTable> = categories
        .iter()
        .map(|category| StatTable::new(kind.table_name(category)))
        .collect();

    for source in sources {
        for entity in &source.document.data {
            for (category, table) in categories.iter().zip(tables.iter_mut()) {
                let record =
                    flatten_entity_category(entity, kind, category, source.team_name.as_deref())?;
                table.push(record);
            }
        }
    }

    Ok(tables)
}

/// Category tables flattened in memory, not yet written
pub struct PreparedTables {
    pub tables: Vec<StatTable>,
    pub entities: usize,
}

/// Read and flatten `raw/team_stats.json`
pub fn prepare_team_tables(layout: &DataLayout) -> Result<PreparedTables> {
    let document = StatsDocument::read(&layout.raw_team_stats())?;
    let sources = vec![SourceDocument {
        team_name: None,
        document,
    }];

    Ok(PreparedTables {
        tables: build_tables(EntityKind::Team, &sources)?,
        entities: count_entities(&sources),
    })
}

/// Read and flatten every `raw/*/players_stats.json`
pub fn prepare_player_tables(layout: &DataLayout) -> Result<PreparedTables> {
    let files = layout.raw_player_files()?;
    if files.is_empty() {
        return Err(EtlError::NotFound(
            layout.raw_dir().join("*").join("players_stats.json"),
        ));
    }

    let mut sources = Vec::with_capacity(files.len());
    for (team_name, path) in files {
        sources.push(SourceDocument {
            team_name: Some(team_name),
            document: StatsDocument::read(&path)?,
        });
    }

    Ok(PreparedTables {
        tables: build_tables(EntityKind::Player, &sources)?,
        entities: count_entities(&sources),
    })
}

/// `raw/team_stats.json` -> `processed/{table}.csv`
pub fn transform_team_stats(layout: &DataLayout, ui: &mut impl Ui) -> Result<TransformOutcome> {
    let prepared = prepare_team_tables(layout)?;
    write_tables(&prepared, &layout.processed_dir(), ui)
}

/// `raw/*/players_stats.json` -> `processed/player_stats/player_{table}.csv`
pub fn transform_player_stats(layout: &DataLayout, ui: &mut impl Ui) -> Result<TransformOutcome> {
    let prepared = prepare_player_tables(layout)?;
    write_tables(&prepared, &layout.player_processed_dir(), ui)
}

/// Team then player transform. Both halves are flattened before either is written.
pub fn transform_all(layout: &DataLayout, ui: &mut impl Ui) -> Result<TransformOutcome> {
    ui.set_phase(Phase::Transforming);
    let teams = prepare_team_tables(layout)?;
    let players = prepare_player_tables(layout)?;

    let mut outcome = write_tables(&teams, &layout.processed_dir(), ui)?;
    let player_outcome = write_tables(&players, &layout.player_processed_dir(), ui)?;
    outcome.files.extend(player_outcome.files);
    outcome.entities += player_outcome.entities;
    Ok(outcome)
}

fn count_entities(sources: &[SourceDocument]) -> usize {
    sources.iter().map(|s| s.document.data.len()).sum()
}

fn write_tables(
    prepared: &PreparedTables,
    dir: &std::path::Path,
    ui: &mut impl Ui,
) -> Result<TransformOutcome> {
    let tables = &prepared.tables;
    let entities = prepared.entities;
    let mut files = Vec::with_capacity(tables.len());
    let total = tables.len() as u64;

    for (idx, table) in tables.iter().enumerate() {
        ui.set_progress(idx as u64, total, table.name.clone());
        let path = dir.join(format!("{}.csv", table.name));
        table.write_csv(&path)?;
        files.push(path);
    }

    ui.clear_progress();
    ui.log(format!(
        "Wrote {} tables for {} entities to {}",
        files.len(),
        entities,
        dir.display()
    ));

    Ok(TransformOutcome { files, entities })
}
