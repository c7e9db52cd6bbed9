//! Stage entry points. Each takes the configuration explicitly and can run alone;
//! stages only share the files under the data directory.

use crate::config::Config;
use crate::error::Result;
use crate::extract::{extract_all, extract_players_for_saved_teams, PlayerExtraction, StatsClient};
use crate::layout::DataLayout;
use crate::transform::{transform_all, TransformOutcome};
use crate::ui::{Phase, Ui};
use crate::writer::{fact_sources, load_schema, preview_ddl, LoadSummary};

/// Fetch team and player stats; with `players_only`, reuse the saved team stats instead
pub fn run_extract(config: &Config, players_only: bool, ui: &mut impl Ui) -> Result<PlayerExtraction> {
    let client = StatsClient::new(&config.api)?;
    let layout = DataLayout::new(&config.data_dir);
    if players_only {
        extract_players_for_saved_teams(&client, &config.api, &layout, ui)
    } else {
        extract_all(&client, &config.api, &layout, ui)
    }
}

pub fn run_transform(config: &Config, ui: &mut impl Ui) -> Result<TransformOutcome> {
    transform_all(&DataLayout::new(&config.data_dir), ui)
}

pub fn run_load(config: &Config, ui: &mut impl Ui) -> Result<LoadSummary> {
    load_schema(&DataLayout::new(&config.data_dir), &config.db_path, ui)
}

/// Summary of a full extract -> transform -> load run
#[derive(Debug)]
pub struct RunSummary {
    pub extraction: PlayerExtraction,
    pub transform: TransformOutcome,
    pub load: LoadSummary,
}

pub fn run_all(config: &Config, ui: &mut impl Ui) -> Result<RunSummary> {
    let extraction = run_extract(config, false, ui)?;
    let transform = run_transform(config, ui)?;
    let load = run_load(config, ui)?;
    ui.set_phase(Phase::Complete);

    Ok(RunSummary {
        extraction,
        transform,
        load,
    })
}

/// DDL for the current processed CSVs, rendered as one SQL script
pub fn render_ddl(config: &Config) -> Result<String> {
    let sources = fact_sources(&DataLayout::new(&config.data_dir))?;
    let mut script = String::new();

    for (table, ddl) in preview_ddl(&sources) {
        match ddl {
            Ok(sql) => {
                script.push_str(&sql);
                script.push_str(";\n\n");
            }
            Err(e) => script.push_str(&format!("-- {}: {}\n\n", table, e)),
        }
    }

    Ok(script)
}
