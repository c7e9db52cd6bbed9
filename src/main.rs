use anyhow::{Context, Result};
use football_stats_etl::{
    cli::{Cli, Commands},
    config::Config,
    error::EtlError,
    pipeline::{render_ddl, run_all, run_extract, run_load, run_transform},
    ui::{ConsoleUi, Phase, Ui},
    writer::LoadSummary,
};
use std::time::Instant;
use tracing::Level;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    let paths = cli.command.paths().clone();
    let config = Config::from_env()
        .map_err(classify)
        .context("Failed to load configuration")?
        .with_overrides(paths.data_dir, paths.db);

    let mut ui = ConsoleUi::new();
    let start = Instant::now();

    match cli.command {
        Commands::Extract { players_only, .. } => {
            let outcome = run_extract(&config, players_only, &mut ui)
                .map_err(classify)
                .context("Extraction failed")?;
            for failure in &outcome.failures {
                println!("  {} ({}): {}", failure.team.team_name, failure.team.team_id, failure.error);
            }
            println!(
                "\nSaved player stats for {} teams ({} failed) in {:.1}s",
                outcome.written.len(),
                outcome.failures.len(),
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Transform { .. } => {
            let outcome = run_transform(&config, &mut ui)
                .map_err(classify)
                .context("Transform failed")?;
            println!(
                "\nWrote {} CSV files for {} entities under {:?}",
                outcome.files.len(),
                outcome.entities,
                config.data_dir.join("processed")
            );
        }

        Commands::Load { .. } => {
            let summary = run_load(&config, &mut ui)
                .map_err(classify)
                .context("Schema creation failed")?;
            ui.set_phase(Phase::Complete);
            print_load_summary(&summary, &config);
        }

        Commands::Run { .. } => {
            let summary = run_all(&config, &mut ui)
                .map_err(classify)
                .context("Pipeline failed")?;
            println!(
                "\nExtracted {} teams, wrote {} CSV files",
                summary.extraction.written.len(),
                summary.transform.files.len()
            );
            print_load_summary(&summary.load, &config);
            println!("Finished in {:.1}s", start.elapsed().as_secs_f64());
        }

        Commands::Ddl { .. } => {
            let script = render_ddl(&config)
                .map_err(classify)
                .context("Failed to generate DDL")?;
            print!("{}", script);
        }
    }

    Ok(())
}

/// Prefix the error with its classification so the diagnostic says what kind of failure it was
fn classify(error: EtlError) -> anyhow::Error {
    let kind = error.kind();
    anyhow::Error::new(error).context(format!("{} error", kind))
}

fn print_load_summary(summary: &LoadSummary, config: &Config) {
    println!(
        "\nSchema ready in {:?}: {} tables created, {} failed",
        config.db_path,
        summary.created(),
        summary.failures.len()
    );
    for (table, error) in &summary.failures {
        println!("  {}: {}", table, error);
    }
    for (table, drift) in summary.drifted() {
        let changes: Vec<String> = drift.iter().map(|d| d.to_string()).collect();
        println!("  {} differs from existing table: {}", table, changes.join(", "));
    }
}
