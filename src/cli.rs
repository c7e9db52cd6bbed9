use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "football-etl")]
#[command(version, about = "Extract football season stats, flatten them to CSV and build a SQLite schema")]
pub struct Cli {
    /// Log debug output (HTTP requests, per-table details)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the environment-provided locations
#[derive(Args, Debug, Default, Clone)]
pub struct PathArgs {
    /// Data directory holding raw/ and processed/ (default: $FOOTBALL_DATA_DIR or ./data)
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// SQLite database path (default: $FOOTBALL_DB_PATH or <data dir>/football.db)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch team and player stats from the API into raw/
    Extract {
        #[command(flatten)]
        paths: PathArgs,

        /// Fetch player stats only, for the teams in the saved raw/team_stats.json
        #[arg(long)]
        players_only: bool,
    },

    /// Flatten raw JSON into one CSV per stat category under processed/
    Transform {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Create reference and per-category tables from the processed CSVs
    Load {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Extract, transform and load in sequence
    Run {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Print the DDL the load stage would run, without touching the database
    Ddl {
        #[command(flatten)]
        paths: PathArgs,
    },
}

impl Commands {
    pub fn paths(&self) -> &PathArgs {
        match self {
            Commands::Extract { paths, .. }
            | Commands::Transform { paths }
            | Commands::Load { paths }
            | Commands::Run { paths }
            | Commands::Ddl { paths } => paths,
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
