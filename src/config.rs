//! Pipeline configuration
//!
//! Built once at startup from the environment (and an optional `.env` file),
//! then passed explicitly into each stage.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{EtlError, Result};

/// Environment variable for the stats API base URL
pub const ENV_BASE_URL: &str = "FBREF_BASE_URL";

/// Environment variable for the stats API key
pub const ENV_API_KEY: &str = "FBREF_API_KEY";

/// Environment variable for the league to extract
pub const ENV_LEAGUE_ID: &str = "FBREF_LEAGUE_ID";

/// Environment variable for the season to extract
pub const ENV_SEASON_ID: &str = "FBREF_SEASON_ID";

/// Environment variable for the HTTP request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "FBREF_TIMEOUT_SECS";

/// Environment variable for the data root (raw and processed artifacts)
pub const ENV_DATA_DIR: &str = "FOOTBALL_DATA_DIR";

/// Environment variable for the SQLite database path
pub const ENV_DB_PATH: &str = "FOOTBALL_DB_PATH";

pub const DEFAULT_LEAGUE_ID: &str = "9";
pub const DEFAULT_SEASON_ID: &str = "2024-2025";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_DB_FILENAME: &str = "football.db";

/// Stats API connection settings
#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub league_id: String,
    pub season_id: String,
    /// `None` keeps the HTTP client's default
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    /// Base URL with any trailing slash removed; required by the extract stage only
    pub fn base_url(&self) -> Result<&str> {
        self.base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .ok_or_else(|| EtlError::Config(format!("{} is not set", ENV_BASE_URL)))
    }

    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| EtlError::Config(format!("{} is not set", ENV_API_KEY)))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
}

impl Config {
    /// Load configuration from `.env` (if present) and the process environment
    pub fn from_env() -> Result<Self> {
        if let Some(error) = dotenv_problem(dotenvy::dotenv()) {
            tracing::warn!(%error, "ignoring unreadable .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    EtlError::Config(format!("{} must be a whole number, got {:?}", ENV_TIMEOUT_SECS, raw))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let data_dir = lookup(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let db_path = lookup(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(DEFAULT_DB_FILENAME));

        Ok(Self {
            api: ApiConfig {
                base_url: lookup(ENV_BASE_URL),
                api_key: lookup(ENV_API_KEY),
                league_id: lookup(ENV_LEAGUE_ID).unwrap_or_else(|| DEFAULT_LEAGUE_ID.to_string()),
                season_id: lookup(ENV_SEASON_ID).unwrap_or_else(|| DEFAULT_SEASON_ID.to_string()),
                timeout,
            },
            data_dir,
            db_path,
        })
    }

    /// Apply command-line overrides on top of the environment
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, db_path: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            // Keep the database next to the data unless it was set explicitly
            if self.db_path == self.data_dir.join(DEFAULT_DB_FILENAME) {
                self.db_path = dir.join(DEFAULT_DB_FILENAME);
            }
            self.data_dir = dir;
        }
        if let Some(db) = db_path {
            self.db_path = db;
        }
        self
    }
}

/// A `.env` load error worth reporting; a missing file is not one
fn dotenv_problem<T>(result: dotenvy::Result<T>) -> Option<dotenvy::Error> {
    match result {
        Ok(_) => None,
        Err(e) if e.not_found() => None,
        Err(e) => Some(e),
    }
}
