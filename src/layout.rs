use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EtlError, Result};

const RAW_DIR: &str = "raw";
const PROCESSED_DIR: &str = "processed";
const PLAYER_PROCESSED_DIR: &str = "player_stats";
const TEAM_STATS_FILE: &str = "team_stats.json";
const PLAYER_STATS_FILE: &str = "players_stats.json";

/// File locations for raw and processed artifacts under one data root
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.root.join(RAW_DIR)
    }

    /// `raw/team_stats.json`
    pub fn raw_team_stats(&self) -> PathBuf {
        self.raw_dir().join(TEAM_STATS_FILE)
    }

    /// `raw/{team_name}/players_stats.json`
    pub fn raw_player_stats(&self, team_name: &str) -> PathBuf {
        self.raw_dir()
            .join(team_dir_name(team_name))
            .join(PLAYER_STATS_FILE)
    }

    /// Every `raw/*/players_stats.json`, paired with its team directory name, sorted by team
    pub fn raw_player_files(&self) -> Result<Vec<(String, PathBuf)>> {
        let raw_dir = self.raw_dir();
        if !raw_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&raw_dir).map_err(|e| EtlError::io(&raw_dir, e))? {
            let entry = entry.map_err(|e| EtlError::io(&raw_dir, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let stats_file = path.join(PLAYER_STATS_FILE);
            if !stats_file.is_file() {
                continue;
            }
            if let Some(team) = path.file_name().and_then(|n| n.to_str()) {
                files.push((team.to_string(), stats_file));
            }
        }

        files.sort();
        Ok(files)
    }

    /// Directory holding team-scoped CSVs
    pub fn processed_dir(&self) -> PathBuf {
        self.root.join(PROCESSED_DIR)
    }

    /// Directory holding player-scoped CSVs
    pub fn player_processed_dir(&self) -> PathBuf {
        self.processed_dir().join(PLAYER_PROCESSED_DIR)
    }

    /// CSV files directly inside `dir`, sorted by name
    pub fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| EtlError::io(dir, e))? {
            let path = entry.map_err(|e| EtlError::io(dir, e))?.path();
            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("csv") {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Team names become directory names; path separators are replaced
pub fn team_dir_name(team_name: &str) -> String {
    let cleaned: String = team_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => "_".repeat(cleaned.len().max(1)),
        _ => cleaned,
    }
}

/// Create the parent directory of `path` if needed
pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| EtlError::io(parent, e))?;
    }
    Ok(())
}
