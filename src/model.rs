//! Stats API document shapes
//!
//! Both endpoints answer with `{"data": [{"meta_data": {...}, "stats": {...}}]}`.
//! Meta data and stats stay as JSON maps: the stat fields differ per category and
//! per endpoint, and they are flattened generically downstream.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EtlError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsDocument {
    pub data: Vec<EntityStats>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityStats {
    pub meta_data: Map<String, Value>,
    pub stats: Map<String, Value>,
}

impl StatsDocument {
    /// Read and parse a raw stats file
    pub fn read(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EtlError::NotFound(path.to_path_buf()))
            }
            Err(e) => return Err(EtlError::io(path, e)),
        };

        serde_json::from_str(&text).map_err(|source| EtlError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Identify the teams listed in a team-season-stats document
    pub fn team_refs(&self) -> Result<Vec<TeamRef>> {
        self.data
            .iter()
            .map(|entity| {
                Ok(TeamRef {
                    team_id: entity.required_meta("team_id")?,
                    team_name: entity.required_meta("team_name")?,
                })
            })
            .collect()
    }
}

impl EntityStats {
    /// Meta data field rendered as text; missing or null is an error
    pub fn required_meta(&self, key: &str) -> Result<String> {
        self.meta(key)
            .ok_or_else(|| EtlError::missing_key(key, "meta_data"))
    }

    /// Meta data field rendered as text, if present and not null
    pub fn meta(&self, key: &str) -> Option<String> {
        match self.meta_data.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Team identity used to drive per-team player requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRef {
    pub team_id: String,
    pub team_name: String,
}
