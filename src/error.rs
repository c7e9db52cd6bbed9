//! Error type shared by every pipeline stage.

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

pub type Result<T, E = EtlError> = std::result::Result<T, E>;

/// Broad classification used for diagnostics and exit reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Api,
    Artifact,
    Schema,
    Database,
    Config,
    Io,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Transport => write!(f, "transport"),
            ErrorKind::Api => write!(f, "api"),
            ErrorKind::Artifact => write!(f, "artifact"),
            ErrorKind::Schema => write!(f, "schema"),
            ErrorKind::Database => write!(f, "database"),
            ErrorKind::Config => write!(f, "config"),
            ErrorKind::Io => write!(f, "io"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EtlError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: Value },

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("{} is not valid JSON: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing key `{key}` in {context}")]
    MissingKey { key: String, context: String },

    #[error("team {team} would share raw directory {} with {other}", .dir.display())]
    TeamDirCollision {
        team: String,
        other: String,
        dir: PathBuf,
    },

    #[error("malformed CSV {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to create table {table}: {source}")]
    Schema {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EtlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EtlError::Transport { .. } => ErrorKind::Transport,
            EtlError::Api { .. } => ErrorKind::Api,
            EtlError::NotFound(_)
            | EtlError::InvalidJson { .. }
            | EtlError::MissingKey { .. }
            | EtlError::TeamDirCollision { .. }
            | EtlError::Csv { .. } => ErrorKind::Artifact,
            EtlError::Schema { .. } => ErrorKind::Schema,
            EtlError::Database(_) => ErrorKind::Database,
            EtlError::Config(_) => ErrorKind::Config,
            EtlError::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EtlError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn missing_key(key: impl Into<String>, context: impl Into<String>) -> Self {
        EtlError::MissingKey {
            key: key.into(),
            context: context.into(),
        }
    }
}
