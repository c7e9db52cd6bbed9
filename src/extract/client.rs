use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::{EtlError, Result};

/// Header carrying the static API key
pub const API_KEY_HEADER: &str = "X-API-KEY";

pub const TEAM_SEASON_STATS: &str = "team-season-stats";
pub const PLAYER_SEASON_STATS: &str = "player-season-stats";

/// A completed HTTP exchange: status plus the raw body text
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Parse the body as JSON, falling back to a JSON string for non-JSON error pages
    pub fn body_json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }

    /// Turn a non-200 response into an `Api` error
    pub fn into_api_error(self) -> EtlError {
        let body = self.body_json();
        EtlError::Api {
            status: self.status,
            body,
        }
    }
}

/// Something that can issue GET requests against the stats API
pub trait ApiTransport {
    fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<ApiResponse>;
}

/// Blocking `reqwest` client for the stats API
pub struct StatsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl StatsClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent("football-stats-etl");
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| EtlError::Transport {
            url: config.base_url.clone().unwrap_or_default(),
            source,
        })?;

        Ok(Self {
            client,
            base_url: config.base_url()?.to_string(),
            api_key: config.api_key()?.to_string(),
        })
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }
}

impl ApiTransport for StatsClient {
    fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<ApiResponse> {
        let url = self.endpoint_url(endpoint);
        let transport = |source: reqwest::Error| EtlError::Transport {
            url: url.clone(),
            source,
        };

        let response = self
            .client
            .get(&url)
            .query(query)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .map_err(transport)?;

        let status = response.status().as_u16();
        let body = response.text().map_err(transport)?;
        tracing::debug!(%url, status, bytes = body.len(), "GET");

        Ok(ApiResponse { status, body })
    }
}
