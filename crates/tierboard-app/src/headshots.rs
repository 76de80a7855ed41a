// Headshot id lookup fetch.
//
// One GET for the id lookup CSV at startup. Any failure degrades to an empty
// lookup: players then just show their own image reference, if any.

use std::time::Duration;

use thiserror::Error;
use tierboard_core::headshot::{parse_id_lookup, IdLookup};
use tracing::{info, warn};

use crate::config::HeadshotConfig;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned HTTP {0}")]
    Status(reqwest::StatusCode),
}

/// Fetches the headshot id lookup.
pub struct HeadshotClient {
    http: reqwest::Client,
    url: String,
}

impl HeadshotClient {
    pub fn new(url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("failed to build HTTP client with timeout, using defaults: {}", e);
                reqwest::Client::new()
            });
        Self {
            http,
            url: url.into(),
        }
    }

    /// The raw lookup CSV body.
    pub async fn fetch_text(&self) -> Result<String, FetchError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(response.text().await?)
    }

    /// Fetch and parse the lookup. Never fails; errors yield an empty map.
    pub async fn fetch_lookup(&self) -> IdLookup {
        match self.fetch_text().await {
            Ok(text) => {
                let lookup = parse_id_lookup(&text);
                info!(entries = lookup.len(), "headshot lookup loaded");
                lookup
            }
            Err(e) => {
                warn!("headshot lookup unavailable ({}): {}", self.url, e);
                IdLookup::new()
            }
        }
    }
}

/// Load the lookup if headshots are enabled.
pub async fn load_lookup(config: &HeadshotConfig) -> IdLookup {
    if !config.enabled {
        info!("headshots disabled");
        return IdLookup::new();
    }
    HeadshotClient::new(config.lookup_url.clone()).fetch_lookup().await
}
