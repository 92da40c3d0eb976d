//! City-name autocomplete against Nominatim (OpenStreetMap).
//!
//! Free, no API key required. Nominatim rate-limits aggressively, which is why
//! the suggester in front of this client debounces keystrokes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::types::Suggestion;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "Cirrus/0.1.0 (https://github.com/cirrus-app)";
const MAX_RESULTS: u32 = 8;

/// Autocomplete provider errors. The suggester swallows these into an empty
/// suggestion list; they are never user-visible.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Provider returned status {0}")]
    Status(u16),
    #[error("Invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Source of place-name suggestions for a partial city name.
#[async_trait]
pub trait PlaceProvider: Send + Sync {
    async fn search_cities(&self, text: &str) -> Result<Vec<Suggestion>, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    place_id: i64,
    display_name: String,
}

/// Forward-geocoding client filtered to city-level results.
#[derive(Debug, Clone)]
pub struct NominatimPlaces {
    client: Client,
    base_url: Url,
}

impl NominatimPlaces {
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(NOMINATIM_URL)
    }

    /// Point the client at a different endpoint (used by tests).
    ///
    /// # Errors
    ///
    /// Fails on an unparseable base URL or client construction failure.
    pub fn with_base_url(base_url: &str) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, base_url: Url::parse(base_url)? })
    }
}

#[async_trait]
impl PlaceProvider for NominatimPlaces {
    async fn search_cities(&self, text: &str) -> Result<Vec<Suggestion>, ProviderError> {
        let url = self.base_url.join("search")?;
        let limit = MAX_RESULTS.to_string();
        let response = self
            .client
            .get(url)
            .query(&[
                ("q", text),
                ("format", "json"),
                ("featuretype", "city"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        Ok(places
            .into_iter()
            .map(|p| Suggestion { label: p.display_name, key: p.place_id.to_string() })
            .collect())
    }
}
