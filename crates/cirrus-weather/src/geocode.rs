//! Reverse geocoding: coordinates to a city name for the "use my location"
//! entry point. Uses Nominatim (OpenStreetMap) - free, no API key required.
//! Every failure degrades to `None`; the caller falls back to typed search.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "Cirrus/0.1.0 (https://github.com/cirrus-app)";

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<AddressParts>,
}

#[derive(Debug, Deserialize)]
struct AddressParts {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    state: Option<String>,
    county: Option<String>,
    country: Option<String>,
}

impl AddressParts {
    /// Pick the most specific settlement name, then disambiguate with the
    /// state or country when they differ from it ("Springfield, Illinois").
    fn place_name(self) -> Option<String> {
        let state = self.state.clone();
        let country = self.country.clone();

        let place = self
            .city
            .or(self.town)
            .or(self.village)
            .or(self.municipality)
            .or(self.county)
            .or(self.state)
            .or(self.country)?;

        let suffix = [state, country]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty() && *s != place);

        Some(match suffix {
            Some(suffix) => format!("{place}, {suffix}"),
            None => place,
        })
    }
}

/// Reverse geocode coordinates to a human-readable city name.
/// Returns `None` on any failure; this path never blocks the user.
pub async fn reverse_geocode(latitude: f64, longitude: f64) -> Option<String> {
    reverse_geocode_at(NOMINATIM_URL, latitude, longitude).await
}

async fn reverse_geocode_at(base_url: &str, latitude: f64, longitude: f64) -> Option<String> {
    let client = match Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Failed to create geocoding client: {}", e);
            return None;
        }
    };

    let lat = latitude.to_string();
    let lon = longitude.to_string();
    let response = match client
        .get(format!("{}/reverse", base_url.trim_end_matches('/')))
        .query(&[
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("format", "json"),
            ("addressdetails", "1"),
            ("zoom", "10"),
        ])
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Reverse geocode request failed: {}", e);
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::debug!("Reverse geocode returned status {}", response.status());
        return None;
    }

    let body: ReverseResponse = match response.json().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!("Reverse geocode parse error: {}", e);
            return None;
        }
    };

    let name = body.address.and_then(AddressParts::place_name);
    if let Some(ref name) = name {
        tracing::info!("Reverse geocoded to: {}", name);
    }
    name
}
