//! HTTP client for the OpenWeatherMap current-weather and forecast endpoints.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::types::{CurrentConditions, Forecast, Units, WeatherError};

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Request/response client for weather lookups. Cheap to clone; reuses one
/// connection pool. No automatic retry: a failed fetch surfaces to the caller
/// as a display-ready error.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl WeatherClient {
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be constructed.
    pub fn new(api_key: impl Into<String>) -> Result<Self, WeatherError> {
        Self::new_with_base_url(api_key, OPENWEATHER_URL)
    }

    /// Point the client at a different endpoint (used by tests).
    ///
    /// # Errors
    ///
    /// Fails on an unparseable base URL or client construction failure.
    pub fn new_with_base_url(
        api_key: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS)).build()?;
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self { client, base_url: Url::parse(&base)?, api_key: api_key.into() })
    }

    /// Current conditions for a city.
    ///
    /// # Errors
    ///
    /// `CityNotFound` for a 404, `Status` for other non-success responses,
    /// `Network` for transport and decode failures.
    pub async fn fetch_current(
        &self,
        city: &str,
        units: Units,
    ) -> Result<CurrentConditions, WeatherError> {
        self.get_json("weather", city, units).await
    }

    /// Multi-day forecast for a city, in three-hour slots.
    ///
    /// # Errors
    ///
    /// Same failure classes as [`Self::fetch_current`].
    pub async fn fetch_forecast(&self, city: &str, units: Units) -> Result<Forecast, WeatherError> {
        self.get_json("forecast", city, units).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
        units: Units,
    ) -> Result<T, WeatherError> {
        let url = self.base_url.join(endpoint)?;
        let response = self
            .client
            .get(url)
            .query(&[("q", city), ("units", units.as_query()), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => {
                tracing::debug!(city, "Weather lookup found no such city");
                Err(WeatherError::CityNotFound(city.to_string()))
            }
            status => Err(WeatherError::Status(status.as_u16())),
        }
    }
}
