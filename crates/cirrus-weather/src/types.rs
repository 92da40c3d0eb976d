use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Measurement system for temperatures and wind speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Query-parameter value expected by the weather API.
    pub fn as_query(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }
}

/// Presentation bucket for a weather description string.
///
/// The API reports free-text descriptions ("broken clouds", "light rain");
/// the UI only distinguishes a handful of background/icon buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Showers,
    Rain,
    Thunderstorm,
    Snow,
    Haze,
}

impl Condition {
    /// Classify an API description string. Unknown descriptions fall back to
    /// the clear-sky bucket.
    pub fn from_description(description: &str) -> Self {
        match description.trim().to_lowercase().as_str() {
            "clear sky" => Self::Clear,
            "few clouds" => Self::PartlyCloudy,
            "scattered clouds" | "broken clouds" | "overcast clouds" => Self::Cloudy,
            "shower rain" => Self::Showers,
            "rain" | "light rain" | "moderate rain" | "heavy intensity rain" => Self::Rain,
            "thunderstorm" => Self::Thunderstorm,
            "snow" | "light snow" | "heavy snow" => Self::Snow,
            "mist" | "haze" | "smoke" | "fog" => Self::Haze,
            _ => Self::Clear,
        }
    }

    /// Background asset for this bucket.
    pub fn background(self) -> &'static str {
        match self {
            Self::Clear => "clear-sky.jpg",
            Self::PartlyCloudy | Self::Cloudy => "cloudy.jpg",
            Self::Showers | Self::Rain => "rain.webp",
            Self::Thunderstorm => "thunderstorm.webp",
            Self::Snow => "snow.webp",
            Self::Haze => "haze.jpg",
        }
    }

    /// Icon name for this bucket.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Clear => "day-sunny",
            Self::PartlyCloudy => "cloud",
            Self::Cloudy => "cloudy",
            Self::Showers => "showers",
            Self::Rain => "rain",
            Self::Thunderstorm => "thunderstorm",
            Self::Snow => "snow",
            Self::Haze => "fog",
        }
    }
}

/// Temperature/humidity block shared by current and forecast payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct Thermals {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherSummary {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SunTimes {
    pub country: Option<String>,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Current conditions for one city. Field names mirror the API payload;
/// only the fields the app renders are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    pub name: String,
    pub main: Thermals,
    pub weather: Vec<WeatherSummary>,
    pub wind: Wind,
    pub sys: SunTimes,
    /// Offset from UTC in seconds.
    pub timezone: i32,
    /// Observation time, Unix seconds.
    pub dt: i64,
}

impl CurrentConditions {
    pub fn condition(&self) -> Condition {
        self.weather
            .first()
            .map(|w| Condition::from_description(&w.description))
            .unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.weather.first().map(|w| w.description.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastCity {
    pub name: String,
    pub country: Option<String>,
    pub timezone: i32,
}

/// One three-hour forecast slot.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastSlot {
    pub dt: i64,
    pub main: Thermals,
    pub weather: Vec<WeatherSummary>,
    /// Probability of precipitation, 0.0 to 1.0.
    #[serde(default)]
    pub pop: f64,
}

impl ForecastSlot {
    pub fn condition(&self) -> Condition {
        self.weather
            .first()
            .map(|w| Condition::from_description(&w.description))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Forecast {
    pub city: ForecastCity,
    pub list: Vec<ForecastSlot>,
}

/// Format a Unix timestamp in the city's local time ("07:42 AM").
/// Falls back to a placeholder if the shifted timestamp is out of range.
pub fn format_local_time(timestamp: i64, timezone_offset_secs: i32) -> String {
    DateTime::<Utc>::from_timestamp(timestamp + i64::from(timezone_offset_secs), 0)
        .map(|dt| dt.format("%I:%M %p").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

/// Weather fetch errors. These are user-visible: `user_message` returns a
/// display-ready string for the view layer.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("City not found: {0}")]
    CityNotFound(String),
    #[error("Weather service returned status {0}")]
    Status(u16),
    #[error("Invalid weather service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::Network(_) => "Unable to reach the weather service. Check your connection.",
            WeatherError::CityNotFound(_) => "No weather data for that city. Check the spelling.",
            WeatherError::Status(_) => "The weather service is having trouble. Please try again.",
            WeatherError::InvalidUrl(_) => "Weather service is misconfigured.",
        }
    }
}
