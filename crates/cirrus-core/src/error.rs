//! Centralized error types for the Cirrus application.
//!
//! Every error that reaches the view layer converts to `AppError`; the view
//! renders `user_message()` and logs the full error. Propagation policy:
//! weather fetches and search-history writes are user-visible, everything on
//! the read and suggestion paths degrades silently before it gets here.

use thiserror::Error;

use cirrus_search::SearchError;
use cirrus_weather::WeatherError;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Search history error: {0}")]
    Search(#[from] SearchError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// A message suitable for display in the UI: actionable, non-technical.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Weather(e) => e.user_message(),
            AppError::Search(SearchError::Persistence(_)) => {
                "Couldn't save your recent searches. They may not survive a restart."
            }
            AppError::Search(SearchError::EmptyTerm) => "Type a city name to search.",
            AppError::Config(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(String),

    #[error("Config file is malformed: {0}")]
    Parse(String),

    #[error("Failed to write config file: {0}")]
    Write(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Read(_) => "Couldn't read your settings. Using defaults.",
            ConfigError::Parse(_) => "Your settings file is malformed. Check its contents.",
            ConfigError::Write(_) => "Couldn't save your settings. Please try again.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_search::StorageError;

    #[test]
    fn test_persistence_failure_has_user_message() {
        let err = AppError::from(SearchError::Persistence(StorageError::WriteFailed(
            "disk full".to_string(),
        )));
        assert!(err.user_message().contains("recent searches"));
    }

    #[test]
    fn test_city_not_found_maps_through() {
        let err = AppError::from(WeatherError::CityNotFound("atlantis".to_string()));
        assert_eq!(err.user_message(), "No weather data for that city. Check the spelling.");
    }

    #[test]
    fn test_config_parse_error_message() {
        let err = AppError::from(ConfigError::Parse("bad toml".to_string()));
        assert!(err.user_message().contains("settings"));
    }
}
