use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use cirrus_weather::Units;

/// Environment variable that overrides the configured weather API key.
pub const WEATHER_KEY_ENV: &str = "CIRRUS_WEATHER_KEY";

/// A single validation finding.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation. Warnings are logged; errors block startup.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationIssue { field: field.into(), message: message.into() });
    }

    fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue { field: field.into(), message: message.into() });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding config.toml.
    pub config_dir: PathBuf,

    /// Directory for durable app data (the recent-searches store).
    pub data_dir: PathBuf,

    /// Weather provider settings.
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Search and autocomplete settings.
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key. Can also be supplied via `CIRRUS_WEATHER_KEY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Measurement system for temperatures and wind speed.
    #[serde(default)]
    pub units: Units,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet interval after the last keystroke before autocomplete fires.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Inputs shorter than this never reach the autocomplete provider.
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Cap on persisted recent searches; 0 keeps everything.
    #[serde(default)]
    pub max_entries: usize,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    3
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            max_entries: 0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir =
            dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("cirrus");
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("cirrus");

        Self {
            config_dir,
            data_dir,
            weather: WeatherConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the platform config directory, creating the
    /// file with defaults on first run. A `CIRRUS_WEATHER_KEY` environment
    /// variable overrides the configured API key.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or parsed, or if the
    /// default file cannot be written on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let default = Self::default();
        let dir = default.config_dir.clone();
        Self::load_from(&dir)
    }

    /// Load configuration rooted at an explicit directory.
    ///
    /// # Errors
    ///
    /// Same failure classes as [`Self::load`].
    pub fn load_from(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.toml");

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::Read(e.to_string()))?;
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else {
            let config = Self { config_dir: config_dir.to_path_buf(), ..Self::default() };
            config.save()?;
            config
        };

        if let Ok(key) = std::env::var(WEATHER_KEY_ENV) {
            if !key.is_empty() {
                config.weather.api_key = Some(key);
            }
        }

        Ok(config)
    }

    /// Write the configuration back to `<config_dir>/config.toml`.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be created or the file written.
    pub fn save(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.config_dir)
            .map_err(|e| ConfigError::Write(e.to_string()))?;
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Write(e.to_string()))?;
        std::fs::write(self.config_dir.join("config.toml"), contents)
            .map_err(|e| ConfigError::Write(e.to_string()))
    }

    /// Validate the configuration. A missing API key is a warning, not an
    /// error: the search subsystem works without it.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.weather.api_key.as_deref().map_or(true, str::is_empty) {
            result.add_warning(
                "weather.api_key",
                format!("no API key configured; set it or export {WEATHER_KEY_ENV}"),
            );
        }

        if self.search.debounce_ms == 0 {
            result.add_warning(
                "search.debounce_ms",
                "debounce disabled; the autocomplete provider may rate-limit",
            );
        }

        if self.search.min_query_len == 0 {
            result.add_error(
                "search.min_query_len",
                "must be at least 1 to avoid querying on empty input",
            );
        }

        result
    }
}
