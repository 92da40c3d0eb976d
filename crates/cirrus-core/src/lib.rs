//! Application core for Cirrus: configuration, the central error type, and
//! process-level initialization.

pub mod config;
pub mod error;

pub use config::{Config, SearchConfig, ValidationIssue, ValidationResult, WeatherConfig};
pub use error::{AppError, ConfigError};

use anyhow::Result;

/// Initialize process-wide logging.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps room for future setup steps.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Cirrus core initialized");
    Ok(())
}
