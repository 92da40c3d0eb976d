//! Weather lookups for Cirrus
//!
//! Current conditions and a multi-day forecast via the OpenWeatherMap API,
//! plus reverse geocoding for the "use my location" entry point.

pub mod client;
pub mod geocode;
pub mod types;

pub use client::WeatherClient;
pub use geocode::reverse_geocode;
pub use types::*;
