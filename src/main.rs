use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use cirrus_core::{AppError, Config};
use cirrus_search::{
    JsonFileStore, NominatimPlaces, PlaceSuggester, RecentSearchStore, SystemClock,
};
use cirrus_weather::{format_local_time, WeatherClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    cirrus_core::init()?;

    let config = Config::load()?;
    for warning in &config.validate().warnings {
        tracing::warn!("Config warning: {}", warning);
    }

    let storage = Arc::new(JsonFileStore::new(config.data_dir.clone()));
    let store = Arc::new(
        RecentSearchStore::new(storage, Arc::new(SystemClock))
            .with_max_entries(config.search.max_entries),
    );

    let arg = std::env::args().nth(1).context("usage: cirrus <city> | cirrus suggest <text>")?;

    if arg == "suggest" {
        let text = std::env::args().nth(2).context("usage: cirrus suggest <text>")?;
        return suggest(&config, store, &text).await;
    }

    lookup(&config, store, &arg).await
}

/// Fetch and print current conditions and the next forecast slots, then
/// record the search.
async fn lookup(config: &Config, store: Arc<RecentSearchStore>, city: &str) -> Result<()> {
    let api_key = config
        .weather
        .api_key
        .clone()
        .context("no weather API key; set weather.api_key or CIRRUS_WEATHER_KEY")?;
    let client = WeatherClient::new(api_key)?;
    let units = config.weather.units;

    let current = match client.fetch_current(city, units).await {
        Ok(current) => current,
        Err(e) => {
            let err = AppError::from(e);
            eprintln!("{}", err.user_message());
            return Err(err.into());
        }
    };

    let suffix = units.temperature_suffix();
    println!("{} - {}", current.name, current.description());
    println!(
        "  {:.1}{suffix} (feels like {:.1}{suffix}), humidity {}%",
        current.main.temp, current.main.feels_like, current.main.humidity
    );
    println!(
        "  sunrise {}  sunset {}",
        format_local_time(current.sys.sunrise, current.timezone),
        format_local_time(current.sys.sunset, current.timezone)
    );

    if let Ok(forecast) = client.fetch_forecast(city, units).await {
        println!("\nNext hours:");
        for slot in forecast.list.iter().take(4) {
            println!(
                "  {}  {:.1}{suffix}  {}",
                format_local_time(slot.dt, forecast.city.timezone),
                slot.main.temp,
                slot.weather.first().map(|w| w.description.as_str()).unwrap_or("")
            );
        }
    }

    if let Err(e) = store.add(city).await {
        let err = AppError::from(e);
        tracing::warn!("Failed to record search: {}", err);
        eprintln!("{}", err.user_message());
    }

    println!("\nRecent searches:");
    for entry in store.load().await {
        println!("  {}", entry.term);
    }

    Ok(())
}

/// One-shot run of the autocomplete pipeline: feed the text, wait for the
/// debounced result, print the suggestions.
async fn suggest(config: &Config, store: Arc<RecentSearchStore>, text: &str) -> Result<()> {
    let provider = Arc::new(NominatimPlaces::new()?);
    let suggester = PlaceSuggester::with_settings(
        provider,
        store,
        Duration::from_millis(config.search.debounce_ms),
        config.search.min_query_len,
    );

    let mut rx = suggester.subscribe();
    suggester.on_input(text);
    tokio::time::timeout(Duration::from_secs(15), rx.changed())
        .await
        .context("timed out waiting for suggestions")?
        .context("suggestion channel closed")?;

    let suggestions = rx.borrow().clone();
    if suggestions.is_empty() {
        println!("No suggestions for {text:?}");
    } else {
        for suggestion in &suggestions {
            println!("{}", suggestion.label);
        }
    }

    Ok(())
}
