//! Core library for the `weather` app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com forecast client
//! - A repository that turns client failures into plain [`FetchError`] values
//! - The UI state projector the presentation layer observes
//!
//! Wiring is explicit: client → [`ForecastRepository`] → [`GetWeatherForecast`] →
//! [`WeatherProjector`].

pub mod config;
pub mod model;
pub mod projector;
pub mod provider;
pub mod repository;
pub mod usecase;

pub use config::{Config, ForecastQuery};
pub use model::{Condition, Current, Day, Forecast, ForecastDay, Hour, Location, WeatherResponse};
pub use projector::{UiState, WeatherProjector};
pub use provider::{ClientError, ForecastProvider, provider_from_config};
pub use repository::{FetchError, ForecastRepository, WeatherRepository};
pub use usecase::{FetchForecast, GetWeatherForecast};

use std::sync::Arc;

/// Build the whole chain from config and start the first fetch.
pub fn projector_from_config(
    config: &Config,
    location: Option<&str>,
    days: Option<u32>,
) -> anyhow::Result<WeatherProjector> {
    let query = config.forecast_query(location, days)?;
    let provider = provider_from_config(config)?;
    let repository = ForecastRepository::new(provider, query);
    let fetch = GetWeatherForecast::new(Arc::new(repository));

    Ok(WeatherProjector::new(Arc::new(fetch)))
}
