//! Core library for the `citycast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeatherMap client behind the [`WeatherProvider`] trait
//! - Domain models decoded from the API
//! - Reduction of the 3-hourly forecast to one sample per day
//! - The search session that fetches current weather and forecast together
//!
//! It is used by `citycast-cli`, but can also be reused by other binaries or services.

pub mod category;
pub mod config;
pub mod error;
pub mod forecast;
pub mod format;
pub mod model;
pub mod provider;
pub mod search;

pub use category::WeatherCategory;
pub use config::Config;
pub use error::WeatherError;
pub use forecast::daily_forecast;
pub use model::{City, ForecastBundle, ForecastSample, WeatherSnapshot};
pub use provider::{
    WeatherProvider, mock::MockProvider, openweather::OpenWeatherClient, provider_from_config,
};
pub use search::{SearchSession, SearchState, WeatherReport};
