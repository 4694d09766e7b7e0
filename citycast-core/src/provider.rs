use crate::{
    Config, WeatherError,
    model::{City, ForecastBundle, WeatherSnapshot},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod mock;
pub mod openweather;

/// Default number of geocoding matches requested.
pub const DEFAULT_CITY_LIMIT: u8 = 5;

/// Source of city, current-weather and forecast data.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn search_cities(&self, query: &str, limit: u8) -> Result<Vec<City>, WeatherError>;

    async fn fetch_current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError>;

    async fn fetch_forecast(&self, city: &str) -> Result<ForecastBundle, WeatherError>;
}

/// Construct the OpenWeatherMap client from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.resolved_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeatherMap API key configured.\n\
                 Hint: run `citycast configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    Ok(OpenWeatherClient::new(
        api_key,
        config.weather_base_url.clone(),
        config.geocode_base_url.clone(),
    ))
}
