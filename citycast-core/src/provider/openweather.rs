use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    config::{DEFAULT_GEOCODE_BASE_URL, DEFAULT_WEATHER_BASE_URL},
    error::WeatherError,
    model::{City, ForecastBundle, WeatherSnapshot},
};

use super::WeatherProvider;

/// HTTP client for the OpenWeatherMap geocoding, weather and forecast APIs.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    weather_base_url: String,
    geocode_base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, weather_base_url: String, geocode_base_url: String) -> Self {
        Self {
            api_key,
            weather_base_url,
            geocode_base_url,
            http: Client::new(),
        }
    }

    pub fn with_default_endpoints(api_key: String) -> Self {
        Self::new(
            api_key,
            DEFAULT_WEATHER_BASE_URL.to_string(),
            DEFAULT_GEOCODE_BASE_URL.to_string(),
        )
    }

    fn geocode_url(&self, query: &str, limit: u8) -> Result<Url, WeatherError> {
        let limit = limit.to_string();
        build_url(
            &self.geocode_base_url,
            "direct",
            &[("q", query), ("limit", limit.as_str()), ("appid", self.api_key.as_str())],
        )
    }

    fn weather_url(&self, path: &str, city: &str) -> Result<Url, WeatherError> {
        build_url(
            &self.weather_base_url,
            path,
            &[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")],
        )
    }

    async fn get(&self, url: Url) -> Result<(StatusCode, String), WeatherError> {
        debug!(host = url.host_str(), path = url.path(), "sending OpenWeatherMap request");

        let res = self.http.get(url).send().await.map_err(transport)?;
        let status = res.status();
        let body = res.text().await.map_err(transport)?;

        debug!(%status, bytes = body.len(), "received OpenWeatherMap response");
        Ok((status, body))
    }

    async fn fetch_weather<T: DeserializeOwned>(
        &self,
        path: &str,
        city: &str,
    ) -> Result<T, WeatherError> {
        let url = self.weather_url(path, non_blank(city)?)?;
        let (status, body) = self.get(url).await?;

        if let Some(err) = weather_status_error(status) {
            warn!(%status, body = %truncate_body(&body), "OpenWeatherMap {path} request failed");
            return Err(err);
        }

        decode(&body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn search_cities(&self, query: &str, limit: u8) -> Result<Vec<City>, WeatherError> {
        let url = self.geocode_url(non_blank(query)?, limit)?;
        let (status, body) = self.get(url).await?;

        if let Some(err) = geocode_status_error(status) {
            warn!(%status, body = %truncate_body(&body), "OpenWeatherMap geocoding request failed");
            return Err(err);
        }

        decode(&body)
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        self.fetch_weather("weather", city).await
    }

    async fn fetch_forecast(&self, city: &str) -> Result<ForecastBundle, WeatherError> {
        self.fetch_weather("forecast", city).await
    }
}

/// Error for a non-200 answer from the weather or forecast endpoint.
pub fn weather_status_error(status: StatusCode) -> Option<WeatherError> {
    match status {
        StatusCode::OK => None,
        StatusCode::UNAUTHORIZED => Some(WeatherError::Auth),
        StatusCode::NOT_FOUND => Some(WeatherError::CityNotFound),
        StatusCode::TOO_MANY_REQUESTS => Some(WeatherError::RateLimited),
        other => Some(WeatherError::Server(other)),
    }
}

/// Error for a non-200 answer from the geocoding endpoint.
pub fn geocode_status_error(status: StatusCode) -> Option<WeatherError> {
    match status {
        StatusCode::OK => None,
        StatusCode::UNAUTHORIZED => Some(WeatherError::Auth),
        other => Some(WeatherError::Server(other)),
    }
}

fn build_url(base: &str, path: &str, params: &[(&str, &str)]) -> Result<Url, WeatherError> {
    let endpoint = format!("{}/{}", base.trim_end_matches('/'), path);
    Url::parse_with_params(&endpoint, params)
        .map_err(|e| WeatherError::InvalidRequest(format!("{endpoint}: {e}")))
}

fn non_blank(query: &str) -> Result<&str, WeatherError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(WeatherError::InvalidRequest("empty location query".to_string()));
    }
    Ok(trimmed)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, WeatherError> {
    if body.trim().is_empty() {
        return Err(WeatherError::NoData);
    }
    serde_json::from_str(body).map_err(WeatherError::Decode)
}

// The request URL carries the API key, keep it out of messages.
fn transport(err: reqwest::Error) -> WeatherError {
    WeatherError::Transport(err.without_url())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
