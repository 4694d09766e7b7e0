use reqwest::StatusCode;
use thiserror::Error;

/// Every way a weather lookup can fail.
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No data received")]
    NoData,

    #[error("Failed to decode weather data")]
    Decode(#[source] serde_json::Error),

    #[error("Network error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("API key is invalid or not activated. Please check your OpenWeatherMap API key.")]
    Auth,

    #[error("City not found. Please check the city name.")]
    CityNotFound,

    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("HTTP Error: {}", .0.as_u16())]
    Server(StatusCode),
}

impl WeatherError {
    /// HTTP status the error was mapped from, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            WeatherError::Auth => Some(StatusCode::UNAUTHORIZED),
            WeatherError::CityNotFound => Some(StatusCode::NOT_FOUND),
            WeatherError::RateLimited => Some(StatusCode::TOO_MANY_REQUESTS),
            WeatherError::Server(status) => Some(*status),
            WeatherError::Transport(err) => err.status(),
            _ => None,
        }
    }
}
