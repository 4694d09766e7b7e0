//! Synthetic weather data for demo mode and tests.

use async_trait::async_trait;

use crate::{
    error::WeatherError,
    model::{
        City, Clouds, Condition, Coordinates, ForecastBundle, ForecastLocation, ForecastSample,
        MainMetrics, SystemInfo, WeatherSnapshot, Wind, unix_to_utc,
    },
};

use super::WeatherProvider;

/// 2022-01-01 00:00:00 UTC.
pub const MOCK_EPOCH: i64 = 1_640_995_200;
const SUNRISE: i64 = MOCK_EPOCH + 8 * 3600;
const SUNSET: i64 = MOCK_EPOCH + 16 * 3600;
const SAMPLE_STEP: i64 = 3 * 3600;
const SAMPLE_COUNT: i64 = 40;

/// Serves generated data for any city without touching the network.
#[derive(Debug, Clone, Default)]
pub struct MockProvider;

#[async_trait]
impl WeatherProvider for MockProvider {
    async fn search_cities(&self, query: &str, limit: u8) -> Result<Vec<City>, WeatherError> {
        let name = query.trim();
        let candidates = [("England", "GB", 51.5074, -0.1278), ("Ontario", "CA", 42.9849, -81.2453)];

        Ok(candidates
            .iter()
            .take(limit as usize)
            .map(|(state, country, lat, lon)| City {
                name: name.to_string(),
                local_names: None,
                lat: *lat,
                lon: *lon,
                country: country.to_string(),
                state: Some(state.to_string()),
            })
            .collect())
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        let mut snapshot = mock_snapshot();
        snapshot.location_name = location_label(city);
        Ok(snapshot)
    }

    async fn fetch_forecast(&self, city: &str) -> Result<ForecastBundle, WeatherError> {
        let mut bundle = mock_forecast();
        bundle.location.name = location_label(city);
        Ok(bundle)
    }
}

fn location_label(city: &str) -> String {
    city.split(',').next().unwrap_or(city).trim().to_string()
}

fn condition(index: i64) -> Condition {
    match index.rem_euclid(3) {
        0 => Condition {
            id: 800,
            main: "Clear".into(),
            description: "clear sky".into(),
            icon: "01d".into(),
        },
        1 => Condition {
            id: 803,
            main: "Clouds".into(),
            description: "broken clouds".into(),
            icon: "04d".into(),
        },
        _ => Condition {
            id: 500,
            main: "Rain".into(),
            description: "light rain".into(),
            icon: "10d".into(),
        },
    }
}

/// Current conditions: a clear 25 °C day in London.
pub fn mock_snapshot() -> WeatherSnapshot {
    WeatherSnapshot {
        conditions: vec![condition(0)],
        main: MainMetrics {
            temp: 25.0,
            feels_like: 26.0,
            temp_min: 20.0,
            temp_max: 30.0,
            pressure: 1013,
            humidity: 65,
        },
        location_name: "London".into(),
        sys: SystemInfo {
            country: "GB".into(),
            sunrise: SUNRISE,
            sunset: SUNSET,
        },
        wind: Wind { speed: 5.0, deg: 180 },
        clouds: Clouds { all: 20 },
        visibility: 10_000,
        dt: MOCK_EPOCH,
    }
}

/// Forty 3-hourly samples starting at [`MOCK_EPOCH`].
///
/// Values vary with the sample index so every day looks different, but the
/// output is the same on every call.
pub fn mock_forecast() -> ForecastBundle {
    let samples = (0..SAMPLE_COUNT).map(mock_sample).collect();

    ForecastBundle {
        samples,
        location: ForecastLocation {
            id: 2_643_743,
            name: "London".into(),
            country: "GB".into(),
            population: 8_908_081,
            timezone: 0,
            sunrise: SUNRISE,
            sunset: SUNSET,
            coord: Coordinates {
                lat: 51.5074,
                lon: -0.1278,
            },
        },
    }
}

fn mock_sample(index: i64) -> ForecastSample {
    let dt = MOCK_EPOCH + index * SAMPLE_STEP;
    // Warmest around 15:00, coldest around 03:00.
    let hour_of_day = (index * 3) % 24;
    let diurnal = 6.0 - ((hour_of_day - 15).abs() as f64) / 2.0;
    let day = index / 8;
    let temp = 15.0 + diurnal + (day % 3) as f64;
    let condition = condition(day + index / 4);

    ForecastSample {
        dt,
        main: MainMetrics {
            temp,
            feels_like: temp - 1.0,
            temp_min: temp - 2.0,
            temp_max: temp + 2.0,
            pressure: 1013,
            humidity: (40 + (index * 7) % 41) as u8,
        },
        clouds: Clouds {
            all: ((index * 13) % 101) as u8,
        },
        wind: Wind {
            speed: ((index * 5) % 16) as f64,
            deg: ((index * 45) % 360) as u16,
        },
        visibility: 10_000,
        pop: if condition.main == "Rain" { 0.6 } else { ((index % 5) as f64) / 10.0 },
        dt_txt: unix_to_utc(dt).format("%Y-%m-%d %H:%M:%S").to_string(),
        conditions: vec![condition],
    }
}
