use std::{collections::HashMap, fmt::Display};

use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{category::WeatherCategory, forecast::daily_forecast};

/// A geocoding match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    #[serde(default)]
    pub local_names: Option<HashMap<String, String>>,
    pub lat: f64,
    pub lon: f64,
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
}

impl City {
    fn state(&self) -> Option<&str> {
        self.state.as_deref().filter(|s| !s.is_empty())
    }

    /// "name, state, country", or "name, country" when there is no state.
    pub fn display_name(&self) -> String {
        match self.state() {
            Some(state) => format!("{}, {}, {}", self.name, state, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }

    /// Name of the city in the given language code (e.g. "de"), if known.
    pub fn local_name(&self, lang: &str) -> Option<&str> {
        self.local_names.as_ref()?.get(lang).map(String::as_str)
    }

    /// The `q` value that asks the weather endpoints for this exact city.
    pub fn query(&self) -> String {
        match self.state() {
            Some(state) => format!("{},{},{}", self.name, state, self.country),
            None => format!("{},{}", self.name, self.country),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

impl Condition {
    pub fn category(&self) -> WeatherCategory {
        WeatherCategory::from_main(&self.main)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainMetrics {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: u32,
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    pub all: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(default)]
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Current conditions for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    #[serde(rename = "weather")]
    pub conditions: Vec<Condition>,
    pub main: MainMetrics,
    #[serde(rename = "name")]
    pub location_name: String,
    pub sys: SystemInfo,
    pub wind: Wind,
    pub clouds: Clouds,
    /// Metres.
    #[serde(default)]
    pub visibility: u32,
    pub dt: i64,
}

impl WeatherSnapshot {
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.conditions.first()
    }

    /// Category of the first condition; `Clear` when the API sent none.
    pub fn category(&self) -> WeatherCategory {
        self.primary_condition().map(Condition::category).unwrap_or_default()
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        unix_to_utc(self.dt)
    }

    pub fn sunrise_at(&self) -> DateTime<Utc> {
        unix_to_utc(self.sys.sunrise)
    }

    pub fn sunset_at(&self) -> DateTime<Utc> {
        unix_to_utc(self.sys.sunset)
    }
}

/// One 3-hourly forecast point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub dt: i64,
    pub main: MainMetrics,
    #[serde(rename = "weather")]
    pub conditions: Vec<Condition>,
    pub clouds: Clouds,
    pub wind: Wind,
    #[serde(default)]
    pub visibility: u32,
    /// Probability of precipitation, 0.0 to 1.0.
    #[serde(default)]
    pub pop: f64,
    pub dt_txt: String,
}

impl ForecastSample {
    pub fn time(&self) -> DateTime<Utc> {
        unix_to_utc(self.dt)
    }

    pub fn category(&self) -> WeatherCategory {
        self.conditions.first().map(Condition::category).unwrap_or_default()
    }

    /// Weekday name, e.g. "Monday".
    pub fn day_name<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.time().with_timezone(tz).format("%A").to_string()
    }

    /// "HH:MM".
    pub fn time_label<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.time().with_timezone(tz).format("%H:%M").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastLocation {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub population: u64,
    /// Offset from UTC in seconds.
    pub timezone: i32,
    pub sunrise: i64,
    pub sunset: i64,
    pub coord: Coordinates,
}

impl ForecastLocation {
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.timezone)
    }
}

/// 5-day / 3-hour forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBundle {
    #[serde(rename = "list")]
    pub samples: Vec<ForecastSample>,
    #[serde(rename = "city")]
    pub location: ForecastLocation,
}

impl ForecastBundle {
    /// One sample per calendar day in the machine's time zone.
    pub fn daily_local(&self) -> Vec<ForecastSample> {
        daily_forecast(&self.samples, &Local)
    }

    /// One sample per calendar day at the forecast location.
    ///
    /// Falls back to UTC when the reported offset is out of range.
    pub fn daily_at_city(&self) -> Vec<ForecastSample> {
        match self.location.utc_offset() {
            Some(offset) => daily_forecast(&self.samples, &offset),
            None => daily_forecast(&self.samples, &Utc),
        }
    }
}

pub(crate) fn unix_to_utc(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_default()
}
