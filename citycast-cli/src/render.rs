use std::fmt::{Display, Write};

use chrono::{DateTime, Local, TimeZone, Utc};
use citycast_core::{
    WeatherReport,
    format::{format_humidity, format_pop, format_temperature, format_wind_speed},
};

/// Which calendar the daily forecast and clock times follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastClock {
    /// The machine's local time zone.
    Local,
    /// The forecast city's UTC offset.
    City,
}

pub fn report(report: &WeatherReport, days: usize, clock: ForecastClock) -> String {
    match clock {
        ForecastClock::Local => render_in(report, days, &Local),
        ForecastClock::City => match report.forecast.location.utc_offset() {
            Some(offset) => render_in(report, days, &offset),
            None => render_in(report, days, &Utc),
        },
    }
}

fn render_in<Tz>(report: &WeatherReport, days: usize, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let snapshot = &report.snapshot;
    let category = snapshot.category();
    let description = snapshot
        .primary_condition()
        .map(|c| c.description.as_str())
        .unwrap_or("no description");
    let clock = |at: DateTime<Utc>| at.with_timezone(tz).format("%H:%M").to_string();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  {}, {}: {} ({})",
        category.glyph(),
        snapshot.location_name,
        snapshot.sys.country,
        category,
        description
    );
    let _ = writeln!(
        out,
        "  Temperature  {} (feels like {}, {} to {})",
        format_temperature(snapshot.main.temp),
        format_temperature(snapshot.main.feels_like),
        format_temperature(snapshot.main.temp_min),
        format_temperature(snapshot.main.temp_max)
    );
    let _ = writeln!(out, "  Humidity     {}", format_humidity(snapshot.main.humidity));
    let _ = writeln!(
        out,
        "  Wind         {} from {}°",
        format_wind_speed(snapshot.wind.speed),
        snapshot.wind.deg
    );
    let _ = writeln!(out, "  Clouds       {}%", snapshot.clouds.all);
    let _ = writeln!(out, "  Visibility   {:.1} km", f64::from(snapshot.visibility) / 1000.0);
    let _ = writeln!(
        out,
        "  Sun          {} up, {} down",
        clock(snapshot.sunrise_at()),
        clock(snapshot.sunset_at())
    );

    let daily = report.daily_forecast(tz, days);
    if daily.is_empty() {
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}-day forecast", daily.len());
    for sample in &daily {
        let description = sample
            .conditions
            .first()
            .map(|c| c.description.as_str())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:<9}  {}  {}  {:>5}  {:<16}  rain {}",
            sample.day_name(tz),
            sample.time_label(tz),
            sample.category().glyph(),
            format_temperature(sample.main.temp),
            description,
            format_pop(sample.pop)
        );
    }

    out
}
