//! Display helpers for weather values.

/// `25.4` → `"25°C"`.
pub fn format_temperature(celsius: f64) -> String {
    format!("{}°C", whole(celsius))
}

/// Metric API units report wind in metres per second.
pub fn format_wind_speed(mps: f64) -> String {
    format!("{} m/s", whole(mps))
}

pub fn format_humidity(percent: u8) -> String {
    format!("{percent}%")
}

/// Precipitation probability, `0.35` → `"35%"`.
pub fn format_pop(probability: f64) -> String {
    format!("{}%", whole(probability.clamp(0.0, 1.0) * 100.0))
}

// Half away from zero.
fn whole(value: f64) -> i64 {
    value.round() as i64
}
