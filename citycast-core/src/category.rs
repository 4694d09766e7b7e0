use serde::{Deserialize, Serialize};

/// Coarse weather classes used to pick iconography.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeatherCategory {
    #[default]
    Clear,
    Cloudy,
    Rainy,
    Snowy,
    Stormy,
    Foggy,
}

impl WeatherCategory {
    /// Map the API's `main` condition text to a category.
    ///
    /// Matching ignores case. Unknown text maps to [`WeatherCategory::Clear`].
    pub fn from_main(main: &str) -> Self {
        match main.trim().to_lowercase().as_str() {
            "clear" => WeatherCategory::Clear,
            "clouds" => WeatherCategory::Cloudy,
            "rain" | "drizzle" => WeatherCategory::Rainy,
            "snow" => WeatherCategory::Snowy,
            "thunderstorm" => WeatherCategory::Stormy,
            "mist" | "fog" | "haze" => WeatherCategory::Foggy,
            _ => WeatherCategory::Clear,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeatherCategory::Clear => "Clear",
            WeatherCategory::Cloudy => "Cloudy",
            WeatherCategory::Rainy => "Rainy",
            WeatherCategory::Snowy => "Snowy",
            WeatherCategory::Stormy => "Stormy",
            WeatherCategory::Foggy => "Foggy",
        }
    }

    /// Single-glyph icon for terminal output.
    pub fn glyph(&self) -> &'static str {
        match self {
            WeatherCategory::Clear => "☀️",
            WeatherCategory::Cloudy => "☁️",
            WeatherCategory::Rainy => "🌧️",
            WeatherCategory::Snowy => "🌨️",
            WeatherCategory::Stormy => "⛈️",
            WeatherCategory::Foggy => "🌫️",
        }
    }

    pub const fn all() -> &'static [WeatherCategory] {
        &[
            WeatherCategory::Clear,
            WeatherCategory::Cloudy,
            WeatherCategory::Rainy,
            WeatherCategory::Snowy,
            WeatherCategory::Stormy,
            WeatherCategory::Foggy,
        ]
    }
}

impl std::fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
