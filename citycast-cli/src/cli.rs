use std::{fmt, sync::Arc};

use anyhow::{Context, anyhow, bail};
use citycast_core::{
    City, Config, MockProvider, SearchSession, SearchState, WeatherProvider,
    provider::DEFAULT_CITY_LIMIT, provider_from_config,
};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use tracing::debug;

use crate::render::{self, ForecastClock};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citycast", version, about = "City weather lookup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key.
    Configure,

    /// Show current weather and the daily forecast for a city.
    Show {
        /// City name, optionally with country code, e.g. "Paris,FR".
        city: String,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Look up matching cities, pick one, and show its weather.
    Search {
        /// Free-text place name.
        query: String,

        /// Maximum number of matches to offer.
        #[arg(long, default_value_t = DEFAULT_CITY_LIMIT)]
        limit: u8,

        #[command(flatten)]
        view: ViewArgs,
    },
}

#[derive(Debug, clap::Args)]
pub struct ViewArgs {
    /// Number of forecast days; defaults to `forecast_days` from the config.
    #[arg(long)]
    days: Option<usize>,

    /// Group the forecast by the city's own calendar days instead of local ones.
    #[arg(long)]
    city_time: bool,

    /// Use generated data instead of calling the API.
    #[arg(long)]
    demo: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, view } => {
                let config = Config::load()?;
                let provider = provider_for(&config, view.demo)?;
                show(provider, &city, &config, &view).await
            }
            Command::Search { query, limit, view } => {
                let config = Config::load()?;
                let provider = provider_for(&config, view.demo)?;

                let cities = provider.search_cities(&query, limit).await?;
                let city = pick_city(cities, &query)?;
                show(provider, &city.query(), &config, &view).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_help_message("Create one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn provider_for(config: &Config, demo: bool) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    if demo {
        debug!("using generated demo data");
        return Ok(Arc::new(MockProvider));
    }
    Ok(Arc::new(provider_from_config(config)?))
}

async fn show(
    provider: Arc<dyn WeatherProvider>,
    query: &str,
    config: &Config,
    view: &ViewArgs,
) -> anyhow::Result<()> {
    let session = SearchSession::new(provider);
    let days = view.days.unwrap_or(config.forecast_days);
    let clock = if view.city_time { ForecastClock::City } else { ForecastClock::Local };

    match session.search(query).await {
        SearchState::Success(report) => {
            print!("{}", render::report(&report, days, clock));
            Ok(())
        }
        SearchState::Failed(message) => Err(anyhow!(message)),
        other => Err(anyhow!("Search ended in unexpected state: {other}")),
    }
}

struct CityChoice(City);

impl fmt::Display for CityChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}, {:.2})", self.0.display_name(), self.0.lat, self.0.lon)
    }
}

fn pick_city(mut cities: Vec<City>, query: &str) -> anyhow::Result<City> {
    match cities.len() {
        0 => bail!("No cities found for '{query}'."),
        1 => Ok(cities.swap_remove(0)),
        _ => {
            let choices: Vec<CityChoice> = cities.into_iter().map(CityChoice).collect();
            let choice = Select::new("Pick a city:", choices)
                .prompt()
                .context("No city selected")?;
            Ok(choice.0)
        }
    }
}
