//! User-driven weather search.
//!
//! A [`SearchSession`] runs the current-weather and forecast requests for a
//! query side by side and publishes a single [`SearchState`]. Either both
//! requests succeed or the whole search fails with the first error.

use std::{
    fmt::Display,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use chrono::TimeZone;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    forecast::daily_forecast,
    model::{ForecastBundle, ForecastSample, WeatherSnapshot},
    provider::WeatherProvider,
};

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a city name";

/// Everything fetched for one successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub snapshot: WeatherSnapshot,
    pub forecast: ForecastBundle,
}

impl WeatherReport {
    /// Up to `days` noon-nearest samples, one per calendar day in `tz`.
    pub fn daily_forecast<Tz: TimeZone>(&self, tz: &Tz, days: usize) -> Vec<ForecastSample> {
        let mut daily = daily_forecast(&self.forecast.samples, tz);
        daily.truncate(days);
        daily
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    Success(Box<WeatherReport>),
    Failed(String),
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SearchState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        match self {
            SearchState::Success(report) => Some(report),
            _ => None,
        }
    }
}

impl Display for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchState::Idle => f.write_str("idle"),
            SearchState::Loading => f.write_str("loading"),
            SearchState::Success(report) => write!(f, "success ({})", report.snapshot.location_name),
            SearchState::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

/// Drives searches against a provider and publishes their state.
///
/// Starting a search supersedes any search still in flight: the older one
/// still runs to completion and returns its result to its caller, but only
/// the newest search updates the published state.
#[derive(Debug)]
pub struct SearchSession {
    provider: Arc<dyn WeatherProvider>,
    state: watch::Sender<SearchState>,
    latest: AtomicU64,
}

impl SearchSession {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        let (state, _) = watch::channel(SearchState::Idle);
        Self {
            provider,
            state,
            latest: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Fetch current conditions and forecast for `query`.
    pub async fn search(&self, query: &str) -> SearchState {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let query = query.trim();

        if query.is_empty() {
            let failed = SearchState::Failed(EMPTY_QUERY_MESSAGE.to_string());
            self.publish(ticket, failed.clone());
            return failed;
        }

        self.publish(ticket, SearchState::Loading);
        info!(%query, ticket, "searching weather");

        let (current, forecast) = tokio::join!(
            self.provider.fetch_current(query),
            self.provider.fetch_forecast(query),
        );

        let outcome = match (current, forecast) {
            (Ok(snapshot), Ok(forecast)) => {
                debug!(samples = forecast.samples.len(), "weather search succeeded");
                SearchState::Success(Box::new(WeatherReport { snapshot, forecast }))
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!(%query, error = %err, "weather search failed");
                SearchState::Failed(err.to_string())
            }
        };

        self.publish(ticket, outcome.clone());
        outcome
    }

    /// Return to `Idle` if the last search failed.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| {
            if matches!(state, SearchState::Failed(_)) {
                *state = SearchState::Idle;
                true
            } else {
                false
            }
        });
    }

    fn publish(&self, ticket: u64, next: SearchState) {
        self.state.send_if_modified(|state| {
            if self.latest.load(Ordering::SeqCst) != ticket {
                debug!(ticket, "dropping result of superseded search");
                return false;
            }
            *state = next;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use chrono::Utc;
    use reqwest::StatusCode;
    use tokio::sync::Notify;

    use super::*;
    use crate::{
        error::WeatherError,
        model::City,
        provider::{
            mock::{MockProvider, mock_forecast, mock_snapshot},
            openweather::weather_status_error,
        },
    };

    /// Counts calls and fails with the configured HTTP status, if any.
    #[derive(Debug, Default)]
    struct FakeProvider {
        current_status: Option<StatusCode>,
        forecast_status: Option<StatusCode>,
        calls: AtomicUsize,
        completed: AtomicUsize,
        slow_city_gate: Option<Arc<Notify>>,
    }

    impl FakeProvider {
        fn failing(current: Option<StatusCode>, forecast: Option<StatusCode>) -> Self {
            Self {
                current_status: current,
                forecast_status: forecast,
                ..Self::default()
            }
        }

        fn outcome(status: Option<StatusCode>) -> Result<(), WeatherError> {
            match status.and_then(weather_status_error) {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn search_cities(&self, _query: &str, _limit: u8) -> Result<Vec<City>, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn fetch_current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Finish after the forecast call so a fast failure cannot cut us short.
            for _ in 0..5 {
                tokio::task::yield_now().await;
            }
            if let Some(gate) = &self.slow_city_gate {
                if city == "Slow" {
                    gate.notified().await;
                }
            }
            self.completed.fetch_add(1, Ordering::SeqCst);

            Self::outcome(self.current_status)?;
            let mut snapshot = mock_snapshot();
            snapshot.location_name = city.to_string();
            Ok(snapshot)
        }

        async fn fetch_forecast(&self, _city: &str) -> Result<ForecastBundle, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.completed.fetch_add(1, Ordering::SeqCst);

            Self::outcome(self.forecast_status)?;
            Ok(mock_forecast())
        }
    }

    #[tokio::test]
    async fn empty_query_fails_without_requests() {
        let provider = Arc::new(FakeProvider::default());
        let session = SearchSession::new(provider.clone());

        for query in ["", "   ", "\t\n"] {
            let state = session.search(query).await;
            assert_eq!(state.error(), Some(EMPTY_QUERY_MESSAGE));
        }

        assert_eq!(session.state().error(), Some("Please enter a city name"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn both_fetches_succeeding_yields_success() {
        let session = SearchSession::new(Arc::new(FakeProvider::default()));

        let state = session.search("  Berlin ").await;
        let report = state.report().expect("search should succeed");

        assert_eq!(report.snapshot.location_name, "Berlin");
        assert_eq!(report.forecast.samples.len(), 40);
        assert_eq!(session.state(), state);
    }

    #[tokio::test]
    async fn forecast_failure_fails_whole_search_after_both_complete() {
        let provider = Arc::new(FakeProvider::failing(None, Some(StatusCode::NOT_FOUND)));
        let session = SearchSession::new(provider.clone());

        let state = session.search("Atlantis").await;

        assert_eq!(state.error(), Some("City not found. Please check the city name."));
        assert!(state.report().is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert_eq!(provider.completed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn current_weather_error_wins_when_both_fail() {
        let provider = FakeProvider::failing(
            Some(StatusCode::TOO_MANY_REQUESTS),
            Some(StatusCode::UNAUTHORIZED),
        );
        let session = SearchSession::new(Arc::new(provider));

        let state = session.search("Rome").await;
        assert_eq!(state.error(), Some("API rate limit exceeded. Please try again later."));
    }

    #[tokio::test]
    async fn loading_is_published_before_result() {
        let session = SearchSession::new(Arc::new(FakeProvider::default()));
        let mut rx = session.subscribe();

        let (state, seen) = tokio::join!(session.search("Oslo"), async {
            rx.changed().await.expect("sender alive");
            rx.borrow_and_update().is_loading()
        });

        assert!(seen);
        assert!(state.report().is_some());
    }

    #[tokio::test]
    async fn clear_error_returns_to_idle() {
        let session = SearchSession::new(Arc::new(MockProvider));

        session.search(" ").await;
        assert!(session.state().error().is_some());

        session.clear_error();
        assert_eq!(session.state(), SearchState::Idle);

        session.search("Oslo").await;
        session.clear_error();
        assert!(session.state().report().is_some());
    }

    #[tokio::test]
    async fn newer_search_supersedes_older_one() {
        let gate = Arc::new(Notify::new());
        let provider = FakeProvider {
            slow_city_gate: Some(gate.clone()),
            ..FakeProvider::default()
        };
        let session = Arc::new(SearchSession::new(Arc::new(provider)));
        let mut rx = session.subscribe();

        let slow = tokio::spawn({
            let session = session.clone();
            async move { session.search("Slow").await }
        });
        rx.changed().await.expect("sender alive");
        assert!(rx.borrow_and_update().is_loading());

        let fast = session.search("Fast").await;
        assert_eq!(fast.report().map(|r| r.snapshot.location_name.as_str()), Some("Fast"));

        gate.notify_one();
        let slow = slow.await.expect("task completes");

        assert_eq!(slow.report().map(|r| r.snapshot.location_name.as_str()), Some("Slow"));
        assert_eq!(session.state(), fast);
    }

    #[test]
    fn report_daily_forecast_truncates_to_requested_days() {
        let report = WeatherReport {
            snapshot: mock_snapshot(),
            forecast: mock_forecast(),
        };

        assert_eq!(report.daily_forecast(&Utc, 3).len(), 3);
        assert_eq!(report.daily_forecast(&Utc, 10).len(), 5);
    }
}
