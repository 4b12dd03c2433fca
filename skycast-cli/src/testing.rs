//! Shared test doubles.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use skycast_core::{DailySummary, FetchError, WeatherProvider, WeatherReport, error::StatusCode};

/// Answers every lookup from canned data, or rejects every lookup with a 404.
#[derive(Debug, Default)]
pub struct FakeProvider {
    fail: bool,
    calls: AtomicUsize,
}

impl FakeProvider {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Number of lookups made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn rejected(endpoint: &'static str) -> FetchError {
    FetchError::Status {
        endpoint,
        status: StatusCode::NOT_FOUND,
        body: "city not found".into(),
    }
}

pub fn report(city: &str) -> WeatherReport {
    WeatherReport {
        location: city.into(),
        temperature: 11.2,
        feels_like: 10.1,
        humidity: 81,
        wind_speed: 5.7,
        description: "broken clouds".into(),
        icon_id: "04d".into(),
        latitude: 54.5973,
        longitude: -5.9301,
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn current_weather(&self, location: &str) -> Result<WeatherReport, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(rejected("weather"))
        } else {
            Ok(report(location))
        }
    }

    async fn forecast(&self, _location: &str) -> Result<Vec<DailySummary>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(rejected("forecast"))
        } else {
            Ok(vec![DailySummary {
                date: "2024-01-01".into(),
                average_temperature: 12.0,
                dominant_description: "clear".into(),
            }])
        }
    }
}
