//! Interactive session: an explicit state record plus pure transitions.
//!
//! Every screen is rendered from [`Session`] alone. The map and forecast
//! actions only become available once a successful lookup stored coordinates.

use std::fmt;

use skycast_core::{Coordinates, FetchError, WeatherProvider, WeatherReport};
use tracing::warn;

use crate::output;

pub const DEFAULT_CITY: &str = "Belfast";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// City of the last weather check, successful or not.
    pub city: Option<String>,
    /// Rendered report or failure text from the last check.
    pub report: Option<String>,
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CheckWeather,
    ShowMap,
    ShowForecast,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::CheckWeather => "Check Weather 🌦️",
            Action::ShowMap => "Show Map 🗺️",
            Action::ShowForecast => "Show 5-Day Forecast 📅",
            Action::Quit => "Quit",
        })
    }
}

/// A user action with its input resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Check(String),
    ShowMap,
    ShowForecast,
}

/// Next state plus anything to print below the report.
#[derive(Debug)]
pub struct Transition {
    pub session: Session,
    pub output: Option<String>,
}

impl Session {
    /// State after a weather check for `city`. A failure clears the coordinates.
    pub fn checked(self, city: &str, outcome: &Result<WeatherReport, FetchError>) -> Session {
        match outcome {
            Ok(report) => Session {
                city: Some(city.to_string()),
                report: Some(output::format_report(report)),
                coordinates: Some(report.coordinates()),
            },
            Err(_) => Session {
                city: Some(city.to_string()),
                report: Some(output::WEATHER_FAILURE.to_string()),
                coordinates: None,
            },
        }
    }

    /// Actions offered in the current state.
    pub fn actions(&self) -> Vec<Action> {
        if self.located().is_some() {
            vec![
                Action::CheckWeather,
                Action::ShowMap,
                Action::ShowForecast,
                Action::Quit,
            ]
        } else {
            vec![Action::CheckWeather, Action::Quit]
        }
    }

    /// Default for the city prompt: the last city checked, else Belfast.
    pub fn city_prompt_default(&self) -> &str {
        self.city.as_deref().unwrap_or(DEFAULT_CITY)
    }

    pub fn map_url(&self) -> Option<String> {
        self.located().map(|(_, at)| output::map_url(at))
    }

    fn located(&self) -> Option<(&str, Coordinates)> {
        match (&self.city, self.coordinates) {
            (Some(city), Some(at)) => Some((city.as_str(), at)),
            _ => None,
        }
    }
}

/// Apply one request. Each request issues at most one HTTP call.
pub async fn dispatch(
    session: Session,
    request: Request,
    provider: &dyn WeatherProvider,
) -> Transition {
    match request {
        Request::Check(city) => {
            let outcome = provider.current_weather(&city).await;
            if let Err(err) = &outcome {
                warn!(%city, status = ?err.status(), error = %err, "weather lookup failed");
            }
            Transition {
                session: session.checked(&city, &outcome),
                output: None,
            }
        }
        Request::ShowMap => {
            let text = session
                .located()
                .map(|(city, at)| output::format_map(city, at));
            Transition {
                session,
                output: text,
            }
        }
        Request::ShowForecast => {
            let Some((city, _)) = session.located() else {
                return Transition {
                    session,
                    output: None,
                };
            };
            let text = match provider.forecast(city).await {
                Ok(days) => output::format_forecast(&days),
                Err(err) => {
                    warn!(%city, status = ?err.status(), error = %err, "forecast lookup failed");
                    output::FORECAST_FAILURE.to_string()
                }
            };
            Transition {
                session,
                output: Some(text),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeProvider, rejected, report};

    fn all_actions() -> Vec<Action> {
        vec![
            Action::CheckWeather,
            Action::ShowMap,
            Action::ShowForecast,
            Action::Quit,
        ]
    }

    #[test]
    fn fresh_session_only_offers_check() {
        let session = Session::default();

        assert_eq!(session.actions(), vec![Action::CheckWeather, Action::Quit]);
        assert_eq!(session.city_prompt_default(), "Belfast");
        assert_eq!(session.map_url(), None);
    }

    #[test]
    fn successful_check_unlocks_map_and_forecast() {
        let session = Session::default().checked("Belfast", &Ok(report("Belfast")));

        assert_eq!(session.city.as_deref(), Some("Belfast"));
        assert_eq!(
            session.coordinates,
            Some(Coordinates {
                lat: 54.5973,
                lon: -5.9301
            })
        );
        assert!(
            session
                .report
                .as_deref()
                .is_some_and(|r| r.contains("Weather in Belfast"))
        );
        assert_eq!(session.actions(), all_actions());
        assert!(session.map_url().is_some());
    }

    #[test]
    fn failed_check_stores_failure_and_clears_coordinates() {
        let session = Session::default()
            .checked("Belfast", &Ok(report("Belfast")))
            .checked("Atlantis", &Err(rejected("weather")));

        assert_eq!(session.city.as_deref(), Some("Atlantis"));
        assert_eq!(session.report.as_deref(), Some(output::WEATHER_FAILURE));
        assert_eq!(session.coordinates, None);
        assert_eq!(session.actions(), vec![Action::CheckWeather, Action::Quit]);
        assert_eq!(session.city_prompt_default(), "Atlantis");
    }

    #[test]
    fn checking_same_city_twice_gives_same_state() {
        let once = Session::default().checked("Belfast", &Ok(report("Belfast")));
        let twice = once.clone().checked("Belfast", &Ok(report("Belfast")));

        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn dispatch_check_then_forecast() {
        let provider = FakeProvider::default();

        let check = Request::Check("Belfast".into());
        let t = dispatch(Session::default(), check, &provider).await;
        assert!(t.output.is_none());

        let t = dispatch(t.session, Request::ShowForecast, &provider).await;
        let text = t.output.expect("forecast text");
        assert!(text.contains("2024-01-01"));
        assert!(text.contains("Avg Temp: 12.0°C"));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn dispatch_map_makes_no_request() {
        let provider = FakeProvider::default();
        let session = Session::default().checked("Belfast", &Ok(report("Belfast")));

        let t = dispatch(session, Request::ShowMap, &provider).await;

        let text = t.output.expect("map text");
        assert!(text.contains("Belfast"));
        assert!(text.contains("openstreetmap.org"));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn dispatch_forecast_without_location_is_noop() {
        let provider = FakeProvider::default();

        let t = dispatch(Session::default(), Request::ShowForecast, &provider).await;

        assert!(t.output.is_none());
        assert_eq!(t.session, Session::default());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn failed_lookups_render_failure_text() {
        let provider = FakeProvider::failing();

        let check = Request::Check("Atlantis".into());
        let t = dispatch(Session::default(), check, &provider).await;
        assert_eq!(t.session.report.as_deref(), Some(output::WEATHER_FAILURE));

        let located = Session::default().checked("Belfast", &Ok(report("Belfast")));
        let t = dispatch(located, Request::ShowForecast, &provider).await;
        assert_eq!(t.output.as_deref(), Some(output::FORECAST_FAILURE));
    }
}
