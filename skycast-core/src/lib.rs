//! Core library for the `skycast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the [`WeatherProvider`] trait
//! - Daily aggregation of the 3-hourly forecast feed
//! - Shared domain models (reports, forecast entries, daily summaries)
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;

pub use config::Config;
pub use error::FetchError;
pub use forecast::summarize_daily;
pub use model::{Coordinates, DailySummary, ForecastEntry, WeatherReport};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
