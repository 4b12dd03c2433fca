use crate::{
    Config, DailySummary, FetchError, WeatherReport, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// A source of current conditions and daily forecasts for a named location.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, location: &str) -> Result<WeatherReport, FetchError>;

    /// Daily summaries for the forecast window, in first-seen date order.
    async fn forecast(&self, location: &str) -> Result<Vec<DailySummary>, FetchError>;
}

/// Construct the OpenWeather provider from a validated config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.weather_api_key()?;

    let provider = OpenWeatherProvider::with_base_url(api_key.to_owned(), &config.base_url);

    Ok(Box::new(provider))
}
