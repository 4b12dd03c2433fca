//! Human-friendly text for reports, forecasts and map links.

use skycast_core::{Coordinates, DailySummary, WeatherReport};

pub const WEATHER_FAILURE: &str = "Sorry, I couldn't fetch the weather information.";
pub const FORECAST_FAILURE: &str = "Sorry, I couldn't fetch the forecast information.";

const MAP_ZOOM: u8 = 10;

pub fn format_report(report: &WeatherReport) -> String {
    format!(
        "🌦️ Weather in {}\n\
         🌡️ Temperature: {:.1}°C (feels like {:.1}°C)\n\
         💧 Humidity: {}%\n\
         💨 Wind Speed: {:.1} m/s\n\
         📝 Description: {}\n\
         🖼️ Icon: {}",
        report.location,
        report.temperature,
        report.feels_like,
        report.humidity,
        report.wind_speed,
        capitalize(&report.description),
        report.icon_url(),
    )
}

pub fn format_forecast(days: &[DailySummary]) -> String {
    if days.is_empty() {
        return "No forecast data available.".to_string();
    }

    days.iter()
        .map(|day| {
            let heading = match day.weekday() {
                Some(weekday) => format!("{} ({weekday})", day.date),
                None => day.date.clone(),
            };
            format!(
                "📅 {heading}\n🌡️ Avg Temp: {:.1}°C\n📝 Condition: {}",
                day.average_temperature,
                capitalize(&day.dominant_description),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Which credentials were found at startup.
pub fn format_credentials(llm_key: bool, weather_key: bool) -> String {
    format!("API Key loaded? {llm_key}\nWeather API Key loaded? {weather_key}")
}

/// OpenStreetMap link with a marker on `at`.
pub fn map_url(at: Coordinates) -> String {
    format!(
        "https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map={MAP_ZOOM}/{lat}/{lon}",
        lat = at.lat,
        lon = at.lon,
    )
}

pub fn format_map(city: &str, at: Coordinates) -> String {
    format!("🗺️ {city} ({:.4}, {:.4})\n{}", at.lat, at.lon, map_url(at))
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
