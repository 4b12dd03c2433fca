use chrono::NaiveDate;

/// Current conditions for one location, in metric units.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub location: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub description: String,
    pub icon_id: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl WeatherReport {
    pub fn icon_url(&self) -> String {
        format!("http://openweathermap.org/img/wn/{}@2x.png", self.icon_id)
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.latitude,
            lon: self.longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One 3-hour slot of the forecast feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    /// Local time as supplied upstream, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    pub temperature: f64,
    pub description: String,
}

impl ForecastEntry {
    pub fn new(
        timestamp: impl Into<String>,
        temperature: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            temperature,
            description: description.into(),
        }
    }

    /// Calendar date part of the timestamp.
    pub fn date(&self) -> &str {
        self.timestamp.split(' ').next().unwrap_or(&self.timestamp)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub date: String,
    pub average_temperature: f64,
    pub dominant_description: String,
}

impl DailySummary {
    /// Abbreviated weekday name ("Mon"), if `date` is a valid calendar date.
    pub fn weekday(&self) -> Option<String> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .ok()
            .map(|d| d.format("%a").to_string())
    }
}
