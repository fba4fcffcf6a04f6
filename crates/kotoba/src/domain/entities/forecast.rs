//! WeatherForecast Entity
//!
//! Normalized result of an external weather lookup.

use serde::{Deserialize, Serialize};

/// Forecast for one location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherForecast {
    /// Location name as reported by the weather service
    pub city: String,
    /// Consecutive forecast windows, earliest first
    pub periods: Vec<ForecastPeriod>,
}

/// One forecast window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastPeriod {
    pub start_time: String,
    pub end_time: String,
    /// Weather phenomenon, e.g. "多雲時晴"
    pub description: String,
    /// Probability of precipitation in percent
    pub rain_probability: Option<u8>,
    /// Minimum temperature in °C
    pub min_temperature: Option<i32>,
    /// Maximum temperature in °C
    pub max_temperature: Option<i32>,
    /// Comfort index descriptor, e.g. "舒適"
    pub comfort: Option<String>,
}

impl ForecastPeriod {
    pub fn new(
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
            description: description.into(),
            rain_probability: None,
            min_temperature: None,
            max_temperature: None,
            comfort: None,
        }
    }

    /// "18°C ~ 25°C", or a single bound when only one is known
    pub fn temperature_range(&self) -> Option<String> {
        match (self.min_temperature, self.max_temperature) {
            (Some(min), Some(max)) => Some(format!("{}°C ~ {}°C", min, max)),
            (Some(min), None) => Some(format!("{}°C 以上", min)),
            (None, Some(max)) => Some(format!("{}°C 以下", max)),
            (None, None) => None,
        }
    }

    /// "06:00 ~ 18:00" taken from "YYYY-MM-DD HH:MM:SS" timestamps
    pub fn time_label(&self) -> String {
        format!(
            "{} ~ {}",
            short_time(&self.start_time),
            short_time(&self.end_time)
        )
    }
}

impl WeatherForecast {
    pub fn new(city: impl Into<String>, periods: Vec<ForecastPeriod>) -> Self {
        Self {
            city: city.into(),
            periods,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

fn short_time(timestamp: &str) -> &str {
    // "2024-06-01 18:00:00" -> "06-01 18:00"
    match (timestamp.get(5..16), timestamp.len()) {
        (Some(short), 19) => short,
        _ => timestamp,
    }
}
