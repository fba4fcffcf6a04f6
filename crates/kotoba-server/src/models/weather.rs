//! Weather DTOs

use serde::Serialize;
use utoipa::ToSchema;

use kotoba::{ForecastPeriod, WeatherForecast};

#[derive(Debug, Serialize, ToSchema)]
pub struct ForecastResponse {
    pub city: String,
    pub periods: Vec<ForecastPeriodResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ForecastPeriodResponse {
    pub start_time: String,
    pub end_time: String,
    pub description: String,
    pub rain_probability: Option<u8>,
    pub min_temperature: Option<i32>,
    pub max_temperature: Option<i32>,
    pub comfort: Option<String>,
    /// Human-readable range, e.g. "26°C ~ 33°C"
    pub temperature: Option<String>,
}

impl ForecastResponse {
    pub fn from_domain(forecast: WeatherForecast) -> Self {
        Self {
            city: forecast.city,
            periods: forecast
                .periods
                .into_iter()
                .map(ForecastPeriodResponse::from_domain)
                .collect(),
        }
    }
}

impl ForecastPeriodResponse {
    pub fn from_domain(period: ForecastPeriod) -> Self {
        let temperature = period.temperature_range();
        Self {
            start_time: period.start_time,
            end_time: period.end_time,
            description: period.description,
            rain_probability: period.rain_probability,
            min_temperature: period.min_temperature,
            max_temperature: period.max_temperature,
            comfort: period.comfort,
            temperature,
        }
    }
}
