//! Central Weather Administration open-data client
//!
//! Fetches the 36-hour city forecast (dataset F-C0032-001) and maps it
//! into the domain `WeatherForecast`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use kotoba::{DomainError, ForecastPeriod, WeatherForecast, WeatherService};

pub const DEFAULT_BASE_URL: &str = "https://opendata.cwa.gov.tw/api";
const DATASET: &str = "F-C0032-001";
const USER_AGENT: &str = "Kotoba-Weather/1.0";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct CwbConfig {
    /// Authorization key; lookups fail when unset
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl CwbConfig {
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for CwbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// HTTP implementation of WeatherService
pub struct CwbWeatherClient {
    client: Client,
    config: CwbConfig,
}

impl CwbWeatherClient {
    pub fn new(config: CwbConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DomainError::ExternalService(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[async_trait]
impl WeatherService for CwbWeatherClient {
    async fn forecast(&self, city: &str) -> Result<WeatherForecast, DomainError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::ExternalService("CWB_API_KEY is not configured".into()))?;

        let url = format!("{}/v1/rest/datastore/{}", self.config.base_url, DATASET);
        tracing::debug!(city = %city, "Requesting CWB forecast");

        let response = self
            .client
            .get(&url)
            .query(&[("Authorization", api_key), ("locationName", city)])
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Weather request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::ExternalService(format!(
                "Weather API returned {}: {}",
                status, body
            )));
        }

        let payload: CwbResponse = response
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Invalid weather response: {e}")))?;

        payload.into_forecast(city)
    }
}

// ============================================
// Response Types
// ============================================

#[derive(Debug, Deserialize)]
struct CwbResponse {
    success: String,
    records: Option<CwbRecords>,
}

#[derive(Debug, Deserialize)]
struct CwbRecords {
    #[serde(default)]
    location: Vec<CwbLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CwbLocation {
    location_name: String,
    #[serde(default)]
    weather_element: Vec<CwbElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CwbElement {
    element_name: String,
    #[serde(default)]
    time: Vec<CwbTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CwbTime {
    start_time: String,
    end_time: String,
    parameter: CwbParameter,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CwbParameter {
    parameter_name: String,
}

impl CwbResponse {
    fn into_forecast(self, city: &str) -> Result<WeatherForecast, DomainError> {
        if self.success != "true" {
            return Err(DomainError::ExternalService(format!(
                "Weather API reported success={}",
                self.success
            )));
        }

        let location = self
            .records
            .and_then(|r| r.location.into_iter().find(|l| l.location_name == city))
            .ok_or_else(|| DomainError::not_found("Location", city))?;

        location.into_forecast()
    }
}

impl CwbLocation {
    fn into_forecast(self) -> Result<WeatherForecast, DomainError> {
        let wx = self.element("Wx").ok_or_else(|| {
            DomainError::ExternalService(format!("No Wx element for {}", self.location_name))
        })?;

        let periods = wx
            .time
            .iter()
            .enumerate()
            .map(|(idx, slot)| {
                let mut period = ForecastPeriod::new(
                    slot.start_time.clone(),
                    slot.end_time.clone(),
                    slot.parameter.parameter_name.clone(),
                );
                period.rain_probability = self.value_at("PoP", idx).and_then(|v| v.parse().ok());
                period.min_temperature = self.value_at("MinT", idx).and_then(|v| v.parse().ok());
                period.max_temperature = self.value_at("MaxT", idx).and_then(|v| v.parse().ok());
                period.comfort = self.value_at("CI", idx).map(str::to_string);
                period
            })
            .collect();

        Ok(WeatherForecast::new(self.location_name.clone(), periods))
    }

    fn element(&self, name: &str) -> Option<&CwbElement> {
        self.weather_element.iter().find(|e| e.element_name == name)
    }

    fn value_at(&self, name: &str, idx: usize) -> Option<&str> {
        self.element(name)?
            .time
            .get(idx)
            .map(|t| t.parameter.parameter_name.trim())
    }
}
