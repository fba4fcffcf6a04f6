//! Weather Service Port
//!
//! Abstract interface for the external weather data lookup.

use async_trait::async_trait;

use crate::domain::entities::WeatherForecast;
use crate::domain::errors::DomainError;

/// Service interface for weather lookups
#[async_trait]
pub trait WeatherService: Send + Sync {
    /// Forecast for a location name understood by the provider
    ///
    /// Any transport, status or decoding problem is a lookup failure;
    /// callers decide how to degrade.
    async fn forecast(&self, city: &str) -> Result<WeatherForecast, DomainError>;
}
