//! ClassificationResult - output of the message classifier

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::City;

/// What the classifier decided about a message text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassificationResult {
    pub is_weather_query: bool,
    /// Resolved city, only ever set for weather queries
    pub city: Option<City>,
}

impl ClassificationResult {
    pub fn not_weather() -> Self {
        Self {
            is_weather_query: false,
            city: None,
        }
    }

    pub fn weather(city: Option<City>) -> Self {
        Self {
            is_weather_query: true,
            city,
        }
    }
}
