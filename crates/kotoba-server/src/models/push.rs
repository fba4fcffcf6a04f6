//! Push DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use kotoba::PushEnvelope;

/// Request to push a text message
#[derive(Debug, Deserialize, ToSchema)]
pub struct PushTextRequest {
    /// LINE user, group or room ID
    pub to: String,
    pub text: String,
}

/// Request to push a weather card
#[derive(Debug, Deserialize, ToSchema)]
pub struct PushWeatherRequest {
    pub to: String,
    /// City alias (e.g. "台北") or a location name passed through as-is
    pub city: String,
}

/// Push result
#[derive(Debug, Serialize, ToSchema)]
pub struct PushResponse {
    pub to: String,
    /// Message kinds that were sent ("text" / "flex")
    pub kinds: Vec<String>,
    /// The envelope exactly as posted to LINE
    #[schema(value_type = Object)]
    pub envelope: PushEnvelope,
}

impl PushResponse {
    pub fn from_domain(envelope: PushEnvelope) -> Self {
        Self {
            to: envelope.to.clone(),
            kinds: envelope
                .messages
                .iter()
                .map(|m| m.kind().to_string())
                .collect(),
            envelope,
        }
    }
}
