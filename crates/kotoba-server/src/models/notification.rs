//! Notification DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Request to publish a notification
#[derive(Debug, Deserialize, ToSchema)]
pub struct NotifyRequest {
    pub message: String,
    /// Arbitrary payload forwarded to subscribers
    #[serde(default)]
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

/// Publish result
#[derive(Debug, Serialize, ToSchema)]
pub struct NotifyResponse {
    pub id: Uuid,
    /// Number of subscribers that received it
    pub delivered: usize,
}

/// Stream filter
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StreamQuery {
    /// Receive notifications targeted at this user in addition to broadcasts
    pub user_id: Option<String>,
}
