//! Webhook DTOs

use serde::Serialize;
use utoipa::ToSchema;

use kotoba::ReplyEnvelope;

/// Replies sent while handling a webhook delivery
#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookResponse {
    /// One envelope per answered event, in delivery order
    #[schema(value_type = Vec<Object>)]
    pub replies: Vec<ReplyEnvelope>,
}

impl WebhookResponse {
    pub fn new(replies: Vec<ReplyEnvelope>) -> Self {
        Self { replies }
    }
}
