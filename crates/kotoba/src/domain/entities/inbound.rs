//! InboundEvent Entity
//!
//! One event received in a webhook delivery from the messaging platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::InboundEventType;

/// A single event from a webhook delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    pub event_type: InboundEventType,
    /// Single-use token for replying to this event
    pub reply_token: Option<String>,
    /// User that caused the event (absent for some group events)
    pub source_user_id: Option<String>,
    /// Text of a text message event
    pub message_text: Option<String>,
    /// When the event occurred, in milliseconds since the epoch
    pub timestamp_ms: i64,
    /// Whether the platform is re-sending an event it already delivered
    #[serde(default)]
    pub is_redelivery: bool,
}

impl InboundEvent {
    /// Create a new event of the given type
    pub fn new(event_type: InboundEventType, timestamp_ms: i64) -> Self {
        Self {
            event_type,
            reply_token: None,
            source_user_id: None,
            message_text: None,
            timestamp_ms,
            is_redelivery: false,
        }
    }

    /// Convenience constructor for a text message event
    pub fn text_message(reply_token: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(InboundEventType::Message, Utc::now().timestamp_millis())
            .with_reply_token(reply_token)
            .with_text(text)
    }

    pub fn with_reply_token(mut self, reply_token: impl Into<String>) -> Self {
        self.reply_token = Some(reply_token.into());
        self
    }

    pub fn with_source_user(mut self, user_id: impl Into<String>) -> Self {
        self.source_user_id = Some(user_id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.message_text = Some(text.into());
        self
    }

    pub fn with_redelivery(mut self, is_redelivery: bool) -> Self {
        self.is_redelivery = is_redelivery;
        self
    }

    /// Reply target and text, if this event should be answered
    pub fn reply_target(&self) -> Option<(&str, &str)> {
        if !self.event_type.is_message() {
            return None;
        }
        match (&self.reply_token, &self.message_text) {
            (Some(token), Some(text)) => Some((token.as_str(), text.as_str())),
            _ => None,
        }
    }

    /// Event time as a UTC timestamp
    pub fn timestamp(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(self.timestamp_ms).unwrap_or_else(Utc::now)
    }
}
