//! Notification Entity
//!
//! Messages fanned out to realtime subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of notification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationEvent {
    /// Something changed in the backing store
    DatabaseChange,
    /// Addressed to a single user
    UserNotification,
}

impl std::fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseChange => write!(f, "database_change"),
            Self::UserNotification => write!(f, "user_notification"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub event: NotificationEvent,
    pub message: String,
    #[serde(default)]
    pub data: serde_json::Value,
    /// Recipient for user notifications; `None` means everyone
    pub target_user: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Broadcast to every subscriber
    pub fn database_change(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self::new(NotificationEvent::DatabaseChange, message, data, None)
    }

    /// Delivered only to subscribers listening as `user_id`
    pub fn for_user(
        user_id: impl Into<String>,
        message: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self::new(
            NotificationEvent::UserNotification,
            message,
            data,
            Some(user_id.into()),
        )
    }

    fn new(
        event: NotificationEvent,
        message: impl Into<String>,
        data: serde_json::Value,
        target_user: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event,
            message: message.into(),
            data,
            target_user,
            timestamp: Utc::now(),
        }
    }

    /// Whether a subscriber identified as `user_id` should see this
    pub fn is_visible_to(&self, user_id: Option<&str>) -> bool {
        match (&self.target_user, user_id) {
            (None, _) => true,
            (Some(target), Some(user)) => target == user,
            (Some(_), None) => false,
        }
    }
}
