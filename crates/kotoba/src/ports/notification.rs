//! Notification Hub Port
//!
//! Fan-out of notifications to realtime subscribers. Invoked explicitly
//! by whoever produces a notification.

use async_trait::async_trait;

use crate::domain::entities::Notification;
use crate::domain::errors::DomainError;

#[async_trait]
pub trait NotificationHub: Send + Sync {
    /// Publish a notification, returning how many subscribers received it
    ///
    /// Having no subscribers is not an error.
    async fn publish(&self, notification: Notification) -> Result<usize, DomainError>;
}
