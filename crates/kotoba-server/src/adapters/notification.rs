//! In-process Notification Hub
//!
//! Fans notifications out over a tokio broadcast channel. Slow
//! subscribers lag and skip items instead of blocking publishers.

use async_trait::async_trait;
use tokio::sync::broadcast;

use kotoba::{DomainError, Notification, NotificationHub};

pub struct BroadcastNotificationHub {
    sender: broadcast::Sender<Notification>,
}

impl BroadcastNotificationHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl NotificationHub for BroadcastNotificationHub {
    async fn publish(&self, notification: Notification) -> Result<usize, DomainError> {
        let event = notification.event.to_string();
        match self.sender.send(notification) {
            Ok(delivered) => {
                tracing::debug!(event = %event, delivered, "Notification published");
                Ok(delivered)
            }
            // Only fails when nobody is listening
            Err(_) => {
                tracing::debug!(event = %event, "Notification published with no subscribers");
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let hub = BroadcastNotificationHub::new(4);
        let delivered = hub
            .publish(Notification::database_change("x", serde_json::Value::Null))
            .await
            .unwrap();
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let hub = BroadcastNotificationHub::new(4);
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);

        let delivered = hub
            .publish(Notification::database_change(
                "user created",
                serde_json::json!({"id": 7}),
            ))
            .await
            .unwrap();
        assert_eq!(delivered, 2);

        let a = first.recv().await.unwrap();
        let b = second.recv().await.unwrap();
        assert_eq!(a.message, "user created");
        assert_eq!(a.id, b.id);
        assert_eq!(b.data["id"], 7);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips() {
        let hub = BroadcastNotificationHub::new(1);
        let mut rx = hub.subscribe();
        for i in 0..3 {
            hub.publish(Notification::database_change(format!("n{i}"), serde_json::Value::Null))
                .await
                .unwrap();
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
        assert_eq!(rx.recv().await.unwrap().message, "n2");
    }
}
