//! MessagingPlatform implementation for LINE

use async_trait::async_trait;
use tracing::{debug, warn};

use kotoba::ports::MessagingPlatform;
use kotoba::{DomainError, InboundEvent, PushEnvelope, ReplyEnvelope};

use crate::client::LineClient;
use crate::config::LineConfig;
use crate::webhook::LineWebhookHandler;

/// LINE integration implementing the MessagingPlatform port
pub struct LineIntegration {
    client: LineClient,
    webhook: LineWebhookHandler,
}

impl LineIntegration {
    /// Create a new LINE integration
    pub fn new(config: LineConfig) -> Result<Self, DomainError> {
        let webhook = match &config.channel_secret {
            Some(secret) => LineWebhookHandler::with_channel_secret(secret.clone()),
            None => LineWebhookHandler::new(),
        };
        let client = LineClient::new(config)?;
        Ok(Self { client, webhook })
    }

    pub fn verifies_signatures(&self) -> bool {
        self.webhook.verifies_signatures()
    }
}

#[async_trait]
impl MessagingPlatform for LineIntegration {
    fn name(&self) -> &str {
        "line"
    }

    async fn reply(&self, envelope: &ReplyEnvelope) -> Result<(), DomainError> {
        self.client.reply(envelope).await
    }

    async fn push(&self, envelope: &PushEnvelope) -> Result<(), DomainError> {
        self.client.push(envelope).await
    }

    async fn handle_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<Vec<InboundEvent>, DomainError> {
        self.webhook.verify(payload, signature)?;
        let events = self.webhook.parse(payload)?;
        debug!(events = events.len(), "Accepted LINE webhook delivery");
        Ok(events)
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        match self.client.bot_info().await {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!(error = %e, "LINE health check failed");
                Ok(false)
            }
        }
    }
}
