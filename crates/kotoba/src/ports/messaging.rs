//! Messaging Platform Port
//!
//! Abstract interface for a chat platform that delivers webhook events
//! and accepts reply / push calls (LINE, and potentially others).
//!
//! Implementations of this trait should live in separate crates
//! (e.g., kotoba-integration-line).

use async_trait::async_trait;

use crate::domain::entities::{InboundEvent, PushEnvelope, ReplyEnvelope};
use crate::domain::errors::DomainError;

/// Messaging platform interface
///
/// # Example
///
/// ```rust,ignore
/// use kotoba::ports::MessagingPlatform;
///
/// struct LineIntegration { /* reqwest client */ }
///
/// #[async_trait]
/// impl MessagingPlatform for LineIntegration {
///     async fn reply(&self, envelope: &ReplyEnvelope) -> Result<(), DomainError> {
///         // POST /v2/bot/message/reply
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait MessagingPlatform: Send + Sync {
    /// Get the platform name (e.g., "line")
    fn name(&self) -> &str;

    /// Answer one event using its reply token
    ///
    /// A non-success answer from the platform must surface as
    /// `DomainError::Upstream` carrying the status and body.
    async fn reply(&self, envelope: &ReplyEnvelope) -> Result<(), DomainError>;

    /// Send messages to a user without a reply token
    async fn push(&self, envelope: &PushEnvelope) -> Result<(), DomainError>;

    /// Verify and parse a raw webhook delivery
    ///
    /// `signature` is the platform's signature header, if present.
    /// Returns every event in the delivery, including ones that need no reply.
    async fn handle_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<Vec<InboundEvent>, DomainError>;

    /// Check if the integration is configured and reachable
    async fn health_check(&self) -> Result<bool, DomainError> {
        Ok(true)
    }
}
