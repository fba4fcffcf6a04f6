//! LINE Messaging API client

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use kotoba::{DomainError, PushEnvelope, ReplyEnvelope};

use crate::config::LineConfig;

const REPLY_PATH: &str = "/v2/bot/message/reply";
const PUSH_PATH: &str = "/v2/bot/message/push";
const BOT_INFO_PATH: &str = "/v2/bot/info";
const USER_AGENT: &str = "Kotoba-LineBot/1.0";

/// LINE API client
pub struct LineClient {
    http: Client,
    config: LineConfig,
}

impl LineClient {
    /// Create a new LINE client
    pub fn new(config: LineConfig) -> Result<Self, DomainError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DomainError::ExternalService(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Answer an event with its reply token
    pub async fn reply(&self, envelope: &ReplyEnvelope) -> Result<(), DomainError> {
        envelope.validate()?;
        debug!(
            reply_token = %envelope.reply_token,
            messages = envelope.messages.len(),
            "Sending LINE reply"
        );
        self.post_json(REPLY_PATH, envelope).await
    }

    /// Push messages to a user, group or room
    pub async fn push(&self, envelope: &PushEnvelope) -> Result<(), DomainError> {
        envelope.validate()?;
        debug!(to = %envelope.to, messages = envelope.messages.len(), "Sending LINE push");
        self.post_json(PUSH_PATH, envelope).await
    }

    /// Fetch the bot's own profile; used as a connectivity check
    pub async fn bot_info(&self) -> Result<serde_json::Value, DomainError> {
        let url = format!("{}{}", self.config.api_base_url, BOT_INFO_PATH);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.channel_access_token)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("LINE API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::upstream(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Invalid LINE bot info: {e}")))
    }

    async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<(), DomainError> {
        let url = format!("{}{}", self.config.api_base_url, path);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.channel_access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("LINE API request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        warn!(path = %path, status = %status, body = %body, "LINE API rejected request");

        Err(DomainError::upstream(status.as_u16(), body))
    }
}
