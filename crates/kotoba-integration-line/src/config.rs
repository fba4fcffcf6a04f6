//! LINE configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.line.me";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the LINE integration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineConfig {
    /// Long-lived channel access token (Bearer)
    pub channel_access_token: String,
    /// Channel secret; enables webhook signature verification when set
    pub channel_secret: Option<String>,
    /// Messaging API base URL, without trailing slash
    pub api_base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl LineConfig {
    /// Create a new LINE configuration with just an access token
    pub fn new(channel_access_token: impl Into<String>) -> Self {
        Self {
            channel_access_token: channel_access_token.into(),
            ..Self::default()
        }
    }

    /// Set the channel secret
    pub fn with_channel_secret(mut self, secret: impl Into<String>) -> Self {
        self.channel_secret = Some(secret.into());
        self
    }

    /// Point the client at another API host (tests, proxies)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_access_token: String::new(),
            channel_secret: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
