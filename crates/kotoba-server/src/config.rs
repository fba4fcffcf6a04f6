//! Server configuration
//!
//! Built once at startup from Shuttle secrets and passed into the
//! components that need it.

use anyhow::{bail, Context, Result};

use kotoba_integration_line::LineConfig;

use crate::adapters::CwbConfig;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_NOTIFICATION_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub line: LineConfig,
    pub cwb: CwbConfig,
    /// Bearer key protecting the admin routes; `None` disables auth
    pub api_key: Option<String>,
    pub notification_capacity: usize,
}

impl AppConfig {
    /// Build the configuration from a key lookup (Shuttle secrets, env, maps in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let access_token = get("LINE_CHANNEL_ACCESS_TOKEN")
            .context("LINE_CHANNEL_ACCESS_TOKEN is not set")?;

        let timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("HTTP_TIMEOUT_SECS is not a number: {raw}"))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            bail!("HTTP_TIMEOUT_SECS must be greater than zero");
        }

        let notification_capacity = match get("NOTIFICATION_CAPACITY") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("NOTIFICATION_CAPACITY is not a number: {raw}"))?,
            None => DEFAULT_NOTIFICATION_CAPACITY,
        };
        if notification_capacity == 0 {
            bail!("NOTIFICATION_CAPACITY must be greater than zero");
        }

        let mut line = LineConfig::new(access_token).with_timeout_secs(timeout_secs);
        if let Some(secret) = get("LINE_CHANNEL_SECRET") {
            line = line.with_channel_secret(secret);
        }
        if let Some(url) = get("LINE_API_BASE_URL") {
            line = line.with_api_base_url(url);
        }

        let mut cwb = CwbConfig::default().with_timeout_secs(timeout_secs);
        if let Some(key) = get("CWB_API_KEY") {
            cwb = cwb.with_api_key(key);
        }
        if let Some(url) = get("CWB_API_BASE_URL") {
            cwb = cwb.with_base_url(url);
        }

        Ok(Self {
            line,
            cwb,
            api_key: get("KOTOBA_API_KEY"),
            notification_capacity,
        })
    }
}
