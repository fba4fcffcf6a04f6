//! Configuration management for Kotoba CLI
//!
//! Stores API key, server URL and named LINE recipients in
//! ~/.config/kotoba/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

const CONFIG_DIR: &str = "kotoba";
const CONFIG_FILE: &str = "config.toml";

/// A named LINE push target
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Recipient {
    /// LINE user, group or room ID
    #[serde(default)]
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// CLI Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_recipient: Option<String>,
    #[serde(default)]
    pub recipients: HashMap<String, Recipient>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            default_recipient: None,
            recipients: HashMap::new(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {:?}", dir))?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Apply KOTOBA_API_KEY / KOTOBA_BASE_URL overrides
    ///
    /// Overrides only affect this run; they are never saved.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("KOTOBA_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = get("KOTOBA_BASE_URL") {
            self.base_url = url;
        }
        self
    }

    /// Set API key
    pub fn set_api_key(&mut self, key: String) {
        self.api_key = Some(key);
    }

    /// Add a recipient
    pub fn add_recipient(&mut self, name: String, user_id: String, display_name: Option<String>) {
        self.recipients.insert(
            name,
            Recipient {
                user_id,
                name: display_name,
            },
        );
    }

    /// Remove a recipient, clearing the default if it pointed there
    pub fn remove_recipient(&mut self, name: &str) -> bool {
        let removed = self.recipients.remove(name).is_some();
        if removed && self.default_recipient.as_deref() == Some(name) {
            self.default_recipient = None;
        }
        removed
    }

    /// Set default recipient
    pub fn set_default_recipient(&mut self, name: String) -> bool {
        if self.recipients.contains_key(&name) {
            self.default_recipient = Some(name);
            true
        } else {
            false
        }
    }

    /// Resolve a push target
    ///
    /// A known recipient name maps to its user ID, anything else is taken
    /// as a raw LINE ID. Without `to`, the default recipient is used.
    pub fn resolve_recipient(&self, to: Option<&str>) -> Option<String> {
        match to {
            Some(to) => Some(
                self.recipients
                    .get(to)
                    .map(|r| r.user_id.clone())
                    .unwrap_or_else(|| to.to_string()),
            ),
            None => self
                .default_recipient
                .as_ref()
                .and_then(|name| self.recipients.get(name))
                .map(|r| r.user_id.clone()),
        }
    }
}
