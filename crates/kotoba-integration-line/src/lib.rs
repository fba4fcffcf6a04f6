//! LINE Integration for Kotoba
//!
//! This crate provides LINE Messaging API integration for the Kotoba
//! chat-bot backend: webhook parsing and signature verification,
//! and the reply / push endpoints.
//!
//! # Usage
//!
//! ```rust,ignore
//! use kotoba_integration_line::{LineConfig, LineIntegration};
//!
//! let config = LineConfig::new("channel-access-token").with_channel_secret("secret");
//! let line = LineIntegration::new(config)?;
//! line.reply(&envelope).await?;
//! ```

mod client;
mod config;
mod integration;
mod webhook;

pub use client::LineClient;
pub use config::LineConfig;
pub use integration::LineIntegration;
pub use webhook::{sign, verify_signature, LineWebhookHandler, SIGNATURE_HEADER};
