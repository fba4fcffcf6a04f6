//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod cwb;
pub mod notification;

// Re-exports
pub use cwb::{CwbConfig, CwbWeatherClient};
pub use notification::BroadcastNotificationHub;
