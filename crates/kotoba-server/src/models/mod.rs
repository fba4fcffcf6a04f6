//! Kotoba Data Models
//!
//! - Webhook: replies sent for a LINE delivery
//! - Push: operator-initiated messages
//! - Notification: realtime hub publishing
//! - Weather: forecast lookups

mod notification;
mod push;
mod weather;
mod webhook;

pub use notification::*;
pub use push::*;
pub use weather::*;
pub use webhook::*;
