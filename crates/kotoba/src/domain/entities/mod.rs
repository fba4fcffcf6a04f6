//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - InboundEvent: One event from a webhook delivery
//! - ClassificationResult: What the classifier made of a message
//! - ReplyMessage / envelopes: Outbound messages in the platform schema
//! - WeatherForecast: Normalized weather lookup result
//! - Notification: Broadcast to realtime subscribers

mod classification;
mod forecast;
mod inbound;
mod notification;
mod reply;

pub use classification::*;
pub use forecast::*;
pub use inbound::*;
pub use notification::*;
pub use reply::*;
