//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the domain layer
//! interacts with external systems (messaging platform, weather API,
//! realtime notification fan-out).
//!
//! Implementations of these traits live in the infrastructure layer.

pub mod messaging;
pub mod notification;
pub mod weather;

// Re-exports
pub use messaging::*;
pub use notification::*;
pub use weather::*;
