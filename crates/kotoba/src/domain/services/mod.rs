//! Domain Services
//!
//! Stateless logic over domain entities:
//! - classifier: weather-inquiry detection and city resolution
//! - strategy: exact-match keyword handlers
//! - composer: turns upstream results into one reply message

mod classifier;
mod composer;
mod strategy;

pub use classifier::*;
pub use composer::*;
pub use strategy::*;
