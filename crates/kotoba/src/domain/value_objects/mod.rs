//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod city;
mod event_type;

pub use city::*;
pub use event_type::*;
