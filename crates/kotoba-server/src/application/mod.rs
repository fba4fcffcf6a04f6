//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! the messaging platform and external services.

mod conversation_service;

pub use conversation_service::ConversationService;
