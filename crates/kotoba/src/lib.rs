//! Kotoba Domain Library
//!
//! Core domain types and interfaces for the Kotoba chat-bot backend.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Inbound events, reply messages, forecasts, notifications
//!   - `value_objects/`: Immutable value types (City, InboundEventType)
//!   - `services/`: Classifier, strategy registry, reply composer
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `messaging`: Messaging platform (reply / push / webhook parsing)
//!   - `weather`: External weather lookup
//!   - `notification`: Notification broadcast hub
//!
//! # Usage
//!
//! ```rust,ignore
//! use kotoba::domain::services::{classify, compose, ReplySource};
//! use kotoba::ports::{MessagingPlatform, WeatherService};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    classify, compose, AskWeatherStrategy, City, ClassificationResult, DomainError,
    FlexBox, FlexBubble, FlexComponent, FlexContainer, FlexLayout, FlexText, ForecastPeriod,
    InboundEvent, InboundEventType, MessageStrategy, NotepadStrategy, Notification,
    NotificationEvent, PushEnvelope, ReplyEnvelope, ReplyMessage, ReplySource,
    StrategyRegistry, StrategyRegistryBuilder, WeatherForecast, FALLBACK_REPLY,
};
pub use ports::{MessagingPlatform, NotificationHub, WeatherService};
