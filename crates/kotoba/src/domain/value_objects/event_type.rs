//! InboundEventType - webhook event kinds

use serde::{Deserialize, Serialize};

/// Kind of an inbound webhook event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum InboundEventType {
    Message,
    Follow,
    Unfollow,
    Join,
    Leave,
    Postback,
    Unsend,
    /// Any event type this service does not act on
    Other(String),
}

impl InboundEventType {
    /// Whether the event can carry user text that deserves a reply
    pub fn is_message(&self) -> bool {
        matches!(self, InboundEventType::Message)
    }
}

impl std::fmt::Display for InboundEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InboundEventType::Message => write!(f, "message"),
            InboundEventType::Follow => write!(f, "follow"),
            InboundEventType::Unfollow => write!(f, "unfollow"),
            InboundEventType::Join => write!(f, "join"),
            InboundEventType::Leave => write!(f, "leave"),
            InboundEventType::Postback => write!(f, "postback"),
            InboundEventType::Unsend => write!(f, "unsend"),
            InboundEventType::Other(kind) => write!(f, "{}", kind),
        }
    }
}

impl std::str::FromStr for InboundEventType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "message" => InboundEventType::Message,
            "follow" => InboundEventType::Follow,
            "unfollow" => InboundEventType::Unfollow,
            "join" => InboundEventType::Join,
            "leave" => InboundEventType::Leave,
            "postback" => InboundEventType::Postback,
            "unsend" => InboundEventType::Unsend,
            _ => InboundEventType::Other(s.to_string()),
        })
    }
}

impl From<String> for InboundEventType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<InboundEventType> for String {
    fn from(value: InboundEventType) -> Self {
        value.to_string()
    }
}
