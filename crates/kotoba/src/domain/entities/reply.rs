//! Reply Messages
//!
//! Outbound messages serialized in the LINE Messaging API schema:
//! plain text, or a flex "card" built from nested boxes and texts.

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Most messages a single reply or push call may carry
pub const MAX_MESSAGES_PER_CALL: usize = 5;
/// Longest text message the platform accepts, in characters
pub const MAX_TEXT_CHARS: usize = 5000;
/// Longest flex alt text the platform accepts, in characters
pub const MAX_ALT_TEXT_CHARS: usize = 1500;

/// One outbound message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplyMessage {
    Text {
        text: String,
    },
    Flex {
        #[serde(rename = "altText")]
        alt_text: String,
        contents: FlexContainer,
    },
}

impl ReplyMessage {
    /// Plain text message, truncated to the platform limit
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: truncate_chars(text.into(), MAX_TEXT_CHARS),
        }
    }

    /// Card message with a text fallback for notifications and old clients
    pub fn flex(alt_text: impl Into<String>, bubble: FlexBubble) -> Self {
        Self::Flex {
            alt_text: truncate_chars(alt_text.into(), MAX_ALT_TEXT_CHARS),
            contents: FlexContainer::Bubble(bubble),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Flex { .. } => "flex",
        }
    }

    /// Every human-readable string in the message, in document order
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Self::Text { text } => vec![text.as_str()],
            Self::Flex { alt_text, contents } => {
                let mut out = vec![alt_text.as_str()];
                let FlexContainer::Bubble(bubble) = contents;
                for section in [&bubble.header, &bubble.body, &bubble.footer]
                    .into_iter()
                    .flatten()
                {
                    section.collect_texts(&mut out);
                }
                out
            }
        }
    }
}

/// Top-level flex container
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FlexContainer {
    Bubble(FlexBubble),
}

/// A single card with optional header, body and footer sections
///
/// Sections are written as `{"type": "box", ...}` like nested boxes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FlexBubble {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "box_section")]
    pub header: Option<FlexBox>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "box_section")]
    pub body: Option<FlexBox>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "box_section")]
    pub footer: Option<FlexBox>,
}

mod box_section {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::FlexBox;

    #[derive(Serialize)]
    #[serde(tag = "type", rename_all = "lowercase")]
    enum TaggedRef<'a> {
        Box(&'a FlexBox),
    }

    #[derive(Deserialize)]
    #[serde(tag = "type", rename_all = "lowercase")]
    enum Tagged {
        Box(FlexBox),
    }

    pub fn serialize<S: Serializer>(
        section: &Option<FlexBox>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        section.as_ref().map(TaggedRef::Box).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<FlexBox>, D::Error> {
        let section = Option::<Tagged>::deserialize(deserializer)?;
        Ok(section.map(|Tagged::Box(inner)| inner))
    }
}

impl FlexBubble {
    pub fn with_header(mut self, header: FlexBox) -> Self {
        self.header = Some(header);
        self
    }

    pub fn with_body(mut self, body: FlexBox) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_footer(mut self, footer: FlexBox) -> Self {
        self.footer = Some(footer);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlexLayout {
    Vertical,
    Horizontal,
    Baseline,
}

/// A flex component
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FlexComponent {
    Box(FlexBox),
    Text(FlexText),
    Separator(FlexSeparator),
}

/// Layout box holding child components
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlexBox {
    pub layout: FlexLayout,
    pub contents: Vec<FlexComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
}

impl FlexBox {
    pub fn vertical() -> Self {
        Self::new(FlexLayout::Vertical)
    }

    pub fn horizontal() -> Self {
        Self::new(FlexLayout::Horizontal)
    }

    fn new(layout: FlexLayout) -> Self {
        Self {
            layout,
            contents: Vec::new(),
            spacing: None,
            margin: None,
        }
    }

    pub fn spacing(mut self, spacing: impl Into<String>) -> Self {
        self.spacing = Some(spacing.into());
        self
    }

    pub fn margin(mut self, margin: impl Into<String>) -> Self {
        self.margin = Some(margin.into());
        self
    }

    pub fn push(mut self, component: FlexComponent) -> Self {
        self.contents.push(component);
        self
    }

    pub fn push_text(self, text: FlexText) -> Self {
        self.push(FlexComponent::Text(text))
    }

    fn collect_texts<'a>(&'a self, out: &mut Vec<&'a str>) {
        for component in &self.contents {
            match component {
                FlexComponent::Box(inner) => inner.collect_texts(out),
                FlexComponent::Text(text) => out.push(text.text.as_str()),
                FlexComponent::Separator(_) => {}
            }
        }
    }
}

/// Text component
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlexText {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<u32>,
}

impl FlexText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size: None,
            weight: None,
            color: None,
            wrap: None,
            flex: None,
        }
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn bold(mut self) -> Self {
        self.weight = Some("bold".to_string());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn wrap(mut self) -> Self {
        self.wrap = Some(true);
        self
    }

    pub fn flex(mut self, flex: u32) -> Self {
        self.flex = Some(flex);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FlexSeparator {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
}

/// Body of a reply API call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReplyEnvelope {
    pub reply_token: String,
    pub messages: Vec<ReplyMessage>,
}

impl ReplyEnvelope {
    pub fn new(reply_token: impl Into<String>, messages: Vec<ReplyMessage>) -> Self {
        Self {
            reply_token: reply_token.into(),
            messages,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.reply_token.trim().is_empty() {
            return Err(DomainError::Validation("reply token is empty".to_string()));
        }
        validate_messages(&self.messages)
    }
}

/// Body of a push API call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PushEnvelope {
    pub to: String,
    pub messages: Vec<ReplyMessage>,
}

impl PushEnvelope {
    pub fn new(to: impl Into<String>, messages: Vec<ReplyMessage>) -> Self {
        Self {
            to: to.into(),
            messages,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.to.trim().is_empty() {
            return Err(DomainError::Validation("push recipient is empty".to_string()));
        }
        validate_messages(&self.messages)
    }
}

fn validate_messages(messages: &[ReplyMessage]) -> Result<(), DomainError> {
    if messages.is_empty() {
        return Err(DomainError::Validation("no messages to send".to_string()));
    }
    if messages.len() > MAX_MESSAGES_PER_CALL {
        return Err(DomainError::Validation(format!(
            "{} messages exceed the limit of {}",
            messages.len(),
            MAX_MESSAGES_PER_CALL
        )));
    }
    Ok(())
}

fn truncate_chars(text: String, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_wire_shape() {
        let json = serde_json::to_value(ReplyMessage::text("你好")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "text", "text": "你好"}));
    }

    #[test]
    fn test_flex_message_wire_shape() {
        let bubble = FlexBubble::default()
            .with_header(FlexBox::vertical().push_text(FlexText::new("Title").bold()))
            .with_body(
                FlexBox::vertical()
                    .spacing("sm")
                    .push(FlexComponent::Separator(FlexSeparator::default()))
                    .push_text(FlexText::new("Line").wrap()),
            );
        let json = serde_json::to_value(ReplyMessage::flex("alt", bubble)).unwrap();

        assert_eq!(json["type"], "flex");
        assert_eq!(json["altText"], "alt");
        assert_eq!(json["contents"]["type"], "bubble");
        assert_eq!(json["contents"]["header"]["type"], "box");
        assert_eq!(json["contents"]["header"]["layout"], "vertical");
        assert_eq!(json["contents"]["header"]["contents"][0]["type"], "text");
        assert_eq!(json["contents"]["header"]["contents"][0]["weight"], "bold");
        assert_eq!(json["contents"]["body"]["type"], "box");
        assert_eq!(json["contents"]["body"]["contents"][0]["type"], "separator");
        assert!(json["contents"].get("footer").is_none());
    }

    #[test]
    fn test_untagged_section_is_rejected() {
        let json = serde_json::json!({
            "type": "flex",
            "altText": "alt",
            "contents": {"type": "bubble", "body": {"layout": "vertical", "contents": []}}
        });
        assert!(serde_json::from_value::<ReplyMessage>(json).is_err());

        let json = serde_json::json!({
            "type": "flex",
            "altText": "alt",
            "contents": {
                "type": "bubble",
                "body": {"type": "box", "layout": "vertical", "contents": []}
            }
        });
        let ReplyMessage::Flex { contents, .. } = serde_json::from_value(json).unwrap() else {
            panic!("Expected flex message");
        };
        let FlexContainer::Bubble(bubble) = contents;
        assert!(bubble.header.is_none());
        assert_eq!(bubble.body, Some(FlexBox::vertical()));
    }

    #[test]
    fn test_texts_walks_nested_boxes() {
        let bubble = FlexBubble::default().with_body(
            FlexBox::vertical()
                .push_text(FlexText::new("a"))
                .push(FlexComponent::Box(
                    FlexBox::horizontal().push_text(FlexText::new("b")),
                )),
        );
        let message = ReplyMessage::flex("alt", bubble);
        assert_eq!(message.texts(), vec!["alt", "a", "b"]);
    }

    #[test]
    fn test_text_is_truncated_on_char_boundary() {
        let long = "天".repeat(MAX_TEXT_CHARS + 10);
        let ReplyMessage::Text { text } = ReplyMessage::text(long) else {
            panic!("Expected text message");
        };
        assert_eq!(text.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn test_envelope_serializes_camel_case() {
        let envelope = ReplyEnvelope::new("R1", vec![ReplyMessage::text("hi")]);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["replyToken"], "R1");
        assert_eq!(json["messages"][0]["text"], "hi");
    }

    #[test]
    fn test_envelope_validation() {
        assert!(ReplyEnvelope::new("R1", vec![]).validate().is_err());
        assert!(ReplyEnvelope::new(" ", vec![ReplyMessage::text("x")])
            .validate()
            .is_err());
        let too_many = vec![ReplyMessage::text("x"); MAX_MESSAGES_PER_CALL + 1];
        assert!(PushEnvelope::new("U1", too_many).validate().is_err());
        assert!(PushEnvelope::new("U1", vec![ReplyMessage::text("x")])
            .validate()
            .is_ok());
    }
}
