//! Message Classifier
//!
//! Decides whether a chat message asks about the weather and, if so,
//! which city it names. Total over all strings.

use crate::domain::entities::ClassificationResult;
use crate::domain::value_objects::City;

/// Substrings that mark a weather inquiry. ASCII entries match case-insensitively.
pub const WEATHER_KEYWORDS: &[&str] = &["天氣", "氣象", "weather"];

/// Classify a raw message text
pub fn classify(text: &str) -> ClassificationResult {
    let lowered = text.to_lowercase();
    if !WEATHER_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        return ClassificationResult::not_weather();
    }
    ClassificationResult::weather(City::resolve(&lowered))
}
