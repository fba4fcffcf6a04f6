//! Conversation Application Service (Use Case)
//!
//! Classify → (weather lookup | strategy dispatch) → compose → send.

use std::sync::Arc;

use kotoba::{
    classify, compose, City, DomainError, InboundEvent, MessagingPlatform, PushEnvelope,
    ReplyEnvelope, ReplyMessage, ReplySource, StrategyRegistry, WeatherForecast, WeatherService,
};

/// Application service answering chat messages
pub struct ConversationService<P: MessagingPlatform, W: WeatherService> {
    platform: Arc<P>,
    weather: Arc<W>,
    strategies: StrategyRegistry,
}

impl<P: MessagingPlatform, W: WeatherService> ConversationService<P, W> {
    pub fn new(platform: Arc<P>, weather: Arc<W>, strategies: StrategyRegistry) -> Self {
        Self {
            platform,
            weather,
            strategies,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    /// Build the reply for one message text; never fails
    pub async fn respond(&self, text: &str) -> ReplyMessage {
        let classification = classify(text);

        if !classification.is_weather_query {
            let reply = self.strategies.dispatch(text).await;
            return compose(ReplySource::Text(&reply));
        }

        let Some(city) = classification.city else {
            tracing::debug!(text = %text, "Weather query without a known city");
            return compose(ReplySource::CityUnresolved);
        };

        self.weather_reply(city.canonical_name()).await
    }

    /// Verify, parse and answer a webhook delivery
    ///
    /// Each answerable event gets its own reply call. The first failed send
    /// aborts the delivery so the platform can redeliver it.
    pub async fn handle_delivery(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<Vec<ReplyEnvelope>, DomainError> {
        let events = self.platform.handle_webhook(payload, signature).await?;
        let mut sent = Vec::new();

        for event in &events {
            let Some(envelope) = self.answer(event).await else {
                tracing::debug!(event_type = %event.event_type, "Skipping event without reply target");
                continue;
            };

            self.platform.reply(&envelope).await?;
            sent.push(envelope);
        }

        tracing::info!(
            platform = %self.platform.name(),
            events = events.len(),
            replies = sent.len(),
            "Webhook delivery handled"
        );

        Ok(sent)
    }

    /// Push a single text message
    pub async fn push_text(&self, to: &str, text: &str) -> Result<PushEnvelope, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::Validation("text must not be empty".to_string()));
        }

        let envelope = PushEnvelope::new(to, vec![ReplyMessage::text(text)]);
        self.platform.push(&envelope).await?;
        tracing::info!(to = %to, "Pushed text message");
        Ok(envelope)
    }

    /// Push a weather card (or the unavailable text) for `city`
    ///
    /// Table aliases are canonicalized, other names are used as given.
    pub async fn push_weather(&self, to: &str, city: &str) -> Result<PushEnvelope, DomainError> {
        let location = location_name(city)?;
        let message = self.weather_reply(&location).await;

        let envelope = PushEnvelope::new(to, vec![message]);
        self.platform.push(&envelope).await?;
        tracing::info!(to = %to, city = %location, "Pushed weather message");
        Ok(envelope)
    }

    /// Raw forecast lookup; failures are returned to the caller
    pub async fn forecast(&self, city: &str) -> Result<WeatherForecast, DomainError> {
        let location = location_name(city)?;
        self.weather.forecast(&location).await
    }

    async fn answer(&self, event: &InboundEvent) -> Option<ReplyEnvelope> {
        let (token, text) = event.reply_target()?;
        if event.is_redelivery {
            tracing::debug!(reply_token = %token, "Answering redelivered event");
        }
        let message = self.respond(text).await;
        Some(ReplyEnvelope::new(token, vec![message]))
    }

    async fn weather_reply(&self, location: &str) -> ReplyMessage {
        match self.weather.forecast(location).await {
            Ok(forecast) => compose(ReplySource::Forecast(&forecast)),
            Err(e) => {
                tracing::warn!(city = %location, error = %e, "Weather lookup failed");
                compose(ReplySource::WeatherUnavailable { city: location })
            }
        }
    }
}

fn location_name(city: &str) -> Result<String, DomainError> {
    if city.trim().is_empty() {
        return Err(DomainError::Validation("city must not be empty".to_string()));
    }
    Ok(City::canonical_or_verbatim(city))
}
