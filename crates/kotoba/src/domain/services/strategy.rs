//! Message Strategies
//!
//! Exact-match dispatch from a trimmed message to a handler. The registry
//! is assembled once at startup and is read-only afterwards.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::errors::DomainError;

/// Reply used when no handler matches or a handler fails
pub const FALLBACK_REPLY: &str = "抱歉，我不太懂您的意思。";

/// A handler that produces reply text for a message
#[async_trait]
pub trait MessageStrategy: Send + Sync {
    /// Stable name for logs
    fn name(&self) -> &str;

    /// Produce the reply text for `message`
    async fn execute(&self, message: &str) -> Result<String, DomainError>;
}

/// Weather inquiry entry point (placeholder reply)
pub struct AskWeatherStrategy;

#[async_trait]
impl MessageStrategy for AskWeatherStrategy {
    fn name(&self) -> &str {
        "ask_weather"
    }

    async fn execute(&self, _message: &str) -> Result<String, DomainError> {
        Ok("這是天氣查詢的回應".to_string())
    }
}

/// Note-taking entry point (placeholder reply)
pub struct NotepadStrategy;

#[async_trait]
impl MessageStrategy for NotepadStrategy {
    fn name(&self) -> &str {
        "notepad"
    }

    async fn execute(&self, _message: &str) -> Result<String, DomainError> {
        Ok("回應你的內容".to_string())
    }
}

/// Immutable keyword → handler table
#[derive(Clone)]
pub struct StrategyRegistry {
    strategies: Arc<HashMap<String, Arc<dyn MessageStrategy>>>,
}

impl StrategyRegistry {
    pub fn builder() -> StrategyRegistryBuilder {
        StrategyRegistryBuilder::default()
    }

    /// Registry with the built-in keywords
    pub fn with_defaults() -> Self {
        Self::builder()
            .register("精打細算", AskWeatherStrategy)
            .register("記事本", NotepadStrategy)
            .build()
    }

    pub fn get(&self, key: &str) -> Option<&Arc<dyn MessageStrategy>> {
        self.strategies.get(key.trim())
    }

    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.strategies.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Reply text for `message`; never fails
    pub async fn dispatch(&self, message: &str) -> String {
        let Some(strategy) = self.get(message) else {
            return FALLBACK_REPLY.to_string();
        };

        match strategy.execute(message).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(strategy = %strategy.name(), error = %e, "Strategy failed, using fallback reply");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Collects handlers before the registry is frozen
#[derive(Default)]
pub struct StrategyRegistryBuilder {
    strategies: HashMap<String, Arc<dyn MessageStrategy>>,
}

impl StrategyRegistryBuilder {
    /// Register a handler; keys are trimmed and later registrations win
    pub fn register(mut self, key: impl Into<String>, strategy: impl MessageStrategy + 'static) -> Self {
        let key = key.into().trim().to_string();
        self.strategies.insert(key, Arc::new(strategy));
        self
    }

    pub fn build(self) -> StrategyRegistry {
        StrategyRegistry {
            strategies: Arc::new(self.strategies),
        }
    }
}
