//! Narrative insights from pluggable text-generation providers.
//!
//! The numbers always come from `core::services`; a provider only turns a prompt built by
//! [`prompts::PromptBuilder`] into prose. No network client ships with the crate, so the
//! application registers whatever providers it has into a [`FallbackChain`].

pub mod assistant;
pub mod cache;
pub mod prompts;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AiSettings;

pub use assistant::{InsightAssistant, StabilityInsight};
pub use cache::{CachedInsights, InsightCache};
pub use prompts::PromptBuilder;

/// Tone and format instructions sent ahead of every prompt.
pub const ASSISTANT_PERSONA: &str = "You are a professional personal finance assistant. \
Your role is to provide clear, helpful, and actionable financial advice. \
Be supportive, informative, and encouraging while maintaining professionalism. \
Use minimal emojis (max 1 per response, only when appropriate). \
Keep responses concise, practical, and easy to understand. \
Focus on helping users make better financial decisions with empathy and expertise.";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AiError {
    #[error("No insight provider is configured")]
    NotConfigured,
    #[error("Provider `{provider}` is unavailable: {message}")]
    Unavailable { provider: String, message: String },
    #[error("Provider `{provider}` responded with HTTP {status}")]
    Http { provider: String, status: u16 },
    #[error("Provider `{provider}` returned an unusable response: {message}")]
    InvalidResponse { provider: String, message: String },
    #[error("AI service temporarily unavailable. Please try again later.")]
    Exhausted,
}

/// One generation call: persona, user prompt, and sampling limits.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, settings: &AiSettings) -> Self {
        Self {
            system: ASSISTANT_PERSONA.to_string(),
            prompt: prompt.into(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }
}

/// A text-generation backend.
pub trait InsightProvider: Send + Sync {
    fn name(&self) -> &str;
    fn complete(&self, request: &CompletionRequest) -> Result<String, AiError>;
}

/// Tries each provider in order and returns the first non-empty answer.
#[derive(Default)]
pub struct FallbackChain {
    providers: Vec<Box<dyn InsightProvider>>,
}

impl FallbackChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: Box<dyn InsightProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn push(&mut self, provider: Box<dyn InsightProvider>) {
        self.providers.push(provider);
    }

    /// Keeps only the providers named in `preferred`, in that order.
    ///
    /// An empty preference list leaves the chain as registered.
    pub fn ordered_by(mut self, preferred: &[String]) -> Self {
        if preferred.is_empty() {
            return self;
        }
        let rank = |provider: &dyn InsightProvider| {
            preferred
                .iter()
                .position(|name| name.eq_ignore_ascii_case(provider.name()))
        };
        self.providers
            .retain(|provider| rank(provider.as_ref()).is_some());
        self.providers
            .sort_by_key(|provider| rank(provider.as_ref()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|provider| provider.name()).collect()
    }
}

impl InsightProvider for FallbackChain {
    fn name(&self) -> &str {
        "fallback"
    }

    fn complete(&self, request: &CompletionRequest) -> Result<String, AiError> {
        if self.providers.is_empty() {
            return Err(AiError::NotConfigured);
        }
        for provider in &self.providers {
            match provider.complete(request) {
                Ok(text) if !text.trim().is_empty() => {
                    debug!(provider = provider.name(), "insight generated");
                    return Ok(text);
                }
                Ok(_) => warn!(provider = provider.name(), "provider returned empty text"),
                Err(err) => warn!(provider = provider.name(), error = %err, "provider failed"),
            }
        }
        Err(AiError::Exhausted)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedProvider;
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest::new("How am I doing?", &AiSettings::default())
    }

    #[test]
    fn empty_chain_is_not_configured() {
        assert_eq!(
            FallbackChain::new().complete(&request()),
            Err(AiError::NotConfigured)
        );
    }

    #[test]
    fn falls_through_to_next_provider() {
        let chain = FallbackChain::new()
            .with_provider(Box::new(ScriptedProvider::failing("gemini", 503)))
            .with_provider(Box::new(ScriptedProvider::ok("groq", "   ")))
            .with_provider(Box::new(ScriptedProvider::ok("local", "Looking good.")));
        assert_eq!(chain.complete(&request()).unwrap(), "Looking good.");
    }

    #[test]
    fn exhausted_when_all_fail() {
        let chain = FallbackChain::new()
            .with_provider(Box::new(ScriptedProvider::failing("gemini", 500)))
            .with_provider(Box::new(ScriptedProvider::failing("groq", 429)));
        assert_eq!(chain.complete(&request()), Err(AiError::Exhausted));
    }

    #[test]
    fn preference_order_filters_and_sorts() {
        let chain = FallbackChain::new()
            .with_provider(Box::new(ScriptedProvider::ok("gemini", "a")))
            .with_provider(Box::new(ScriptedProvider::ok("local", "b")))
            .with_provider(Box::new(ScriptedProvider::ok("groq", "c")))
            .ordered_by(&["groq".to_string(), "Gemini".to_string()]);
        assert_eq!(chain.names(), vec!["groq", "gemini"]);
    }

    #[test]
    fn request_carries_settings() {
        let settings = AiSettings {
            temperature: 0.2,
            max_tokens: 64,
            providers: Vec::new(),
        };
        let request = CompletionRequest::new("hi", &settings);
        assert_eq!(request.max_tokens, 64);
        assert_eq!(request.system, ASSISTANT_PERSONA);
    }
}
