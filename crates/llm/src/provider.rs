pub(crate) mod openai;

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::messages::{ChatMessage, ChatRole};

/// Type alias for a stream of completion text fragments.
///
/// Fragments arrive in provider-chosen chunk boundaries and are forwarded
/// without batching or coalescing. The stream is pinned and boxed to allow
/// dynamic dispatch across provider implementations.
pub(crate) type TokenStream = Pin<Box<dyn Stream<Item = crate::Result<String>> + Send>>;

/// A fully composed provider invocation: system prompt, trimmed history and
/// the current user turn are already in `messages`.
#[derive(Debug, Clone)]
pub(crate) struct ProviderRequest {
    pub(crate) model: String,
    pub(crate) messages: Vec<ChatMessage>,
    pub(crate) temperature: f32,
    pub(crate) max_tokens: u32,
}

impl ProviderRequest {
    /// Minimal request used by the connectivity probe.
    fn probe() -> Self {
        Self {
            model: crate::catalog::MODELS[0].id.to_string(),
            messages: vec![ChatMessage {
                role: ChatRole::User,
                content: "Hello".to_string(),
            }],
            temperature: 0.7,
            max_tokens: 5,
        }
    }
}

/// Result of a non-streaming provider invocation.
#[derive(Debug, Clone)]
pub(crate) struct Completion {
    pub(crate) text: String,
    pub(crate) tokens_used: u32,
}

/// Trait for LLM provider implementations.
///
/// Note for async_trait: the trait must be dyn-compatible, so plain Rust
/// async trait functions without Box/Pin won't do.
#[async_trait]
pub(crate) trait Provider: Send + Sync {
    /// Process a completion request and return the full generated text.
    async fn complete(&self, request: ProviderRequest) -> crate::Result<Completion>;

    /// Process a streaming completion request.
    ///
    /// Returns a stream of text fragments emitted as the model generates the
    /// response. Failures are surfaced once, never retried here.
    async fn complete_stream(&self, request: ProviderRequest) -> crate::Result<TokenStream>;

    /// Check provider connectivity with a minimal completion call.
    async fn probe(&self) -> bool {
        self.complete(ProviderRequest::probe()).await.is_ok()
    }

    /// Get the provider name.
    fn name(&self) -> &str;
}
