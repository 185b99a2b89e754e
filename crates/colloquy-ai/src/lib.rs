//! Chat engine for Colloquy.
//!
//! Provides the provider-agnostic `ChatSession` pipeline and a Gemini
//! provider with:
//! - Synchronous and streaming (SSE) completions
//! - Google AI (API key) and Vertex AI (project/region) endpoints
//! - Content-safety blocks recorded as refusal turns
//! - Token usage tracking
//! - A scripted mock provider for tests

pub mod gemini;
pub mod mock;
pub mod session;
pub mod streaming;
pub mod token_tracker;

use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use colloquy_common::{GenerationConfig, SafetyPolicy, Turn};

pub use gemini::{GeminiClient, GeminiConfig, GeminiEndpoint};
pub use mock::{MockProvider, MockReply, RecordedRequest};
pub use session::{ChatSession, Reply, SessionId};
pub use token_tracker::TokenTracker;

/// Lazy, finite, non-restartable sequence of response chunks.
pub type ChunkStream = BoxStream<'static, Result<StreamChunk, ChatError>>;

/// A service that turns a transcript into new model text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short provider name used in logs and usage accounting.
    fn name(&self) -> &str;

    /// Generate the complete response in one round trip.
    async fn generate(&self, request: &CompletionRequest<'_>) -> Result<Completion, ChatError>;

    /// Start a streaming response. Chunks arrive in generation order.
    async fn generate_stream(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<ChunkStream, ChatError>;
}

#[async_trait]
impl<T: CompletionProvider + ?Sized> CompletionProvider for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn generate(&self, request: &CompletionRequest<'_>) -> Result<Completion, ChatError> {
        (**self).generate(request).await
    }

    async fn generate_stream(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<ChunkStream, ChatError> {
        (**self).generate_stream(request).await
    }
}

/// Everything a provider receives for one call.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub generation: &'a GenerationConfig,
    pub safety: &'a SafetyPolicy,
    /// Full transcript, ending with the new user turn.
    pub turns: &'a [Turn],
}

/// A finished, non-streamed response.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub finish_reason: Option<FinishReason>,
    pub usage: TokenUsage,
}

/// One piece of a streamed response.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamChunk {
    pub text: String,
    /// Set on the terminal chunk only.
    pub finish_reason: Option<FinishReason>,
    pub usage: Option<TokenUsage>,
}

impl StreamChunk {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: None,
            usage: None,
        }
    }

    pub fn last(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: Some(FinishReason::Stop),
            usage: None,
        }
    }
}

/// Why generation stopped. Safety stops are reported as
/// `ChatError::Blocked` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Other(String),
}

impl FinishReason {
    pub fn from_wire(reason: &str) -> Self {
        match reason {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::MaxTokens,
            other => FinishReason::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChatError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("response blocked: {0}")]
    Blocked(String),
    #[error("incomplete response stream: {0}")]
    IncompleteStream(String),
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("message must not be empty")]
    EmptyMessage,
}
