//! Scripted completion provider for tests.
//!
//! Replies are consumed from a queue, one per call. When the queue is
//! empty the provider echoes the last user turn as `echo:<text>`. Every
//! request is recorded so tests can inspect what the session sent.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};

use colloquy_common::{Role, Turn};

use crate::{
    ChatError, ChunkStream, Completion, CompletionProvider, CompletionRequest, FinishReason,
    StreamChunk, TokenUsage,
};

/// One scripted outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// `echo:` followed by the last user turn's text.
    Echo,
    /// A fixed response.
    Text(String),
    /// Exact stream items, terminal chunk included or not.
    Stream(Vec<Result<StreamChunk, ChatError>>),
    /// Fail the call.
    Error(ChatError),
    /// Never answer.
    Stall,
}

/// What the session handed the provider on one call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub model: String,
    /// Serialized generation config.
    pub generation: String,
    /// Serialized safety policy.
    pub safety: String,
    pub turns: Vec<Turn>,
}

#[derive(Debug, Default)]
pub struct MockProvider {
    script: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<RecordedRequest>>,
    call_count: AtomicUsize,
    /// Characters per streamed chunk; 0 streams the text in one chunk.
    chunk_size: usize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: impl IntoIterator<Item = MockReply>) -> Self {
        let provider = Self::new();
        for reply in replies {
            provider.push(reply);
        }
        provider
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Queue a reply behind the ones already scripted.
    pub fn push(&self, reply: MockReply) {
        lock(&self.script).push_back(reply);
    }

    /// Number of `generate`/`generate_stream` calls received.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    fn next_reply(&self, request: &CompletionRequest<'_>) -> MockReply {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        lock(&self.requests).push(RecordedRequest {
            model: request.model.to_string(),
            generation: serde_json::to_string(request.generation).unwrap_or_default(),
            safety: serde_json::to_string(request.safety).unwrap_or_default(),
            turns: request.turns.to_vec(),
        });
        lock(&self.script).pop_front().unwrap_or(MockReply::Echo)
    }

    fn split(&self, text: &str, usage: TokenUsage) -> Vec<StreamChunk> {
        let chars: Vec<char> = text.chars().collect();
        let pieces: Vec<String> = if self.chunk_size == 0 || chars.is_empty() {
            vec![text.to_string()]
        } else {
            chars
                .chunks(self.chunk_size)
                .map(|c| c.iter().collect())
                .collect()
        };

        let last = pieces.len() - 1;
        pieces
            .into_iter()
            .enumerate()
            .map(|(i, piece)| {
                if i == last {
                    StreamChunk {
                        usage: Some(usage),
                        ..StreamChunk::last(piece)
                    }
                } else {
                    StreamChunk::text(piece)
                }
            })
            .collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn echo(turns: &[Turn]) -> String {
    let last_user = turns
        .iter()
        .rev()
        .find(|t| t.role() == Role::User)
        .map(Turn::text)
        .unwrap_or_default();
    format!("echo:{last_user}")
}

/// Word counts stand in for tokens.
fn usage_for(turns: &[Turn], output: &str) -> TokenUsage {
    TokenUsage {
        input_tokens: turns
            .iter()
            .map(|t| t.text().split_whitespace().count() as u64)
            .sum(),
        output_tokens: output.split_whitespace().count() as u64,
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &CompletionRequest<'_>) -> Result<Completion, ChatError> {
        let text = match self.next_reply(request) {
            MockReply::Echo => echo(request.turns),
            MockReply::Text(text) => text,
            MockReply::Stream(items) => {
                let mut text = String::new();
                let mut finish_reason = None;
                for item in items {
                    let chunk = item?;
                    text.push_str(&chunk.text);
                    finish_reason = chunk.finish_reason.or(finish_reason);
                }
                let usage = usage_for(request.turns, &text);
                return Ok(Completion {
                    text,
                    finish_reason,
                    usage,
                });
            }
            MockReply::Error(e) => return Err(e),
            MockReply::Stall => std::future::pending::<String>().await,
        };

        Ok(Completion {
            usage: usage_for(request.turns, &text),
            text,
            finish_reason: Some(FinishReason::Stop),
        })
    }

    async fn generate_stream(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<ChunkStream, ChatError> {
        let text = match self.next_reply(request) {
            MockReply::Echo => echo(request.turns),
            MockReply::Text(text) => text,
            MockReply::Stream(items) => return Ok(stream::iter(items).boxed()),
            MockReply::Error(e) => return Err(e),
            MockReply::Stall => return Ok(stream::pending().boxed()),
        };

        let usage = usage_for(request.turns, &text);
        let chunks = self.split(&text, usage);
        Ok(stream::iter(chunks.into_iter().map(Ok)).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_common::{GenerationConfig, SafetyPolicy};

    fn request_over<'a>(
        turns: &'a [Turn],
        generation: &'a GenerationConfig,
        safety: &'a SafetyPolicy,
    ) -> CompletionRequest<'a> {
        CompletionRequest {
            model: "mock-model",
            generation,
            safety,
            turns,
        }
    }

    #[tokio::test]
    async fn echoes_last_user_turn_when_script_is_empty() {
        let provider = MockProvider::new();
        let turns = vec![Turn::user("first"), Turn::model("ok"), Turn::user("ping")];
        let generation = GenerationConfig::new();
        let safety = SafetyPolicy::new();

        let completion = provider
            .generate(&request_over(&turns, &generation, &safety))
            .await
            .unwrap();
        assert_eq!(completion.text, "echo:ping");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.requests()[0].turns, turns);
    }

    #[tokio::test]
    async fn scripted_replies_are_consumed_in_order() {
        let provider = MockProvider::with_replies([
            MockReply::Text("one".into()),
            MockReply::Error(ChatError::RateLimited("quota".into())),
        ]);
        let turns = vec![Turn::user("q")];
        let generation = GenerationConfig::new();
        let safety = SafetyPolicy::new();
        let request = request_over(&turns, &generation, &safety);

        assert_eq!(provider.generate(&request).await.unwrap().text, "one");
        assert_eq!(
            provider.generate(&request).await,
            Err(ChatError::RateLimited("quota".into()))
        );
        assert_eq!(provider.generate(&request).await.unwrap().text, "echo:q");
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn streams_text_in_fixed_size_chunks() {
        let provider = MockProvider::with_replies([MockReply::Text("abcdefg".into())])
            .with_chunk_size(3);
        let turns = vec![Turn::user("q")];
        let generation = GenerationConfig::new();
        let safety = SafetyPolicy::new();

        let chunks: Vec<_> = provider
            .generate_stream(&request_over(&turns, &generation, &safety))
            .await
            .unwrap()
            .collect()
            .await;
        let texts: Vec<String> = chunks
            .iter()
            .map(|c| c.as_ref().unwrap().text.clone())
            .collect();
        assert_eq!(texts, vec!["abc", "def", "g"]);
        assert_eq!(chunks[0].as_ref().unwrap().finish_reason, None);
        assert_eq!(
            chunks[2].as_ref().unwrap().finish_reason,
            Some(FinishReason::Stop)
        );
    }

    #[test]
    fn records_serialized_configuration() {
        let provider = MockProvider::new();
        let turns = vec![Turn::user("q")];
        let generation = GenerationConfig::new().with_temperature(0.5);
        let safety = SafetyPolicy::new();
        provider.next_reply(&request_over(&turns, &generation, &safety));

        let recorded = &provider.requests()[0];
        assert_eq!(recorded.model, "mock-model");
        assert!(recorded.generation.contains("0.5"));
    }
}
