//! Async send methods for ChatSession (synchronous + streaming).

use std::future::Future;
use std::time::Duration;

use colloquy_common::Turn;
use futures_util::StreamExt;
use tracing::{debug, warn};

use crate::token_tracker::TokenTracker;
use crate::{ChatError, Completion, CompletionProvider, CompletionRequest, TokenUsage};

use super::manager::ChatSession;
use super::transcript::PendingTurn;
use super::types::Reply;

impl ChatSession {
    /// Append a user turn, wait for the complete response, append it.
    ///
    /// A content-safety block is returned as `Reply::Blocked` and recorded
    /// as a refusal turn. Every other failure is returned unchanged and
    /// leaves the transcript as it was.
    pub async fn send(
        &mut self,
        provider: &dyn CompletionProvider,
        user_message: impl Into<String>,
    ) -> Result<Reply, ChatError> {
        let user_message = non_empty(user_message.into())?;
        debug!(session = %self.id.short(), provider = provider.name(), "sending message");

        let pending = PendingTurn::begin(&mut self.transcript, Turn::user(user_message));
        let request = CompletionRequest {
            model: &self.model,
            generation: &self.generation,
            safety: &self.safety,
            turns: pending.turns(),
        };
        let outcome = within(self.timeout, provider.generate(&request)).await;

        settle(pending, &mut self.tracker, provider.name(), outcome)
    }

    /// Like `send`, but consumes the response as a stream.
    ///
    /// Each chunk is passed to `on_chunk` as it arrives, then appended to
    /// the response text. A stream that ends without a terminal chunk is an
    /// `IncompleteStream` error. Chunks already handed to `on_chunk` are not
    /// recalled when the stream later fails or is blocked.
    pub async fn send_streaming<F>(
        &mut self,
        provider: &dyn CompletionProvider,
        user_message: impl Into<String>,
        mut on_chunk: F,
    ) -> Result<Reply, ChatError>
    where
        F: FnMut(&str) + Send,
    {
        let user_message = non_empty(user_message.into())?;
        debug!(
            session = %self.id.short(),
            provider = provider.name(),
            "sending message (streaming)"
        );

        let pending = PendingTurn::begin(&mut self.transcript, Turn::user(user_message));
        let request = CompletionRequest {
            model: &self.model,
            generation: &self.generation,
            safety: &self.safety,
            turns: pending.turns(),
        };
        let outcome = within(
            self.timeout,
            collect_stream(provider, &request, &mut on_chunk),
        )
        .await;

        settle(pending, &mut self.tracker, provider.name(), outcome)
    }
}

fn non_empty(message: String) -> Result<String, ChatError> {
    if message.trim().is_empty() {
        return Err(ChatError::EmptyMessage);
    }
    Ok(message)
}

/// Run `call`, failing with `Timeout` once `limit` elapses. Dropping the
/// call future cancels the in-flight request.
async fn within<T, Fut>(limit: Option<Duration>, call: Fut) -> Result<T, ChatError>
where
    Fut: Future<Output = Result<T, ChatError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| ChatError::Timeout(limit))?,
        None => call.await,
    }
}

/// Drain a provider stream in order, concatenating the chunk text.
async fn collect_stream<F>(
    provider: &dyn CompletionProvider,
    request: &CompletionRequest<'_>,
    on_chunk: &mut F,
) -> Result<Completion, ChatError>
where
    F: FnMut(&str) + Send,
{
    let mut stream = provider.generate_stream(request).await?;

    let mut text = String::new();
    let mut finish_reason = None;
    let mut usage = TokenUsage::default();
    let mut chunks = 0usize;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        chunks += 1;
        if !chunk.text.is_empty() {
            on_chunk(&chunk.text);
            text.push_str(&chunk.text);
        }
        if let Some(u) = chunk.usage {
            usage = u;
        }
        if chunk.finish_reason.is_some() {
            finish_reason = chunk.finish_reason;
        }
    }

    debug!(chunks, "stream drained");

    match finish_reason {
        Some(reason) => Ok(Completion {
            text,
            finish_reason: Some(reason),
            usage,
        }),
        None if chunks == 0 => Err(ChatError::IncompleteStream(
            "stream produced no chunks".into(),
        )),
        None => Err(ChatError::IncompleteStream(format!(
            "stream ended after {chunks} chunks without a finish reason"
        ))),
    }
}

/// Commit or roll back the pending turn according to the call outcome.
fn settle(
    pending: PendingTurn<'_>,
    tracker: &mut TokenTracker,
    provider: &str,
    outcome: Result<Completion, ChatError>,
) -> Result<Reply, ChatError> {
    match outcome {
        Ok(completion) => {
            tracker.record(&completion.usage);
            debug!(
                provider,
                chars = completion.text.len(),
                finish = ?completion.finish_reason,
                "response received"
            );
            pending.commit(Turn::model(completion.text.clone()));
            Ok(Reply::Completed(completion.text))
        }
        Err(ChatError::Blocked(reason)) => {
            tracker.record_blocked();
            warn!(provider, %reason, "response blocked by provider");
            pending.commit(Turn::refusal(reason.clone()));
            Ok(Reply::Blocked { reason })
        }
        Err(e) => {
            debug!(provider, error = %e, "send failed, pending turn rolled back");
            drop(pending);
            Err(e)
        }
    }
}
