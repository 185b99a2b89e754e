//! ChatSession struct and conversation state.

use std::time::Duration;

use colloquy_common::{GenerationConfig, SafetyPolicy, Turn};
use tracing::debug;

use crate::token_tracker::TokenTracker;

use super::transcript::Transcript;
use super::types::SessionId;

/// One conversation with a completion provider.
///
/// The model id, generation config and safety policy are fixed at
/// construction; there are no setters. `send` takes `&mut self`, so calls
/// on one session are strictly sequential.
pub struct ChatSession {
    pub(super) id: SessionId,
    pub(super) model: String,
    pub(super) generation: GenerationConfig,
    pub(super) safety: SafetyPolicy,
    pub(super) transcript: Transcript,
    /// Upper bound on one provider call, stream included.
    pub(super) timeout: Option<Duration>,
    pub(super) tracker: TokenTracker,
}

impl ChatSession {
    pub fn new(
        model: impl Into<String>,
        generation: GenerationConfig,
        safety: SafetyPolicy,
        initial_turns: Vec<Turn>,
    ) -> Self {
        let session = Self {
            id: SessionId::new(),
            model: model.into(),
            generation,
            safety,
            transcript: Transcript::from(initial_turns),
            timeout: None,
            tracker: TokenTracker::new(),
        };
        debug!(
            session = %session.id.short(),
            model = %session.model,
            seeded = session.transcript.len(),
            "chat session created"
        );
        session
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read-only view of the transcript.
    pub fn history(&self) -> &[Turn] {
        self.transcript.turns()
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn generation_config(&self) -> &GenerationConfig {
        &self.generation
    }

    pub fn safety_policy(&self) -> &SafetyPolicy {
        &self.safety
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Token usage accumulated over all successful calls.
    pub fn usage(&self) -> &TokenTracker {
        &self.tracker
    }
}
