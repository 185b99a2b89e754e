//! Token usage tracking for a session.

use crate::TokenUsage;

/// Cumulative usage over the calls of one session.
#[derive(Debug, Clone, Default)]
pub struct TokenTracker {
    total: TokenUsage,
    /// Calls that produced a response.
    completed: u64,
    /// Calls the provider refused on safety grounds.
    blocked: u64,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record token usage from a completed call.
    pub fn record(&mut self, usage: &TokenUsage) {
        self.total.input_tokens = self.total.input_tokens.saturating_add(usage.input_tokens);
        self.total.output_tokens = self
            .total
            .output_tokens
            .saturating_add(usage.output_tokens);
        self.completed += 1;
    }

    /// Record a call that ended in a content-safety block.
    pub fn record_blocked(&mut self) {
        self.blocked += 1;
    }

    pub fn total(&self) -> &TokenUsage {
        &self.total
    }

    pub fn total_tokens(&self) -> u64 {
        self.total.total_tokens()
    }

    /// Calls that reached the provider and produced an outcome.
    pub fn call_count(&self) -> u64 {
        self.completed + self.blocked
    }

    pub fn blocked_count(&self) -> u64 {
        self.blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accumulates() {
        let mut tracker = TokenTracker::new();
        tracker.record(&TokenUsage {
            input_tokens: 10,
            output_tokens: 5,
        });
        tracker.record(&TokenUsage {
            input_tokens: 3,
            output_tokens: 2,
        });

        assert_eq!(tracker.total().input_tokens, 13);
        assert_eq!(tracker.total().output_tokens, 7);
        assert_eq!(tracker.total_tokens(), 20);
        assert_eq!(tracker.call_count(), 2);
        assert_eq!(tracker.blocked_count(), 0);
    }

    #[test]
    fn blocked_calls_count_without_tokens() {
        let mut tracker = TokenTracker::new();
        tracker.record_blocked();
        assert_eq!(tracker.call_count(), 1);
        assert_eq!(tracker.blocked_count(), 1);
        assert_eq!(tracker.total_tokens(), 0);
    }
}
