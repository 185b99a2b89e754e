//! Append-only conversation history and the guard that keeps it consistent.

use colloquy_common::Turn;

/// Ordered history of turns.
///
/// Turns are only ever appended. The single removal path is the rollback
/// of a `PendingTurn` that never got its response.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub(crate) fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub(crate) fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub(crate) fn len(&self) -> usize {
        self.turns.len()
    }
}

impl From<Vec<Turn>> for Transcript {
    fn from(turns: Vec<Turn>) -> Self {
        Self { turns }
    }
}

/// A user turn appended ahead of its response.
///
/// Dropping the guard without `commit` removes the user turn again, so an
/// error, a timeout, or a cancelled future all leave the transcript as it
/// was before the call.
pub(crate) struct PendingTurn<'a> {
    transcript: &'a mut Transcript,
    mark: usize,
    committed: bool,
}

impl<'a> PendingTurn<'a> {
    pub(crate) fn begin(transcript: &'a mut Transcript, user_turn: Turn) -> Self {
        let mark = transcript.len();
        transcript.push(user_turn);
        Self {
            transcript,
            mark,
            committed: false,
        }
    }

    /// The transcript including the pending user turn.
    pub(crate) fn turns(&self) -> &[Turn] {
        self.transcript.turns()
    }

    pub(crate) fn commit(mut self, model_turn: Turn) {
        self.transcript.push(model_turn);
        self.committed = true;
    }
}

impl Drop for PendingTurn<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.transcript.turns.truncate(self.mark);
        }
    }
}
