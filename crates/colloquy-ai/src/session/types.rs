//! Session result and identity types.

use std::fmt;

use colloquy_common::Turn;

/// Outcome of a successful `send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The model's full response text.
    Completed(String),
    /// The provider refused to answer; a refusal turn was recorded.
    Blocked { reason: String },
}

impl Reply {
    /// Response text, or the refusal marker for a blocked reply.
    pub fn text(&self) -> String {
        match self {
            Reply::Completed(text) => text.clone(),
            Reply::Blocked { reason } => Turn::refusal_marker(reason),
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Reply::Blocked { .. })
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Completed(text) => f.write_str(text),
            Reply::Blocked { reason } => f.write_str(&Turn::refusal_marker(reason)),
        }
    }
}

/// Identifies a session in log output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// First eight hex digits, enough to tell sessions apart in logs.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
