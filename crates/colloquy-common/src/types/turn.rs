use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a conversation.
///
/// Fields are private so a turn cannot be edited once it sits in a
/// transcript. A model turn that records a content-safety refusal carries
/// the block reason in `blocked` and the refusal marker as its only part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    parts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    blocked: Option<String>,
}

impl Turn {
    pub fn new(role: Role, parts: Vec<String>) -> Self {
        Self {
            role,
            parts,
            blocked: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![text.into()])
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, vec![text.into()])
    }

    /// A model turn standing in for a response the provider refused to return.
    pub fn refusal(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            role: Role::Model,
            parts: vec![Self::refusal_marker(&reason)],
            blocked: Some(reason),
        }
    }

    /// Text recorded in place of a blocked response.
    pub fn refusal_marker(reason: &str) -> String {
        format!("[response blocked: {reason}]")
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// All parts joined without separators.
    pub fn text(&self) -> String {
        self.parts.concat()
    }

    pub fn blocked_reason(&self) -> Option<&str> {
        self.blocked.as_deref()
    }

    pub fn is_refusal(&self) -> bool {
        self.blocked.is_some()
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role, self.text())
    }
}
