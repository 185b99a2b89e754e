//! Conversation session management.
//!
//! A `ChatSession` owns the transcript and the fixed request parameters
//! of one conversation, and runs each `send` as an all-or-nothing step:
//! either a user turn and a model turn are appended, or nothing is.

mod chat;
mod manager;
mod transcript;
mod types;

#[cfg(test)]
mod tests;

pub use manager::ChatSession;
pub use types::{Reply, SessionId};
