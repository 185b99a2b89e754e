//! Conversation data model shared by the config loader and the chat engine.

mod generation;
mod safety;
mod turn;

pub use generation::GenerationConfig;
pub use safety::{BlockThreshold, HarmCategory, SafetyPolicy, SafetySetting};
pub use turn::{Role, Turn};
