//! Google Gemini completion provider.
//!
//! Implements `CompletionProvider` for the Generative Language API
//! (API key) and for Vertex AI (project, region and bearer token).

mod api;
mod client;
mod config;

pub use client::GeminiClient;
pub use config::{GeminiConfig, GeminiEndpoint};
