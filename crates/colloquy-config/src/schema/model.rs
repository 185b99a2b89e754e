//! Model and endpoint selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which Gemini endpoint to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Google AI Gemini API, authenticated with an API key.
    GoogleAi,
    /// Vertex AI on Google Cloud, authenticated with an access token.
    VertexAi,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::GoogleAi => "google-ai",
            Backend::VertexAi => "vertex-ai",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google-ai" | "googleai" | "gemini" => Ok(Backend::GoogleAi),
            "vertex-ai" | "vertexai" | "vertex" => Ok(Backend::VertexAi),
            other => Err(format!(
                "unknown backend '{other}' (expected google-ai or vertex-ai)"
            )),
        }
    }
}

/// `[model]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    pub backend: Backend,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gemini-1.5-pro-latest".into(),
            backend: Backend::GoogleAi,
        }
    }
}
