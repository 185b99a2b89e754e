//! One-shot conversation settings.

use colloquy_common::Turn;
use serde::{Deserialize, Serialize};

/// `[session]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name shown in the welcome banner.
    pub title: String,
    /// Message sent when none is given on the command line.
    pub message: String,
    /// Print the response as it streams in.
    pub stream: bool,
    /// Per-call timeout in seconds. Unset means wait indefinitely.
    pub timeout_secs: Option<u64>,
    /// Dump the transcript after the response. Unset picks the backend
    /// default (on for google-ai, off for vertex-ai).
    pub show_history: Option<bool>,
    /// Conversation to seed the session with. Unset uses the built-in
    /// SQL-assistant exchange; an empty list starts from scratch.
    pub seed: Option<Vec<Turn>>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            title: "the SQL expert chatbot".into(),
            message: "INSERT_INPUT_HERE".into(),
            stream: false,
            timeout_secs: None,
            show_history: None,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_common::Role;

    #[test]
    fn seed_turns_parse_from_array_of_tables() {
        let session: SessionConfig = toml::from_str(
            r#"
[[seed]]
role = "user"
parts = ["What is an index?"]

[[seed]]
role = "model"
parts = ["A lookup structure."]
"#,
        )
        .unwrap();
        let seed = session.seed.unwrap();
        assert_eq!(seed.len(), 2);
        assert_eq!(seed[0].role(), Role::User);
        assert_eq!(seed[1].text(), "A lookup structure.");
    }

    #[test]
    fn empty_seed_is_distinct_from_unset() {
        let session: SessionConfig = toml::from_str("seed = []").unwrap();
        assert_eq!(session.seed.map(|s| s.len()), Some(0));
    }
}
