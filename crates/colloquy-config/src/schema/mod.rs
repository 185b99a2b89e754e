//! Configuration schema types for Colloquy.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Defaults reproduce the stock SQL-assistant request parameters.

mod logging;
mod model;
mod session;

pub use logging::*;
pub use model::*;
pub use session::*;

use colloquy_common::{BlockThreshold, GenerationConfig, SafetyPolicy};
use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Colloquy.
///
/// `[generation]` and `[[safety]]` replace the defaults as a whole when
/// present: options left out of a `[generation]` table are unset, not
/// defaulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColloquyConfig {
    pub model: ModelConfig,
    pub generation: GenerationConfig,
    pub safety: SafetyPolicy,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

impl Default for ColloquyConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            generation: default_generation(),
            safety: SafetyPolicy::uniform(BlockThreshold::BlockMediumAndAbove),
            session: SessionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_generation() -> GenerationConfig {
    GenerationConfig::new()
        .with_temperature(1.0)
        .with_top_p(0.95)
        .with_top_k(64)
        .with_max_output_tokens(8192)
        .with_response_mime_type("text/plain")
}
