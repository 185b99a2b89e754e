pub mod errors;
pub mod types;

pub use errors::{ColloquyError, ConfigError};
pub use types::{
    BlockThreshold, GenerationConfig, HarmCategory, Role, SafetyPolicy, SafetySetting, Turn,
};

pub type Result<T> = std::result::Result<T, ColloquyError>;
