//! Colloquy configuration system.
//!
//! TOML configuration for the chat client plus startup credential
//! resolution. Every section has defaults, so an empty file (or no file)
//! reproduces the stock SQL-assistant setup.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use colloquy_config::{load_config, Credentials};
//!
//! let config = load_config(None).expect("failed to load config");
//! let credentials = Credentials::from_env(config.model.backend).expect("missing credentials");
//! println!("{} via {:?}", config.model.name, credentials);
//! ```

pub mod credentials;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use credentials::Credentials;
pub use schema::{Backend, ColloquyConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use colloquy_common::ConfigError;

/// Load config from `path`, or from the platform default location.
///
/// The default file is created from the documented template when it does
/// not exist yet. An explicit path must exist.
pub fn load_config(path: Option<&Path>) -> Result<ColloquyConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &ColloquyConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
