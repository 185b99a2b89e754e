//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use colloquy_common::{BlockThreshold, ConfigError, HarmCategory};
use std::path::Path;

use crate::schema::{Backend, ColloquyConfig};

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_colloquy_config.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[model]
name = "gemini-1.5-flash"

[session]
stream = true
timeout_secs = 30
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.model.name, "gemini-1.5-flash");
    assert!(config.session.stream);
    assert_eq!(config.session.timeout_secs, Some(30));
    // Defaults preserved
    assert_eq!(config.model.backend, Backend::GoogleAi);
    assert_eq!(config.generation.top_k, Some(64));
    assert_eq!(config.session.message, "INSERT_INPUT_HERE");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_unknown_threshold_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[[safety]]\ncategory = \"harassment\"\nthreshold = \"sometimes\"\n",
    )
    .unwrap();

    assert!(matches!(
        load_from_path(&path),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn load_keeps_out_of_range_values_for_caller_to_reject() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[generation]\ntop_p = 3.0\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.generation.top_p, Some(3.0));
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("colloquy").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    let defaults = ColloquyConfig::default();
    assert_eq!(config.model.name, defaults.model.name);
    assert_eq!(config.generation, defaults.generation);
    assert_eq!(config.safety, defaults.safety);
    assert_eq!(
        config.safety.threshold(HarmCategory::Harassment),
        Some(BlockThreshold::BlockMediumAndAbove)
    );
}

#[test]
fn default_config_path_ends_with_colloquy_config() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("colloquy/config.toml"));
    }
}
