//! Full configuration validation.
//!
//! Checks numeric ranges and required strings, collecting every problem
//! into a single `ConfigError`.

mod helpers;


use crate::schema::ColloquyConfig;
use colloquy_common::{ConfigError, Role};

use helpers::{validate_min, validate_non_empty, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ColloquyConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_model(&mut errors, config);
    validate_generation(&mut errors, config);
    validate_session(&mut errors, config);
    validate_non_empty(&mut errors, "logging.level", &config.logging.level);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_model(errors: &mut Vec<String>, config: &ColloquyConfig) {
    validate_non_empty(errors, "model.name", &config.model.name);
}

fn validate_generation(errors: &mut Vec<String>, config: &ColloquyConfig) {
    let generation = &config.generation;
    if let Some(temperature) = generation.temperature {
        validate_range_f64(errors, "generation.temperature", temperature, 0.0, 2.0);
    }
    if let Some(top_p) = generation.top_p {
        validate_range_f64(errors, "generation.top_p", top_p, 0.0, 1.0);
    }
    if let Some(top_k) = generation.top_k {
        validate_min(errors, "generation.top_k", top_k.into(), 1);
    }
    if let Some(max) = generation.max_output_tokens {
        validate_min(errors, "generation.max_output_tokens", max.into(), 1);
    }
    if let Some(ref mime) = generation.response_mime_type {
        validate_non_empty(errors, "generation.response_mime_type", mime);
    }
}

fn validate_session(errors: &mut Vec<String>, config: &ColloquyConfig) {
    let session = &config.session;
    validate_non_empty(errors, "session.message", &session.message);
    if let Some(timeout) = session.timeout_secs {
        validate_min(errors, "session.timeout_secs", timeout, 1);
    }
    if let Some(ref seed) = session.seed {
        for (i, turn) in seed.iter().enumerate() {
            if turn.parts().is_empty() || turn.text().trim().is_empty() {
                errors.push(format!("session.seed[{i}] has no text"));
            }
            if turn.role() == Role::Model && turn.is_refusal() {
                errors.push(format!("session.seed[{i}] must not be a refusal"));
            }
        }
    }
}
