//! Request parameter validation.
//!
//! Pure checks over caller-supplied parameters, run before any provider
//! call. All violations are collected; nothing short-circuits.

use crate::catalog;

/// Result of validating chat completion parameters.
#[derive(Debug)]
pub(crate) struct ParameterValidation {
    pub(crate) valid: bool,
    pub(crate) errors: Vec<String>,
}

/// Validate the model identifier, temperature and token limit of a request.
pub(crate) fn validate_parameters(model: &str, temperature: f32, max_tokens: u32) -> ParameterValidation {
    let mut errors = Vec::new();

    if !catalog::contains(model) {
        errors.push(format!("Invalid model: {model}"));
    }

    if !(0.0..=2.0).contains(&temperature) {
        errors.push("Temperature must be between 0.0 and 2.0".to_string());
    }

    if !(1..=4000).contains(&max_tokens) {
        errors.push("Max tokens must be between 1 and 4000".to_string());
    }

    ParameterValidation {
        valid: errors.is_empty(),
        errors,
    }
}
