//! LLM provider configuration for the chat and recipe endpoints.

use std::borrow::Cow;

use secrecy::SecretString;
use serde::Deserialize;

/// LLM configuration for the OpenAI-backed chat and recipe endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmConfig {
    /// Whether the LLM endpoints are enabled.
    enabled: bool,

    /// The path where the LLM endpoints will be mounted.
    pub path: Cow<'static, str>,

    /// API key for the provider. Falls back to the `OPENAI_API_KEY`
    /// environment variable when not set here.
    api_key: Option<SecretString>,

    /// Custom base URL for the provider API.
    pub base_url: Option<String>,

    /// Default model for chat completions when the request does not name one.
    pub default_model: Option<String>,

    /// Recipe generation defaults.
    pub recipes: RecipeConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: Cow::Borrowed("/api/v1"),
            api_key: None,
            base_url: None,
            default_model: None,
            recipes: RecipeConfig::default(),
        }
    }
}

impl LlmConfig {
    /// Whether the LLM endpoints are enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Resolve the provider API key, reading the environment when the
    /// configuration file does not carry one.
    pub fn api_key(&self) -> Option<SecretString> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok().map(SecretString::from))
    }
}

/// Fixed invocation parameters for recipe generation.
///
/// Recipe generation wants deterministic, schema-shaped output, so the
/// defaults run colder and with a larger token budget than chat.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecipeConfig {
    /// Model used for recipe generation. Defaults to the most capable
    /// catalog entry when not set.
    pub model: Option<String>,
    /// Sampling temperature for recipe generation.
    pub temperature: f32,
    /// Token budget for recipe generation.
    pub max_tokens: u32,
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            model: None,
            temperature: 0.3,
            max_tokens: 2000,
        }
    }
}
