//! Sous configuration structures to map the sous.toml configuration.

#![deny(missing_docs)]

mod cors;
mod health;
mod llm;
mod loader;

use std::{net::SocketAddr, path::Path};

pub use cors::*;
pub use health::HealthConfig;
pub use llm::{LlmConfig, RecipeConfig};
use serde::Deserialize;

/// Main configuration structure for the Sous application.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// LLM provider configuration settings.
    #[serde(default)]
    pub llm: LlmConfig,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        loader::load(path)
    }
}

/// HTTP server configuration settings.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// The socket address the server should listen on.
    pub listen_address: Option<SocketAddr>,
    /// Health endpoint configuration.
    #[serde(default)]
    pub health: HealthConfig,
    /// CORS configuration.
    pub cors: Option<CorsConfig>,
}
