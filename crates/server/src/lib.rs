//! Sous server library.
//!
//! Provides a reusable server function to serve the culinary LLM gateway
//! either for the binary, or for tests.

#![deny(missing_docs)]

mod cors;
mod health;

use std::net::SocketAddr;

use anyhow::anyhow;
use axum::{Router, routing::get};
use config::Config;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

/// Configuration for serving the gateway.
pub struct ServeConfig {
    /// The socket address (IP and port) the server will bind to
    pub listen_address: SocketAddr,
    /// The deserialized sous TOML configuration.
    pub config: Config,
}

/// Starts and runs the server with the provided configuration.
pub async fn serve(ServeConfig { listen_address, config }: ServeConfig) -> anyhow::Result<()> {
    let mut app = Router::new();

    let cors = if let Some(cors_config) = &config.server.cors {
        cors::generate(cors_config)
    } else {
        CorsLayer::permissive()
    };

    let mut llm_exposed = false;

    if config.llm.enabled() {
        let llm_router = llm::router(config.llm.clone())?;
        app = app.merge(llm_router.layer(cors.clone()));
        llm_exposed = true;
    } else {
        log::warn!("LLM endpoints are disabled - only the health endpoint will be exposed");
    }

    if config.server.health.enabled {
        let health_router = Router::new()
            .route(&config.server.health.path, get(health::health))
            .layer(cors);

        app = app.merge(health_router);
    }

    let listener = TcpListener::bind(listen_address)
        .await
        .map_err(|e| anyhow!("Failed to bind to {listen_address}: {e}"))?;

    if llm_exposed {
        log::info!("LLM endpoints available at: http://{listen_address}{}", config.llm.path);
    }

    if config.server.health.enabled {
        log::info!(
            "Health endpoint available at: http://{listen_address}{}",
            config.server.health.path
        );
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow!("Failed to start HTTP server: {e}"))?;

    Ok(())
}
