//! Culinary LLM endpoints: chat completion (blocking and streamed), recipe
//! generation, the model catalog and the provider status probe.

use std::convert::Infallible;

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Sse, sse::Event},
    routing::{get, post},
};
use config::LlmConfig;
use futures::StreamExt;

mod catalog;
mod error;
mod messages;
mod prompt;
mod provider;
mod recipes;
mod relay;
mod service;
mod validation;

use error::LlmError;
use messages::{ChatRequest, RecipeRequest};
use service::ChatService;

pub(crate) type Result<T> = std::result::Result<T, LlmError>;

/// Creates an axum router for the LLM endpoints, mounted under the
/// configured path.
pub fn router(config: LlmConfig) -> anyhow::Result<Router> {
    let path = config.path.clone();

    let service =
        ChatService::new(config).map_err(|e| anyhow::anyhow!("Failed to initialize chat service: {e}"))?;

    let routes = Router::new()
        .route("/chat", post(chat))
        .route("/chat/stream", post(chat_stream))
        .route("/recipes", post(generate_recipes))
        .route("/models", get(list_models))
        .route("/status", get(status))
        .with_state(service);

    Ok(Router::new().nest(&path, routes))
}

/// Handle blocking chat completion requests.
async fn chat(State(service): State<ChatService>, Json(request): Json<ChatRequest>) -> Result<impl IntoResponse> {
    log::debug!("Chat completion requested, history of {} turns", request.history.len());

    let response = service.completion(request).await?;
    Ok(Json(response))
}

/// Handle streaming chat completion requests.
///
/// Parameter validation failures reject the request before any frame is
/// sent. Afterwards every event, including failures, is delivered as a
/// `data: <json>` frame; the connection closes after the terminal frame.
async fn chat_stream(
    State(service): State<ChatService>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse> {
    let events = service.completion_stream(request).await?;

    let frames = events.map(|event| {
        let json = serde_json::to_string(&event).unwrap_or_else(|e| {
            log::error!("Failed to serialize stream event: {e}");
            r#"{"type":"error","error":"serialization failed"}"#.to_string()
        });

        Ok::<_, Infallible>(Event::default().data(json))
    });

    Ok(Sse::new(frames))
}

/// Handle recipe generation requests.
///
/// The outcome always comes back with HTTP 200; parse and provider failures
/// are reported through the body's `success` flag.
async fn generate_recipes(
    State(service): State<ChatService>,
    Json(request): Json<RecipeRequest>,
) -> impl IntoResponse {
    Json(service.recipes(request).await)
}

/// Handle list models requests.
async fn list_models(State(service): State<ChatService>) -> impl IntoResponse {
    Json(service.models())
}

/// Report service status including provider connectivity.
async fn status(State(service): State<ChatService>) -> impl IntoResponse {
    Json(service.status().await)
}
