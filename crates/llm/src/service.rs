use std::sync::Arc;

use config::LlmConfig;
use jiff::Timestamp;

use crate::{
    catalog,
    error::LlmError,
    messages::{
        ChatMessage, ChatRequest, ChatResponse, ChatRole, ModelsResponse, RecipeRequest, RecipeResponse,
        StatusResponse,
    },
    prompt,
    provider::{Provider, ProviderRequest, openai::OpenAIProvider},
    recipes,
    relay::{self, EventStream},
    validation,
};

/// The chat service behind every LLM endpoint.
///
/// Holds the provider adapter and configuration; everything else is
/// request-scoped. Cloning is cheap and shares the provider connection pool.
#[derive(Clone)]
pub(crate) struct ChatService {
    shared: Arc<ChatServiceInner>,
}

struct ChatServiceInner {
    provider: Box<dyn Provider>,
    config: LlmConfig,
}

impl ChatService {
    pub(crate) fn new(config: LlmConfig) -> crate::Result<Self> {
        let provider = Box::new(OpenAIProvider::new(&config)?);
        Ok(Self::from_parts(provider, config))
    }

    fn from_parts(provider: Box<dyn Provider>, config: LlmConfig) -> Self {
        Self {
            shared: Arc::new(ChatServiceInner { provider, config }),
        }
    }

    /// Process a chat completion request.
    pub(crate) async fn completion(&self, request: ChatRequest) -> crate::Result<ChatResponse> {
        let model = self.resolve_chat_model(request.model);
        self.check_parameters(&model, request.temperature, request.max_tokens)?;

        let provider_request = ProviderRequest {
            model: model.clone(),
            messages: prompt::compose(&request.history, &request.message),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let completion = self.shared.provider.complete(provider_request).await?;

        log::info!("Generated response using {model}, tokens: {}", completion.tokens_used);

        Ok(ChatResponse {
            response: completion.text,
            model_used: model,
            tokens_used: completion.tokens_used,
            timestamp: Timestamp::now(),
        })
    }

    /// Process a streaming chat completion request.
    ///
    /// Parameter validation still fails the call itself; once the stream is
    /// returned, every later failure travels inside it as an `error` event.
    pub(crate) async fn completion_stream(&self, request: ChatRequest) -> crate::Result<EventStream> {
        let model = self.resolve_chat_model(request.model);
        self.check_parameters(&model, request.temperature, request.max_tokens)?;

        let provider_request = ProviderRequest {
            model: model.clone(),
            messages: prompt::compose(&request.history, &request.message),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let shared = self.shared.clone();
        let open = async move { shared.provider.complete_stream(provider_request).await };

        log::info!("Starting streaming response using {model}");

        Ok(relay::events(open, model))
    }

    /// Generate recipe suggestions from the given ingredients and preferences.
    ///
    /// Failures are carried in the outcome body rather than surfaced as HTTP
    /// errors; the caller always receives a `success` flag to inspect.
    pub(crate) async fn recipes(&self, request: RecipeRequest) -> RecipeResponse {
        let query = recipes::build_query(&request);

        let recipe_config = &self.shared.config.recipes;
        let model = request
            .model
            .clone()
            .or_else(|| recipe_config.model.clone())
            .unwrap_or_else(|| catalog::DEFAULT_RECIPE_MODEL.to_string());

        // A fresh conversation per call: the recipe contract never reuses
        // chat history, only the system prompt turn.
        let chat_request = ChatRequest {
            message: query,
            model: Some(model),
            temperature: recipe_config.temperature,
            max_tokens: recipe_config.max_tokens,
            history: vec![ChatMessage {
                role: ChatRole::System,
                content: prompt::SYSTEM_PROMPT.to_string(),
            }],
        };

        let response = match self.completion(chat_request).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("Error generating recipes: {e}");
                return RecipeResponse {
                    success: false,
                    recipes: None,
                    error: Some(e.to_string()),
                    raw_response: None,
                    model_used: None,
                    tokens_used: None,
                    timestamp: Timestamp::now(),
                    query_parameters: None,
                };
            }
        };

        match recipes::parse_recipes(&response.response) {
            Ok(parsed) => {
                log::info!("Generated {} recipes using {}", parsed.len(), response.model_used);

                RecipeResponse {
                    success: true,
                    recipes: Some(parsed),
                    error: None,
                    raw_response: None,
                    model_used: Some(response.model_used),
                    tokens_used: Some(response.tokens_used),
                    timestamp: response.timestamp,
                    query_parameters: Some(request),
                }
            }
            Err(failure) if failure.includes_raw_response() => {
                log::error!("Failed to parse recipe JSON response: {failure}");

                RecipeResponse {
                    success: false,
                    recipes: None,
                    error: Some(failure.to_string()),
                    raw_response: Some(response.response),
                    model_used: Some(response.model_used),
                    tokens_used: Some(response.tokens_used),
                    timestamp: response.timestamp,
                    query_parameters: None,
                }
            }
            Err(failure) => {
                log::error!("Recipe response failed shape validation: {failure}");

                RecipeResponse {
                    success: false,
                    recipes: None,
                    error: Some(failure.to_string()),
                    raw_response: None,
                    model_used: None,
                    tokens_used: None,
                    timestamp: Timestamp::now(),
                    query_parameters: None,
                }
            }
        }
    }

    /// List the model catalog.
    pub(crate) fn models(&self) -> ModelsResponse {
        ModelsResponse { models: catalog::MODELS }
    }

    /// Report provider connectivity.
    pub(crate) async fn status(&self) -> StatusResponse {
        let connected = self.shared.provider.probe().await;

        let (status, message) = if connected {
            ("operational", "All services are running normally")
        } else {
            ("down", "OpenAI service is unavailable")
        };

        StatusResponse {
            status,
            openai_connected: connected,
            database_connected: true,
            message,
            timestamp: Timestamp::now(),
        }
    }

    fn resolve_chat_model(&self, requested: Option<String>) -> String {
        requested
            .or_else(|| self.shared.config.default_model.clone())
            .unwrap_or_else(|| catalog::DEFAULT_CHAT_MODEL.to_string())
    }

    fn check_parameters(&self, model: &str, temperature: f32, max_tokens: u32) -> crate::Result<()> {
        let validation = validation::validate_parameters(model, temperature, max_tokens);

        if !validation.valid {
            return Err(LlmError::InvalidParameters(validation.errors));
        }

        Ok(())
    }
}
