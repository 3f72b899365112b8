mod input;
mod output;

use async_trait::async_trait;
use config::LlmConfig;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::{Client, StatusCode, header::AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};

use self::{
    input::OpenAIRequest,
    output::{OpenAIResponse, OpenAIStreamChunk},
};

use crate::{
    error::LlmError,
    provider::{Completion, Provider, ProviderRequest, TokenStream},
};

const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";

pub(crate) struct OpenAIProvider {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl OpenAIProvider {
    pub(crate) fn new(config: &LlmConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| {
                log::error!("Failed to create HTTP client for OpenAI provider: {e}");
                LlmError::Internal(None)
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key(),
        })
    }

    /// The key is resolved once at startup; a missing key fails per call, so
    /// the service still comes up and `/status` can report the outage.
    fn api_key(&self) -> crate::Result<&SecretString> {
        self.api_key
            .as_ref()
            .ok_or_else(|| LlmError::AuthenticationFailed("OpenAI API key not configured".to_string()))
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn complete(&self, request: ProviderRequest) -> crate::Result<Completion> {
        let url = format!("{}/chat/completions", self.base_url);
        let key = self.api_key()?;

        let mut openai_request = OpenAIRequest::from(request);
        openai_request.stream = false;

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", key.expose_secret()))
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(format!("Failed to send request to OpenAI: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("OpenAI API error ({status}): {error_text}");

            return Err(map_error_status(status, error_text));
        }

        // First get the response as text to log if parsing fails
        let response_text = response.text().await.map_err(|e| {
            log::error!("Failed to read OpenAI response body: {e}");
            LlmError::Internal(None)
        })?;

        let openai_response: OpenAIResponse = sonic_rs::from_str(&response_text).map_err(|e| {
            log::error!("Failed to parse OpenAI chat completion response: {e}");
            log::error!("Raw response that failed to parse: {response_text}");
            LlmError::Internal(None)
        })?;

        let text = openai_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                log::error!("OpenAI response contained no message content");
                LlmError::Internal(Some("Provider returned an empty response".to_string()))
            })?;

        Ok(Completion {
            text,
            tokens_used: openai_response.usage.total_tokens,
        })
    }

    async fn complete_stream(&self, request: ProviderRequest) -> crate::Result<TokenStream> {
        let url = format!("{}/chat/completions", self.base_url);
        let key = self.api_key()?;

        let mut openai_request = OpenAIRequest::from(request);
        openai_request.stream = true;

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", key.expose_secret()))
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(format!("Failed to send streaming request to OpenAI: {e}")))?;

        let status = response.status();

        // Check for HTTP errors before attempting to stream
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("OpenAI streaming API error ({status}): {error_text}");

            return Err(map_error_status(status, error_text));
        }

        // Convert response bytes stream to SSE event stream
        let event_stream = response.bytes_stream().eventsource();

        // Transform the SSE event stream into text fragments
        let fragment_stream = event_stream.filter_map(|event| async move {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    // Transport failure mid-stream; surface once to the relay
                    log::error!("SSE error in OpenAI stream: {e}");
                    return Some(Err(LlmError::Connection(format!("Stream interrupted: {e}"))));
                }
            };

            // Check for end marker
            if event.data == "[DONE]" {
                return None;
            }

            let Ok(chunk) = sonic_rs::from_str::<OpenAIStreamChunk>(&event.data) else {
                log::warn!("Failed to parse OpenAI streaming chunk");
                return None;
            };

            chunk
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content)
                .filter(|content| !content.is_empty())
                .map(Ok)
        });

        Ok(Box::pin(fragment_stream))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Map a provider error status to the local error taxonomy.
fn map_error_status(status: StatusCode, message: String) -> LlmError {
    match status.as_u16() {
        401 => LlmError::AuthenticationFailed(message),
        429 => LlmError::RateLimitExceeded(message),
        _ => LlmError::Provider {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_failures_map_to_auth_error() {
        let error = map_error_status(StatusCode::UNAUTHORIZED, "bad key".to_string());
        assert!(matches!(error, LlmError::AuthenticationFailed(_)));
    }

    #[test]
    fn rate_limit_signals_map_to_rate_limit_error() {
        let error = map_error_status(StatusCode::TOO_MANY_REQUESTS, "slow down".to_string());
        assert!(matches!(error, LlmError::RateLimitExceeded(_)));
    }

    #[test]
    fn other_client_errors_carry_the_provider_message() {
        let error = map_error_status(StatusCode::NOT_FOUND, "no such model".to_string());

        match error {
            LlmError::Provider { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "no such model");
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn provider_server_errors_carry_status_and_message() {
        let error = map_error_status(StatusCode::SERVICE_UNAVAILABLE, "overloaded".to_string());

        match error {
            LlmError::Provider { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "overloaded");
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }
}
