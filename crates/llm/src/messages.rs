use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Role of a conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single conversational turn. Ordering within a conversation is significant.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct ChatMessage {
    pub(crate) role: ChatRole,
    pub(crate) content: String,
}

/// Request body for the `/chat` and `/chat/stream` endpoints.
///
/// The conversation history is caller-supplied per request; nothing is
/// persisted between calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ChatRequest {
    pub(crate) message: String,
    #[serde(default)]
    pub(crate) model: Option<String>,
    #[serde(default = "default_temperature")]
    pub(crate) temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub(crate) max_tokens: u32,
    #[serde(default)]
    pub(crate) history: Vec<ChatMessage>,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    150
}

/// Response body for the `/chat` endpoint.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatResponse {
    pub(crate) response: String,
    pub(crate) model_used: String,
    pub(crate) tokens_used: u32,
    pub(crate) timestamp: Timestamp,
}

/// One frame of a streamed chat completion.
///
/// A well-formed stream is one `start`, zero or more `content` frames in
/// emission order, then exactly one terminal frame (`end` or `error`).
/// Nothing follows a terminal frame.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum StreamEvent {
    Start {
        model: String,
        timestamp: Timestamp,
    },
    Content {
        content: String,
    },
    End {
        full_response: String,
        model_used: String,
        timestamp: Timestamp,
    },
    Error {
        error: String,
    },
}

/// Response body for the `/models` endpoint.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ModelsResponse {
    pub(crate) models: &'static [crate::catalog::ModelDescriptor],
}

/// Response body for the `/status` endpoint.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct StatusResponse {
    pub(crate) status: &'static str,
    pub(crate) openai_connected: bool,
    // No database behind this service; kept for response compatibility.
    pub(crate) database_connected: bool,
    pub(crate) message: &'static str,
    pub(crate) timestamp: Timestamp,
}

/// Unit system requested for recipe quantities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) enum UnitSystem {
    #[default]
    #[serde(rename = "metric")]
    Metric,
    #[serde(rename = "US")]
    Us,
}

impl UnitSystem {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Us => "US",
        }
    }
}

/// Request body for the `/recipes` endpoint.
///
/// Also serialized back verbatim as the `query_parameters` echo of a
/// successful recipe response, except for the model override.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RecipeRequest {
    pub(crate) ingredients: Vec<String>,
    #[serde(default)]
    pub(crate) dietary_preferences: Option<Vec<String>>,
    #[serde(default)]
    pub(crate) allergens: Option<Vec<String>>,
    #[serde(default)]
    pub(crate) excluded_ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub(crate) cuisine: Option<String>,
    #[serde(default)]
    pub(crate) time_limit: Option<u32>,
    #[serde(default)]
    pub(crate) servings: Option<u32>,
    #[serde(default)]
    pub(crate) units: UnitSystem,
    #[serde(default, skip_serializing)]
    pub(crate) model: Option<String>,
}

/// Outcome of a recipe generation call.
///
/// Parse failures travel in this body with `success: false` rather than as
/// HTTP errors; the individual recipe entries are passed through as raw JSON
/// without field-level validation.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RecipeResponse {
    pub(crate) success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) recipes: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) raw_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) model_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) tokens_used: Option<u32>,
    pub(crate) timestamp: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) query_parameters: Option<RecipeRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_events_carry_a_type_discriminator() {
        let start = StreamEvent::Start {
            model: "gpt-4o-mini".to_string(),
            timestamp: Timestamp::UNIX_EPOCH,
        };

        insta::assert_json_snapshot!(start, @r#"
        {
          "type": "start",
          "model": "gpt-4o-mini",
          "timestamp": "1970-01-01T00:00:00Z"
        }
        "#);

        let content = StreamEvent::Content {
            content: "Hello".to_string(),
        };

        insta::assert_json_snapshot!(content, @r#"
        {
          "type": "content",
          "content": "Hello"
        }
        "#);

        let end = StreamEvent::End {
            full_response: "Hello there".to_string(),
            model_used: "gpt-4o-mini".to_string(),
            timestamp: Timestamp::UNIX_EPOCH,
        };

        insta::assert_json_snapshot!(end, @r#"
        {
          "type": "end",
          "full_response": "Hello there",
          "model_used": "gpt-4o-mini",
          "timestamp": "1970-01-01T00:00:00Z"
        }
        "#);

        let error = StreamEvent::Error {
            error: "boom".to_string(),
        };

        insta::assert_json_snapshot!(error, @r#"
        {
          "type": "error",
          "error": "boom"
        }
        "#);
    }

    #[test]
    fn chat_request_fills_defaults() {
        let request: ChatRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();

        assert!(request.model.is_none());
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 150);
        assert!(request.history.is_empty());
    }

    #[test]
    fn recipe_request_defaults_to_metric_units() {
        let request: RecipeRequest = serde_json::from_str(r#"{"ingredients": ["egg", "flour"]}"#).unwrap();

        assert_eq!(request.units, UnitSystem::Metric);
        assert!(request.dietary_preferences.is_none());
        assert!(request.model.is_none());
    }

    #[test]
    fn recipe_request_echo_omits_model_override() {
        let request = RecipeRequest {
            ingredients: vec!["egg".to_string()],
            dietary_preferences: None,
            allergens: None,
            excluded_ingredients: None,
            cuisine: None,
            time_limit: None,
            servings: None,
            units: UnitSystem::Us,
            model: Some("gpt-4o-mini".to_string()),
        };

        insta::assert_json_snapshot!(request, @r#"
        {
          "ingredients": [
            "egg"
          ],
          "dietary_preferences": null,
          "allergens": null,
          "excluded_ingredients": null,
          "cuisine": null,
          "time_limit": null,
          "servings": null,
          "units": "US"
        }
        "#);
    }

    #[test]
    fn failed_recipe_response_omits_absent_fields() {
        let response = RecipeResponse {
            success: false,
            recipes: None,
            error: Some("Invalid JSON response from AI model".to_string()),
            raw_response: Some("not json".to_string()),
            model_used: Some("gpt-4o-mini".to_string()),
            tokens_used: Some(42),
            timestamp: Timestamp::UNIX_EPOCH,
            query_parameters: None,
        };

        insta::assert_json_snapshot!(response, @r#"
        {
          "success": false,
          "error": "Invalid JSON response from AI model",
          "raw_response": "not json",
          "model_used": "gpt-4o-mini",
          "tokens_used": 42,
          "timestamp": "1970-01-01T00:00:00Z"
        }
        "#);
    }
}
