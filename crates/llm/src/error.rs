use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// LLM service errors with appropriate HTTP status codes.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Caller-supplied parameters failed validation. Never reaches the provider.
    #[error("Invalid parameters: {}", .0.join(", "))]
    InvalidParameters(Vec<String>),

    /// Authentication failed (missing or invalid API key).
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Rate limit exceeded at the provider.
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Provider API returned an error.
    #[error("Provider API error ({status}): {message}")]
    Provider {
        /// HTTP status code reported by the provider.
        status: u16,
        /// Error message reported by the provider.
        message: String,
    },

    /// Network or connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Internal server error.
    /// If Some(message), it came from the provider and can be shown.
    /// If None, it's an internal error and should not leak details.
    #[error("Internal server error")]
    Internal(Option<String>),
}

impl LlmError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidParameters(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            Self::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Provider { status, .. } => match *status {
                400 => StatusCode::BAD_REQUEST,
                401 => StatusCode::UNAUTHORIZED,
                403 => StatusCode::FORBIDDEN,
                404 => StatusCode::NOT_FOUND,
                429 => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Connection(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string for the response.
    pub fn error_type(&self) -> &str {
        match self {
            Self::InvalidParameters(_) => "invalid_request_error",
            Self::AuthenticationFailed(_) => "authentication_error",
            Self::RateLimitExceeded(_) => "rate_limit_error",
            Self::Provider { .. } | Self::Connection(_) => "api_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Error response body returned from all LLM endpoints.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetails,
}

#[derive(Debug, Serialize)]
struct ErrorDetails {
    message: String,
    r#type: String,
    code: u16,
}

impl IntoResponse for LlmError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            match &self {
                Self::Internal(Some(provider_msg)) => {
                    log::error!("Provider returned internal error: {provider_msg}");
                }
                Self::Internal(None) => {
                    // Full error details are already logged where the error was created
                    log::error!("Internal server error occurred");
                }
                _ => {
                    log::error!("Server error ({}): {}", status.as_u16(), self);
                }
            }
        }

        // For internal errors, only show provider messages, never our internals
        let message = match &self {
            Self::Internal(Some(provider_msg)) => provider_msg.clone(),
            Self::Internal(None) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        let error_response = ErrorResponse {
            error: ErrorDetails {
                message,
                r#type: self.error_type().to_string(),
                code: status.as_u16(),
            },
        };

        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_client_errors() {
        let error = LlmError::InvalidParameters(vec!["Invalid model: nope".to_string()]);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.error_type(), "invalid_request_error");
    }

    #[test]
    fn validation_error_message_joins_all_violations() {
        let error = LlmError::InvalidParameters(vec![
            "Invalid model: nope".to_string(),
            "Temperature must be between 0.0 and 2.0".to_string(),
        ]);

        insta::assert_snapshot!(
            error.to_string(),
            @"Invalid parameters: Invalid model: nope, Temperature must be between 0.0 and 2.0"
        );
    }

    #[test]
    fn provider_status_codes_are_preserved_for_client_faults() {
        let error = LlmError::Provider {
            status: 404,
            message: "model not found".to_string(),
        };
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn provider_server_faults_map_to_bad_gateway() {
        let error = LlmError::Provider {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert_eq!(error.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn auth_and_rate_limit_have_dedicated_codes() {
        assert_eq!(
            LlmError::AuthenticationFailed("bad key".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            LlmError::RateLimitExceeded("slow down".to_string()).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
