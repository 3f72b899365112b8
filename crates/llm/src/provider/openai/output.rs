use serde::Deserialize;

/// Response body of a non-streaming OpenAI chat completion.
#[derive(Debug, Deserialize)]
pub(super) struct OpenAIResponse {
    pub(super) choices: Vec<OpenAIChoice>,
    pub(super) usage: OpenAIUsage,
}

#[derive(Debug, Deserialize)]
pub(super) struct OpenAIChoice {
    pub(super) message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
pub(super) struct OpenAIMessage {
    pub(super) content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OpenAIUsage {
    pub(super) total_tokens: u32,
}

/// One SSE chunk of a streaming OpenAI chat completion.
#[derive(Debug, Deserialize)]
pub(super) struct OpenAIStreamChunk {
    pub(super) choices: Vec<OpenAIStreamChoice>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OpenAIStreamChoice {
    pub(super) delta: OpenAIDelta,
}

#[derive(Debug, Deserialize)]
pub(super) struct OpenAIDelta {
    #[serde(default)]
    pub(super) content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_response_parses() {
        let body = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "model": "gpt-4o-mini",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello!"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
        }"#;

        let response: OpenAIResponse = sonic_rs::from_str(body).unwrap();

        assert_eq!(response.choices[0].message.content.as_deref(), Some("Hello!"));
        assert_eq!(response.usage.total_tokens, 12);
    }

    #[test]
    fn stream_chunk_without_content_parses() {
        let body = r#"{"id":"chatcmpl-123","object":"chat.completion.chunk","choices":[{"index":0,"delta":{"role":"assistant"},"finish_reason":null}]}"#;

        let chunk: OpenAIStreamChunk = sonic_rs::from_str(body).unwrap();

        assert!(chunk.choices[0].delta.content.is_none());
    }

    #[test]
    fn stream_chunk_with_content_parses() {
        let body = r#"{"choices":[{"index":0,"delta":{"content":"Hel"},"finish_reason":null}]}"#;

        let chunk: OpenAIStreamChunk = sonic_rs::from_str(body).unwrap();

        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("Hel"));
    }
}
