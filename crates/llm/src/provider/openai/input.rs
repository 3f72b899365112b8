use serde::Serialize;

use crate::{messages::ChatMessage, provider::ProviderRequest};

/// Request body for the OpenAI Chat Completions API.
///
/// See the [OpenAI API Reference](https://platform.openai.com/docs/api-reference/chat/create)
/// for the full format; only the fields this gateway drives are present.
#[derive(Debug, Serialize)]
pub(super) struct OpenAIRequest {
    /// ID of the model to use.
    pub(super) model: String,

    /// A list of messages comprising the conversation so far.
    pub(super) messages: Vec<ChatMessage>,

    /// What sampling temperature to use, between 0 and 2.
    pub(super) temperature: f32,

    /// The maximum number of tokens that can be generated in the chat completion.
    pub(super) max_completion_tokens: u32,

    /// If set, partial message deltas are sent as data-only server-sent
    /// events, with the stream terminated by a `data: [DONE]` message.
    pub(super) stream: bool,
}

impl From<ProviderRequest> for OpenAIRequest {
    fn from(request: ProviderRequest) -> Self {
        let ProviderRequest {
            model,
            messages,
            temperature,
            max_tokens,
        } = request;

        Self {
            model,
            messages,
            temperature,
            max_completion_tokens: max_tokens,
            stream: false,
        }
    }
}
