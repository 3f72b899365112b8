//! Streaming relay.
//!
//! Turns a provider fragment stream into the event sequence consumed by the
//! `/chat/stream` endpoint: one `start`, one `content` per non-empty
//! fragment in emission order, then exactly one terminal event. The `end`
//! event carries the in-order concatenation of every emitted fragment.
//!
//! The stream is pull-driven, so production is paced by the consumer and
//! dropping it releases the underlying provider connection.

use std::{future::Future, pin::Pin};

use futures::{Stream, StreamExt, stream};
use jiff::Timestamp;

use crate::{messages::StreamEvent, provider::TokenStream};

/// Type alias for the relayed event sequence.
pub(crate) type EventStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

enum RelayState<F> {
    /// Provider stream not yet opened. Opening lazily means an open failure
    /// becomes the stream's single `error` event instead of a severed
    /// connection after headers were already sent.
    Opening { open: F, model: String },
    Streaming {
        stream: TokenStream,
        model: String,
        full_response: String,
    },
    Finished,
}

/// Relay a provider stream as a lazy event sequence.
///
/// `open` is awaited when the consumer requests the first event; each call
/// to [`events`] therefore opens a fresh provider stream.
pub(crate) fn events<F>(open: F, model: String) -> EventStream
where
    F: Future<Output = crate::Result<TokenStream>> + Send + 'static,
{
    let relay = stream::unfold(RelayState::Opening { open, model }, |state| async move {
        match state {
            RelayState::Opening { open, model } => match open.await {
                Ok(stream) => {
                    let event = StreamEvent::Start {
                        model: model.clone(),
                        timestamp: Timestamp::now(),
                    };

                    let next = RelayState::Streaming {
                        stream,
                        model,
                        full_response: String::new(),
                    };

                    Some((event, next))
                }
                Err(e) => {
                    log::error!("Failed to open provider stream: {e}");
                    Some((StreamEvent::Error { error: e.to_string() }, RelayState::Finished))
                }
            },
            RelayState::Streaming {
                mut stream,
                model,
                mut full_response,
            } => loop {
                match stream.next().await {
                    Some(Ok(fragment)) => {
                        // Providers occasionally emit empty deltas; they carry
                        // no content and are not forwarded.
                        if fragment.is_empty() {
                            continue;
                        }

                        full_response.push_str(&fragment);

                        let next = RelayState::Streaming {
                            stream,
                            model,
                            full_response,
                        };

                        break Some((StreamEvent::Content { content: fragment }, next));
                    }
                    Some(Err(e)) => {
                        log::error!("Provider stream failed mid-response: {e}");
                        break Some((StreamEvent::Error { error: e.to_string() }, RelayState::Finished));
                    }
                    None => {
                        let event = StreamEvent::End {
                            full_response,
                            model_used: model,
                            timestamp: Timestamp::now(),
                        };

                        break Some((event, RelayState::Finished));
                    }
                }
            },
            RelayState::Finished => None,
        }
    });

    Box::pin(relay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use futures::stream;

    fn fragments(items: Vec<crate::Result<&'static str>>) -> TokenStream {
        Box::pin(stream::iter(
            items.into_iter().map(|r| r.map(str::to_string)).collect::<Vec<_>>(),
        ))
    }

    async fn collect(stream: EventStream) -> Vec<StreamEvent> {
        stream.collect().await
    }

    #[tokio::test]
    async fn end_event_carries_the_concatenated_fragments() {
        let stream = fragments(vec![Ok("Hel"), Ok("lo"), Ok(" world")]);
        let events = collect(events(async move { Ok(stream) }, "gpt-4o-mini".to_string())).await;

        assert_eq!(events.len(), 5);
        assert!(matches!(&events[0], StreamEvent::Start { model, .. } if model == "gpt-4o-mini"));
        assert!(matches!(&events[1], StreamEvent::Content { content } if content == "Hel"));
        assert!(matches!(&events[2], StreamEvent::Content { content } if content == "lo"));
        assert!(matches!(&events[3], StreamEvent::Content { content } if content == " world"));

        match &events[4] {
            StreamEvent::End {
                full_response,
                model_used,
                ..
            } => {
                assert_eq!(full_response, "Hello world");
                assert_eq!(model_used, "gpt-4o-mini");
            }
            other => panic!("expected end event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fragment_boundaries_are_preserved() {
        let stream = fragments(vec![Ok("a"), Ok("b"), Ok("c")]);
        let events = collect(events(async move { Ok(stream) }, "gpt-4o-mini".to_string())).await;

        let contents: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Content { content } => Some(content.as_str()),
                _ => None,
            })
            .collect();

        assert_eq!(contents, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn empty_fragments_are_not_forwarded() {
        let stream = fragments(vec![Ok(""), Ok("text"), Ok("")]);
        let events = collect(events(async move { Ok(stream) }, "gpt-4o-mini".to_string())).await;

        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], StreamEvent::Start { .. }));
        assert!(matches!(&events[1], StreamEvent::Content { content } if content == "text"));
        assert!(matches!(&events[2], StreamEvent::End { full_response, .. } if full_response == "text"));
    }

    #[tokio::test]
    async fn empty_stream_ends_with_an_empty_full_response() {
        let stream = fragments(vec![]);
        let events = collect(events(async move { Ok(stream) }, "gpt-4o-mini".to_string())).await;

        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], StreamEvent::Start { .. }));
        assert!(matches!(&events[1], StreamEvent::End { full_response, .. } if full_response.is_empty()));
    }

    #[tokio::test]
    async fn mid_stream_failure_emits_a_single_terminal_error() {
        let stream = fragments(vec![
            Ok("partial"),
            Err(LlmError::Connection("reset by peer".to_string())),
            Ok("never seen"),
        ]);

        let events = collect(events(async move { Ok(stream) }, "gpt-4o-mini".to_string())).await;

        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], StreamEvent::Start { .. }));
        assert!(matches!(&events[1], StreamEvent::Content { content } if content == "partial"));
        assert!(matches!(&events[2], StreamEvent::Error { error } if error.contains("reset by peer")));
    }

    #[tokio::test]
    async fn open_failure_yields_only_an_error_event() {
        let open = async { Err(LlmError::AuthenticationFailed("OpenAI API key not configured".to_string())) };
        let events = collect(events(open, "gpt-4o-mini".to_string())).await;

        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], StreamEvent::Error { error } if error.contains("API key")));
    }

    #[tokio::test]
    async fn provider_stream_opens_lazily() {
        use std::sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        };

        let opened = Arc::new(AtomicBool::new(false));
        let flag = opened.clone();

        let open = async move {
            flag.store(true, Ordering::SeqCst);
            Ok(fragments(vec![Ok("x")]))
        };

        let mut stream = events(open, "gpt-4o-mini".to_string());
        assert!(!opened.load(Ordering::SeqCst));

        let first = stream.next().await;
        assert!(opened.load(Ordering::SeqCst));
        assert!(matches!(first, Some(StreamEvent::Start { .. })));
    }
}
