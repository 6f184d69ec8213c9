//! Completion helper: message normalization and dispatch to the external
//! completion service.
//!
//! Callers hand over a candidate message list; the helper canonicalizes
//! roles, guarantees non-empty content, decides the system-prompt source
//! once at entry, and forwards the finalized list to the configured
//! [`CompletionClient`]. An empty normalized list short-circuits with a
//! fixed fallback string instead of an outbound call.

mod client;
mod normalize;
mod types;

pub use client::{CompletionClient, NO_RESPONSE_FALLBACK, OpenAiCompletionClient};
pub use normalize::{
    DEFAULT_SYSTEM_PROMPT, EMPTY_CONTENT_PLACEHOLDER, SystemPromptPolicy, ensure_system_prompt,
    normalize_messages,
};
pub use types::{ChatMessage, CompletionError, IncomingMessage, Role};

/// Returned without contacting the service when normalization leaves nothing to send.
pub const NO_VALID_CONTENT_FALLBACK: &str = "No valid content available to process.";

/// Normalize `messages` and obtain a text reply from the completion service.
///
/// The system-prompt policy is derived from the normalized list exactly
/// once: a caller-supplied system message is used as-is, otherwise the
/// default summarization prompt is prepended. There is no way to opt out of
/// a system message entirely.
pub async fn complete(
    client: &dyn CompletionClient,
    model: &str,
    messages: Vec<IncomingMessage>,
) -> Result<String, CompletionError> {
    let normalized = normalize_messages(messages);

    if normalized.is_empty() {
        tracing::warn!("No messages survived normalization; skipping completion call");
        return Ok(NO_VALID_CONTENT_FALLBACK.to_string());
    }

    let policy = SystemPromptPolicy::for_messages(&normalized);
    let finalized = ensure_system_prompt(normalized, policy);

    tracing::debug!(
        model,
        messages = finalized.len(),
        policy = ?policy,
        "Dispatching completion request"
    );
    client.complete(model, &finalized).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingClient {
        calls: AtomicUsize,
        sent: Mutex<Vec<Vec<ChatMessage>>>,
    }

    #[async_trait]
    impl CompletionClient for RecordingClient {
        async fn complete(
            &self,
            _model: &str,
            messages: &[ChatMessage],
        ) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sent.lock().unwrap().push(messages.to_vec());
            Ok("stub reply".into())
        }
    }

    #[tokio::test]
    async fn empty_list_short_circuits_without_calling_service() {
        let client = RecordingClient::default();
        let reply = complete(&client, "gpt-4o-mini", Vec::new())
            .await
            .expect("fallback reply");

        assert_eq!(reply, NO_VALID_CONTENT_FALLBACK);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn prepends_default_system_prompt_when_absent() {
        let client = RecordingClient::default();
        complete(
            &client,
            "gpt-4o-mini",
            vec![IncomingMessage::new("user", "What is this document about?")],
        )
        .await
        .expect("reply");

        let sent = client.sent.lock().unwrap();
        let messages = &sent[0];
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::system(DEFAULT_SYSTEM_PROMPT));
        assert_eq!(
            messages[1],
            ChatMessage::user("What is this document about?")
        );
    }

    #[tokio::test]
    async fn caller_system_prompt_is_forwarded_unchanged() {
        let client = RecordingClient::default();
        complete(
            &client,
            "gpt-4o-mini",
            vec![
                IncomingMessage::new("system", "Answer from the summary only."),
                IncomingMessage::new("user", "Hello"),
                IncomingMessage::new("ai", "Hi, how can I help?"),
            ],
        )
        .await
        .expect("reply");

        let sent = client.sent.lock().unwrap();
        let messages = &sent[0];
        assert_eq!(messages.len(), 3);
        assert_eq!(
            messages[0],
            ChatMessage::system("Answer from the summary only.")
        );
        assert_eq!(messages[2].role, Role::Assistant);
    }
}
