//! Chat service coordinating extraction, summarization, and grounded replies.

use crate::{
    chat::prompts::{chat_system_prompt, summarization_messages},
    completion::{self, CompletionClient, CompletionError, IncomingMessage},
    config::get_config,
    extract::{ExtractionError, extract_text},
    metrics::{ChatMetrics, MetricsSnapshot},
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors emitted by the chat service.
#[derive(Debug, Error)]
pub enum ChatError {
    /// No usable text could be derived from the uploaded document.
    #[error("Failed to extract document text: {0}")]
    Extraction(#[from] ExtractionError),
    /// The external completion service failed or returned unusable output.
    #[error("Completion request failed: {0}")]
    Completion(#[from] CompletionError),
}

/// Abstraction over the chat pipeline used by external surfaces.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Extract text from an uploaded document and produce its summary.
    async fn summarize_document(
        &self,
        data: &[u8],
        media_type: Option<&str>,
    ) -> Result<String, ChatError>;

    /// Answer the latest question in `messages`, constrained to `file_summary`.
    async fn generate_reply(
        &self,
        messages: Vec<IncomingMessage>,
        file_summary: String,
    ) -> Result<String, ChatError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

/// Coordinates document summarization and summary-grounded chat.
///
/// The service owns the completion client and the metrics registry so that
/// every surface reuses the same components. Construct it once near process
/// start and share it through an `Arc`.
pub struct ChatService {
    completion_client: Box<dyn CompletionClient>,
    metrics: Arc<ChatMetrics>,
}

impl ChatService {
    /// Build a new chat service around an explicitly constructed client.
    pub fn new(completion_client: Box<dyn CompletionClient>) -> Self {
        Self {
            completion_client,
            metrics: Arc::new(ChatMetrics::new()),
        }
    }

    /// Extract text from an uploaded document and produce its summary.
    ///
    /// Extraction failures surface before any outbound call; the completion
    /// service is only contacted once non-empty text is in hand.
    pub async fn summarize_document(
        &self,
        data: &[u8],
        media_type: Option<&str>,
    ) -> Result<String, ChatError> {
        let text = extract_text(data, media_type)?;
        tracing::info!(
            media_type = media_type.unwrap_or("unknown"),
            text_chars = text.chars().count(),
            "Summarizing document"
        );

        let model = &get_config().completion_model;
        let summary = completion::complete(
            self.completion_client.as_ref(),
            model,
            summarization_messages(&text),
        )
        .await?;

        self.metrics.record_summary(summary.chars().count() as u64);
        Ok(summary)
    }

    /// Answer the conversation's latest question, constrained to the summary.
    ///
    /// The constrained system prompt is prepended to the caller's history;
    /// nothing is persisted between calls.
    pub async fn generate_reply(
        &self,
        messages: Vec<IncomingMessage>,
        file_summary: String,
    ) -> Result<String, ChatError> {
        tracing::info!(
            history = messages.len(),
            summary_chars = file_summary.chars().count(),
            "Generating grounded reply"
        );

        let mut conversation = Vec::with_capacity(messages.len() + 1);
        conversation.push(IncomingMessage::new(
            "system",
            &chat_system_prompt(&file_summary),
        ));
        conversation.extend(messages);

        let model = &get_config().completion_model;
        let reply =
            completion::complete(self.completion_client.as_ref(), model, conversation).await?;

        self.metrics.record_reply();
        Ok(reply)
    }

    /// Return the current request counters.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl ChatApi for ChatService {
    async fn summarize_document(
        &self,
        data: &[u8],
        media_type: Option<&str>,
    ) -> Result<String, ChatError> {
        ChatService::summarize_document(self, data, media_type).await
    }

    async fn generate_reply(
        &self,
        messages: Vec<IncomingMessage>,
        file_summary: String,
    ) -> Result<String, ChatError> {
        ChatService::generate_reply(self, messages, file_summary).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        ChatService::metrics_snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::prompts::SUMMARY_SYSTEM_PROMPT;
    use crate::completion::ChatMessage;
    use crate::config::{CONFIG, Config};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, Once};

    fn ensure_test_config() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = CONFIG.set(Config {
                openai_api_key: "test-key".into(),
                openai_base_url: "http://127.0.0.1:9".into(),
                completion_model: "test-model".into(),
                server_port: None,
            });
        });
    }

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

    fn service_with_recorder() -> (ChatService, Arc<ChatMetrics>) {
        let service = ChatService::new(Box::new(RecordingClient::default()));
        let metrics = Arc::clone(&service.metrics);
        (service, metrics)
    }

    #[tokio::test]
    async fn summarize_sends_system_prompt_then_document_text() {
        ensure_test_config();
        let client = Arc::new(RecordingClient::default());
        let service = ChatService {
            completion_client: Box::new(SharedClient(Arc::clone(&client))),
            metrics: Arc::new(ChatMetrics::new()),
        };

        let summary = service
            .summarize_document(b"Blood pressure was 120/80.", Some("text/plain"))
            .await
            .expect("summary");

        assert_eq!(summary, "stub reply");
        let sent = client.sent.lock().unwrap();
        let messages = &sent[0];
        assert_eq!(messages[0], ChatMessage::system(SUMMARY_SYSTEM_PROMPT));
        assert_eq!(messages[1], ChatMessage::user("Blood pressure was 120/80."));
    }

    #[tokio::test]
    async fn empty_document_never_reaches_the_completion_service() {
        ensure_test_config();
        let client = Arc::new(RecordingClient::default());
        let service = ChatService {
            completion_client: Box::new(SharedClient(Arc::clone(&client))),
            metrics: Arc::new(ChatMetrics::new()),
        };

        let error = service
            .summarize_document(b"   ", Some("text/plain"))
            .await
            .expect_err("extraction error");

        assert!(matches!(
            error,
            ChatError::Extraction(ExtractionError::EmptyDocument)
        ));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn reply_prepends_summary_bound_system_prompt() {
        ensure_test_config();
        let client = Arc::new(RecordingClient::default());
        let service = ChatService {
            completion_client: Box::new(SharedClient(Arc::clone(&client))),
            metrics: Arc::new(ChatMetrics::new()),
        };

        service
            .generate_reply(
                vec![
                    IncomingMessage::new("user", "What was the diagnosis?"),
                    IncomingMessage::new("ai", "The document mentions hypertension."),
                    IncomingMessage::new("user", "Anything else?"),
                ],
                "Patient has hypertension.".into(),
            )
            .await
            .expect("reply");

        let sent = client.sent.lock().unwrap();
        let messages = &sent[0];
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, crate::completion::Role::System);
        assert!(
            messages[0]
                .content
                .contains("Document Summary: Patient has hypertension.")
        );
        assert_eq!(
            messages[2],
            ChatMessage::assistant("The document mentions hypertension.")
        );
    }

    #[tokio::test]
    async fn metrics_track_summaries_and_replies() {
        ensure_test_config();
        let (service, metrics) = service_with_recorder();

        service
            .summarize_document(b"content", Some("text/plain"))
            .await
            .expect("summary");
        service
            .generate_reply(vec![IncomingMessage::new("user", "hi")], "summary".into())
            .await
            .expect("reply");

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_summarized, 1);
        assert_eq!(snapshot.replies_generated, 1);
        assert_eq!(snapshot.last_summary_chars, Some("stub reply".len() as u64));
    }

    struct SharedClient(Arc<RecordingClient>);

    #[async_trait]
    impl CompletionClient for SharedClient {
        async fn complete(
            &self,
            model: &str,
            messages: &[ChatMessage],
        ) -> Result<String, CompletionError> {
            self.0.complete(model, messages).await
        }
    }
}
