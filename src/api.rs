//! HTTP surface for docchat.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /summarize` – Accept a multipart document upload (`file` field),
//!   extract its text, and return `{ "summary": string }` produced by the
//!   completion service.
//! - `POST /chat` – Accept a conversation history plus a previously produced
//!   document summary and return `{ "reply": string }` constrained to that
//!   summary.
//! - `GET /metrics` – Observe request counters and the last summary length.
//! - `GET /commands` – Machine-readable command catalog for quick discovery
//!   by tools/hosts.
//!
//! Handlers are stateless across requests; every failure is returned as a
//! structured JSON object with an `error` field.

use crate::chat::{ChatApi, ChatError};
use crate::completion::IncomingMessage;
use crate::extract::ExtractionError;
use crate::metrics::MetricsSnapshot;
use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Build the HTTP router exposing the chat assistant surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: ChatApi + 'static,
{
    Router::new()
        .route("/summarize", post(summarize_document::<S>))
        .route("/chat", post(generate_reply::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(service)
}

/// Success response for the `POST /summarize` endpoint.
#[derive(Serialize)]
struct SummarizeResponse {
    /// Summary of the uploaded document.
    summary: String,
}

/// Summarize an uploaded document.
///
/// Reads the multipart `file` field (bytes plus declared media type),
/// extracts plain text, and forwards it to the completion service. The
/// upload is held in memory only for the duration of the request.
async fn summarize_document<S>(
    State(service): State<Arc<S>>,
    mut multipart: Multipart,
) -> Result<Json<SummarizeResponse>, ApiError>
where
    S: ChatApi,
{
    let mut upload: Option<(Vec<u8>, Option<String>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| ApiError::SummarizeFailed {
            details: error.to_string(),
        })?
    {
        if field.name() != Some("file") {
            continue;
        }
        let media_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|error| ApiError::SummarizeFailed {
                details: error.to_string(),
            })?;
        upload = Some((data.to_vec(), media_type));
        break;
    }

    let Some((data, media_type)) = upload else {
        return Err(ApiError::MissingFile);
    };

    let summary = service
        .summarize_document(&data, media_type.as_deref())
        .await
        .map_err(summarize_error)?;

    tracing::info!(
        upload_bytes = data.len(),
        media_type = media_type.as_deref().unwrap_or("unknown"),
        summary_chars = summary.chars().count(),
        "Summarize request completed"
    );
    Ok(Json(SummarizeResponse { summary }))
}

/// Success response for the `POST /chat` endpoint.
#[derive(Serialize)]
struct ChatResponse {
    /// Reply grounded in the document summary.
    reply: String,
}

/// Answer a follow-up question constrained to the document summary.
///
/// The body must carry a `messages` array; each element may spell its text
/// under `content` or `message`. A missing or non-array `messages` value is
/// rejected before any outbound call.
async fn generate_reply<S>(
    State(service): State<Arc<S>>,
    Json(body): Json<Value>,
) -> Result<Json<ChatResponse>, ApiError>
where
    S: ChatApi,
{
    let Some(raw_messages) = body.get("messages").and_then(Value::as_array) else {
        return Err(ApiError::InvalidChatRequest);
    };

    // Non-object elements degrade to an empty message; normalization turns
    // those into the placeholder rather than rejecting the conversation.
    let messages: Vec<IncomingMessage> = raw_messages
        .iter()
        .map(|value| serde_json::from_value(value.clone()).unwrap_or_default())
        .collect();

    let file_summary = body
        .get("fileSummary")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let history = messages.len();
    let reply = service
        .generate_reply(messages, file_summary)
        .await
        .map_err(|error| {
            tracing::error!(error = %error, "Chat request failed");
            ApiError::ChatFailed
        })?;

    tracing::info!(
        history,
        reply_chars = reply.chars().count(),
        "Chat request completed"
    );
    Ok(Json(ChatResponse { reply }))
}

/// Return a concise metrics snapshot with request counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: ChatApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "summarize",
                method: "POST",
                path: "/summarize",
                description: "Upload a document as the multipart `file` field and receive { \"summary\": string }. PDF uploads are parsed structurally; anything else is decoded as UTF-8 text.",
                request_example: None,
            },
            CommandDescriptor {
                name: "chat",
                method: "POST",
                path: "/chat",
                description: "Send the conversation history and a document summary; receive { \"reply\": string } constrained to that summary.",
                request_example: Some(json!({
                    "messages": [
                        { "role": "user", "content": "What was the diagnosis?" }
                    ],
                    "fileSummary": "Patient has mild hypertension."
                })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return request counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

/// Boundary error type rendering the structured JSON error bodies.
#[derive(Debug)]
enum ApiError {
    /// Multipart body carried no `file` field.
    MissingFile,
    /// Upload decoded to an empty string; nothing to summarize.
    NoTextExtracted,
    /// Summarization failed downstream of validation.
    SummarizeFailed { details: String },
    /// Chat body was missing a `messages` array.
    InvalidChatRequest,
    /// Reply generation failed downstream of validation.
    ChatFailed,
}

/// Map a summarization-path service error onto the boundary taxonomy.
fn summarize_error(error: ChatError) -> ApiError {
    match error {
        ChatError::Extraction(ExtractionError::EmptyDocument) => ApiError::NoTextExtracted,
        other => {
            tracing::error!(error = %other, "Summarize request failed");
            ApiError::SummarizeFailed {
                details: other.to_string(),
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::MissingFile => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "No file received" }),
            ),
            Self::NoTextExtracted => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "No text extracted from document" }),
            ),
            Self::SummarizeFailed { details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to summarize document", "details": details }),
            ),
            Self::InvalidChatRequest => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid request" }),
            ),
            Self::ChatFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to generate response" }),
            ),
        };
        (status, Json(body)).into_response()
    }
}
