//! Message model and error definitions for the completion pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical conversational roles understood by the completion service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instruction message establishing behavioral constraints.
    System,
    /// End-user turn.
    User,
    /// Model turn.
    Assistant,
}

impl Role {
    /// Wire label for the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A normalized conversation message ready for dispatch.
///
/// Invariant: `content` is non-empty. Normalization substitutes a placeholder
/// for blank content instead of rejecting the message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Canonical role tag.
    pub role: Role,
    /// Trimmed, non-empty message text.
    pub content: String,
}

impl ChatMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Build an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A candidate message as received from callers, before normalization.
///
/// Clients are loose about shape: the assistant role may arrive under the
/// `ai` label, and message text may arrive under either `content` or
/// `message`. Both keys and a missing role are tolerated here and
/// canonicalized by [`crate::completion::normalize_messages`].
#[derive(Clone, Debug, Default, Deserialize)]
pub struct IncomingMessage {
    /// Role label as supplied by the caller.
    #[serde(default)]
    pub role: Option<String>,
    /// Message text under either accepted key.
    #[serde(default, alias = "message")]
    pub content: Option<String>,
}

impl IncomingMessage {
    /// Convenience constructor used by internal callers and tests.
    pub fn new(role: &str, content: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            content: Some(content.to_string()),
        }
    }
}

impl From<ChatMessage> for IncomingMessage {
    fn from(message: ChatMessage) -> Self {
        Self {
            role: Some(message.role.as_str().to_string()),
            content: Some(message.content),
        }
    }
}

/// Errors raised while obtaining a completion from the external service.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Completion endpoint could not be reached.
    #[error("Completion service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Completion endpoint returned a non-success status.
    #[error("Completion service returned {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status reported by the service.
        status: reqwest::StatusCode,
        /// Response body captured for diagnostics.
        body: String,
    },
    /// Completion response could not be decoded.
    #[error("Malformed completion response: {0}")]
    InvalidResponse(String),
}
