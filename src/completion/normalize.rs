//! Canonicalization of caller-supplied messages before dispatch.
//!
//! Normalization guarantees that every message sent to the completion
//! service carries a canonical role and non-empty content. Blank content is
//! substituted with a placeholder rather than dropped, trading fidelity for
//! robustness. The pass is idempotent: already-canonical messages come out
//! unchanged.

use super::types::{ChatMessage, IncomingMessage, Role};

/// Substituted for messages whose content is empty after trimming.
pub const EMPTY_CONTENT_PLACEHOLDER: &str = "No meaningful content provided.";

/// System prompt used when the caller supplies no system message of its own.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an AI that provides concise, structured summaries for uploaded documents. \
For medical documents, extract relevant information including patient details, diagnosis, test results, and treatment instructions. \
For other documents, extract key findings, main topics, and conclusions. \
Output the summary in a structured format with clear sections, avoiding jargon. \
DO NOT ask for more documents or user input.";

/// Source of the system prompt for a completion call, decided once at entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SystemPromptPolicy {
    /// The caller's own system message is present and used as-is.
    UseProvided,
    /// No system message present; the default prompt is prepended.
    UseDefault,
}

impl SystemPromptPolicy {
    /// Decide the policy for a normalized message list.
    ///
    /// A caller cannot opt out of a system message entirely: absence always
    /// selects the default prompt.
    pub fn for_messages(messages: &[ChatMessage]) -> Self {
        if messages.iter().any(|message| message.role == Role::System) {
            Self::UseProvided
        } else {
            Self::UseDefault
        }
    }
}

/// Canonicalize roles and guarantee non-empty content for every message.
///
/// The `ai` label maps to `assistant`; unrecognized or missing labels map to
/// `user`. Content is trimmed, with blank content replaced by
/// [`EMPTY_CONTENT_PLACEHOLDER`]. Messages empty even after substitution are
/// dropped; with a non-empty placeholder that filter never fires, but it is
/// kept for behavioral parity with the upstream contract.
pub fn normalize_messages(messages: Vec<IncomingMessage>) -> Vec<ChatMessage> {
    messages
        .into_iter()
        .map(|message| ChatMessage {
            role: canonical_role(message.role.as_deref()),
            content: canonical_content(message.content.as_deref()),
        })
        .filter(|message| !message.content.is_empty())
        .collect()
}

/// Prepend the default system prompt when the policy calls for one.
pub fn ensure_system_prompt(
    messages: Vec<ChatMessage>,
    policy: SystemPromptPolicy,
) -> Vec<ChatMessage> {
    match policy {
        SystemPromptPolicy::UseProvided => messages,
        SystemPromptPolicy::UseDefault => {
            let mut finalized = Vec::with_capacity(messages.len() + 1);
            finalized.push(ChatMessage::system(DEFAULT_SYSTEM_PROMPT));
            finalized.extend(messages);
            finalized
        }
    }
}

fn canonical_role(label: Option<&str>) -> Role {
    match label {
        Some("ai") | Some("assistant") => Role::Assistant,
        Some("system") => Role::System,
        _ => Role::User,
    }
}

fn canonical_content(content: Option<&str>) -> String {
    let trimmed = content.unwrap_or_default().trim();
    if trimmed.is_empty() {
        EMPTY_CONTENT_PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}
