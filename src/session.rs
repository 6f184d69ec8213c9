//! Client-held session state.
//!
//! The server is stateless across requests; everything a chat session
//! accumulates lives on the client side and is discarded when the session
//! ends. Two keyed stores model that state explicitly: a per-document
//! summary cache with a compute-once guarantee, and a display transcript
//! that applies reply formatting before text reaches the user.

use crate::format::strip_markdown;
use std::collections::HashMap;
use std::future::Future;

/// Per-document summary cache keyed by document name.
///
/// Invariant: at most one summary is computed per document. Re-selecting an
/// already-summarized document must not trigger a second summarization, so
/// [`SummaryStore::ensure`] consults membership before fetching.
#[derive(Default)]
pub struct SummaryStore {
    entries: HashMap<String, String>,
}

impl SummaryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the cached summary for a document.
    pub fn get(&self, document: &str) -> Option<&str> {
        self.entries.get(document).map(String::as_str)
    }

    /// Names of every document summarized so far, in arbitrary order.
    pub fn documents(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Return the summary for `document`, fetching it only on first sight.
    ///
    /// `fetch` runs when the document has no cached summary; a fetch failure
    /// leaves the store unchanged so a later attempt can retry.
    pub async fn ensure<F, Fut, E>(&mut self, document: &str, fetch: F) -> Result<&str, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        if !self.entries.contains_key(document) {
            let summary = fetch().await?;
            tracing::debug!(document, summary_chars = summary.chars().count(), "Summary cached");
            self.entries.insert(document.to_string(), summary);
        }
        Ok(self
            .entries
            .get(document)
            .expect("summary present after ensure")
            .as_str())
    }
}

/// Visible author of a transcript entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speaker {
    /// The person typing questions.
    User,
    /// The assistant, including inline error notices.
    Assistant,
}

/// A single displayed line of conversation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayMessage {
    /// Who the line is attributed to.
    pub speaker: Speaker,
    /// Display text, already formatted.
    pub text: String,
}

/// Ordered chat display log for one session.
#[derive(Default)]
pub struct Transcript {
    messages: Vec<DisplayMessage>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user question verbatim.
    pub fn push_question(&mut self, text: impl Into<String>) {
        self.messages.push(DisplayMessage {
            speaker: Speaker::User,
            text: text.into(),
        });
    }

    /// Append an assistant reply, stripping markdown artifacts for display.
    pub fn push_reply(&mut self, reply: &str) {
        self.messages.push(DisplayMessage {
            speaker: Speaker::Assistant,
            text: strip_markdown(reply),
        });
    }

    /// Surface a failure as an inline assistant message, preserving
    /// conversation continuity instead of interrupting with a dialog.
    pub fn push_error(&mut self, detail: &str) {
        self.messages.push(DisplayMessage {
            speaker: Speaker::Assistant,
            text: format!("Something went wrong: {detail}"),
        });
    }

    /// The displayed conversation so far.
    pub fn messages(&self) -> &[DisplayMessage] {
        &self.messages
    }
}
