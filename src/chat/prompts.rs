//! Fixed prompts and request construction for summarization and chat.

use crate::completion::IncomingMessage;

/// Hard cap on the number of characters of extracted text forwarded for
/// summarization. Longer documents are truncated silently; there is no
/// chunking or iteration over the remainder.
pub const SUMMARY_INPUT_LIMIT: usize = 2000;

/// Disclaimer sentence appended to every summary and chat reply.
pub const CLOSING_DISCLAIMER: &str =
    "This information comes from the uploaded document and is not a substitute for professional medical advice.";

/// Refusal phrase for questions the summary cannot answer.
pub const REFUSAL_PHRASE: &str = "I'm sorry, but I don't have information about that.";

/// System prompt governing document summarization.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are an AI that summarizes uploaded documents. \
Respond in plain text only, with no markdown formatting. \
Simplify medical terminology so that a layperson can understand it. \
Do not add facts that are not present in the document, and do not offer opinions. \
End every summary with this exact sentence: \
\"This information comes from the uploaded document and is not a substitute for professional medical advice.\"";

/// Build the two-message exchange requesting a summary of `text`.
///
/// The fixed system prompt comes first; the user message carries the
/// extracted text capped at [`SUMMARY_INPUT_LIMIT`] characters.
pub fn summarization_messages(text: &str) -> Vec<IncomingMessage> {
    vec![
        IncomingMessage::new("system", SUMMARY_SYSTEM_PROMPT),
        IncomingMessage::new("user", truncate_for_summary(text)),
    ]
}

/// Build the system prompt binding chat replies to the document summary.
pub fn chat_system_prompt(file_summary: &str) -> String {
    format!(
        "You are an AI that answers questions based solely on the provided document summary. \
Use the summary as context to provide accurate and concise answers, in plain text only with no markdown formatting. \
Do not ask clarifying questions or request additional information from the user. \
If the summary does not contain the answer, reply exactly: \"{REFUSAL_PHRASE}\" \
End every answer with this exact sentence: \"{CLOSING_DISCLAIMER}\"\n\
Document Summary: {file_summary}"
    )
}

/// Cap `text` at the first [`SUMMARY_INPUT_LIMIT`] characters.
///
/// Counts Unicode scalar values, so a multi-byte character is never split.
pub fn truncate_for_summary(text: &str) -> &str {
    match text.char_indices().nth(SUMMARY_INPUT_LIMIT) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
