//! Document summarization and summary-grounded chat orchestration.

pub mod prompts;
mod service;

pub use service::{ChatApi, ChatError, ChatService};
