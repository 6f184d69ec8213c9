#![deny(missing_docs)]

//! Core library for the docchat service.

/// HTTP routing and REST handlers.
pub mod api;
/// Summarization and grounded-chat orchestration.
pub mod chat;
/// Completion client abstraction and message normalization.
pub mod completion;
/// Environment-driven configuration management.
pub mod config;
/// Document text extraction.
pub mod extract;
/// Reply formatting helpers applied before display.
pub mod format;
/// Structured logging and tracing setup.
pub mod logging;
/// Request counters.
pub mod metrics;
/// Client-held session state: summary cache and chat transcript.
pub mod session;
