use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing request activity.
#[derive(Default)]
pub struct ChatMetrics {
    documents_summarized: AtomicU64,
    replies_generated: AtomicU64,
    last_summary_chars: AtomicU64,
}

impl ChatMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed summarization and the summary length produced for it.
    pub fn record_summary(&self, summary_chars: u64) {
        self.documents_summarized.fetch_add(1, Ordering::Relaxed);
        self.last_summary_chars
            .store(summary_chars, Ordering::Relaxed);
    }

    /// Record a completed chat reply.
    pub fn record_reply(&self) {
        self.replies_generated.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let documents_summarized = self.documents_summarized.load(Ordering::Relaxed);
        MetricsSnapshot {
            documents_summarized,
            replies_generated: self.replies_generated.load(Ordering::Relaxed),
            last_summary_chars: if documents_summarized == 0 {
                None
            } else {
                Some(self.last_summary_chars.load(Ordering::Relaxed))
            },
        }
    }
}

/// Immutable view of request counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of documents summarized since startup.
    pub documents_summarized: u64,
    /// Number of chat replies generated since startup.
    pub replies_generated: u64,
    /// Character length of the most recent summary, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_summary_chars: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_summaries_and_replies() {
        let metrics = ChatMetrics::new();
        metrics.record_summary(120);
        metrics.record_summary(48);
        metrics.record_reply();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_summarized, 2);
        assert_eq!(snapshot.replies_generated, 1);
        assert_eq!(snapshot.last_summary_chars, Some(48));
    }

    #[test]
    fn last_summary_chars_is_absent_before_first_summary() {
        let metrics = ChatMetrics::new();
        assert_eq!(metrics.snapshot().last_summary_chars, None);
    }
}
