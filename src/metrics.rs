use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing ingestion activity.
#[derive(Default)]
pub struct IngestMetrics {
    documents_processed: AtomicU64,
    pages_processed: AtomicU64,
    chunks_emitted: AtomicU64,
}

impl IngestMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a processed document together with its page and chunk counts.
    pub fn record_document(&self, page_count: u64, chunk_count: u64) {
        self.documents_processed.fetch_add(1, Ordering::Relaxed);
        self.pages_processed.fetch_add(page_count, Ordering::Relaxed);
        self.chunks_emitted.fetch_add(chunk_count, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_processed: self.documents_processed.load(Ordering::Relaxed),
            pages_processed: self.pages_processed.load(Ordering::Relaxed),
            chunks_emitted: self.chunks_emitted.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of ingestion counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of documents processed since startup.
    pub documents_processed: u64,
    /// Total pages seen across all processed documents.
    pub pages_processed: u64,
    /// Total chunk records emitted across all processed documents.
    pub chunks_emitted: u64,
}
