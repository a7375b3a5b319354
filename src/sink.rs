//! Destinations for chunk records.
//!
//! The platform-side table that ultimately backs the vector index is out of
//! scope; the pipeline only promises to hand a flat, ordered record sequence
//! to a [`RecordSink`]. The JSONL sink is the demo rendition of that hand-off
//! and drops one JSON object per line into the storage volume, where the
//! platform's table loader picks it up.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::processing::{ChunkRecord, SinkError};

/// Accepts the flat sequence of chunk records produced by ingestion.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Persist the records, replacing any previous batch.
    async fn write_records(&self, records: &[ChunkRecord]) -> Result<(), SinkError>;
}

/// Sink writing newline-delimited JSON to a file in the volume directory.
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// Create a sink targeting `path`; parent directories are created on
    /// first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Destination path of the sink.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSink for JsonlSink {
    async fn write_records(&self, records: &[ChunkRecord]) -> Result<(), SinkError> {
        let mut body = String::new();
        for record in records {
            body.push_str(&serde_json::to_string(record)?);
            body.push('\n');
        }

        let io_error = |source| SinkError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        tokio::fs::write(&self.path, body).await.map_err(io_error)?;

        tracing::debug!(path = %self.path.display(), records = records.len(), "Records written");
        Ok(())
    }
}

/// In-memory sink used by tests and dry runs.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<ChunkRecord>>,
}

impl MemorySink {
    /// Create an empty in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy out everything written so far.
    pub fn records(&self) -> Vec<ChunkRecord> {
        self.records.lock().expect("sink mutex poisoned").clone()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn write_records(&self, records: &[ChunkRecord]) -> Result<(), SinkError> {
        let mut stored = self.records.lock().expect("sink mutex poisoned");
        stored.clear();
        stored.extend_from_slice(records);
        Ok(())
    }
}
