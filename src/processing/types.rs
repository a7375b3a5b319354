//! Core data types and error definitions for the ingestion pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while splitting page text into windows.
#[derive(Debug, Error)]
pub enum ChunkingError {
    /// Window size of zero can never hold any text.
    #[error("max_chars must be greater than zero")]
    InvalidMaxChars,
    /// Overlap at or beyond the window size would stall the windowing loop.
    #[error("overlap ({overlap}) must be strictly less than max_chars ({max_chars})")]
    OverlapTooLarge {
        /// Requested overlap in characters.
        overlap: usize,
        /// Requested window size in characters.
        max_chars: usize,
    },
}

/// Errors raised while extracting text from a source document.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Source file could not be read from disk.
    #[error("failed to read document '{path}': {source}")]
    Io {
        /// Path of the document that failed to open.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// PDF parser rejected the document.
    #[error("failed to extract text from '{path}': {message}")]
    Parse {
        /// Path of the document that failed to parse.
        path: String,
        /// Diagnostic reported by the PDF library.
        message: String,
    },
}

/// Errors raised while persisting chunk records.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Record serialization failed before anything was written.
    #[error("failed to serialize chunk record: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Destination could not be created or written.
    #[error("failed to write records to '{path}': {source}")]
    Io {
        /// Destination path of the failed write.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors emitted by the document ingestion pipeline.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Document directory could not be enumerated.
    #[error("failed to list documents in '{path}': {source}")]
    ListDocuments {
        /// Directory that failed to enumerate.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// Text extraction failed for a document.
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),
    /// Chunking parameters were rejected.
    #[error("chunking failed: {0}")]
    Chunking(#[from] ChunkingError),
    /// Sink refused the record batch.
    #[error("sink write failed: {0}")]
    Sink(#[from] SinkError),
}

/// Raw text extracted for a single page of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based page number within the source document.
    pub page: u32,
    /// Raw extracted text; empty when the page had no extractable text.
    pub text: String,
}

/// One chunk of a document page together with its provenance, the unit
/// persisted for indexing and retrieval.
///
/// `chunk_id` values for a given `(doc_id, page)` pair form a contiguous
/// sequence starting at 0, in source-text order. Records are immutable once
/// built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Identifier assigned once per source document.
    pub doc_id: String,
    /// Location of the source document inside the storage volume.
    pub source_path: String,
    /// Display name of the source document.
    pub doc_name: String,
    /// 1-based page number the chunk was taken from.
    pub page: u32,
    /// 0-based sequence number of the chunk within its page.
    pub chunk_id: u32,
    /// Normalized chunk text, never empty.
    pub content: String,
    /// Language tag carried through to the index, not interpreted here.
    pub lang: String,
}

/// Summary of a completed ingestion run returned by
/// [`crate::processing::IngestionService::ingest_dir`].
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct IngestOutcome {
    /// Number of documents processed.
    pub documents: usize,
    /// Number of pages seen across all documents, including empty ones.
    pub pages: usize,
    /// Number of chunk records handed to the sink.
    pub chunks: usize,
}
