//! Document processing pipeline: extraction, chunking, and record assembly.

pub mod chunking;
pub mod extract;
pub mod records;
mod service;
pub mod types;

pub use chunking::{DEFAULT_MAX_CHARS, DEFAULT_OVERLAP, chunk_text, normalize_whitespace};
pub use extract::{PdfTextExtractor, TextExtractor};
pub use records::{DocumentContext, build_page_records};
pub use service::IngestionService;
pub use types::{
    ChunkRecord, ChunkingError, ExtractError, IngestError, IngestOutcome, PageText, SinkError,
};
