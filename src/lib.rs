#![deny(missing_docs)]

//! Core library for the document question-answering demo pipeline.
//!
//! The pipeline stages PDF files into a managed storage volume, extracts and
//! chunks their text into records, and keeps a vector search index synced to
//! those records for similarity queries. The chunker is the only in-crate
//! algorithm; storage, embedding, and ANN search stay behind the platform's
//! REST surfaces and trait seams.

/// YAML demo configuration and workspace credentials.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Ingestion metrics helpers.
pub mod metrics;
/// Document processing pipeline: extraction, chunking, record assembly.
pub mod processing;
/// Chunk record destinations.
pub mod sink;
/// Staging of source PDFs into the storage volume.
pub mod staging;
/// Vector search endpoint, index, and query client.
pub mod vector_search;
