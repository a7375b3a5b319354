//! Ingestion service coordinating extraction, chunking, and the record sink.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use uuid::Uuid;
use walkdir::WalkDir;

use crate::metrics::{IngestMetrics, MetricsSnapshot};
use crate::processing::extract::TextExtractor;
use crate::processing::records::{DocumentContext, build_page_records};
use crate::processing::types::{ChunkRecord, IngestError, IngestOutcome};
use crate::sink::RecordSink;

/// Coordinates the full ingestion pipeline: per-page extraction, fixed-window
/// chunking, and a single hand-off of the flat record sequence to the sink.
///
/// The service owns its collaborators behind trait objects so that tests can
/// script extraction and capture sink output. Construct it once and share it
/// through an `Arc` when callers want to ingest concurrently; each document
/// is processed independently.
pub struct IngestionService {
    extractor: Box<dyn TextExtractor>,
    sink: Box<dyn RecordSink>,
    max_chars: usize,
    overlap: usize,
    metrics: Arc<IngestMetrics>,
}

impl IngestionService {
    /// Build a new service around the given collaborators and chunking
    /// parameters.
    pub fn new(
        extractor: Box<dyn TextExtractor>,
        sink: Box<dyn RecordSink>,
        max_chars: usize,
        overlap: usize,
    ) -> Self {
        Self {
            extractor,
            sink,
            max_chars,
            overlap,
            metrics: Arc::new(IngestMetrics::new()),
        }
    }

    /// Extract, chunk, and sink every PDF in `dir`.
    ///
    /// `volume_uri` prefixes each document's `source_path`; `lang` is stamped
    /// on every record. Returns a summary of what was processed. Extraction
    /// failure for any document aborts the run with an error; nothing is
    /// written to the sink in that case.
    pub async fn ingest_dir(
        &self,
        dir: &Path,
        volume_uri: &str,
        lang: &str,
    ) -> Result<IngestOutcome, IngestError> {
        let files = list_pdfs(dir)?;
        tracing::info!(dir = %dir.display(), documents = files.len(), "Ingesting documents");

        let mut records: Vec<ChunkRecord> = Vec::new();
        let mut outcome = IngestOutcome::default();

        for path in files {
            let doc_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let doc = DocumentContext {
                doc_id: Uuid::new_v4().to_string(),
                source_path: format!("{}/{}", volume_uri.trim_end_matches('/'), doc_name),
                doc_name: doc_name.clone(),
                lang: lang.to_string(),
            };

            let pages = self.extractor.extract_pages(&path)?;
            let mut doc_chunks = 0usize;
            for page in &pages {
                let page_records =
                    build_page_records(&doc, page.page, &page.text, self.max_chars, self.overlap)?;
                doc_chunks += page_records.len();
                records.extend(page_records);
            }

            tracing::debug!(
                doc = %doc_name,
                doc_id = %doc.doc_id,
                pages = pages.len(),
                chunks = doc_chunks,
                "Document chunked"
            );

            outcome.documents += 1;
            outcome.pages += pages.len();
            outcome.chunks += doc_chunks;
            self.metrics
                .record_document(pages.len() as u64, doc_chunks as u64);
        }

        self.sink.write_records(&records).await?;
        tracing::info!(
            documents = outcome.documents,
            pages = outcome.pages,
            chunks = outcome.chunks,
            "Ingestion complete"
        );

        Ok(outcome)
    }

    /// Return the current ingestion metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

/// Enumerate `*.pdf` files directly under `dir`, case-insensitive and
/// sorted by name so runs are deterministic.
fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|err| IngestError::ListDocuments {
            path: dir.display().to_string(),
            source: err
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("walk error")),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_pdf = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_pdfs_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.PDF", "a.pdf", "notes.txt", "c.pdf"] {
            std::fs::write(dir.path().join(name), b"stub").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("d.pdf"), b"stub").unwrap();

        let files = list_pdfs(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        // Nested files are ignored; the listing is flat like the volume's.
        assert_eq!(names, vec!["a.pdf", "b.PDF", "c.pdf"]);
    }

    #[test]
    fn list_pdfs_missing_dir_is_an_error() {
        let error = list_pdfs(Path::new("/nonexistent/pdfs")).unwrap_err();
        assert!(matches!(error, IngestError::ListDocuments { .. }));
    }
}
