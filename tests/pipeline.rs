//! End-to-end ingestion tests over scripted collaborators.

use std::collections::HashMap;
use std::path::Path;

use docqa::processing::{
    ExtractError, IngestionService, PageText, TextExtractor,
};
use docqa::sink::{MemorySink, RecordSink};
use std::sync::Arc;

/// Extractor returning canned pages per document name.
struct FakeExtractor {
    pages_by_doc: HashMap<String, Vec<PageText>>,
}

impl TextExtractor for FakeExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>, ExtractError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self.pages_by_doc.get(&name).cloned().unwrap_or_default())
    }
}

/// Sink wrapper sharing the captured records with the test body.
struct SharedSink(Arc<MemorySink>);

#[async_trait::async_trait]
impl RecordSink for SharedSink {
    async fn write_records(
        &self,
        records: &[docqa::processing::ChunkRecord],
    ) -> Result<(), docqa::processing::SinkError> {
        self.0.write_records(records).await
    }
}

fn page(page: u32, text: &str) -> PageText {
    PageText {
        page,
        text: text.to_string(),
    }
}

#[tokio::test]
async fn ingest_dir_produces_ordered_records_with_contiguous_chunk_ids() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("contract-a.pdf"), b"stub").unwrap();
    std::fs::write(dir.path().join("contract-b.pdf"), b"stub").unwrap();

    let long_page = "cláusula de rescisão e multa ".repeat(30);
    let mut pages_by_doc = HashMap::new();
    pages_by_doc.insert(
        "contract-a.pdf".to_string(),
        vec![page(1, &long_page), page(2, ""), page(3, "página final")],
    );
    pages_by_doc.insert(
        "contract-b.pdf".to_string(),
        vec![page(1, "texto   com \n espaços   irregulares")],
    );

    let captured = Arc::new(MemorySink::new());
    let service = IngestionService::new(
        Box::new(FakeExtractor { pages_by_doc }),
        Box::new(SharedSink(captured.clone())),
        200,
        40,
    );

    let outcome = service
        .ingest_dir(dir.path(), "dbfs:/Volumes/demo/contracts/pdfs", "pt-BR")
        .await
        .unwrap();

    assert_eq!(outcome.documents, 2);
    assert_eq!(outcome.pages, 4);

    let records = captured.records();
    assert_eq!(outcome.chunks, records.len());

    // Documents are processed in sorted order, pages in source order.
    let a_records: Vec<_> = records
        .iter()
        .filter(|r| r.doc_name == "contract-a.pdf")
        .collect();
    let b_records: Vec<_> = records
        .iter()
        .filter(|r| r.doc_name == "contract-b.pdf")
        .collect();
    assert!(!a_records.is_empty());
    assert_eq!(b_records.len(), 1);
    assert!(records.iter().position(|r| r.doc_name == "contract-a.pdf")
        < records.iter().position(|r| r.doc_name == "contract-b.pdf"));

    // The empty page 2 contributes nothing; page numbering is untouched.
    assert!(a_records.iter().all(|r| r.page != 2));
    assert!(a_records.iter().any(|r| r.page == 3));

    // chunk_id restarts at 0 per page and increases contiguously.
    let mut per_page: HashMap<(String, u32), Vec<u32>> = HashMap::new();
    for record in &records {
        per_page
            .entry((record.doc_id.clone(), record.page))
            .or_default()
            .push(record.chunk_id);
    }
    for ids in per_page.values() {
        let expected: Vec<u32> = (0..ids.len() as u32).collect();
        assert_eq!(ids, &expected);
    }

    // Provenance fields carry through.
    for record in &records {
        assert_eq!(
            record.source_path,
            format!("dbfs:/Volumes/demo/contracts/pdfs/{}", record.doc_name)
        );
        assert_eq!(record.lang, "pt-BR");
        assert!(!record.content.is_empty());
        assert!(record.content.chars().count() <= 200);
    }

    // One doc_id per document, distinct across documents.
    let a_id = &a_records[0].doc_id;
    assert!(a_records.iter().all(|r| &r.doc_id == a_id));
    assert_ne!(a_id, &b_records[0].doc_id);

    // Whitespace is normalized before windowing.
    assert_eq!(b_records[0].content, "texto com espaços irregulares");

    let snapshot = service.metrics_snapshot();
    assert_eq!(snapshot.documents_processed, 2);
    assert_eq!(snapshot.pages_processed, 4);
    assert_eq!(snapshot.chunks_emitted, records.len() as u64);
}

#[tokio::test]
async fn ingest_dir_with_only_empty_pages_writes_empty_batch() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("scanned.pdf"), b"stub").unwrap();

    let mut pages_by_doc = HashMap::new();
    pages_by_doc.insert(
        "scanned.pdf".to_string(),
        vec![page(1, ""), page(2, "   \n ")],
    );

    let captured = Arc::new(MemorySink::new());
    let service = IngestionService::new(
        Box::new(FakeExtractor { pages_by_doc }),
        Box::new(SharedSink(captured.clone())),
        900,
        120,
    );

    let outcome = service
        .ingest_dir(dir.path(), "dbfs:/Volumes/demo/contracts/pdfs", "pt-BR")
        .await
        .unwrap();

    assert_eq!(outcome.documents, 1);
    assert_eq!(outcome.pages, 2);
    assert_eq!(outcome.chunks, 0);
    assert!(captured.records().is_empty());
}

#[tokio::test]
async fn invalid_chunk_parameters_abort_the_run() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("doc.pdf"), b"stub").unwrap();

    let mut pages_by_doc = HashMap::new();
    pages_by_doc.insert("doc.pdf".to_string(), vec![page(1, "algum texto")]);

    let captured = Arc::new(MemorySink::new());
    let service = IngestionService::new(
        Box::new(FakeExtractor { pages_by_doc }),
        Box::new(SharedSink(captured.clone())),
        100,
        100,
    );

    let result = service
        .ingest_dir(dir.path(), "dbfs:/Volumes/demo/contracts/pdfs", "pt-BR")
        .await;

    assert!(result.is_err());
    assert!(captured.records().is_empty());
}
