//! Assembly of chunk records from per-page text.

use super::chunking::chunk_text;
use super::types::{ChunkRecord, ChunkingError};

/// Provenance shared by every chunk of one document.
#[derive(Debug, Clone)]
pub struct DocumentContext {
    /// Identifier assigned once for the whole document.
    pub doc_id: String,
    /// Location of the document inside the storage volume.
    pub source_path: String,
    /// Display name of the document.
    pub doc_name: String,
    /// Language tag stamped on every chunk.
    pub lang: String,
}

/// Chunk one page's text and wrap each window into a [`ChunkRecord`].
///
/// Chunk ids are assigned contiguously from 0 in source order. A page whose
/// normalized text is empty produces no records.
pub fn build_page_records(
    doc: &DocumentContext,
    page: u32,
    text: &str,
    max_chars: usize,
    overlap: usize,
) -> Result<Vec<ChunkRecord>, ChunkingError> {
    let chunks = chunk_text(text, max_chars, overlap)?;
    let records = chunks
        .into_iter()
        .enumerate()
        .map(|(idx, content)| ChunkRecord {
            doc_id: doc.doc_id.clone(),
            source_path: doc.source_path.clone(),
            doc_name: doc.doc_name.clone(),
            page,
            chunk_id: idx as u32,
            content,
            lang: doc.lang.clone(),
        })
        .collect();
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> DocumentContext {
        DocumentContext {
            doc_id: "doc-1".into(),
            source_path: "dbfs:/Volumes/demo/contracts/pdfs/contract.pdf".into(),
            doc_name: "contract.pdf".into(),
            lang: "pt-BR".into(),
        }
    }

    #[test]
    fn chunk_ids_are_contiguous_from_zero() {
        let text = "palavra ".repeat(400);
        let records = build_page_records(&context(), 3, &text, 300, 40).unwrap();
        assert!(records.len() > 1);
        for (idx, record) in records.iter().enumerate() {
            assert_eq!(record.chunk_id, idx as u32);
            assert_eq!(record.page, 3);
            assert_eq!(record.doc_id, "doc-1");
            assert_eq!(record.lang, "pt-BR");
            assert!(!record.content.is_empty());
        }
    }

    #[test]
    fn empty_page_produces_no_records() {
        let records = build_page_records(&context(), 1, "  \n ", 300, 40).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn bad_parameters_propagate() {
        assert!(build_page_records(&context(), 1, "texto", 40, 40).is_err());
    }

    #[test]
    fn record_round_trips_through_json() {
        let records = build_page_records(&context(), 1, "uma frase curta", 300, 40).unwrap();
        let line = serde_json::to_string(&records[0]).unwrap();
        let back: ChunkRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(back, records[0]);
    }
}
