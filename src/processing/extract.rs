//! Page-level text extraction from source documents.
//!
//! The pipeline only ever sees an ordered sequence of per-page strings, so
//! extraction sits behind the [`TextExtractor`] trait and the production
//! implementation can be swapped for a scripted fake in tests.

use std::path::Path;

use super::types::{ExtractError, PageText};

/// Yields the ordered per-page raw text of a source document.
pub trait TextExtractor: Send + Sync {
    /// Extract every page of the document at `path`, in order, 1-based.
    ///
    /// Pages without extractable text are reported with an empty string
    /// rather than omitted, so page numbers stay aligned with the source.
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>, ExtractError>;
}

/// PDF extractor backed by the `pdf-extract` crate.
///
/// The library returns the whole document as one string with form-feed
/// (`\x0C`) separators between pages; splitting on those recovers the
/// per-page sequence.
#[derive(Debug, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Construct a new extractor instance.
    pub const fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>, ExtractError> {
        let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let text =
            pdf_extract::extract_text_from_mem(&bytes).map_err(|err| ExtractError::Parse {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;

        Ok(split_pages(&text))
    }
}

/// Split flat extractor output into 1-based pages on form-feed separators.
///
/// Empty segments are kept: a scanned or image-only page still occupies a
/// page number, it just carries no text.
pub(crate) fn split_pages(text: &str) -> Vec<PageText> {
    text.split('\x0C')
        .enumerate()
        .map(|(idx, page_text)| PageText {
            page: idx as u32 + 1,
            text: page_text.to_string(),
        })
        .collect()
}
