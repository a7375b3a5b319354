//! Fixed-window text chunking.
//!
//! This module holds the one self-contained algorithm of the pipeline: page
//! text is whitespace-normalized, then split into overlapping character
//! windows of bounded length. Highlights:
//!
//! - Normalization: every maximal whitespace run collapses to a single ASCII
//!   space and the ends are trimmed, so chunk boundaries never depend on the
//!   extractor's newline or tab habits.
//! - Windowing: each chunk covers `min(max_chars, remaining)` characters and
//!   the next window starts `overlap` characters before the previous end, so
//!   sentences straddling a boundary stay visible to both chunks.
//! - Windows are counted in `char`s, not bytes; accented text common in the
//!   demo corpora must never be sliced mid-codepoint.
//!
//! The function is pure and stateless. Callers wanting concurrency can chunk
//! arbitrarily many pages in parallel without coordination.

use super::types::ChunkingError;

/// Default window size in characters, balancing embedding-context size
/// against the number of chunks per page.
pub const DEFAULT_MAX_CHARS: usize = 900;

/// Default number of characters repeated between consecutive chunks.
pub const DEFAULT_OVERLAP: usize = 120;

/// Collapse whitespace runs to single spaces and trim the ends.
///
/// Idempotent: normalizing already-normalized text is a no-op.
pub fn normalize_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(word);
    }
    normalized
}

/// Split `text` into overlapping windows of at most `max_chars` characters.
///
/// The text is normalized first (see [`normalize_whitespace`]); empty or
/// whitespace-only input yields an empty vector, which is the policy for
/// pages with no extractable text rather than an error. Otherwise the first
/// window starts at offset 0, every window except possibly the last spans
/// exactly `max_chars` characters, and each successive window starts
/// `overlap` characters before the previous end. Every character of the
/// normalized text lands in at least one window.
///
/// `overlap` must be strictly less than `max_chars`; anything else cannot
/// make forward progress and is rejected up front rather than clamped.
pub fn chunk_text(
    text: &str,
    max_chars: usize,
    overlap: usize,
) -> Result<Vec<String>, ChunkingError> {
    if max_chars == 0 {
        return Err(ChunkingError::InvalidMaxChars);
    }
    if overlap >= max_chars {
        return Err(ChunkingError::OverlapTooLarge { overlap, max_chars });
    }

    let normalized = normalize_whitespace(text);
    if normalized.is_empty() {
        return Ok(Vec::new());
    }

    let chars: Vec<char> = normalized.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let end = usize::min(chars.len(), start + max_chars);
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        // end > overlap holds because end - start == max_chars here.
        start = end - overlap;
    }

    Ok(chunks)
}
