//! Staging of source PDFs into the managed storage volume.
//!
//! The demo ships its corpus in an assets directory; before ingestion the
//! files are copied into the volume directory the platform exposes as a
//! local mount. Uploading through the platform UI instead is fine, in which
//! case this step is simply skipped.

use std::path::Path;

use thiserror::Error;
use walkdir::WalkDir;

/// Errors raised while copying PDFs into the volume.
#[derive(Debug, Error)]
pub enum StagingError {
    /// Source directory could not be enumerated.
    #[error("failed to list source directory '{path}': {source}")]
    ListSource {
        /// Directory that failed to enumerate.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// Destination directory could not be created or a file copy failed.
    #[error("failed to copy '{path}': {source}")]
    Copy {
        /// File or directory the copy failed on.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
}

/// Copy every `*.pdf` directly under `source_dir` into `dest_dir`.
///
/// The destination is created if missing; existing files are overwritten so
/// the step is safe to re-run. Returns the number of files copied.
pub fn stage_pdfs(source_dir: &Path, dest_dir: &Path) -> Result<usize, StagingError> {
    std::fs::create_dir_all(dest_dir).map_err(|source| StagingError::Copy {
        path: dest_dir.display().to_string(),
        source,
    })?;

    let mut copied = 0usize;
    for entry in WalkDir::new(source_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|err| StagingError::ListSource {
            path: source_dir.display().to_string(),
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
        if !is_pdf {
            continue;
        }

        let file_name = entry.file_name().to_owned();
        let dest = dest_dir.join(&file_name);
        std::fs::copy(entry.path(), &dest).map_err(|source| StagingError::Copy {
            path: entry.path().display().to_string(),
            source,
        })?;
        tracing::debug!(file = %file_name.to_string_lossy(), dest = %dest.display(), "Staged PDF");
        copied += 1;
    }

    tracing::info!(
        source = %source_dir.display(),
        dest = %dest_dir.display(),
        copied,
        "Staging complete"
    );
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_only_pdfs_and_creates_destination() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("a.pdf"), b"pdf-a").unwrap();
        std::fs::write(src.path().join("b.PDF"), b"pdf-b").unwrap();
        std::fs::write(src.path().join("readme.md"), b"nope").unwrap();

        let dest_dir = dst.path().join("volume").join("pdfs");
        let copied = stage_pdfs(src.path(), &dest_dir).unwrap();

        assert_eq!(copied, 2);
        assert!(dest_dir.join("a.pdf").exists());
        assert!(dest_dir.join("b.PDF").exists());
        assert!(!dest_dir.join("readme.md").exists());
    }

    #[test]
    fn restaging_overwrites_existing_files() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("a.pdf"), b"v1").unwrap();
        stage_pdfs(src.path(), dst.path()).unwrap();

        std::fs::write(src.path().join("a.pdf"), b"v2").unwrap();
        let copied = stage_pdfs(src.path(), dst.path()).unwrap();

        assert_eq!(copied, 1);
        assert_eq!(std::fs::read(dst.path().join("a.pdf")).unwrap(), b"v2");
    }

    #[test]
    fn missing_source_is_an_error() {
        let dst = tempfile::tempdir().unwrap();
        let error = stage_pdfs(Path::new("/nonexistent/assets"), dst.path()).unwrap_err();
        assert!(matches!(error, StagingError::ListSource { .. }));
    }
}
