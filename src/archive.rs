//! Zip extraction.

use std::fs::File;
use std::path::Path;

use crate::error::DocsError;

/// Expand the zip at `archive_path` under `destination`, keeping the folder
/// structure stored in the archive.
///
/// The archive is opened and its central directory read before anything is
/// created, so a corrupt or truncated file fails without touching
/// `destination`. Nothing is cleaned up on failure; the archive stays where it
/// is.
pub fn extract(archive_path: &Path, destination: &Path) -> Result<usize, DocsError> {
    let failure = |reason: String| DocsError::ExtractionFailure {
        path: archive_path.to_path_buf(),
        reason,
    };

    let file = File::open(archive_path).map_err(|e| failure(e.to_string()))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| failure(e.to_string()))?;
    tracing::debug!(
        archive = %archive_path.display(),
        entries = archive.len(),
        "opened archive"
    );

    std::fs::create_dir_all(destination).map_err(|e| failure(e.to_string()))?;
    archive
        .extract(destination)
        .map_err(|e| failure(e.to_string()))?;

    tracing::info!(
        archive = %archive_path.display(),
        destination = %destination.display(),
        entries = archive.len(),
        "extracted archive"
    );
    Ok(archive.len())
}
