//! On-disk layout under `storage.root`.
//!
//! ```text
//! <root>/
//!   zips/laravel-docs-<version>.zip   downloaded archives
//!   docs-<version>/                   extracted branch archive
//!   docsense.sqlite                   index (unless [db].path is set)
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::version::DocVersion;

#[derive(Debug, Clone)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.storage.root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn zips_dir(&self) -> PathBuf {
        self.root.join("zips")
    }

    pub fn archive_path(&self, version: DocVersion) -> PathBuf {
        self.zips_dir()
            .join(format!("laravel-docs-{}.zip", version.as_str()))
    }

    /// Archives extract into the root; the branch folder lands here.
    pub fn docs_dir(&self, version: DocVersion) -> PathBuf {
        self.root.join(version.extracted_folder_name())
    }

    /// Create the root and `zips/` if absent.
    pub fn ensure_scratch_dirs(&self) -> Result<()> {
        let zips = self.zips_dir();
        std::fs::create_dir_all(&zips)
            .with_context(|| format!("Failed to create storage directory: {}", zips.display()))
    }

    /// Delete `zips/` and every extracted docs folder. The database is kept.
    /// Returns the paths that were removed.
    pub fn clean(&self) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::new();

        let zips = self.zips_dir();
        if zips.exists() {
            std::fs::remove_dir_all(&zips)
                .with_context(|| format!("Failed to remove {}", zips.display()))?;
            removed.push(zips);
        }

        for version in DocVersion::ALL {
            let dir = self.docs_dir(version);
            if dir.exists() {
                std::fs::remove_dir_all(&dir)
                    .with_context(|| format!("Failed to remove {}", dir.display()))?;
                removed.push(dir);
            }
        }

        Ok(removed)
    }
}

/// `docsense clean`.
pub fn run_clean(config: &Config) -> Result<()> {
    let layout = StorageLayout::from_config(config);
    let removed = layout.clean()?;

    if removed.is_empty() {
        println!("Nothing to clean under {}", layout.root().display());
    } else {
        for path in &removed {
            tracing::info!(path = %path.display(), "removed");
            println!("  removed {}", path.display());
        }
        println!("Cleaned up {} path(s).", removed.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn paths_follow_version() {
        let layout = StorageLayout::new("/srv/docs");
        assert_eq!(
            layout.archive_path(DocVersion::V11),
            PathBuf::from("/srv/docs/zips/laravel-docs-11.x.zip")
        );
        assert_eq!(
            layout.docs_dir(DocVersion::Master),
            PathBuf::from("/srv/docs/docs-master")
        );
    }

    #[test]
    fn clean_removes_artifacts_and_keeps_database() {
        let tmp = TempDir::new().unwrap();
        let layout = StorageLayout::new(tmp.path());
        layout.ensure_scratch_dirs().unwrap();
        std::fs::write(layout.archive_path(DocVersion::V12), b"zip").unwrap();
        std::fs::create_dir_all(layout.docs_dir(DocVersion::V12)).unwrap();
        std::fs::create_dir_all(layout.docs_dir(DocVersion::V10)).unwrap();
        std::fs::write(tmp.path().join("docsense.sqlite"), b"db").unwrap();

        let removed = layout.clean().unwrap();
        assert_eq!(removed.len(), 3);
        assert!(!layout.zips_dir().exists());
        assert!(!layout.docs_dir(DocVersion::V12).exists());
        assert!(!layout.docs_dir(DocVersion::V10).exists());
        assert!(tmp.path().join("docsense.sqlite").exists());

        assert!(layout.clean().unwrap().is_empty());
    }
}
