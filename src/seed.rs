//! Section-and-index pipeline.
//!
//! Walks an extracted docs folder, sections every markdown file, and replaces
//! the version's rows in the `docs` table in one transaction:
//!
//! ```text
//! docs-<version>/**/*.md ──▶ section_markdown ──▶ DocEntry ──▶ store::replace_version
//! ```
//!
//! Files are visited in sorted path order and rows are built in heading order
//! per file, so two seeds of the same tree insert identical rows.

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{Config, DocsConfig};
use crate::db;
use crate::error::DocsError;
use crate::migrate;
use crate::models::DocEntry;
use crate::plaintext::markdown_to_text;
use crate::progress::{SeedProgressEvent, SeedProgressReporter};
use crate::section::{section_markdown, slugify};
use crate::storage::StorageLayout;
use crate::store;
use crate::version::DocVersion;

/// Outcome of seeding one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub version: DocVersion,
    pub files: u64,
    pub rows: u64,
    pub replaced: u64,
}

/// Markdown files under `root` as `/`-separated relative paths, sorted.
pub fn discover_markdown(root: &Path, docs: &DocsConfig) -> Result<Vec<(PathBuf, String)>> {
    let include_set = build_globset(&docs.include_globs)?;

    let mut default_excludes = vec!["**/.git/**".to_string(), "**/.github/**".to_string()];
    default_excludes.extend(docs.exclude_globs.iter().cloned());
    let exclude_set = build_globset(&default_excludes)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }

        files.push((path.to_path_buf(), rel_str));
    }

    files.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(files)
}

/// `base_url` + path without `.md` + `#` + slug.
pub fn build_link(version: DocVersion, relative_path: &str, heading: &str) -> String {
    let page = relative_path.strip_suffix(".md").unwrap_or(relative_path);
    format!("{}{}#{}", version.base_url(), page, slugify(heading))
}

/// Rows for one markdown file, in heading order.
pub fn build_entries(version: DocVersion, relative_path: &str, raw: &str) -> Vec<DocEntry> {
    let doc = section_markdown(raw);

    doc.sections
        .into_iter()
        .map(|section| DocEntry {
            title: doc.title.clone(),
            link: build_link(version, relative_path, &section.heading),
            content: markdown_to_text(&section.content),
            heading: section.heading,
            markdown: section.content,
            path: relative_path.to_string(),
            version,
        })
        .collect()
}

/// Section every markdown file of an extracted version and swap its rows.
pub async fn seed_version(
    pool: &SqlitePool,
    layout: &StorageLayout,
    docs: &DocsConfig,
    version: DocVersion,
    reporter: &dyn SeedProgressReporter,
) -> Result<SeedSummary> {
    let docs_dir = layout.docs_dir(version);
    if !docs_dir.is_dir() {
        return Err(DocsError::MissingDocsDirectory { version }.into());
    }

    reporter.report(SeedProgressEvent::Discovering {
        version: version.to_string(),
    });
    let files = discover_markdown(&docs_dir, docs)?;
    tracing::info!(version = %version, files = files.len(), "sectioning markdown files");

    let total = files.len() as u64;
    let mut entries = Vec::new();
    for (i, (path, relative)) in files.iter().enumerate() {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let raw = String::from_utf8_lossy(&bytes);
        let file_entries = build_entries(version, relative, &raw);
        tracing::debug!(path = %relative, sections = file_entries.len(), "sectioned");
        entries.extend(file_entries);

        reporter.report(SeedProgressEvent::Indexing {
            version: version.to_string(),
            n: i as u64 + 1,
            total,
        });
    }

    let stats = store::replace_version(pool, version, &entries).await?;
    reporter.report(SeedProgressEvent::Stored {
        version: version.to_string(),
        rows: stats.inserted,
    });

    Ok(SeedSummary {
        version,
        files: total,
        rows: stats.inserted,
        replaced: stats.deleted,
    })
}

/// `docsense seed`: every configured version, in order.
pub async fn run_seed(config: &Config, reporter: &dyn SeedProgressReporter) -> Result<()> {
    let layout = StorageLayout::from_config(config);
    let versions = config.versions();

    // Fail before opening the database if any version was never downloaded.
    for version in &versions {
        if !layout.docs_dir(*version).is_dir() {
            return Err(DocsError::MissingDocsDirectory { version: *version }.into());
        }
    }

    let pool = db::connect(config).await?;
    migrate::ensure_schema(&pool).await?;

    for version in versions {
        let summary = seed_version(&pool, &layout, &config.docs, version, reporter).await?;
        println!("seed {}", summary.version);
        println!("  files: {}", summary.files);
        println!("  sections written: {}", summary.rows);
        println!("  sections replaced: {}", summary.replaced);
    }
    println!("ok");

    pool.close().await;
    Ok(())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
