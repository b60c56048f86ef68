//! Data types that flow through the seed and search pipeline.

use serde::Serialize;

use crate::version::DocVersion;

pub const UNTITLED: &str = "[Untitled]";
pub const INTRO: &str = "[Intro]";

/// One heading-delimited slice of a markdown file, heading line included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub content: String,
}

/// One row of the `docs` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocEntry {
    pub title: String,
    pub heading: String,
    pub markdown: String,
    /// Plain text rendering of `markdown`; this is the column searches match.
    pub content: String,
    /// Path relative to the extracted docs root, `/`-separated.
    pub path: String,
    pub version: DocVersion,
    pub link: String,
}

/// A ranked search result.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub rowid: i64,
    pub title: String,
    pub heading: String,
    pub markdown: String,
    pub link: String,
    pub version: String,
}

impl SearchHit {
    /// `"<title> - <heading> - <version>"`, the line shown above each result.
    pub fn label(&self) -> String {
        format!("{} - {} - {}", self.title, self.heading, self.version)
    }
}
