//! Typed failures for the download, extract, seed, and configuration paths.
//!
//! Command-level code works in `anyhow::Result` like the rest of the crate;
//! these variants ride inside `anyhow::Error` so callers that care (the fetch
//! retry loop, the tests) can recover them with `downcast_ref::<DocsError>()`.

use std::path::PathBuf;

use thiserror::Error;

use crate::version::DocVersion;

#[derive(Debug, Error)]
pub enum DocsError {
    /// The raw string does not name a supported documentation version.
    #[error("invalid documentation version '{raw}', expected one of: {}", DocVersion::valid_list())]
    InvalidVersion { raw: String },

    /// The archive host answered, but not with a 2xx.
    #[error("failed to download docs from {url}: HTTP {status}")]
    HttpFailure { url: String, status: u16 },

    /// DNS, connect, TLS, or timeout failure before a status was received.
    #[error("could not reach {url}: {source}")]
    ConnectionFailure {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The downloaded file could not be opened or expanded as a zip archive.
    /// The archive itself is left on disk.
    #[error("failed to unzip archive {}: {reason}", .path.display())]
    ExtractionFailure { path: PathBuf, reason: String },

    #[error("documentation for version \"{version}\" does not exist, run `docsense download --doc-version {version}` first")]
    MissingDocsDirectory { version: DocVersion },

    #[error("configuration is invalid:\n  - {}", .problems.join("\n  - "))]
    ConfigurationInvalid { problems: Vec<String> },
}

impl DocsError {
    /// Whether a fetch that failed this way is worth trying again.
    pub fn is_transient(&self) -> bool {
        match self {
            DocsError::ConnectionFailure { .. } => true,
            DocsError::HttpFailure { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
