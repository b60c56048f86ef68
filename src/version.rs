//! Supported documentation versions.
//!
//! The set is closed: every version maps to a zip archive on GitHub, the name
//! of the top-level folder inside that archive, and the public docs site
//! prefix used when building links. None of these lookups touch the network
//! or the filesystem.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::DocsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocVersion {
    #[serde(rename = "12.x")]
    V12,
    #[serde(rename = "11.x")]
    V11,
    #[serde(rename = "10.x")]
    V10,
    #[serde(rename = "master")]
    Master,
}

impl DocVersion {
    pub const ALL: [DocVersion; 4] = [
        DocVersion::V12,
        DocVersion::V11,
        DocVersion::V10,
        DocVersion::Master,
    ];

    /// Validate a raw identifier such as `"12.x"` against the known versions.
    pub fn resolve(raw: &str) -> Result<Self, DocsError> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == raw.trim())
            .ok_or_else(|| DocsError::InvalidVersion {
                raw: raw.to_string(),
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocVersion::V12 => "12.x",
            DocVersion::V11 => "11.x",
            DocVersion::V10 => "10.x",
            DocVersion::Master => "master",
        }
    }

    pub fn archive_url(&self) -> &'static str {
        match self {
            DocVersion::V12 => "https://github.com/laravel/docs/archive/refs/heads/12.x.zip",
            DocVersion::V11 => "https://github.com/laravel/docs/archive/refs/heads/11.x.zip",
            DocVersion::V10 => "https://github.com/laravel/docs/archive/refs/heads/10.x.zip",
            DocVersion::Master => "https://github.com/laravel/docs/archive/refs/heads/master.zip",
        }
    }

    /// Top-level folder GitHub puts inside the branch archive.
    pub fn extracted_folder_name(&self) -> &'static str {
        match self {
            DocVersion::V12 => "docs-12.x",
            DocVersion::V11 => "docs-11.x",
            DocVersion::V10 => "docs-10.x",
            DocVersion::Master => "docs-master",
        }
    }

    /// Public site prefix, always ending in `/`.
    pub fn base_url(&self) -> &'static str {
        match self {
            DocVersion::V12 => "https://laravel.com/docs/12.x/",
            DocVersion::V11 => "https://laravel.com/docs/11.x/",
            DocVersion::V10 => "https://laravel.com/docs/10.x/",
            DocVersion::Master => "https://laravel.com/docs/master/",
        }
    }

    /// Comma-separated identifiers, for error messages.
    pub fn valid_list() -> String {
        Self::ALL
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for DocVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocVersion {
    type Err = DocsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}
