use anyhow::{Context, Result};
use globset::Glob;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::DocsError;
use crate::format::FormatterKind;
use crate::query::SearchMode;
use crate::version::DocVersion;

pub const DEFAULT_CONFIG_PATH: &str = "./config/docsense.toml";

pub const PROXIMITY_RANGE: std::ops::RangeInclusive<i64> = 1..=50;
pub const LIMIT_RANGE: std::ops::RangeInclusive<i64> = 1..=10;
const MAX_FETCH_RETRIES: u32 = 10;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub docs: DocsConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
        }
    }
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("./storage/docsense")
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct DbConfig {
    /// Falls back to `<storage.root>/docsense.sqlite`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct DocsConfig {
    #[serde(default = "default_versions")]
    pub versions: Vec<String>,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            versions: default_versions(),
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
        }
    }
}

fn default_versions() -> Vec<String> {
    vec![DocVersion::V12.as_str().to_string()]
}
fn default_include_globs() -> Vec<String> {
    vec!["**/*.md".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    #[serde(default = "default_preference")]
    pub preference: String,
    #[serde(default = "default_proximity")]
    pub proximity: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            preference: default_preference(),
            proximity: default_proximity(),
            limit: default_limit(),
        }
    }
}

fn default_preference() -> String {
    "ordered".to_string()
}
fn default_proximity() -> i64 {
    10
}
fn default_limit() -> i64 {
    5
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_formatter")]
    pub formatter: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            formatter: default_formatter(),
        }
    }
}

fn default_formatter() -> String {
    "basic".to_string()
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    120
}
fn default_max_retries() -> u32 {
    3
}

/// Values given on the command line, layered over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub versions: Vec<String>,
    pub preference: Option<String>,
    pub proximity: Option<i64>,
    pub limit: Option<i64>,
    pub formatter: Option<String>,
}

impl Config {
    /// Apply `overrides` and re-validate. An unknown `--doc-version` fails with
    /// [`DocsError::InvalidVersion`]; anything else out of range fails the same
    /// way the file would.
    pub fn apply_overrides(&mut self, overrides: &Overrides) -> Result<(), DocsError> {
        if !overrides.versions.is_empty() {
            let mut versions = Vec::with_capacity(overrides.versions.len());
            for raw in &overrides.versions {
                versions.push(DocVersion::resolve(raw)?.as_str().to_string());
            }
            self.docs.versions = versions;
        }
        if let Some(preference) = &overrides.preference {
            self.search.preference = preference.clone();
        }
        if let Some(proximity) = overrides.proximity {
            self.search.proximity = proximity;
        }
        if let Some(limit) = overrides.limit {
            self.search.limit = limit;
        }
        if let Some(formatter) = &overrides.formatter {
            self.output.formatter = formatter.clone();
        }
        self.validate()
    }

    pub fn db_path(&self) -> PathBuf {
        self.db
            .path
            .clone()
            .unwrap_or_else(|| self.storage.root.join("docsense.sqlite"))
    }

    /// Configured versions in order. Only meaningful after [`Config::validate`].
    pub fn versions(&self) -> Vec<DocVersion> {
        self.docs
            .versions
            .iter()
            .filter_map(|raw| DocVersion::resolve(raw).ok())
            .collect()
    }

    pub fn search_mode(&self) -> SearchMode {
        SearchMode::parse(&self.search.preference).unwrap_or(SearchMode::Ordered)
    }

    pub fn formatter_kind(&self) -> FormatterKind {
        FormatterKind::parse(&self.output.formatter).unwrap_or(FormatterKind::Plain)
    }

    /// Check every value and report all problems at once.
    pub fn validate(&self) -> Result<(), DocsError> {
        let mut problems = Vec::new();

        if self.docs.versions.is_empty() {
            problems.push("docs.versions must list at least one version".to_string());
        }
        for raw in &self.docs.versions {
            if DocVersion::resolve(raw).is_err() {
                problems.push(format!(
                    "docs.versions: unknown version '{}' (expected one of: {})",
                    raw,
                    DocVersion::valid_list()
                ));
            }
        }

        if self.docs.include_globs.is_empty() {
            problems.push("docs.include_globs must not be empty".to_string());
        }
        for pattern in self
            .docs
            .include_globs
            .iter()
            .chain(self.docs.exclude_globs.iter())
        {
            if let Err(e) = Glob::new(pattern) {
                problems.push(format!("docs: invalid glob '{}': {}", pattern, e));
            }
        }

        if SearchMode::parse(&self.search.preference).is_none() {
            problems.push(format!(
                "search.preference: unknown mode '{}' (expected ordered or unordered)",
                self.search.preference
            ));
        }
        if !PROXIMITY_RANGE.contains(&self.search.proximity) {
            problems.push(format!(
                "search.proximity must be between {} and {}, got {}",
                PROXIMITY_RANGE.start(),
                PROXIMITY_RANGE.end(),
                self.search.proximity
            ));
        }
        if !LIMIT_RANGE.contains(&self.search.limit) {
            problems.push(format!(
                "search.limit must be between {} and {}, got {}",
                LIMIT_RANGE.start(),
                LIMIT_RANGE.end(),
                self.search.limit
            ));
        }

        if FormatterKind::parse(&self.output.formatter).is_none() {
            problems.push(format!(
                "output.formatter: unknown formatter '{}' (expected plain, basic, or glow)",
                self.output.formatter
            ));
        }

        if self.fetch.timeout_secs == 0 {
            problems.push("fetch.timeout_secs must be > 0".to_string());
        }
        if self.fetch.max_retries > MAX_FETCH_RETRIES {
            problems.push(format!(
                "fetch.max_retries must be at most {}, got {}",
                MAX_FETCH_RETRIES, self.fetch.max_retries
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DocsError::ConfigurationInvalid { problems })
        }
    }
}

/// Parse and validate a TOML config file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = parse_config(&content)?;
    Ok(config)
}

/// Parse and validate TOML text. Type errors and range errors both surface as
/// [`DocsError::ConfigurationInvalid`].
pub fn parse_config(content: &str) -> Result<Config, DocsError> {
    let config: Config = toml::from_str(content).map_err(|e| DocsError::ConfigurationInvalid {
        problems: vec![e.to_string().trim().to_string()],
    })?;
    config.validate()?;
    Ok(config)
}

/// Resolve the config to use: an explicit path must exist; the default path is
/// optional and built-in defaults apply when it is absent.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => load_config(path),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                load_config(default_path)
            } else {
                tracing::debug!("no config file at {}, using defaults", DEFAULT_CONFIG_PATH);
                Ok(Config::default())
            }
        }
    }
}
