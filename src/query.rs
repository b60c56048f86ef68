//! Query engine and the `search` / `ask` commands.
//!
//! [`build_query`] turns user input into an FTS5 expression for the
//! configured [`SearchMode`]; [`QueryEngine::search`] runs it against the
//! `docs` table for one version. Inputs shorter than [`MIN_QUERY_CHARS`]
//! return nothing and never reach the database.

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Select};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;
use crate::format::OutputFormatter;
use crate::migrate;
use crate::models::SearchHit;
use crate::store;
use crate::version::DocVersion;

pub const MIN_QUERY_CHARS: usize = 3;
pub const MAX_LIMIT: i64 = 10;
pub const DEFAULT_LIMIT: i64 = 5;

const NO_RESULTS: &str = "No results found for your query.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Input is handed to FTS5 as written.
    Ordered,
    /// Terms must appear within `proximity` tokens of each other.
    Proximity,
}

impl SearchMode {
    /// Config spelling: `ordered` or `unordered`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "ordered" => Some(SearchMode::Ordered),
            "unordered" => Some(SearchMode::Proximity),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Ordered => "ordered",
            SearchMode::Proximity => "unordered",
        }
    }
}

pub fn build_query(input: &str, mode: SearchMode, proximity: i64) -> String {
    match mode {
        SearchMode::Ordered => input.to_string(),
        SearchMode::Proximity => format!("NEAR({}, {})", input, proximity),
    }
}

/// Stateless search front end over one pool.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    pool: SqlitePool,
    mode: SearchMode,
    proximity: i64,
    limit: i64,
}

impl QueryEngine {
    pub fn new(pool: SqlitePool, mode: SearchMode, proximity: i64) -> Self {
        Self {
            pool,
            mode,
            proximity,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn from_config(pool: SqlitePool, config: &Config) -> Self {
        Self::new(pool, config.search_mode(), config.search.proximity)
            .with_limit(config.search.limit)
    }

    /// Clamped to `1..=MAX_LIMIT`.
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit.clamp(1, MAX_LIMIT);
        self
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Ranked hits for `input` in one version, best match first.
    ///
    /// Input shorter than [`MIN_QUERY_CHARS`] characters returns no hits
    /// without touching the index. Length is counted after trimming, so
    /// `"  ab  "` is too short even though it is six characters raw.
    pub async fn search(&self, input: &str, version: DocVersion) -> Result<Vec<SearchHit>> {
        if input.trim().chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let fts_query = build_query(input, self.mode, self.proximity);
        tracing::debug!(
            query = %fts_query,
            version = %version,
            mode = self.mode.as_str(),
            "running search"
        );

        store::search(&self.pool, &fts_query, version, self.limit)
            .await
            .with_context(|| format!("Search for '{}' failed", input))
    }

    /// Run [`QueryEngine::search`] per version and concatenate, in the order given.
    pub async fn search_versions(
        &self,
        input: &str,
        versions: &[DocVersion],
    ) -> Result<Vec<SearchHit>> {
        let mut hits = Vec::new();
        for version in versions {
            hits.extend(self.search(input, *version).await?);
        }
        Ok(hits)
    }

    pub async fn entry(&self, rowid: i64) -> Result<Option<SearchHit>> {
        store::get_entry(&self.pool, rowid).await
    }
}

/// `docsense search`: flag-driven with `--query`, interactive without.
pub async fn run_search(config: &Config, query: Option<&str>, json: bool) -> Result<()> {
    let pool = db::connect(config).await?;
    migrate::ensure_schema(&pool).await?;

    let engine = QueryEngine::from_config(pool.clone(), config);
    let formatter = config.formatter_kind().build();
    let versions = config.versions();

    match query {
        Some(query) => {
            let hits = engine.search_versions(query, &versions).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else if hits.is_empty() {
                println!("{}", NO_RESULTS);
            } else {
                for hit in &hits {
                    print_hit(hit, formatter.as_ref());
                }
            }
        }
        None => interactive_search(&engine, &versions, formatter.as_ref()).await?,
    }

    pool.close().await;
    Ok(())
}

async fn interactive_search(
    engine: &QueryEngine,
    versions: &[DocVersion],
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    loop {
        let term = Input::<String>::new()
            .with_prompt("Search the docs (leave empty to quit)")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read search term")?;

        if term.trim().is_empty() {
            return Ok(());
        }

        let hits = match engine.search_versions(&term, versions).await {
            Ok(hits) => hits,
            Err(e) => {
                eprintln!("{:#}", e);
                continue;
            }
        };

        if hits.is_empty() {
            println!("{}", NO_RESULTS);
            continue;
        }

        let labels: Vec<String> = hits.iter().map(SearchHit::label).collect();
        let selection = Select::new()
            .with_prompt("Pick a section")
            .items(&labels)
            .default(0)
            .interact_opt()
            .context("Failed to select a result")?;

        let Some(index) = selection else {
            continue;
        };

        // Re-read by rowid so the printed markdown is whatever is indexed now.
        match engine.entry(hits[index].rowid).await? {
            Some(hit) => print_hit(&hit, formatter),
            None => println!("{}", NO_RESULTS),
        }
    }
}

/// `docsense ask`: one question, every hit printed with its link.
pub async fn run_ask(config: &Config, question: Option<&str>) -> Result<()> {
    let question = match question {
        Some(q) => q.to_string(),
        None => Input::<String>::new()
            .with_prompt("What would you like to know?")
            .interact_text()
            .context("Failed to read question")?,
    };

    let pool = db::connect(config).await?;
    migrate::ensure_schema(&pool).await?;

    let engine = QueryEngine::from_config(pool.clone(), config);
    let formatter = config.formatter_kind().build();
    let hits = engine.search_versions(&question, &config.versions()).await?;

    if hits.is_empty() {
        println!("{}", NO_RESULTS);
    } else {
        println!("🔍 Found relevant information:");
        println!();
        for hit in &hits {
            println!("{}", style(format!("{} - {}", hit.title, hit.heading)).bold());
            println!("{}", formatter.format(&hit.markdown).trim_end());
            println!();
            println!("Learn more: {}", hit.link);
            println!();
        }
    }

    pool.close().await;
    Ok(())
}

fn print_hit(hit: &SearchHit, formatter: &dyn OutputFormatter) {
    println!("{}", style(hit.label()).bold().green());
    println!();
    println!("{}", formatter.format(&hit.markdown).trim_end());
    println!();
    println!("Learn more: {}", hit.link);
    println!();
}
