//! # docsense CLI
//!
//! ## Usage
//!
//! ```bash
//! docsense [--config ./config/docsense.toml] [-v] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docsense init` | Create the SQLite database and `docs` table |
//! | `docsense versions` | List supported versions and their local status |
//! | `docsense download` | Download and extract documentation archives |
//! | `docsense seed` | Section and index extracted documentation |
//! | `docsense install` | `download` followed by `seed` |
//! | `docsense search` | Search sections (interactive without `--query`) |
//! | `docsense ask` | Answer one question with every matching section |
//! | `docsense stats` | Indexed sections per version |
//! | `docsense clean` | Remove downloaded archives and extracted folders |
//!
//! ## Examples
//!
//! ```bash
//! docsense install --doc-version 12.x --doc-version 11.x
//! docsense search --query "rate limiting" --limit 3
//! docsense search --query "queue worker" --preference unordered --json
//! docsense ask --question "artisan tinker" --formatter glow
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use docsense::config::{self, Overrides};
use docsense::progress::ProgressMode;
use docsense::{fetch, logging, migrate, query, seed, stats, storage, versions};

/// docsense: local full-text search over the Laravel documentation.
///
/// Settings are read from `--config`, or `./config/docsense.toml` when that
/// file exists, otherwise built-in defaults are used. See
/// `config/docsense.example.toml`.
#[derive(Parser)]
#[command(
    name = "docsense",
    about = "Download, index, and search the Laravel documentation from the terminal",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug). DOCSENSE_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Seed progress on stderr. Defaults to `human` on a terminal, else `off`.
    #[arg(long, global = true, value_parser = ["off", "human", "json"])]
    progress: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and `docs` table. Safe to run repeatedly.
    Init,

    /// List supported documentation versions.
    Versions,

    /// Download and extract documentation archives, one version at a time.
    Download(VersionArgs),

    /// Section and index downloaded documentation.
    ///
    /// Replaces every indexed section of each version in one transaction.
    Seed(VersionArgs),

    /// Download, then seed.
    Install(VersionArgs),

    /// Search indexed sections.
    ///
    /// With `--query`, prints the ranked results and exits. Without it,
    /// prompts for search terms until an empty line is entered.
    Search {
        /// Search terms (at least three characters).
        #[arg(long)]
        query: Option<String>,

        /// Print results as JSON.
        #[arg(long, requires = "query")]
        json: bool,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Ask a question and print every matching section with its link.
    Ask {
        /// The question. Prompted for when omitted.
        #[arg(long)]
        question: Option<String>,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Show indexed sections per version.
    Stats,

    /// Remove downloaded archives and extracted docs. The index is kept.
    Clean,
}

#[derive(Args, Default)]
struct VersionArgs {
    /// Documentation version (12.x, 11.x, 10.x, master). Repeatable.
    #[arg(long = "doc-version")]
    doc_version: Vec<String>,
}

#[derive(Args, Default)]
struct SearchArgs {
    #[command(flatten)]
    versions: VersionArgs,

    /// Maximum results per version (1-10).
    #[arg(long)]
    limit: Option<i64>,

    /// `ordered` or `unordered`.
    #[arg(long)]
    preference: Option<String>,

    /// Token distance for `unordered` searches (1-50).
    #[arg(long)]
    proximity: Option<i64>,

    /// `plain`, `basic`, or `glow`.
    #[arg(long)]
    formatter: Option<String>,
}

impl Commands {
    fn overrides(&self) -> Overrides {
        match self {
            Commands::Download(args) | Commands::Seed(args) | Commands::Install(args) => {
                Overrides {
                    versions: args.doc_version.clone(),
                    ..Overrides::default()
                }
            }
            Commands::Search { search, .. } | Commands::Ask { search, .. } => Overrides {
                versions: search.versions.doc_version.clone(),
                preference: search.preference.clone(),
                proximity: search.proximity,
                limit: search.limit,
                formatter: search.formatter.clone(),
            },
            Commands::Init | Commands::Versions | Commands::Stats | Commands::Clean => {
                Overrides::default()
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let mut cfg = config::resolve_config(cli.config.as_deref())?;
    cfg.apply_overrides(&cli.command.overrides())?;

    let progress = cli
        .progress
        .as_deref()
        .and_then(ProgressMode::parse)
        .unwrap_or_else(ProgressMode::default_for_tty);

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized at {}", cfg.db_path().display());
        }
        Commands::Versions => {
            versions::list_versions(&cfg).await?;
        }
        Commands::Download(_) => {
            fetch::run_download(&cfg).await?;
        }
        Commands::Seed(_) => {
            seed::run_seed(&cfg, progress.reporter().as_ref()).await?;
        }
        Commands::Install(_) => {
            fetch::run_download(&cfg).await?;
            seed::run_seed(&cfg, progress.reporter().as_ref()).await?;
        }
        Commands::Search {
            query: terms, json, ..
        } => {
            query::run_search(&cfg, terms.as_deref(), json).await?;
        }
        Commands::Ask { question, .. } => {
            query::run_ask(&cfg, question.as_deref()).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Clean => {
            storage::run_clean(&cfg)?;
        }
    }

    Ok(())
}
