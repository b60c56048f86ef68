//! # docsense
//!
//! Local full-text search over the Laravel documentation.
//!
//! docsense downloads a documentation branch archive, splits every markdown
//! page into heading-delimited sections, and indexes those sections in a
//! SQLite FTS5 table so they can be searched from the terminal.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌───────────┐   ┌──────────┐
//! │  fetch   │──▶│ archive  │──▶│  section  │──▶│  store   │
//! │ (HTTP)   │   │  (zip)   │   │ + seed    │   │ (FTS5)   │
//! └──────────┘   └──────────┘   └───────────┘   └────┬─────┘
//!                                                    │
//!                                              ┌─────▼─────┐
//!                                              │   query   │──▶ format
//!                                              └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! docsense install                 # download + seed the configured versions
//! docsense search --query "queue worker"
//! docsense ask --question "how do I schedule commands"
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`version`] | Supported documentation versions |
//! | [`fetch`] | Archive download with retry |
//! | [`archive`] | Zip extraction |
//! | [`section`] | Heading-boundary markdown sectioner and slugs |
//! | [`plaintext`] | Markdown to searchable text |
//! | [`seed`] | Section-and-index pipeline |
//! | [`store`] | Version-scoped FTS5 operations |
//! | [`query`] | Query engine, `search` and `ask` |
//! | [`format`] | Terminal markdown formatters |
//! | [`storage`] | Scratch layout and cleanup |
//! | [`config`] | TOML configuration and validation |
//! | [`error`] | Typed failures |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |

pub mod archive;
pub mod config;
pub mod db;
pub mod error;
pub mod fetch;
pub mod format;
pub mod logging;
pub mod migrate;
pub mod models;
pub mod plaintext;
pub mod progress;
pub mod query;
pub mod section;
pub mod seed;
pub mod stats;
pub mod storage;
pub mod store;
pub mod version;
pub mod versions;
