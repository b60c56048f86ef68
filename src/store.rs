//! Version-scoped operations on the `docs` FTS5 table.
//!
//! Re-indexing a version is replace-not-merge: [`replace_version`] deletes
//! every row for the version and inserts the new rows inside one transaction,
//! so readers see either the old set or the new set, never an empty version.

use anyhow::Result;
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::models::{DocEntry, SearchHit};
use crate::version::DocVersion;

/// Remove every row belonging to `version`. Returns the number of rows removed.
pub async fn delete_for_version(conn: &mut SqliteConnection, version: DocVersion) -> Result<u64> {
    let result = sqlx::query("DELETE FROM docs WHERE version = ?")
        .bind(version.as_str())
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

/// Append one row. There is no upsert; callers delete first.
pub async fn insert_entry(conn: &mut SqliteConnection, entry: &DocEntry) -> Result<()> {
    sqlx::query(
        "INSERT INTO docs (title, heading, markdown, content, path, version, link) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&entry.title)
    .bind(&entry.heading)
    .bind(&entry.markdown)
    .bind(&entry.content)
    .bind(&entry.path)
    .bind(entry.version.as_str())
    .bind(&entry.link)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Swap the rows for `version` with `entries` atomically.
pub async fn replace_version(
    pool: &SqlitePool,
    version: DocVersion,
    entries: &[DocEntry],
) -> Result<ReplaceStats> {
    let mut tx = pool.begin().await?;

    let deleted = delete_for_version(&mut *tx, version).await?;
    for entry in entries {
        debug_assert_eq!(entry.version, version);
        insert_entry(&mut *tx, entry).await?;
    }

    tx.commit().await?;

    Ok(ReplaceStats {
        deleted,
        inserted: entries.len() as u64,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceStats {
    pub deleted: u64,
    pub inserted: u64,
}

/// Ranked full-text match against `content` for one version.
///
/// Rows whose heading equals their title are whole-document top-level
/// headings and are left out. Best match first.
pub async fn search(
    pool: &SqlitePool,
    fts_query: &str,
    version: DocVersion,
    limit: i64,
) -> Result<Vec<SearchHit>> {
    let rows = sqlx::query(
        r#"
        SELECT rowid, title, heading, markdown, link, version
        FROM docs
        WHERE content MATCH ?
          AND heading != title
          AND version = ?
        ORDER BY rank
        LIMIT ?
        "#,
    )
    .bind(fts_query)
    .bind(version.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_hit).collect())
}

/// Fetch a single row by its FTS rowid.
pub async fn get_entry(pool: &SqlitePool, rowid: i64) -> Result<Option<SearchHit>> {
    let row = sqlx::query(
        "SELECT rowid, title, heading, markdown, link, version FROM docs WHERE rowid = ?",
    )
    .bind(rowid)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(row_to_hit))
}

pub async fn count_for_version(pool: &SqlitePool, version: DocVersion) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM docs WHERE version = ?")
        .bind(version.as_str())
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// `(version, rows, files)` for every version present in the table.
pub async fn version_counts(pool: &SqlitePool) -> Result<Vec<(String, i64, i64)>> {
    let rows = sqlx::query(
        r#"
        SELECT version, COUNT(*) AS row_count, COUNT(DISTINCT path) AS file_count
        FROM docs
        GROUP BY version
        ORDER BY version DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| (row.get("version"), row.get("row_count"), row.get("file_count")))
        .collect())
}

fn row_to_hit(row: &sqlx::sqlite::SqliteRow) -> SearchHit {
    SearchHit {
        rowid: row.get("rowid"),
        title: row.get("title"),
        heading: row.get("heading"),
        markdown: row.get("markdown"),
        link: row.get("link"),
        version: row.get("version"),
    }
}
