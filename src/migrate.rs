use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

/// Create the database file and the `docs` table. Safe to run repeatedly.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    ensure_schema(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Create the FTS5 `docs` table if it is missing. Existing rows are kept.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    // Look the virtual table up by name rather than recreating it
    let existing: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='docs'",
    )
    .fetch_one(pool)
    .await?;

    if existing == 0 {
        tracing::info!("creating docs table");
        sqlx::query(
            r#"
            CREATE VIRTUAL TABLE docs USING fts5(
                title,
                heading,
                markdown,
                content,
                path,
                version,
                link
            )
            "#,
        )
        .execute(pool)
        .await?;
    }

    Ok(())
}
