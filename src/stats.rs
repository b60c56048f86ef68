//! Index statistics.
//!
//! `docsense stats` prints how many sections and files are indexed per
//! version and how large the database file is.

use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::migrate;
use crate::store;

/// Run the stats command: query the database and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let db_path = config.db_path();
    let pool = db::connect(config).await?;
    migrate::ensure_schema(&pool).await?;

    let counts = store::version_counts(&pool).await?;
    let total_rows: i64 = counts.iter().map(|(_, rows, _)| rows).sum();

    let db_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    println!("docsense index stats");
    println!("====================");
    println!();
    println!("  Database:    {}", db_path.display());
    println!("  Size:        {}", format_bytes(db_size));
    println!("  Sections:    {}", total_rows);

    if !counts.is_empty() {
        println!();
        println!("  By version:");
        println!("  {:<10} {:>10} {:>8}", "VERSION", "SECTIONS", "FILES");
        println!("  {}", "-".repeat(30));
        for (version, rows, files) in &counts {
            println!("  {:<10} {:>10} {:>8}", version, rows, files);
        }
    }

    println!();

    pool.close().await;
    Ok(())
}

/// Format a byte count as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_scale() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GB");
    }
}
