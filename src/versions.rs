use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::migrate;
use crate::storage::StorageLayout;
use crate::store;
use crate::version::DocVersion;

/// Print every supported version with whether it is configured, downloaded,
/// and how many sections are indexed.
pub async fn list_versions(config: &Config) -> Result<()> {
    let layout = StorageLayout::from_config(config);
    let configured = config.versions();

    let pool = db::connect(config).await?;
    migrate::ensure_schema(&pool).await?;

    println!(
        "{:<10} {:<12} {:<12} INDEXED",
        "VERSION", "CONFIGURED", "DOWNLOADED"
    );
    for version in DocVersion::ALL {
        let downloaded = layout.docs_dir(version).is_dir();
        let indexed = store::count_for_version(&pool, version).await?;
        println!(
            "{:<10} {:<12} {:<12} {}",
            version.as_str(),
            yes_no(configured.contains(&version)),
            yes_no(downloaded),
            indexed
        );
    }

    pool.close().await;
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
