//! Download → extract → seed → search against a local HTTP server.

use std::io::Write;

use docsense::config::{DocsConfig, FetchConfig};
use docsense::error::DocsError;
use docsense::fetch::{build_client, download_version};
use docsense::progress::NoProgress;
use docsense::query::{QueryEngine, SearchMode};
use docsense::storage::StorageLayout;
use docsense::version::DocVersion;
use docsense::{db, migrate, seed};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;

const ARTISAN: &str = "# Artisan Console\n\n## Introduction\nArtisan is the command line interface included with Laravel.\n\n## Writing Commands\nIn addition to the commands provided with Artisan, you may build your own custom commands.\n";

fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, body) in files {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn client() -> reqwest::Client {
    build_client(&FetchConfig {
        timeout_secs: 5,
        max_retries: 0,
    })
    .unwrap()
}

async fn serve(status: u16, body: Vec<u8>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/12.x.zip"))
        .respond_with(ResponseTemplate::new(status).set_body_bytes(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn http_500_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let layout = StorageLayout::new(tmp.path().join("storage"));
    let server = serve(500, Vec::new()).await;

    let err = download_version(
        &layout,
        &client(),
        DocVersion::V12,
        &format!("{}/12.x.zip", server.uri()),
        0,
    )
    .await
    .unwrap_err();

    match err.downcast_ref::<DocsError>() {
        Some(DocsError::HttpFailure { status, .. }) => assert_eq!(*status, 500),
        other => panic!("expected HttpFailure, got {:?}", other),
    }
    assert!(!layout.docs_dir(DocVersion::V12).exists());
    assert!(!layout.archive_path(DocVersion::V12).exists());
}

#[tokio::test]
async fn garbage_body_keeps_archive_and_creates_no_docs_dir() {
    let tmp = TempDir::new().unwrap();
    let layout = StorageLayout::new(tmp.path().join("storage"));
    let server = serve(200, b"<html>not a zip</html>".to_vec()).await;

    let err = download_version(
        &layout,
        &client(),
        DocVersion::V12,
        &format!("{}/12.x.zip", server.uri()),
        0,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DocsError>(),
        Some(DocsError::ExtractionFailure { .. })
    ));
    assert!(layout.archive_path(DocVersion::V12).exists());
    assert!(!layout.docs_dir(DocVersion::V12).exists());
}

#[tokio::test]
async fn valid_archive_seeds_and_searches() {
    let tmp = TempDir::new().unwrap();
    let layout = StorageLayout::new(tmp.path().join("storage"));
    let archive = zip_bytes(&[
        ("docs-12.x/artisan.md", ARTISAN),
        ("docs-12.x/license.md", "The MIT License."),
    ]);
    let server = serve(200, archive).await;

    let docs_dir = download_version(
        &layout,
        &client(),
        DocVersion::V12,
        &format!("{}/12.x.zip", server.uri()),
        0,
    )
    .await
    .unwrap();
    assert_eq!(docs_dir, layout.docs_dir(DocVersion::V12));
    assert!(docs_dir.join("artisan.md").is_file());

    let pool = db::connect_path(&tmp.path().join("index.sqlite"))
        .await
        .unwrap();
    migrate::ensure_schema(&pool).await.unwrap();

    let summary = seed::seed_version(
        &pool,
        &layout,
        &DocsConfig::default(),
        DocVersion::V12,
        &NoProgress,
    )
    .await
    .unwrap();
    assert_eq!(summary.files, 2);
    assert_eq!(summary.rows, 4);

    let engine = QueryEngine::new(pool.clone(), SearchMode::Ordered, 10);
    let hits = engine.search("artisan", DocVersion::V12).await.unwrap();
    let mut links: Vec<&str> = hits.iter().map(|h| h.link.as_str()).collect();
    links.sort();
    assert_eq!(
        links,
        vec![
            "https://laravel.com/docs/12.x/artisan#introduction",
            "https://laravel.com/docs/12.x/artisan#writing-commands",
        ]
    );
    assert!(hits.iter().all(|h| h.title == "Artisan Console"));

    assert!(engine.search("ar", DocVersion::V12).await.unwrap().is_empty());

    pool.close().await;
}
