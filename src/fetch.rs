//! Archive download and the `download` command.
//!
//! [`fetch`] is a single GET that keeps "the server answered with a bad
//! status" ([`DocsError::HttpFailure`]) apart from "the server could not be
//! reached" ([`DocsError::ConnectionFailure`]). [`fetch_with_retry`] wraps it
//! with a bounded retry budget for the transient cases:
//!
//! - connection failures and HTTP 429 / 5xx are retried with exponential
//!   backoff (1s, 2s, 4s, ... capped at 32s)
//! - any other non-2xx status fails immediately
//!
//! Versions are downloaded one after another, never concurrently.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::archive;
use crate::config::{Config, FetchConfig};
use crate::error::DocsError;
use crate::storage::StorageLayout;
use crate::version::DocVersion;

pub fn build_client(config: &FetchConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(concat!("docsense/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// One GET of `url`, returning the body on 2xx.
pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, DocsError> {
    let connection_failure = |source| DocsError::ConnectionFailure {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(connection_failure)?;

    let status = response.status();
    if !status.is_success() {
        return Err(DocsError::HttpFailure {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(connection_failure)?;
    Ok(bytes.to_vec())
}

/// [`fetch`] with up to `max_retries` further attempts for transient failures.
/// The last error is returned as-is.
pub async fn fetch_with_retry(
    client: &reqwest::Client,
    url: &str,
    max_retries: u32,
) -> Result<Vec<u8>, DocsError> {
    let mut attempt = 0;
    loop {
        if attempt > 0 {
            let delay = Duration::from_secs(1 << (attempt - 1).min(5));
            tokio::time::sleep(delay).await;
        }

        match fetch(client, url).await {
            Ok(bytes) => return Ok(bytes),
            Err(e) if e.is_transient() && attempt < max_retries => {
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts = max_retries + 1,
                    "fetch failed, retrying: {}",
                    e
                );
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Fetch `url`, store it as the version's archive, and extract it into the
/// storage root. Returns the extracted docs directory.
///
/// Nothing is written if the fetch fails. If extraction fails the archive
/// file is left in `zips/`.
pub async fn download_version(
    layout: &StorageLayout,
    client: &reqwest::Client,
    version: DocVersion,
    url: &str,
    max_retries: u32,
) -> Result<PathBuf> {
    tracing::info!(version = %version, url, "downloading documentation archive");
    let bytes = fetch_with_retry(client, url, max_retries).await?;
    tracing::debug!(version = %version, bytes = bytes.len(), "archive downloaded");

    layout.ensure_scratch_dirs()?;
    let archive_path = layout.archive_path(version);
    std::fs::write(&archive_path, &bytes)
        .with_context(|| format!("Failed to write archive: {}", archive_path.display()))?;

    archive::extract(&archive_path, layout.root())?;

    let docs_dir = layout.docs_dir(version);
    if !docs_dir.is_dir() {
        tracing::warn!(
            expected = %docs_dir.display(),
            "archive did not contain the expected top-level folder"
        );
    }
    Ok(docs_dir)
}

/// `docsense download`: every configured version, in order.
pub async fn run_download(config: &Config) -> Result<()> {
    let layout = StorageLayout::from_config(config);
    let client = build_client(&config.fetch)?;

    for version in config.versions() {
        let docs_dir = download_version(
            &layout,
            &client,
            version,
            version.archive_url(),
            config.fetch.max_retries,
        )
        .await?;
        println!("download {}", version);
        println!("  archive: {}", layout.archive_path(version).display());
        println!("  docs:    {}", docs_dir.display());
    }
    println!("ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> reqwest::Client {
        build_client(&FetchConfig {
            timeout_secs: 5,
            max_retries: 0,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn returns_body_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/12.x.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK".to_vec()))
            .mount(&server)
            .await;

        let body = fetch(&client(), &format!("{}/12.x.zip", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, b"PK");
    }

    #[tokio::test]
    async fn non_success_status_is_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = fetch(&client(), &server.uri()).await.unwrap_err();
        assert!(matches!(err, DocsError::HttpFailure { status: 404, .. }));
    }

    #[tokio::test]
    async fn unreachable_host_is_connection_failure() {
        // Bind then drop a listener so the port is closed.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let err = fetch(&client(), &format!("http://127.0.0.1:{}/x.zip", port))
            .await
            .unwrap_err();
        assert!(matches!(err, DocsError::ConnectionFailure { .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let err = fetch_with_retry(&client(), &server.uri(), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, DocsError::HttpFailure { status: 403, .. }));
    }

    #[tokio::test]
    async fn server_errors_are_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
            .mount(&server)
            .await;

        let body = fetch_with_retry(&client(), &server.uri(), 1).await.unwrap();
        assert_eq!(body, b"ok");
    }
}
