//! HTTP client wrapper shared by the crawler and the workers.
//!
//! One `reqwest::Client` serves both directory-page fetches and asset
//! transfers, so connection pooling works across the whole run.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};

use super::error::DownloadError;

/// Default HTTP connect timeout (seconds).
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (seconds; audio assets can be large).
const READ_TIMEOUT_SECS: u64 = 300;

/// Browser-style User-Agent sent on every request.
///
/// The service rejects requests carrying default library identifiers, so
/// all traffic goes out with a browser-like header.
pub const USER_AGENT: &str = "Mozilla/5.0";

/// HTTP client for page fetches and streaming asset downloads.
///
/// Designed to be created once and cloned freely; clones share the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .read_timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Fetches a directory page and returns its HTML.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Network`] for transport failures and
    /// [`DownloadError::HttpStatus`] for non-2xx responses.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_page(&self, url: &str) -> Result<String, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| DownloadError::network(url, source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|source| DownloadError::network(url, source))
    }

    /// Streams the asset at `url` into `dest`, overwriting any existing
    /// file, and returns the number of bytes written.
    ///
    /// The body is read until the stream ends; a missing or zero
    /// Content-Length simply means the stream defines the size.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Network`] for transport failures,
    /// [`DownloadError::HttpStatus`] for non-2xx responses, and
    /// [`DownloadError::Io`] for file creation or write failures.
    #[instrument(level = "debug", skip(self), fields(dest = %dest.display()))]
    pub async fn download_to_file(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| DownloadError::network(url, source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        debug!(content_length = ?response.content_length(), "transfer started");

        let file = File::create(dest)
            .await
            .map_err(|source| DownloadError::io(dest, source))?;
        let mut writer = BufWriter::new(file);

        let mut bytes_written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| DownloadError::network(url, source))?;
            writer
                .write_all(&chunk)
                .await
                .map_err(|source| DownloadError::io(dest, source))?;
            bytes_written += chunk.len() as u64;
        }

        writer
            .flush()
            .await
            .map_err(|source| DownloadError::io(dest, source))?;

        Ok(bytes_written)
    }
}
