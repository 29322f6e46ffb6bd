//! Error types for the download module.
//!
//! Every error here is scoped to a single unit of work (one page fetch or
//! one task); the worker loop and the crawler log them and carry on.

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::DecodeError;

/// Errors that can occur while resolving and transferring one resource.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The resource URL does not match the expected name/id/extension shape.
    #[error("resource URL does not match the audio link shape: {url}")]
    Pattern {
        /// The URL that failed to parse.
        url: String,
    },

    /// An encoded name or path segment failed to decode.
    #[error("failed to decode encoded path in {url}: {source}")]
    Decode {
        /// The resource URL the segment came from.
        url: String,
        /// The underlying codec error.
        #[source]
        source: DecodeError,
    },

    /// Network-level error (DNS resolution, connection refused, TLS, read).
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Filesystem error while creating directories or writing the file.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Creates a pattern-mismatch error.
    pub fn pattern(url: impl Into<String>) -> Self {
        Self::Pattern { url: url.into() }
    }

    /// Creates a decode error with the URL it arose from.
    pub fn decode(url: impl Into<String>, source: DecodeError) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// Note on From trait implementations:
// We intentionally do NOT implement `From<reqwest::Error>` or
// `From<std::io::Error>` because the variants require context (url, path)
// that the source errors don't carry. The helper constructors are the
// pattern here.
