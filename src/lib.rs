//! Chomik Mirror Core Library
//!
//! This library walks a remote directory-listing service breadth-first,
//! discovers audio resources named with the service's encoded-path scheme,
//! and mirrors them into a matching local directory tree.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`codec`] - encoded-path decoding into Unicode file names
//! - [`queue`] - task channel with per-item completion tracking
//! - [`crawler`] - breadth-first walk over directory pages
//! - [`download`] - asset resolution, HTTP transfers, and the worker pool
//! - [`pipeline`] - wiring of crawler and workers into one run

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod crawler;
pub mod download;
pub mod pipeline;
pub mod queue;

// Re-export commonly used types
pub use codec::{DecodeError, decode_path};
pub use crawler::{CrawlStats, Crawler};
pub use download::{
    DownloadError, DownloadStats, DownloadTask, Downloader, HttpClient, QueueItem, ResourceType,
    WorkerPool,
};
pub use pipeline::{DEFAULT_WORKERS, Pipeline, RunStats};
pub use queue::TaskQueue;
