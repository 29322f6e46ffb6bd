//! Resource retrieval: task records, HTTP transport, the per-task
//! downloader, and the worker pool that drains the shared queue.
//!
//! # Overview
//!
//! The crawler pushes [`QueueItem::Task`] records onto a
//! [`TaskQueue`](crate::queue::TaskQueue); each worker in the
//! [`WorkerPool`] pops one, lets the [`Downloader`] resolve and transfer
//! it, and acknowledges it whether or not it succeeded. Failures are
//! logged per task and never abort the run.

mod client;
mod error;
mod fetcher;
mod task;
mod worker;

pub use client::{HttpClient, USER_AGENT};
pub use error::DownloadError;
pub use fetcher::{AudioTarget, Downloader};
pub use task::{DownloadTask, QueueItem, ResourceType};
pub use worker::{DownloadStats, WorkerPool};
