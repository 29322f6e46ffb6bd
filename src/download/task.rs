//! Download task records produced by the crawler and consumed by workers.

use std::path::PathBuf;

/// Resolution strategy applied to a discovered resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    /// Audio asset resolved through the service's `Audio.ashx` endpoint.
    Audio,
}

/// One discovered resource to mirror locally.
///
/// Created by the crawler, consumed exactly once by a worker, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    /// Absolute URL of the discovered resource link.
    pub resource_url: String,
    /// Local mirror root directory.
    pub local_root: PathBuf,
    /// Root URL the crawl started from; the resource's path relative to it
    /// is mirrored under `local_root`.
    pub remote_root: String,
    /// Which resolution strategy the downloader applies.
    pub resource_type: ResourceType,
}

/// Item carried on the shared task queue.
#[derive(Debug, Clone)]
pub enum QueueItem {
    /// A resource to download.
    Task(DownloadTask),
    /// Tells the worker that pops it to stop after acknowledging.
    Shutdown,
}
