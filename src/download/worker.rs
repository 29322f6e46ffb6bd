//! Fixed pool of queue consumers.
//!
//! Each worker pops from the shared [`TaskQueue`], runs the downloader
//! inside its own failure boundary, and acknowledges the item regardless
//! of outcome. Workers never talk to each other; all coordination goes
//! through the queue.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use super::fetcher::Downloader;
use super::task::QueueItem;
use crate::queue::TaskQueue;

/// Statistics from the worker pool for one run.
///
/// Uses atomic counters for thread-safe updates from concurrent workers.
#[derive(Debug, Default)]
pub struct DownloadStats {
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl DownloadStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of successfully completed downloads.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Returns the number of failed downloads.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Returns the sum of completed and failed tasks.
    #[must_use]
    pub fn total(&self) -> usize {
        self.completed() + self.failed()
    }

    fn increment_completed(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

/// A fixed number of concurrent consumers bound to one shared queue.
///
/// Spawn with [`WorkerPool::spawn`]; after the producer has queued one
/// shutdown sentinel per worker, [`WorkerPool::shutdown`] waits for every
/// worker to exit and returns the pool's statistics.
#[derive(Debug)]
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    workers: usize,
    stats: Arc<DownloadStats>,
}

impl WorkerPool {
    /// Spawns `workers` consumers on the shared queue.
    #[must_use]
    pub fn spawn(
        workers: usize,
        queue: Arc<TaskQueue<QueueItem>>,
        downloader: Downloader,
    ) -> Self {
        let stats = Arc::new(DownloadStats::new());
        let handles = (0..workers)
            .map(|worker_id| {
                let queue = Arc::clone(&queue);
                let downloader = downloader.clone();
                let stats = Arc::clone(&stats);
                tokio::spawn(worker_loop(worker_id, queue, downloader, stats))
            })
            .collect();
        Self {
            handles,
            workers,
            stats,
        }
    }

    /// Returns the configured worker count.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Waits for every worker to exit and returns the run statistics.
    ///
    /// Call after one shutdown sentinel per worker has been queued.
    pub async fn shutdown(self) -> DownloadStats {
        for handle in self.handles {
            // Ignore JoinError - a panicked worker is logged, not fatal
            if let Err(error) = handle.await {
                warn!(error = %error, "worker task panicked");
            }
        }

        match Arc::try_unwrap(self.stats) {
            Ok(stats) => stats,
            Err(shared) => {
                // All workers have exited, so sole ownership is expected;
                // fall back to copying the atomic values.
                let stats = DownloadStats::new();
                stats.completed.store(shared.completed(), Ordering::SeqCst);
                stats.failed.store(shared.failed(), Ordering::SeqCst);
                stats
            }
        }
    }
}

/// One consumer loop: pop, download, acknowledge; stop on the sentinel.
///
/// Every failure while fetching is logged with the resource URL and
/// counted, never propagated. The acknowledgement happens regardless of
/// outcome so the join barrier stays exact.
#[instrument(level = "debug", skip(queue, downloader, stats))]
async fn worker_loop(
    worker_id: usize,
    queue: Arc<TaskQueue<QueueItem>>,
    downloader: Downloader,
    stats: Arc<DownloadStats>,
) {
    debug!("worker started");
    loop {
        match queue.pop().await {
            QueueItem::Shutdown => {
                queue.ack();
                debug!("worker stopping");
                return;
            }
            QueueItem::Task(task) => {
                match downloader.fetch(&task).await {
                    Ok(path) => {
                        debug!(path = %path.display(), "task complete");
                        stats.increment_completed();
                    }
                    Err(error) => {
                        warn!(
                            url = %task.resource_url,
                            error = %error,
                            "download failed"
                        );
                        stats.increment_failed();
                    }
                }
                queue.ack();
            }
        }
    }
}
