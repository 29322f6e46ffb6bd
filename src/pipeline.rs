//! Wiring of the crawler and the worker pool into one run-to-completion
//! batch job.
//!
//! # Shutdown Protocol
//!
//! The coordinator starts N workers, runs the crawl to completion while
//! workers drain tasks concurrently, then pushes exactly N shutdown
//! sentinels and blocks on the queue's join barrier. The run is complete
//! only once every task - resource tasks and sentinels alike - has been
//! acknowledged.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::crawler::{CrawlStats, Crawler};
use crate::download::{DownloadStats, Downloader, HttpClient, QueueItem, WorkerPool};
use crate::queue::TaskQueue;

/// Reference worker count.
pub const DEFAULT_WORKERS: usize = 4;

/// Aggregate outcome of one run.
#[derive(Debug)]
pub struct RunStats {
    /// Worker pool outcomes.
    pub downloads: DownloadStats,
    /// Crawl outcomes.
    pub crawl: CrawlStats,
}

/// One-shot mirror pipeline.
#[derive(Debug)]
pub struct Pipeline {
    start_url: String,
    local_root: PathBuf,
    workers: usize,
}

impl Pipeline {
    /// Creates a pipeline for one starting URL and local mirror root.
    #[must_use]
    pub fn new(
        start_url: impl Into<String>,
        local_root: impl Into<PathBuf>,
        workers: usize,
    ) -> Self {
        Self {
            start_url: start_url.into(),
            local_root: local_root.into(),
            workers,
        }
    }

    /// Runs the crawl and all downloads to completion.
    ///
    /// Individual page or task failures are logged and counted, never
    /// fatal; this method itself cannot fail.
    #[instrument(skip(self), fields(start = %self.start_url, workers = self.workers))]
    pub async fn run(&self) -> RunStats {
        let queue = Arc::new(TaskQueue::new());
        let client = HttpClient::new();

        let pool = WorkerPool::spawn(
            self.workers,
            Arc::clone(&queue),
            Downloader::new(client.clone()),
        );

        let mut crawler = Crawler::new(client, &self.start_url, &self.local_root);
        let crawl = crawler.walk(&queue).await;

        debug!("crawl finished; signalling workers to stop");
        for _ in 0..self.workers {
            queue.push(QueueItem::Shutdown);
        }
        queue.join_all().await;
        let downloads = pool.shutdown().await;

        info!(
            completed = downloads.completed(),
            failed = downloads.failed(),
            pages_visited = crawl.pages_visited,
            pages_failed = crawl.pages_failed,
            "run complete"
        );
        RunStats { downloads, crawl }
    }
}
