//! Breadth-first walk over remote directory pages.
//!
//! The crawler owns its frontier and bookkeeping sets exclusively; the
//! only structure it shares with the rest of the pipeline is the task
//! queue it produces into. Directories at depth k are visited before any
//! at depth k+1, and a page that fails to fetch is logged and skipped
//! without aborting the walk.

pub mod extract;

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::download::{DownloadTask, HttpClient, QueueItem, ResourceType};
use crate::queue::TaskQueue;

/// Counters for one completed walk.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages fetched and scanned.
    pub pages_visited: usize,
    /// Pages skipped after a fetch or parse failure.
    pub pages_failed: usize,
    /// Download tasks produced.
    pub tasks_enqueued: usize,
}

/// Single-threaded breadth-first crawler over directory pages.
#[derive(Debug)]
pub struct Crawler {
    client: HttpClient,
    start_url: String,
    local_root: PathBuf,
    frontier: VecDeque<String>,
    visited: HashSet<String>,
    downloaded: HashSet<String>,
}

impl Crawler {
    /// Creates a crawler seeded with the starting directory URL.
    #[must_use]
    pub fn new(
        client: HttpClient,
        start_url: impl Into<String>,
        local_root: impl Into<PathBuf>,
    ) -> Self {
        let start_url = start_url.into();
        let mut frontier = VecDeque::new();
        frontier.push_back(start_url.clone());
        Self {
            client,
            start_url,
            local_root: local_root.into(),
            frontier,
            visited: HashSet::new(),
            downloaded: HashSet::new(),
        }
    }

    /// Walks the directory graph to exhaustion, producing one task per
    /// newly discovered resource link.
    ///
    /// Each directory URL is fetched at most once and each resource URL
    /// yields at most one task, so cycles and cross-references terminate.
    #[instrument(skip(self, queue), fields(start = %self.start_url))]
    pub async fn walk(&mut self, queue: &TaskQueue<QueueItem>) -> CrawlStats {
        let mut stats = CrawlStats::default();

        while let Some(current) = self.frontier.pop_front() {
            if !self.visited.insert(current.clone()) {
                continue;
            }

            let Ok(page_url) = Url::parse(&current) else {
                warn!(url = %current, "skipping unparsable directory URL");
                stats.pages_failed += 1;
                continue;
            };

            let html = match self.client.fetch_page(&current).await {
                Ok(html) => html,
                Err(error) => {
                    warn!(url = %current, error = %error, "failed to fetch directory page");
                    stats.pages_failed += 1;
                    continue;
                }
            };
            stats.pages_visited += 1;
            debug!(url = %current, "scanning directory page");

            let links = extract::page_links(&html);
            for href in links.resources {
                let Some(absolute) = absolutize(&page_url, &href) else {
                    warn!(url = %current, href, "skipping unresolvable resource link");
                    continue;
                };
                if !self.downloaded.insert(absolute.clone()) {
                    continue;
                }
                debug!(url = %absolute, "discovered resource");
                queue.push(QueueItem::Task(DownloadTask {
                    resource_url: absolute,
                    local_root: self.local_root.clone(),
                    remote_root: self.start_url.clone(),
                    resource_type: ResourceType::Audio,
                }));
                stats.tasks_enqueued += 1;
            }

            for href in links.subdirectories {
                let Some(absolute) = absolutize(&page_url, &href) else {
                    warn!(url = %current, href, "skipping unresolvable directory link");
                    continue;
                };
                debug!(url = %absolute, "discovered sub-directory");
                self.frontier.push_back(absolute);
            }
        }

        info!(
            pages_visited = stats.pages_visited,
            pages_failed = stats.pages_failed,
            tasks = stats.tasks_enqueued,
            "walk complete"
        );
        stats
    }
}

/// Computes the absolute URL for an anchor href found on `page_url`.
///
/// Host-relative hrefs are concatenated onto the page origin rather than
/// joined through `Url`, so the encoded name survives byte-for-byte (URL
/// normalization could re-encode characters the path codec needs
/// literally).
fn absolutize(page_url: &Url, href: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    if href.starts_with('/') {
        let origin = page_url.origin().ascii_serialization();
        return Some(format!("{origin}{href}"));
    }
    page_url.join(href).ok().map(Into::into)
}
