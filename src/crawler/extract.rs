//! Link extraction from directory pages.
//!
//! Parsing is synchronous and self-contained: `scraper`'s DOM is not
//! `Send`, so the crawler hands the fetched HTML to this helper and gets
//! plain href strings back before the next await point. Each page is
//! parsed exactly once.

use scraper::{Html, Selector};

/// CSS selector for the per-page content container.
const CONTENT_CONTAINER: &str = "#folderContent";

/// CSS selector for the sub-directory listing inside the container.
const FOLDERS_LIST: &str = "#foldersList";

/// Trailing marker identifying a downloadable audio resource link.
pub const AUDIO_MARKER: &str = "(audio)";

#[allow(clippy::expect_used)]
fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Hrefs extracted from one directory page, in document order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageLinks {
    /// Audio resource anchors inside the content container.
    pub resources: Vec<String>,
    /// Sub-directory anchors inside the container's folders list.
    pub subdirectories: Vec<String>,
}

/// Extracts resource and sub-directory hrefs from one directory page.
#[must_use]
pub fn page_links(html: &str) -> PageLinks {
    let document = Html::parse_document(html);
    let container = selector(CONTENT_CONTAINER);
    let folders = selector(FOLDERS_LIST);
    let anchors = selector("a[href]");

    let mut links = PageLinks::default();
    for div in document.select(&container) {
        for anchor in div.select(&anchors) {
            if let Some(href) = anchor.value().attr("href") {
                if href.ends_with(AUDIO_MARKER) {
                    links.resources.push(href.to_string());
                }
            }
        }
        for list in div.select(&folders) {
            for anchor in list.select(&anchors) {
                if let Some(href) = anchor.value().attr("href") {
                    links.subdirectories.push(href.to_string());
                }
            }
        }
    }
    links
}
