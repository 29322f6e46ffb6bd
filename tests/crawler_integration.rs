//! Integration tests for the crawler against mock directory pages.

use chomik_mirror::{Crawler, HttpClient, QueueItem, TaskQueue};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts an HTML directory page at `page_path`.
async fn mount_page(server: &MockServer, page_path: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(html.to_string()))
        .mount(server)
        .await;
}

/// Wraps `inner` in the page's content container.
fn page(inner: &str) -> String {
    format!(r#"<html><body><div id="folderContent">{inner}</div></body></html>"#)
}

#[tokio::test]
async fn test_walk_visits_cyclic_graph_once_and_terminates() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/a",
        &page(r#"<div id="foldersList"><a href="/b">b</a></div>"#),
    )
    .await;
    mount_page(
        &server,
        "/b",
        &page(r#"<div id="foldersList"><a href="/a">a</a></div>"#),
    )
    .await;

    let queue = TaskQueue::new();
    let mut crawler = Crawler::new(HttpClient::new(), format!("{}/a", server.uri()), ".");
    let stats = crawler.walk(&queue).await;

    assert_eq!(stats.pages_visited, 2, "each page fetched exactly once");
    assert_eq!(stats.pages_failed, 0);
    assert_eq!(stats.tasks_enqueued, 0);
}

#[tokio::test]
async fn test_duplicate_resource_yields_single_task() {
    let server = MockServer::start().await;
    let resource = r#"<a href="/a/Song+X,1.mp3(audio)">song</a>"#;
    mount_page(
        &server,
        "/a",
        &page(&format!(
            r#"{resource}<div id="foldersList"><a href="/b">b</a></div>"#
        )),
    )
    .await;
    // Second page references the same resource URL
    mount_page(&server, "/b", &page(resource)).await;

    let queue = TaskQueue::new();
    let mut crawler = Crawler::new(HttpClient::new(), format!("{}/a", server.uri()), ".");
    let stats = crawler.walk(&queue).await;

    assert_eq!(stats.pages_visited, 2);
    assert_eq!(stats.tasks_enqueued, 1, "resource deduplicated across pages");
    assert_eq!(queue.outstanding(), 1);

    let QueueItem::Task(task) = queue.pop().await else {
        panic!("expected a download task");
    };
    assert_eq!(
        task.resource_url,
        format!("{}/a/Song+X,1.mp3(audio)", server.uri())
    );
}

#[tokio::test]
async fn test_walk_discovers_resource_and_subdirectory() {
    // The starting page lists one sub-directory and one encoded resource;
    // the sub-directory must be fetched afterwards (breadth-first).
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/dir1",
        &page(
            r#"<a href="/dir1/Song+Name,12345.mp3(audio)">song</a>
               <div id="foldersList"><a href="/dir1/dir2">dir2</a></div>"#,
        ),
    )
    .await;
    mount_page(&server, "/dir1/dir2", &page("")).await;

    let queue = TaskQueue::new();
    let start = format!("{}/dir1", server.uri());
    let mut crawler = Crawler::new(HttpClient::new(), &start, "/mirror");
    let stats = crawler.walk(&queue).await;

    assert_eq!(stats.pages_visited, 2, "sub-directory page fetched");
    assert_eq!(stats.tasks_enqueued, 1);

    let QueueItem::Task(task) = queue.pop().await else {
        panic!("expected a download task");
    };
    assert_eq!(task.remote_root, start);

    // The decoded local name is the spec'd `Song Name.mp3`
    let target = chomik_mirror::download::AudioTarget::from_task(&task).unwrap();
    assert_eq!(
        target.dest_file,
        std::path::Path::new("/mirror/Song Name.mp3")
    );
}

#[tokio::test]
async fn test_failed_page_is_skipped_without_aborting_walk() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/a",
        &page(
            r#"<div id="foldersList">
                 <a href="/missing">missing</a>
                 <a href="/b">b</a>
               </div>"#,
        ),
    )
    .await;
    // `/missing` is not mounted and returns 404
    mount_page(
        &server,
        "/b",
        &page(r#"<a href="/b/Track,9.mp3(audio)">t</a>"#),
    )
    .await;

    let queue = TaskQueue::new();
    let mut crawler = Crawler::new(HttpClient::new(), format!("{}/a", server.uri()), ".");
    let stats = crawler.walk(&queue).await;

    assert_eq!(stats.pages_visited, 2, "walk continued past the failure");
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.tasks_enqueued, 1);
}
