//! Integration tests for the crawler
//!
//! These tests use wiremock to stand up mock HTTP servers and exercise the
//! full crawl cycle end-to-end through the real HTTP downloader.

use fathom::config::UserAgentConfig;
use fathom::fetch::{CachingDownloader, Downloader, HttpDownloader};
use fathom::{CrawlError, Crawler, FathomError};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_downloader() -> Arc<dyn Downloader> {
    Arc::new(HttpDownloader::new(&UserAgentConfig::default()).unwrap())
}

fn crawler() -> Crawler {
    Crawler::new(http_downloader(), 4, 4, 4).unwrap()
}

fn html_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes(), "text/html")
}

async fn mount_page(server: &MockServer, route: &str, links: &[String]) {
    let body = links
        .iter()
        .map(|link| format!(r#"<a href="{}">link</a>"#, link))
        .collect::<Vec<_>>()
        .join("\n");

    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_response(&format!(
            "<html><body>{}</body></html>",
            body
        )))
        .mount(server)
        .await;
}

fn sorted(mut urls: Vec<String>) -> Vec<String> {
    urls.sort();
    urls
}

#[tokio::test]
async fn test_depth_one_fetches_only_the_seed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        &[format!("{}/page1", base), format!("{}/page2", base)],
    )
    .await;

    // discovered in the final layer, must never be requested
    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html_response("<html></html>"))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html_response("<html></html>"))
        .expect(0)
        .mount(&server)
        .await;

    let seed = format!("{}/", base);
    let result = crawler().download(&seed, 1, &[]).await.unwrap();

    assert_eq!(result.downloaded, vec![seed]);
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_two_layers_follow_links_but_not_further() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        &[format!("{}/page1", base), format!("{}/page2", base)],
    )
    .await;
    mount_page(&server, "/page1", &[format!("{}/deeper", base)]).await;
    mount_page(&server, "/page2", &[]).await;

    Mock::given(method("GET"))
        .and(path("/deeper"))
        .respond_with(html_response("<html></html>"))
        .expect(0)
        .mount(&server)
        .await;

    let seed = format!("{}/", base);
    let result = crawler().download(&seed, 2, &[]).await.unwrap();

    assert_eq!(
        sorted(result.downloaded),
        sorted(vec![
            seed,
            format!("{}/page1", base),
            format!("{}/page2", base),
        ])
    );
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_failed_seed_is_reported_in_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let seed = format!("{}/", server.uri());
    let result = crawler().download(&seed, 1, &[]).await.unwrap();

    assert!(result.downloaded.is_empty());
    assert!(matches!(
        result.errors.get(&seed),
        Some(CrawlError::Fetch(_))
    ));
}

#[tokio::test]
async fn test_failed_link_does_not_abort_the_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        &[format!("{}/ok", base), format!("{}/broken", base)],
    )
    .await;
    mount_page(&server, "/ok", &[]).await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let seed = format!("{}/", base);
    let result = crawler().download(&seed, 2, &[]).await.unwrap();

    assert_eq!(
        sorted(result.downloaded),
        sorted(vec![seed, format!("{}/ok", base)])
    );
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors.contains_key(&format!("{}/broken", base)));
}

#[tokio::test]
async fn test_malformed_seed_is_reported_without_a_request() {
    let result = crawler().download("not a url at all", 1, &[]).await.unwrap();

    assert!(result.downloaded.is_empty());
    assert!(matches!(
        result.errors.get("not a url at all"),
        Some(CrawlError::Malformed(_))
    ));
}

#[tokio::test]
async fn test_excluded_urls_are_never_requested() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        &[format!("{}/admin/panel", base), format!("{}/docs", base)],
    )
    .await;
    mount_page(&server, "/docs", &[]).await;

    Mock::given(method("GET"))
        .and(path("/admin/panel"))
        .respond_with(html_response("<html></html>"))
        .expect(0)
        .mount(&server)
        .await;

    let seed = format!("{}/", base);
    let excludes = vec!["admin".to_string()];
    let result = crawler().download(&seed, 2, &excludes).await.unwrap();

    let admin_url = format!("{}/admin/panel", base);
    assert!(!result.downloaded.contains(&admin_url));
    assert!(!result.errors.contains_key(&admin_url));
    assert_eq!(
        sorted(result.downloaded),
        sorted(vec![seed, format!("{}/docs", base)])
    );
}

#[tokio::test]
async fn test_shared_link_is_requested_exactly_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        &[format!("{}/a", base), format!("{}/b", base)],
    )
    .await;
    mount_page(&server, "/a", &[format!("{}/shared", base)]).await;
    mount_page(&server, "/b", &[format!("{}/shared", base)]).await;

    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(html_response("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let seed = format!("{}/", base);
    let result = crawler().download(&seed, 3, &[]).await.unwrap();

    assert_eq!(result.downloaded.len(), 4);
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_caching_downloader_avoids_repeat_requests() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(&format!(
            r#"<html><body><a href="{}/child">child</a></body></html>"#,
            base
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/child"))
        .respond_with(html_response("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let cache_dir = TempDir::new().unwrap();
    let http = HttpDownloader::new(&UserAgentConfig::default()).unwrap();
    let caching = CachingDownloader::new(http, cache_dir.path()).unwrap();
    let crawler = Crawler::new(Arc::new(caching), 4, 4, 4).unwrap();

    let seed = format!("{}/", base);

    // two separate crawls; the second one is served entirely from the cache
    let first = crawler.download(&seed, 2, &[]).await.unwrap();
    let second = crawler.download(&seed, 2, &[]).await.unwrap();

    assert_eq!(sorted(first.downloaded), sorted(second.downloaded));
    assert!(second.errors.is_empty());
}

#[tokio::test]
async fn test_close_rejects_further_downloads() {
    let crawler = crawler();

    crawler.close().await;
    crawler.close().await; // idempotent

    assert!(matches!(
        crawler.download("https://example.com/", 1, &[]).await,
        Err(FathomError::Closed)
    ));
}
