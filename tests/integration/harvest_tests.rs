//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the blog's infinite-scroll
//! endpoint and run full harvests over HTTP.

use scroll_harvest::catalog::Article;
use scroll_harvest::config::Config;
use scroll_harvest::crawler::{harvest, Harvester, HttpTransport};
use scroll_harvest::output::load_catalog;
use scroll_harvest::state::{HarvestState, TerminationReason};
use scroll_harvest::HarvestError;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Match, Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.source.endpoint = format!("{}/?infinity=scrolling", server.uri());
    config.harvest.page_delay_ms = 0;
    config.harvest.backoff_base_ms = 5;
    config.harvest.backoff_max_ms = 20;
    config.harvest.max_retries = 5;
    config.output.catalog_path = dir
        .path()
        .join("build")
        .join("articles.json")
        .to_string_lossy()
        .to_string();
    config
}

/// Article `n` is dated one day older than article `n - 1`
fn article_date(n: usize) -> String {
    format!("2026-01-{:02}T10:00:00+00:00", 28 - n)
}

/// HTML fragment with one block per article number
fn articles_html(numbers: std::ops::Range<usize>) -> String {
    numbers
        .map(|n| {
            format!(
                r#"<article id="post-{n}" class="post type-post category-sql tag-jooq">
                    <header>
                        <h2 class="entry-title"><a href="https://blog.example.com/post-{n}/">Post {n}</a></h2>
                        <time class="entry-date published" datetime="{date}">Jan</time>
                    </header>
                    <div class="entry-content"><p>Summary of post {n}. Continue reading &rarr;</p></div>
                </article>"#,
                n = n,
                date = article_date(n)
            )
        })
        .collect()
}

fn scroll_body(html: &str, lastbatch: bool, currentday: &str) -> String {
    serde_json::json!({
        "type": "success",
        "html": html,
        "lastbatch": lastbatch,
        "currentday": currentday,
    })
    .to_string()
}

fn page_matcher(page: u32) -> impl Match {
    body_string_contains(format!("&page={}&", page))
}

#[tokio::test]
async fn test_full_harvest_three_pages() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/"))
        .and(query_param("infinity", "scrolling"))
        .and(page_matcher(1))
        .and(body_string_contains("action=infinite_scroll"))
        .and(body_string_contains("currentday=20.02.26"))
        .and(body_string_contains("last_post_date=2026-02-20+06%3A51%3A59"))
        .and(header("x-requested-with", "XMLHttpRequest"))
        .and(header(
            "content-type",
            "application/x-www-form-urlencoded; charset=UTF-8",
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(scroll_body(&articles_html(0..10), false, "19.01.26")),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Page 2 continues from the oldest article of page 1
    Mock::given(method("POST"))
        .and(page_matcher(2))
        .and(body_string_contains("currentday=19.01.26"))
        .and(body_string_contains("last_post_date=2026-01-19+10%3A00%3A00"))
        .and(body_string_contains("query_before=2026-02-20+06%3A51%3A59"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(scroll_body(&articles_html(10..20), false, "09.01.26")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(page_matcher(3))
        .and(body_string_contains("last_post_date=2026-01-09+10%3A00%3A00"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(scroll_body(&articles_html(20..25), true, "04.01.26")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, &dir);
    let catalog_path = config.output.catalog_path.clone();

    let report = harvest(config).await.expect("harvest failed");

    assert_eq!(report.reason, TerminationReason::LastBatch);
    assert_eq!(report.total_articles, 25);
    assert_eq!(report.persist_count, 3);
    assert_eq!(report.pages_processed, 3);

    let saved = load_catalog(std::path::Path::new(&catalog_path)).unwrap();
    assert_eq!(saved.len(), 25);
    assert!(saved.windows(2).all(|w| w[0].date >= w[1].date));

    let first = &saved[0];
    assert_eq!(first.url, "https://blog.example.com/post-0");
    assert_eq!(first.title, "Post 0");
    assert_eq!(first.description, "Summary of post 0.");
    assert_eq!(first.tags, vec!["sql", "jooq"]);
    assert!(!first.processed);
}

#[tokio::test]
async fn test_rate_limited_page_is_retried() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // Mounted first, so it answers the first two attempts
    Mock::given(method("POST"))
        .and(page_matcher(1))
        .respond_with(
            ResponseTemplate::new(429).set_body_string("<html><body>Too Many Requests</body></html>"),
        )
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(page_matcher(1))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(scroll_body(&articles_html(0..3), true, "25.01.26")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, &dir);
    let report = harvest(config).await.expect("harvest failed");

    assert_eq!(report.reason, TerminationReason::LastBatch);
    assert_eq!(report.total_articles, 3);
    assert_eq!(report.persist_count, 1);
}

#[tokio::test]
async fn test_persistent_block_exhausts_retries() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("<html>blocked</html>"))
        .expect(6)
        .mount(&server)
        .await;

    let config = create_test_config(&server, &dir);
    let result = harvest(config).await;

    assert!(matches!(
        result,
        Err(HarvestError::RetriesExhausted {
            page: 1,
            attempts: 6
        })
    ));
}

#[tokio::test]
async fn test_empty_page_stops_harvest() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(page_matcher(1))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(scroll_body(&articles_html(0..10), false, "19.01.26")),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(page_matcher(2))
        .respond_with(ResponseTemplate::new(200).set_body_string(scroll_body("", false, "19.01.26")))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, &dir);
    let mut harvester = Harvester::new(config.clone(), HttpTransport::from_config(&config.source).unwrap());

    let report = harvester.run().await.expect("harvest failed");

    assert_eq!(report.reason, TerminationReason::EmptyPage);
    assert_eq!(report.total_articles, 10);
    assert_eq!(report.persist_count, 1);
    assert_eq!(harvester.cursor().page_index, 2);
    assert!(!harvester.catalog().is_empty());
    assert_eq!(
        harvester.state(),
        &HarvestState::Terminated(TerminationReason::EmptyPage)
    );
}

#[tokio::test]
async fn test_page_limit_stops_harvest() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(page_matcher(1))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(scroll_body(&articles_html(0..10), false, "19.01.26")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server, &dir);
    config.harvest.max_pages = 1;
    let report = harvest(config).await.expect("harvest failed");

    assert_eq!(report.reason, TerminationReason::PageLimitReached);
    assert_eq!(report.total_articles, 10);
}

#[tokio::test]
async fn test_undated_last_article_stops_unexpectedly() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let html = format!(
        "{}{}",
        articles_html(0..2),
        r#"<article class="post"><h2 class="entry-title"><a href="https://blog.example.com/undated/">Undated</a></h2></article>"#
    );
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(scroll_body(&html, false, "19.01.26")))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, &dir);
    let catalog_path = config.output.catalog_path.clone();
    let report = harvest(config).await.expect("harvest failed");

    assert_eq!(report.reason, TerminationReason::CursorAdvanceFailed);
    assert!(!report.reason.is_expected());

    let saved: Vec<Article> = load_catalog(std::path::Path::new(&catalog_path)).unwrap();
    assert_eq!(saved.len(), 3);
    assert_eq!(saved.last().unwrap().date, "");
}

#[tokio::test]
async fn test_rerun_overwrites_previous_catalog() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(scroll_body(&articles_html(0..4), true, "24.01.26")),
        )
        .expect(2)
        .mount(&server)
        .await;

    let config = create_test_config(&server, &dir);
    let catalog_path = config.output.catalog_path.clone();

    harvest(config.clone()).await.expect("first harvest failed");
    let report = harvest(config).await.expect("second harvest failed");

    assert_eq!(report.total_articles, 4);
    let saved = load_catalog(std::path::Path::new(&catalog_path)).unwrap();
    assert_eq!(saved.len(), 4);
}

#[tokio::test]
async fn test_connection_failure_is_fatal() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    let mut config = create_test_config(&server, &dir);

    // Reserve a free port, then release it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    config.source.endpoint = format!("http://127.0.0.1:{}/?infinity=scrolling", port);

    let result = harvest(config).await;

    assert!(matches!(result, Err(HarvestError::Http { .. })));
}
