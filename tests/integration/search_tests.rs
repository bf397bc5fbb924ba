//! Integration tests for the search run
//!
//! These tests use wiremock to stand in for the search endpoint and check
//! fetching, extraction and persistence end-to-end.

use serp_scout::config::{Config, HttpConfig, OutputConfig, SearchConfig};
use serp_scout::search::{build_http_client, fetch_results_page, run_search, TransportError};
use serp_scout::storage::{RunStatus, SqliteStorage, Storage};
use serp_scout::ScoutError;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULTS_PAGE: &str = r#"<!doctype html>
<html><head><title>site:https://jobs.lever.co - Search</title></head>
<body><div id="search"><div id="rso">
  <div class="g"><div class="yuRUbf">
    <a href="https://jobs.lever.co/acme/123"><h3>Support Specialist — Acme</h3></a>
  </div><div class="VwiC3b">Remote customer support role</div></div>
  <div class="g"><div class="yuRUbf">
    <a href="/url?q=https://jobs.lever.co/globex/456&amp;sa=U"><h3>Customer Support (Full-Time)</h3></a>
  </div><div class="IsZvec"><span class="aCOpRe">Globex is hiring</span></div></div>
  <div class="g"><a href="/search?q=related">People also ask</a></div>
</div></div></body></html>"#;

/// Creates a test configuration pointing at the mock server
fn create_test_config(server_uri: &str, db_path: &Path, timeout_secs: u64) -> Config {
    Config {
        search: SearchConfig {
            endpoint: format!("{}/search", server_uri),
            ..SearchConfig::default()
        },
        http: HttpConfig {
            user_agent: "SerpScoutTest/1.0".to_string(),
            accept_language: "de".to_string(),
            timeout_secs,
        },
        output: OutputConfig {
            database_path: db_path.to_string_lossy().into_owned(),
        },
    }
}

#[tokio::test]
async fn test_fetch_sends_query_and_headers_and_returns_body_unmodified() {
    let mock_server = MockServer::start().await;
    let body = "<html><body>  exact \n body  </body></html>";

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", serp_scout::config::DEFAULT_QUERY))
        .and(query_param("hl", "en"))
        .and(query_param("num", "10"))
        .and(query_param("start", "0"))
        .and(query_param("filter", "0"))
        .and(header("user-agent", "SerpScoutTest/1.0"))
        .and(header("accept-language", "de"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir.path().join("r.db"), 5);
    let client = build_http_client(&config.http).unwrap();

    let fetched = fetch_results_page(&client, &config.search).await.unwrap();

    assert_eq!(fetched, body);
}

#[tokio::test]
async fn test_fetch_404_and_500_are_transport_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&HttpConfig::default()).unwrap();

    for (route, expected) in [("/missing", 404), ("/broken", 500)] {
        let search = SearchConfig {
            endpoint: format!("{}{}", mock_server.uri(), route),
            ..SearchConfig::default()
        };
        let error = fetch_results_page(&client, &search).await.unwrap_err();
        assert!(
            matches!(error, TransportError::Status { status, .. } if status == expected),
            "unexpected error for {}: {:?}",
            route,
            error
        );
    }
}

#[tokio::test]
async fn test_fetch_timeout_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir.path().join("r.db"), 1);
    let client = build_http_client(&config.http).unwrap();

    let error = fetch_results_page(&client, &config.search)
        .await
        .unwrap_err();

    assert!(matches!(error, TransportError::Timeout { .. }));
}

#[tokio::test]
async fn test_full_run_persists_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(RESULTS_PAGE)
                .insert_header("content-type", "text/html; charset=UTF-8"),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("results.db");
    let config = create_test_config(&mock_server.uri(), &db_path, 5);

    let outcome = run_search(&config, "test-hash").await.unwrap();

    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.saved, 2);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.results[0].title, "Support Specialist — Acme");
    assert_eq!(outcome.results[0].snippet, "Remote customer support role");
    assert_eq!(outcome.results[1].link, "https://jobs.lever.co/globex/456");
    assert_eq!(outcome.results[1].snippet, "Globex is hiring");

    let storage = SqliteStorage::new(&db_path).unwrap();
    let stored = storage.get_results().unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].rank, 1);
    assert_eq!(stored[0].link, "https://jobs.lever.co/acme/123");
    assert_eq!(stored[1].rank, 2);
    assert_eq!(stored[1].query, config.search.query);

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.id, outcome.run_id);
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.result_count, 2);
    assert_eq!(run.config_hash, "test-hash");
}

#[tokio::test]
async fn test_run_with_no_cards_completes_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><p>Your search did not match any documents.</p></body></html>",
        ))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("results.db");
    let config = create_test_config(&mock_server.uri(), &db_path, 5);

    let outcome = run_search(&config, "test-hash").await.unwrap();

    assert!(outcome.results.is_empty());
    assert_eq!(outcome.strategy, None);

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_results().unwrap(), 0);
    assert_eq!(
        storage.get_latest_run().unwrap().unwrap().status,
        RunStatus::Completed
    );
}

#[tokio::test]
async fn test_failed_fetch_marks_run_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("results.db");
    let config = create_test_config(&mock_server.uri(), &db_path, 5);

    let error = run_search(&config, "test-hash").await.unwrap_err();

    match error {
        ScoutError::Transport(transport) => assert_eq!(transport.status(), Some(429)),
        other => panic!("expected transport error, got {:?}", other),
    }

    let storage = SqliteStorage::new(&db_path).unwrap();
    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Failed);
    assert!(run.error_message.unwrap().contains("429"));
    assert_eq!(storage.count_results().unwrap(), 0);
}

#[tokio::test]
async fn test_repeated_link_on_page_is_stored_once_at_best_rank() {
    let mock_server = MockServer::start().await;
    let page = r#"<html><body>
      <div class="g"><a href="https://jobs.lever.co/a/1"><h3>A</h3></a></div>
      <div class="g"><a href="https://jobs.lever.co/b/2"><h3>B</h3></a></div>
      <div class="g"><a href="/url?q=https://jobs.lever.co/a/1"><h3>A again</h3></a></div>
    </body></html>"#;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("results.db");
    let config = create_test_config(&mock_server.uri(), &db_path, 5);

    let outcome = run_search(&config, "test-hash").await.unwrap();

    assert_eq!(outcome.results.len(), 3);
    assert_eq!(outcome.saved, 2);

    let storage = SqliteStorage::new(&db_path).unwrap();
    let stored: Vec<(u32, String)> = storage
        .get_results()
        .unwrap()
        .into_iter()
        .map(|r| (r.rank, r.title))
        .collect();
    assert_eq!(stored, vec![(1, "A".to_string()), (2, "B".to_string())]);
    assert_eq!(storage.get_latest_run().unwrap().unwrap().result_count, 2);
}

#[tokio::test]
async fn test_invalid_config_is_rejected_before_run_is_recorded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("results.db");
    let mut config = create_test_config(&mock_server.uri(), &db_path, 5);
    config.search.num = 0;

    let error = run_search(&config, "test-hash").await.unwrap_err();

    assert!(matches!(error, ScoutError::Config(_)));
    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_runs().unwrap(), 0);
}
