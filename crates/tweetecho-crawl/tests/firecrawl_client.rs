//! Integration tests for `FirecrawlClient::extract_content`.
//!
//! Uses `wiremock` to stand up a local crawl service for each test so no
//! real network traffic is made. Poll delays are shrunk to 1 ms so the
//! backoff loop runs instantly; the exact default delay sequence is covered
//! by unit tests on `PollConfig`.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tweetecho_crawl::{CrawlError, FirecrawlClient, PollConfig};

/// Poll policy for tests: instant delays, 4 attempts.
fn fast_poll() -> PollConfig {
    PollConfig {
        initial_delay_ms: 1,
        multiplier: 1.0,
        max_attempts: 4,
    }
}

fn test_client(server: &MockServer) -> FirecrawlClient {
    FirecrawlClient::new(
        "test-key",
        &format!("{}/v1/crawl", server.uri()),
        5,
        fast_poll(),
    )
    .expect("failed to build test FirecrawlClient")
}

fn submit_ok(job_id: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "id": job_id }))
}

fn status_completed(markdown: &str, title: &str, description: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "status": "completed",
        "data": [{
            "markdown": markdown,
            "metadata": { "title": title, "description": description }
        }]
    }))
}

fn status_scraping() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "status": "scraping",
        "data": []
    }))
}

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_url_fails_without_any_network_call() {
    let server = MockServer::start().await;

    // Any request hitting the server would violate this expectation.
    Mock::given(method("POST"))
        .respond_with(submit_ok("job-1"))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.extract_content("not a url").await;

    assert!(
        matches!(result, Err(CrawlError::InvalidUrl { .. })),
        "expected InvalidUrl, got: {result:?}"
    );
}

#[tokio::test]
async fn relative_url_is_rejected() {
    let server = MockServer::start().await;
    let client = test_client(&server);
    let result = client.extract_content("/relative/path").await;
    assert!(
        matches!(result, Err(CrawlError::InvalidUrl { .. })),
        "expected InvalidUrl, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Submission failures (not retried)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submission_http_error_fails_without_polling() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/crawl"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.extract_content("https://example.com").await;

    assert!(
        matches!(result, Err(CrawlError::SubmissionFailed { .. })),
        "expected SubmissionFailed, got: {result:?}"
    );
}

#[tokio::test]
async fn submission_response_without_job_id_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.extract_content("https://example.com").await;

    assert!(
        matches!(result, Err(CrawlError::SubmissionFailed { .. })),
        "expected SubmissionFailed, got: {result:?}"
    );
}

#[tokio::test]
async fn submission_response_with_success_false_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/crawl"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "id": "job-1" })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.extract_content("https://example.com").await;

    assert!(
        matches!(result, Err(CrawlError::SubmissionFailed { .. })),
        "expected SubmissionFailed, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Polling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn completes_on_first_status_check() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/crawl"))
        .respond_with(submit_ok("job-1"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/crawl/job-1"))
        .respond_with(status_completed("# Heading\n\nBody.", "A Title", "A description"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let page = client
        .extract_content("https://example.com/article")
        .await
        .expect("expected successful extraction");

    assert_eq!(page.title, "A Title");
    assert_eq!(page.description, "A description");
    assert_eq!(page.markdown, "# Heading\n\nBody.");
    assert_eq!(
        page.structured(),
        "Title: A Title\n\nDescription: A description\n\nContent: # Heading\n\nBody."
    );
}

#[tokio::test]
async fn stops_polling_on_first_completed_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/crawl"))
        .respond_with(submit_ok("job-2"))
        .mount(&server)
        .await;

    // Two in-progress responses, then completion. No fourth check happens.
    Mock::given(method("GET"))
        .and(path("/v1/crawl/job-2"))
        .respond_with(status_scraping())
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/crawl/job-2"))
        .respond_with(status_completed("body", "t", "d"))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let page = client
        .extract_content("https://example.com")
        .await
        .expect("expected success on third status check");
    assert_eq!(page.markdown, "body");
}

#[tokio::test]
async fn transient_status_failures_consume_attempts_but_do_not_abort() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/crawl"))
        .respond_with(submit_ok("job-3"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/crawl/job-3"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/crawl/job-3"))
        .respond_with(status_completed("recovered", "t", "d"))
        .with_priority(2)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let page = client
        .extract_content("https://example.com")
        .await
        .expect("expected success after transient status failures");
    assert_eq!(page.markdown, "recovered");
}

#[tokio::test]
async fn exhausting_all_attempts_times_out_with_no_extra_check() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/crawl"))
        .respond_with(submit_ok("job-4"))
        .mount(&server)
        .await;

    // Exactly max_attempts (4) status checks, never a fifth.
    Mock::given(method("GET"))
        .and(path("/v1/crawl/job-4"))
        .respond_with(status_scraping())
        .expect(4)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.extract_content("https://example.com").await;

    match result {
        Err(CrawlError::Timeout { job_id, attempts }) => {
            assert_eq!(job_id, "job-4");
            assert_eq!(attempts, 4);
        }
        other => panic!("expected Timeout, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Extraction defaults
// ---------------------------------------------------------------------------

#[tokio::test]
async fn completed_job_with_empty_data_yields_all_defaults() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/crawl"))
        .respond_with(submit_ok("job-5"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/crawl/job-5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "status": "completed",
            "data": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let page = client
        .extract_content("https://example.com")
        .await
        .expect("expected success with defaults");

    assert_eq!(
        page.structured(),
        "Title: No title\n\nDescription: No description\n\nContent: No content"
    );
}

#[tokio::test]
async fn completed_job_without_metadata_defaults_title_and_description() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/crawl"))
        .respond_with(submit_ok("job-6"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/crawl/job-6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "status": "completed",
            "data": [{ "markdown": "only body" }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let page = client
        .extract_content("https://example.com")
        .await
        .expect("expected success");
    assert_eq!(page.title, "No title");
    assert_eq!(page.description, "No description");
    assert_eq!(page.markdown, "only body");
}
