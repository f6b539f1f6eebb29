//! Integration tests for the Twitter OAuth and publishing client, using
//! `wiremock` for the Twitter API.

use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tweetecho_twitter::{TwitterClient, TwitterConfig, TwitterError};

fn test_client(server: &MockServer) -> TwitterClient {
    TwitterClient::new(
        TwitterConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_uri: "https://app.example.com/callback".to_string(),
            api_base_url: server.uri(),
            authorize_url: "https://twitter.com/i/oauth2/authorize".to_string(),
        },
        5,
    )
    .expect("failed to build TwitterClient")
}

fn token_reply() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "token_type": "bearer",
        "expires_in": 7200,
        "access_token": "access-123",
        "scope": "tweet.read tweet.write users.read offline.access",
        "refresh_token": "refresh-456"
    }))
}

// ---------------------------------------------------------------------------
// Token exchange
// ---------------------------------------------------------------------------

#[tokio::test]
async fn exchange_code_returns_token_pair() {
    let server = MockServer::start().await;

    // Basic auth for client-id:client-secret.
    Mock::given(method("POST"))
        .and(path("/2/oauth2/token"))
        .and(header(
            "authorization",
            "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=",
        ))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=the-code"))
        .and(body_string_contains("code_verifier=the-verifier"))
        .respond_with(token_reply())
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let tokens = client
        .exchange_code("the-code", "the-verifier")
        .await
        .expect("expected Ok");

    assert_eq!(tokens.access_token, "access-123");
    assert_eq!(tokens.refresh_token.as_deref(), Some("refresh-456"));
    assert_eq!(tokens.expires_in, Some(7200));
}

#[tokio::test]
async fn exchange_code_surfaces_rejected_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_request",
            "error_description": "Value passed for the authorization code was invalid."
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.exchange_code("bad-code", "the-verifier").await;
    assert!(
        matches!(result, Err(TwitterError::UnexpectedStatus { status: 400 })),
        "expected UnexpectedStatus(400), got: {result:?}"
    );
}

#[tokio::test]
async fn refresh_tokens_sends_refresh_grant() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2/oauth2/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-456"))
        .respond_with(token_reply())
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let tokens = client
        .refresh_tokens("refresh-456")
        .await
        .expect("expected Ok");
    assert_eq!(tokens.access_token, "access-123");
}

#[tokio::test]
async fn token_pair_without_refresh_token_still_parses() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "bearer",
            "access_token": "access-only"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let tokens = client
        .exchange_code("the-code", "the-verifier")
        .await
        .expect("expected Ok");
    assert_eq!(tokens.access_token, "access-only");
    assert!(tokens.refresh_token.is_none());
    assert!(tokens.expires_in.is_none());
}

// ---------------------------------------------------------------------------
// Publishing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn post_tweet_returns_published_tweet() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .and(header("authorization", "Bearer access-123"))
        .and(body_partial_json(json!({ "text": "hello world" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "id": "1844", "text": "hello world" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let tweet = client
        .post_tweet("access-123", "hello world")
        .await
        .expect("expected Ok");

    assert_eq!(tweet.id, "1844");
    assert_eq!(tweet.url(), "https://twitter.com/i/web/status/1844");
}

#[tokio::test]
async fn post_tweet_surfaces_expired_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "title": "Unauthorized"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.post_tweet("stale-token", "hello").await;
    assert!(
        matches!(result, Err(TwitterError::UnexpectedStatus { status: 401 })),
        "expected UnexpectedStatus(401), got: {result:?}"
    );
}

#[tokio::test]
async fn post_tweet_fails_on_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.post_tweet("access-123", "hello").await;
    assert!(
        matches!(result, Err(TwitterError::Deserialize(_))),
        "expected Deserialize error, got: {result:?}"
    );
}
