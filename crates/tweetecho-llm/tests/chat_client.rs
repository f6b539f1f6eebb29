//! Integration tests for the chat-completion client and the fail-open
//! generation wrappers, using `wiremock` for the LLM service.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tweetecho_llm::{generate_posts, generate_profile, LlmClient, LlmError, POST_COUNT};

fn test_client(server: &MockServer) -> LlmClient {
    LlmClient::new("sk-test", &server.uri(), "test/model", 5).expect("failed to build LlmClient")
}

fn chat_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    }))
}

// ---------------------------------------------------------------------------
// Raw client
// ---------------------------------------------------------------------------

#[tokio::test]
async fn complete_returns_first_choice_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "test/model" })))
        .respond_with(chat_reply("hello"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let content = client
        .complete("system", "user", 0.7, 100)
        .await
        .expect("expected Ok");
    assert_eq!(content, "hello");
}

#[tokio::test]
async fn complete_surfaces_non_success_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.complete("system", "user", 0.7, 100).await;
    assert!(
        matches!(result, Err(LlmError::UnexpectedStatus { status: 429 })),
        "expected UnexpectedStatus(429), got: {result:?}"
    );
}

#[tokio::test]
async fn complete_fails_on_empty_choices() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.complete("system", "user", 0.7, 100).await;
    assert!(
        matches!(result, Err(LlmError::EmptyResponse)),
        "expected EmptyResponse, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Post generation (fail-open)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_posts_returns_three_posts_from_model_output() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(chat_reply("First post.\nSecond post.\nThird post."))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let generated = generate_posts(&client, "rust release", None).await;

    assert!(!generated.used_fallback);
    assert_eq!(
        generated.posts,
        vec!["First post.", "Second post.", "Third post."]
    );
}

#[tokio::test]
async fn generate_posts_falls_back_when_model_returns_two_lines() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(chat_reply("only one\nand two"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let generated = generate_posts(&client, "rust release", None).await;

    assert!(generated.used_fallback);
    assert_eq!(generated.posts.len(), POST_COUNT);
    assert!(generated.posts.iter().all(|p| !p.is_empty()));
}

#[tokio::test]
async fn generate_posts_falls_back_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let generated = generate_posts(&client, "distributed consensus", None).await;

    assert!(generated.used_fallback);
    assert_eq!(generated.posts.len(), POST_COUNT);
    assert!(generated.posts[0].contains("distributed consensus"));
}

#[tokio::test]
async fn generate_posts_tolerates_blank_lines_between_posts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(chat_reply("one\n\ntwo\n\nthree\n"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let generated = generate_posts(&client, "topic", None).await;
    assert!(!generated.used_fallback);
    assert_eq!(generated.posts, vec!["one", "two", "three"]);
}

// ---------------------------------------------------------------------------
// Profile generation (fail-open)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_profile_parses_complete_model_output() {
    let server = MockServer::start().await;

    let profile_json =
        serde_json::to_string(&tweetecho_llm::profile_gen::default_profile("whatever")).unwrap();
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(chat_reply(&profile_json))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let generated = generate_profile(&client, "user-9", "a topic").await;

    assert!(!generated.used_fallback);
    assert_eq!(generated.profile.user_id, "user-9");
    assert!(generated.profile.id.is_none());
}

#[tokio::test]
async fn generate_profile_defaults_on_malformed_output() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(chat_reply("Sure, here's your profile!"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let generated = generate_profile(&client, "user-9", "a topic").await;

    assert!(generated.used_fallback);
    assert_eq!(generated.profile.user_id, "user-9");
}

#[tokio::test]
async fn generate_profile_defaults_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let generated = generate_profile(&client, "user-9", "a topic").await;

    assert!(generated.used_fallback);
    assert_eq!(generated.profile.user_id, "user-9");
    assert!(!generated.profile.writing_style.is_empty());
}
