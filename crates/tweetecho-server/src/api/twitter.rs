//! Twitter account connection and tweet publishing.
//!
//! The PKCE verifier never lives in server state: `auth_url` hands it to the
//! caller together with the authorize URL, and `authorize` expects it echoed
//! back in the request body. Tokens are likewise returned to the caller
//! rather than stored.

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tweetecho_twitter::{TwitterClient, TwitterError};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(in crate::api) struct AuthUrlData {
    pub auth_url: String,
    pub state: String,
    pub code_verifier: String,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct AuthorizeRequest {
    pub code: String,
    pub code_verifier: String,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct TokenData {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct PublishRequest {
    pub text: String,
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct PublishedTweetData {
    pub tweet_id: String,
    pub tweet_url: String,
    pub published_at: DateTime<Utc>,
}

fn require_twitter<'a>(
    state: &'a AppState,
    request_id: &str,
) -> Result<&'a Arc<TwitterClient>, ApiError> {
    state.twitter.as_ref().ok_or_else(|| {
        ApiError::new(
            request_id,
            "service_unavailable",
            "twitter publishing is not configured on this server",
        )
    })
}

fn map_twitter_error(request_id: &str, error: &TwitterError) -> ApiError {
    match error {
        TwitterError::UnexpectedStatus { status: 400 } => ApiError::new(
            request_id,
            "bad_request",
            "twitter rejected the authorization request",
        ),
        TwitterError::UnexpectedStatus { status: 401 | 403 } => ApiError::new(
            request_id,
            "unauthorized",
            "twitter rejected the credentials",
        ),
        _ => {
            tracing::error!(error = %error, "twitter request failed");
            ApiError::new(request_id, "bad_gateway", "twitter request failed")
        }
    }
}

fn validate_non_empty(value: &str, field: &str, request_id: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::new(
            request_id,
            "validation_error",
            format!("{field} is required"),
        ));
    }
    Ok(())
}

/// GET /api/v1/twitter/auth-url — start the OAuth2 connect flow.
///
/// The caller must hold the returned `state` and `code_verifier` for the
/// duration of the flow and send the verifier back on `authorize`.
pub(in crate::api) async fn auth_url(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<AuthUrlData>>, ApiError> {
    let client = require_twitter(&state, &req_id.0)?;
    let request = client.authorization_request();

    Ok(Json(ApiResponse {
        data: AuthUrlData {
            auth_url: request.url,
            state: request.state,
            code_verifier: request.code_verifier,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/twitter/authorize — exchange a callback code for tokens.
pub(in crate::api) async fn authorize(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AuthorizeRequest>,
) -> Result<Json<ApiResponse<TokenData>>, ApiError> {
    let rid = &req_id.0;
    validate_non_empty(&body.code, "code", rid)?;
    validate_non_empty(&body.code_verifier, "code_verifier", rid)?;

    let client = require_twitter(&state, rid)?;
    let tokens = client
        .exchange_code(&body.code, &body.code_verifier)
        .await
        .map_err(|e| map_twitter_error(rid, &e))?;

    Ok(Json(ApiResponse {
        data: TokenData {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/twitter/tweet — publish one tweet with a caller-held token.
pub(in crate::api) async fn publish(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<PublishRequest>,
) -> Result<Json<ApiResponse<PublishedTweetData>>, ApiError> {
    let rid = &req_id.0;
    validate_non_empty(&body.text, "tweet text", rid)?;
    validate_non_empty(&body.access_token, "access_token", rid)?;

    let client = require_twitter(&state, rid)?;
    let tweet = client
        .post_tweet(&body.access_token, &body.text)
        .await
        .map_err(|e| map_twitter_error(rid, &e))?;

    tracing::info!(tweet_id = %tweet.id, "tweet published");

    Ok(Json(ApiResponse {
        data: PublishedTweetData {
            tweet_url: tweet.url(),
            tweet_id: tweet.id,
            published_at: Utc::now(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tweet_text_is_a_validation_error() {
        let err = validate_non_empty("   ", "tweet text", "req-1").expect_err("blank text");
        assert_eq!(err.error.code, "validation_error");
        assert_eq!(err.error.message, "tweet text is required");
    }

    #[test]
    fn non_empty_text_passes_validation() {
        assert!(validate_non_empty("hello", "tweet text", "req-1").is_ok());
    }

    #[test]
    fn rejected_authorization_maps_to_bad_request() {
        let err = map_twitter_error("req-1", &TwitterError::UnexpectedStatus { status: 400 });
        assert_eq!(err.error.code, "bad_request");
    }

    #[test]
    fn rejected_credentials_map_to_unauthorized() {
        let err = map_twitter_error("req-1", &TwitterError::UnexpectedStatus { status: 401 });
        assert_eq!(err.error.code, "unauthorized");
    }

    #[test]
    fn upstream_failure_maps_to_bad_gateway() {
        let err = map_twitter_error("req-1", &TwitterError::UnexpectedStatus { status: 500 });
        assert_eq!(err.error.code, "bad_gateway");
    }
}
