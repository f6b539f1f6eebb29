use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use tweetecho_reconcile::SessionUser;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// The resolved principal for a request, stored as a request extension.
///
/// `None` means the request is anonymous; anonymous requests are served but
/// nothing is persisted on their behalf.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<SessionUser>);

/// Bearer-token session settings used by middleware.
///
/// Each token maps to one user id, so the session layer resolves identity
/// instead of merely gating access.
#[derive(Debug, Clone)]
pub struct SessionState {
    tokens: Arc<HashMap<String, String>>,
    pub enabled: bool,
}

impl SessionState {
    /// Builds session config from `TWEETECHO_SESSION_TOKENS`, a
    /// comma-separated list of `token:user_id` pairs.
    ///
    /// In development, an empty/missing list disables auth for local
    /// iteration (every request is anonymous). In non-development envs,
    /// empty/missing tokens fail startup.
    pub fn from_env(is_development: bool) -> anyhow::Result<Self> {
        let raw = std::env::var("TWEETECHO_SESSION_TOKENS").unwrap_or_default();
        Self::from_raw(&raw, is_development)
    }

    fn from_raw(raw: &str, is_development: bool) -> anyhow::Result<Self> {
        let mut tokens = HashMap::new();
        for pair in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let Some((token, user_id)) = pair.split_once(':') else {
                anyhow::bail!(
                    "TWEETECHO_SESSION_TOKENS entries must be 'token:user_id', got '{pair}'"
                );
            };
            if token.trim().is_empty() || user_id.trim().is_empty() {
                anyhow::bail!(
                    "TWEETECHO_SESSION_TOKENS entries must be 'token:user_id', got '{pair}'"
                );
            }
            tokens.insert(token.trim().to_owned(), user_id.trim().to_owned());
        }

        if tokens.is_empty() {
            if is_development {
                tracing::warn!(
                    "TWEETECHO_SESSION_TOKENS not set; session auth disabled in development environment"
                );
                return Ok(Self {
                    tokens: Arc::new(HashMap::new()),
                    enabled: false,
                });
            }

            anyhow::bail!(
                "TWEETECHO_SESSION_TOKENS is required outside development; provide comma-separated token:user_id pairs"
            );
        }

        Ok(Self {
            tokens: Arc::new(tokens),
            enabled: true,
        })
    }

    fn resolve(&self, token: &str) -> Option<&str> {
        self.tokens.get(token).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Sliding fixed-window limiter for simple API protection.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<RateLimitWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Arc::new(Mutex::new(RateLimitWindow {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware resolving the bearer token to a [`CurrentUser`] extension.
///
/// A request without an `Authorization` header proceeds as anonymous. A
/// request that presents a token the session map does not know is rejected
/// outright: an unknown credential is an error, not an anonymous visitor.
pub async fn attach_session(
    State(session): State<SessionState>,
    mut req: Request,
    next: Next,
) -> Response {
    if !session.enabled {
        req.extensions_mut().insert(CurrentUser(None));
        return next.run(req).await;
    }

    let token = extract_bearer_token(req.headers().get(AUTHORIZATION));
    let current = match token {
        None => CurrentUser(None),
        Some(token) => match session.resolve(token) {
            Some(user_id) => CurrentUser(Some(SessionUser {
                id: user_id.to_owned(),
            })),
            None => {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(MiddlewareErrorBody {
                        error: MiddlewareError {
                            code: "unauthorized",
                            message: "unrecognized bearer token",
                        },
                    }),
                )
                    .into_response();
            }
        },
    };

    req.extensions_mut().insert(current);
    next.run(req).await
}

/// Middleware enforcing a fixed request-per-window limit.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let mut window = rate_limit.state.lock().await;
    let elapsed = window.started_at.elapsed();

    if elapsed >= rate_limit.window {
        window.started_at = Instant::now();
        window.count = 0;
    }

    if window.count >= rate_limit.max_requests {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(MiddlewareErrorBody {
                error: MiddlewareError {
                    code: "rate_limited",
                    message: "rate limit exceeded",
                },
            }),
        )
            .into_response();
    }

    window.count += 1;
    drop(window);

    next.run(req).await
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_bearer_token_accepts_valid_header() {
        let header = HeaderValue::from_static("Bearer test-token");
        assert_eq!(extract_bearer_token(Some(&header)), Some("test-token"));
    }

    #[test]
    fn extract_bearer_token_rejects_non_bearer_header() {
        let header = HeaderValue::from_static("Basic abc123");
        assert_eq!(extract_bearer_token(Some(&header)), None);
    }

    #[test]
    fn session_state_disables_when_no_tokens_in_dev() {
        let state = SessionState::from_raw("", true).expect("dev should allow missing tokens");
        assert!(!state.enabled);
    }

    #[test]
    fn session_state_requires_tokens_outside_dev() {
        assert!(SessionState::from_raw("", false).is_err());
    }

    #[test]
    fn session_state_resolves_token_to_user() {
        let state =
            SessionState::from_raw("tok-a:alice, tok-b:bob", false).expect("valid token list");
        assert!(state.enabled);
        assert_eq!(state.resolve("tok-a"), Some("alice"));
        assert_eq!(state.resolve("tok-b"), Some("bob"));
        assert_eq!(state.resolve("tok-c"), None);
    }

    #[test]
    fn session_state_rejects_malformed_pairs() {
        assert!(SessionState::from_raw("just-a-token", false).is_err());
        assert!(SessionState::from_raw("tok:", false).is_err());
        assert!(SessionState::from_raw(":alice", false).is_err());
    }
}
