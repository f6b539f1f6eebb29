mod posts;
mod profiles;
mod scrape;
mod twitter;
mod web_content;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use tweetecho_crawl::FirecrawlClient;
use tweetecho_llm::LlmClient;
use tweetecho_reconcile::{reconcile_profile, ReconcileRequest, ReconciledProfile, SessionUser};
use tweetecho_twitter::TwitterClient;

use crate::adapters::{LlmProfileGenerator, PgProfileStore, RequestSession};
use crate::middleware::{
    attach_session, enforce_rate_limit, request_id, CurrentUser, RateLimitState, RequestId,
    SessionState,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub crawler: Arc<FirecrawlClient>,
    pub llm: Arc<LlmClient>,
    /// `None` when Twitter credentials are not configured; the twitter
    /// endpoints answer 503 in that case.
    pub twitter: Option<Arc<TwitterClient>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "forbidden" => StatusCode::FORBIDDEN,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "bad_gateway" => StatusCode::BAD_GATEWAY,
            "gateway_timeout" => StatusCode::GATEWAY_TIMEOUT,
            "service_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &tweetecho_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

/// Returns the session user, or an `unauthorized` error for anonymous
/// requests hitting an endpoint that needs an identity.
pub(super) fn require_user<'a>(
    current: &'a CurrentUser,
    request_id: &str,
) -> Result<&'a SessionUser, ApiError> {
    current.0.as_ref().ok_or_else(|| {
        ApiError::new(
            request_id,
            "unauthorized",
            "this endpoint requires an authenticated session",
        )
    })
}

/// Runs profile reconciliation for one request, wiring the store, generator,
/// and session adapters over the request's resolved identity.
pub(super) async fn reconcile_for_request(
    state: &AppState,
    current: &CurrentUser,
    user_id: Option<&str>,
    seed_text: &str,
    use_stored_metadata: bool,
) -> ReconciledProfile {
    let store = PgProfileStore::new(state.pool.clone());
    let generator = LlmProfileGenerator::new(Arc::clone(&state.llm));
    let session = RequestSession(current.0.clone());
    reconcile_profile(
        &store,
        &generator,
        &session,
        ReconcileRequest {
            user_id,
            seed_text,
            use_stored_metadata,
        },
    )
    .await
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn api_router(session: SessionState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/posts/generate", post(posts::generate))
        .route("/api/v1/scrape", post(scrape::scrape))
        .route(
            "/api/v1/profiles",
            get(profiles::latest_profile)
                .post(profiles::create_profile)
                .put(profiles::update_profile),
        )
        .route("/api/v1/profiles/{id}", delete(profiles::delete_profile))
        .route("/api/v1/web-content", get(web_content::list))
        .route("/api/v1/web-content/{id}", delete(web_content::delete))
        .route("/api/v1/twitter/auth-url", get(twitter::auth_url))
        .route("/api/v1/twitter/authorize", post(twitter::authorize))
        .route("/api/v1/twitter/tweet", post(twitter::publish))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    session,
                    attach_session,
                )),
        )
}

pub fn build_app(state: AppState, session: SessionState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(api_router(session, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match tweetecho_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_forbidden_maps_to_403() {
        let response = ApiError::new("req-1", "forbidden", "not your profile").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn api_error_bad_gateway_maps_to_502() {
        let response = ApiError::new("req-1", "bad_gateway", "upstream failed").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn api_error_service_unavailable_maps_to_503() {
        let response =
            ApiError::new("req-1", "service_unavailable", "feature disabled").into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn api_error_unknown_code_maps_to_500() {
        let response = ApiError::new("req-1", "mystery", "??").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn require_user_rejects_anonymous() {
        let err = require_user(&CurrentUser(None), "req-1").expect_err("anonymous");
        assert_eq!(err.error.code, "unauthorized");
    }

    #[test]
    fn require_user_returns_session_user() {
        let current = CurrentUser(Some(SessionUser {
            id: "alice".to_owned(),
        }));
        let user = require_user(&current, "req-1").expect("user");
        assert_eq!(user.id, "alice");
    }
}
