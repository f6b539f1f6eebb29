//! Scrape endpoint: crawl a URL, voice the content, and draft posts from it.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use tweetecho_core::{VoiceProfile, WebContent};
use tweetecho_crawl::{CrawlError, ScrapedPage};

use crate::middleware::{CurrentUser, RequestId};

use super::{reconcile_for_request, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct ScrapeRequest {
    pub url: String,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct ScrapedSource {
    pub url: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct ScrapeData {
    pub posts: Vec<String>,
    pub profile: VoiceProfile,
    pub source: ScrapedSource,
    pub used_stored_metadata: bool,
    pub used_fallback: bool,
    pub persisted: bool,
    /// Whether the scraped page was saved to the caller's library.
    pub saved: bool,
}

fn map_crawl_error(request_id: &str, error: &CrawlError) -> ApiError {
    match error {
        CrawlError::InvalidUrl { .. } => {
            ApiError::new(request_id, "validation_error", error.to_string())
        }
        CrawlError::SubmissionFailed { .. } => {
            tracing::error!(error = %error, "crawl submission failed");
            ApiError::new(request_id, "bad_gateway", "crawl submission failed")
        }
        CrawlError::Timeout { .. } => {
            tracing::error!(error = %error, "crawl polling timed out");
            ApiError::new(request_id, "gateway_timeout", "crawl did not complete in time")
        }
    }
}

/// POST /api/v1/scrape — crawl a page, then draft posts from its content.
pub(in crate::api) async fn scrape(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<ScrapeRequest>,
) -> Result<Json<ApiResponse<ScrapeData>>, ApiError> {
    let rid = &req_id.0;

    let page = state
        .crawler
        .extract_content(&body.url)
        .await
        .map_err(|e| map_crawl_error(rid, &e))?;

    let seed = page.structured();
    let reconciled =
        reconcile_for_request(&state, &current, body.user_id.as_deref(), &seed, false).await;

    let generated = tweetecho_llm::generate_posts(&state.llm, &seed, Some(&reconciled.profile)).await;

    let saved = save_for_authorized_user(&state, &current, body.user_id.as_deref(), &body.url, &page)
        .await;

    Ok(Json(ApiResponse {
        data: ScrapeData {
            posts: generated.posts,
            profile: reconciled.profile,
            source: ScrapedSource {
                url: body.url,
                title: page.title,
                description: page.description,
            },
            used_stored_metadata: reconciled.used_stored_metadata,
            used_fallback: generated.used_fallback || reconciled.used_fallback,
            persisted: reconciled.persisted,
            saved,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Upserts the scraped page into the caller's library when the session user
/// matches the requested user. Save failures are logged, never surfaced: the
/// generated posts are the point of the request.
async fn save_for_authorized_user(
    state: &AppState,
    current: &CurrentUser,
    requested_user: Option<&str>,
    url: &str,
    page: &ScrapedPage,
) -> bool {
    let Some(user_id) = requested_user else {
        return false;
    };
    if current.0.as_ref().map(|u| u.id.as_str()) != Some(user_id) {
        return false;
    }

    let content = WebContent {
        id: None,
        user_id: user_id.to_owned(),
        url: url.to_owned(),
        title: page.title.clone(),
        description: page.description.clone(),
        content: page.markdown.clone(),
        created_at: None,
        updated_at: None,
    };

    match tweetecho_db::upsert_web_content(&state.pool, &content).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(user_id, url, error = %e, "failed to save scraped page");
            false
        }
    }
}
