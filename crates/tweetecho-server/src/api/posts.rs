//! Post generation endpoint: reconcile a voice profile, then draft posts.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use tweetecho_core::VoiceProfile;

use crate::middleware::{CurrentUser, RequestId};

use super::{reconcile_for_request, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct GeneratePostsRequest {
    pub topic: String,
    pub user_id: Option<String>,
    #[serde(default)]
    pub use_stored_metadata: bool,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct GeneratedPostsData {
    pub posts: Vec<String>,
    pub profile: VoiceProfile,
    pub used_stored_metadata: bool,
    pub used_fallback: bool,
    pub persisted: bool,
}

/// POST /api/v1/posts/generate — draft posts for a topic in the user's voice.
pub(in crate::api) async fn generate(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<GeneratePostsRequest>,
) -> Result<Json<ApiResponse<GeneratedPostsData>>, ApiError> {
    let rid = &req_id.0;

    let topic = body.topic.trim();
    if topic.is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "topic must not be empty",
        ));
    }

    let reconciled = reconcile_for_request(
        &state,
        &current,
        body.user_id.as_deref(),
        topic,
        body.use_stored_metadata,
    )
    .await;

    let generated = tweetecho_llm::generate_posts(&state.llm, topic, Some(&reconciled.profile)).await;

    Ok(Json(ApiResponse {
        data: GeneratedPostsData {
            posts: generated.posts,
            profile: reconciled.profile,
            used_stored_metadata: reconciled.used_stored_metadata,
            used_fallback: generated.used_fallback || reconciled.used_fallback,
            persisted: reconciled.persisted,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
