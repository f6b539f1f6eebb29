//! Voice profile CRUD handlers.
//!
//! Every endpoint here requires a session; the profile store is personal data
//! and anonymous callers never touch it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use tweetecho_core::{VoiceProfile, VoiceProfileInput};
use tweetecho_db::DbError;

use crate::middleware::{CurrentUser, RequestId};

use super::{map_db_error, require_user, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct LatestProfileQuery {
    pub user_id: Option<String>,
}

/// Rejects requests that name a user other than the session user.
fn authorize_user(request_id: &str, session_user: &str, requested: &str) -> Result<(), ApiError> {
    if session_user == requested {
        Ok(())
    } else {
        Err(ApiError::new(
            request_id,
            "forbidden",
            "you may only access your own voice profiles",
        ))
    }
}

/// GET /api/v1/profiles — latest profile for the session user.
pub(in crate::api) async fn latest_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<LatestProfileQuery>,
) -> Result<Json<ApiResponse<VoiceProfile>>, ApiError> {
    let rid = &req_id.0;
    let user = require_user(&current, rid)?;
    if let Some(ref requested) = query.user_id {
        authorize_user(rid, &user.id, requested)?;
    }

    let profile = tweetecho_db::latest_voice_profile(&state.pool, &user.id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", "no voice profile stored for this user"))?;

    Ok(Json(ApiResponse {
        data: profile,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/profiles — create a profile from a complete input payload.
pub(in crate::api) async fn create_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<VoiceProfileInput>,
) -> Result<(StatusCode, Json<ApiResponse<VoiceProfile>>), ApiError> {
    let rid = &req_id.0;
    let user = require_user(&current, rid)?;
    authorize_user(rid, &user.id, &body.user_id)?;

    let profile = body
        .validate()
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

    let stored = tweetecho_db::create_voice_profile(&state.pool, &profile)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: stored,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PUT /api/v1/profiles — update an existing profile in place.
pub(in crate::api) async fn update_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<VoiceProfileInput>,
) -> Result<Json<ApiResponse<VoiceProfile>>, ApiError> {
    let rid = &req_id.0;
    let user = require_user(&current, rid)?;
    authorize_user(rid, &user.id, &body.user_id)?;

    let profile = body
        .validate()
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

    let stored = tweetecho_db::update_voice_profile(&state.pool, &profile)
        .await
        .map_err(|e| match e {
            DbError::NotFound => ApiError::new(rid, "not_found", "no such voice profile"),
            other => map_db_error(rid.clone(), &other),
        })?;

    Ok(Json(ApiResponse {
        data: stored,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/profiles/:id — hard-delete a profile.
pub(in crate::api) async fn delete_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = &req_id.0;
    let user = require_user(&current, rid)?;

    // Ownership check before delete: the store deletes by id alone.
    let owned = tweetecho_db::get_voice_profile(&state.pool, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    match owned {
        Some(ref profile) if profile.user_id == user.id => {}
        Some(_) => {
            return Err(ApiError::new(
                rid,
                "forbidden",
                "you may only access your own voice profiles",
            ));
        }
        None => return Err(ApiError::new(rid, "not_found", "no such voice profile")),
    }

    tweetecho_db::delete_voice_profile(&state.pool, id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => ApiError::new(rid, "not_found", "no such voice profile"),
            other => map_db_error(rid.clone(), &other),
        })?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}
