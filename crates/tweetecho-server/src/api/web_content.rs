//! Saved-page handlers: list and delete the session user's scraped pages.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use tweetecho_core::WebContent;
use tweetecho_db::DbError;

use crate::middleware::{CurrentUser, RequestId};

use super::{map_db_error, require_user, ApiError, ApiResponse, AppState, ResponseMeta};

/// GET /api/v1/web-content — all pages saved for the session user.
pub(in crate::api) async fn list(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<WebContent>>>, ApiError> {
    let rid = &req_id.0;
    let user = require_user(&current, rid)?;

    let pages = tweetecho_db::list_web_content(&state.pool, &user.id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: pages,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/web-content/:id — delete one saved page.
pub(in crate::api) async fn delete(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = &req_id.0;
    let user = require_user(&current, rid)?;

    tweetecho_db::delete_web_content(&state.pool, &user.id, id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => ApiError::new(rid, "not_found", "no such saved page"),
            other => map_db_error(rid.clone(), &other),
        })?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}
