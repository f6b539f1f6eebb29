//! Database operations for the `web_content` table.
//!
//! Saves are upserts keyed on (`user_id`, `url`): scraping the same URL
//! twice updates the existing row instead of duplicating it.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use tweetecho_core::WebContent;

use crate::DbError;

/// A row from the `web_content` table.
#[derive(Debug, sqlx::FromRow)]
struct WebContentRow {
    id: Uuid,
    user_id: String,
    url: String,
    title: String,
    description: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<WebContentRow> for WebContent {
    fn from(row: WebContentRow) -> Self {
        WebContent {
            id: Some(row.id),
            user_id: row.user_id,
            url: row.url,
            title: row.title,
            description: row.description,
            content: row.content,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

const SELECT_COLUMNS: &str =
    "id, user_id, url, title, description, content, created_at, updated_at";

/// List all saved web content for a user, newest first.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn list_web_content(pool: &PgPool, user_id: &str) -> Result<Vec<WebContent>, DbError> {
    let rows = sqlx::query_as::<_, WebContentRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM web_content \
         WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(WebContent::from).collect())
}

/// Get the saved content for one (`user_id`, `url`) pair, if present.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn get_web_content_by_url(
    pool: &PgPool,
    user_id: &str,
    url: &str,
) -> Result<Option<WebContent>, DbError> {
    let row = sqlx::query_as::<_, WebContentRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM web_content WHERE user_id = $1 AND url = $2"
    ))
    .bind(user_id)
    .bind(url)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(WebContent::from))
}

/// Insert or update the saved content for (`user_id`, `url`).
///
/// A second save of the same pair overwrites `title`, `description`, and
/// `content` in the existing row; exactly one row per pair ever exists.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn upsert_web_content(
    pool: &PgPool,
    content: &WebContent,
) -> Result<WebContent, DbError> {
    let row = sqlx::query_as::<_, WebContentRow>(&format!(
        "INSERT INTO web_content (user_id, url, title, description, content) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (user_id, url) DO UPDATE SET \
           title       = EXCLUDED.title, \
           description = EXCLUDED.description, \
           content     = EXCLUDED.content, \
           updated_at  = NOW() \
         RETURNING {SELECT_COLUMNS}"
    ))
    .bind(&content.user_id)
    .bind(&content.url)
    .bind(&content.title)
    .bind(&content.description)
    .bind(&content.content)
    .fetch_one(pool)
    .await?;

    Ok(WebContent::from(row))
}

/// Hard-delete a saved page by id, scoped to its owner.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row was deleted, or [`DbError`] on
/// query failure.
pub async fn delete_web_content(pool: &PgPool, user_id: &str, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM web_content WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
