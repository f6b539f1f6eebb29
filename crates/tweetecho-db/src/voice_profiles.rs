//! Database operations for the `voice_profiles` table.
//!
//! The six structured profile fields live in JSONB columns; row types carry
//! them as [`Json<T>`] and are converted to the domain [`VoiceProfile`] at
//! the boundary.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use tweetecho_core::{
    EmojiUsage, EngagementTrends, HashtagPattern, SentenceAndVocab, TopPerformingTweets,
    VoiceProfile,
};

use crate::DbError;

/// A row from the `voice_profiles` table.
#[derive(Debug, sqlx::FromRow)]
struct VoiceProfileRow {
    id: Uuid,
    user_id: String,
    writing_style: Json<Vec<String>>,
    hashtag_pattern: Json<HashtagPattern>,
    emoji_usage: Json<EmojiUsage>,
    sentence_and_vocab: Json<SentenceAndVocab>,
    top_performing_tweets: Json<TopPerformingTweets>,
    engagement_trends: Json<EngagementTrends>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VoiceProfileRow> for VoiceProfile {
    fn from(row: VoiceProfileRow) -> Self {
        VoiceProfile {
            id: Some(row.id),
            user_id: row.user_id,
            writing_style: row.writing_style.0,
            hashtag_pattern: row.hashtag_pattern.0,
            emoji_usage: row.emoji_usage.0,
            sentence_and_vocab: row.sentence_and_vocab.0,
            top_performing_tweets: row.top_performing_tweets.0,
            engagement_trends: row.engagement_trends.0,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

const SELECT_COLUMNS: &str = "id, user_id, writing_style, hashtag_pattern, emoji_usage, \
     sentence_and_vocab, top_performing_tweets, engagement_trends, created_at, updated_at";

/// Get the most-recently-created voice profile for a user, if any.
///
/// Absence is not an error: reconciliation treats `None` as "generate".
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn latest_voice_profile(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<VoiceProfile>, DbError> {
    let row = sqlx::query_as::<_, VoiceProfileRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM voice_profiles \
         WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(VoiceProfile::from))
}

/// Get a voice profile by id.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn get_voice_profile(pool: &PgPool, id: Uuid) -> Result<Option<VoiceProfile>, DbError> {
    let row = sqlx::query_as::<_, VoiceProfileRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM voice_profiles WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(VoiceProfile::from))
}

/// Insert a new voice profile row; the store assigns `id` and timestamps.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn create_voice_profile(
    pool: &PgPool,
    profile: &VoiceProfile,
) -> Result<VoiceProfile, DbError> {
    let row = sqlx::query_as::<_, VoiceProfileRow>(&format!(
        "INSERT INTO voice_profiles \
           (user_id, writing_style, hashtag_pattern, emoji_usage, \
            sentence_and_vocab, top_performing_tweets, engagement_trends) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {SELECT_COLUMNS}"
    ))
    .bind(&profile.user_id)
    .bind(Json(&profile.writing_style))
    .bind(Json(&profile.hashtag_pattern))
    .bind(Json(&profile.emoji_usage))
    .bind(Json(&profile.sentence_and_vocab))
    .bind(Json(&profile.top_performing_tweets))
    .bind(Json(&profile.engagement_trends))
    .fetch_one(pool)
    .await?;

    Ok(VoiceProfile::from(row))
}

/// Update an existing voice profile row in place.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if `profile.id` is absent or no row with
/// that id exists, or [`DbError`] on query failure.
pub async fn update_voice_profile(
    pool: &PgPool,
    profile: &VoiceProfile,
) -> Result<VoiceProfile, DbError> {
    let id = profile.id.ok_or(DbError::NotFound)?;

    let row = sqlx::query_as::<_, VoiceProfileRow>(&format!(
        "UPDATE voice_profiles SET \
           writing_style = $2, hashtag_pattern = $3, emoji_usage = $4, \
           sentence_and_vocab = $5, top_performing_tweets = $6, \
           engagement_trends = $7, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {SELECT_COLUMNS}"
    ))
    .bind(id)
    .bind(Json(&profile.writing_style))
    .bind(Json(&profile.hashtag_pattern))
    .bind(Json(&profile.emoji_usage))
    .bind(Json(&profile.sentence_and_vocab))
    .bind(Json(&profile.top_performing_tweets))
    .bind(Json(&profile.engagement_trends))
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(VoiceProfile::from(row))
}

/// Hard-delete a voice profile row by id.
///
/// Not idempotent: deleting a missing row is [`DbError::NotFound`]; callers
/// that need idempotence must check existence first.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row was deleted, or [`DbError`] on
/// query failure.
pub async fn delete_voice_profile(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM voice_profiles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
