//! Voice profile domain types.
//!
//! A [`VoiceProfile`] is a structured summary of a user's writing persona,
//! used to steer generated posts. All six structured fields are required for
//! a profile to be valid; API input arrives as a [`VoiceProfileInput`] whose
//! fields are optional and must pass [`VoiceProfileInput::validate`] before
//! anything touches the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile is missing required field: {0}")]
    MissingField(&'static str),
}

/// How often a pattern shows up in the user's writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Low,
    Moderate,
    High,
}

/// Where in a post a pattern tends to appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Positioning {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashtagPattern {
    pub common_hashtags: Vec<String>,
    pub usage_frequency: Frequency,
    pub positioning: Positioning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmojiUsage {
    pub used: bool,
    pub common_emojis: Vec<String>,
    pub positioning: Positioning,
    pub frequency: Frequency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceAndVocab {
    pub avg_length_chars: f64,
    pub avg_length_words: f64,
    pub common_structures: Vec<String>,
    pub frequent_words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementTraits {
    pub style: Vec<String>,
    pub length_range: String,
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPerformingTweets {
    pub likes_threshold: i64,
    pub retweets_threshold: i64,
    pub engagement_traits: EngagementTraits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementTrends {
    pub best_days: Vec<String>,
    pub best_times: Vec<String>,
    pub hot_topics: Vec<String>,
}

/// A user's learned writing persona.
///
/// `id` and the timestamps are assigned by the store; `id: None` means the
/// profile has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub user_id: String,
    pub writing_style: Vec<String>,
    pub hashtag_pattern: HashtagPattern,
    pub emoji_usage: EmojiUsage,
    pub sentence_and_vocab: SentenceAndVocab,
    pub top_performing_tweets: TopPerformingTweets,
    pub engagement_trends: EngagementTrends,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl VoiceProfile {
    /// Replaces the six structured fields with those of `generated`, keeping
    /// this profile's `id`, `user_id`, and `created_at`.
    ///
    /// This is the merge step of reconciliation: regeneration updates the
    /// existing row in place rather than creating a new one.
    #[must_use]
    pub fn merged_with(mut self, generated: VoiceProfile) -> VoiceProfile {
        self.writing_style = generated.writing_style;
        self.hashtag_pattern = generated.hashtag_pattern;
        self.emoji_usage = generated.emoji_usage;
        self.sentence_and_vocab = generated.sentence_and_vocab;
        self.top_performing_tweets = generated.top_performing_tweets;
        self.engagement_trends = generated.engagement_trends;
        self
    }
}

/// API-facing profile payload where every structured field is optional.
///
/// Mirrors what arrives over the wire; a profile missing any of the six
/// structured fields is rejected before write.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceProfileInput {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub user_id: String,
    pub writing_style: Option<Vec<String>>,
    pub hashtag_pattern: Option<HashtagPattern>,
    pub emoji_usage: Option<EmojiUsage>,
    pub sentence_and_vocab: Option<SentenceAndVocab>,
    pub top_performing_tweets: Option<TopPerformingTweets>,
    pub engagement_trends: Option<EngagementTrends>,
}

impl VoiceProfileInput {
    /// Validates that all six structured fields are present and converts the
    /// input into a complete [`VoiceProfile`].
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::MissingField`] naming the first absent field.
    /// An empty `writing_style` list is also rejected.
    pub fn validate(self) -> Result<VoiceProfile, ProfileError> {
        let writing_style = self
            .writing_style
            .filter(|s| !s.is_empty())
            .ok_or(ProfileError::MissingField("writing_style"))?;
        let hashtag_pattern = self
            .hashtag_pattern
            .ok_or(ProfileError::MissingField("hashtag_pattern"))?;
        let emoji_usage = self
            .emoji_usage
            .ok_or(ProfileError::MissingField("emoji_usage"))?;
        let sentence_and_vocab = self
            .sentence_and_vocab
            .ok_or(ProfileError::MissingField("sentence_and_vocab"))?;
        let top_performing_tweets = self
            .top_performing_tweets
            .ok_or(ProfileError::MissingField("top_performing_tweets"))?;
        let engagement_trends = self
            .engagement_trends
            .ok_or(ProfileError::MissingField("engagement_trends"))?;

        Ok(VoiceProfile {
            id: self.id,
            user_id: self.user_id,
            writing_style,
            hashtag_pattern,
            emoji_usage,
            sentence_and_vocab,
            top_performing_tweets,
            engagement_trends,
            created_at: None,
            updated_at: None,
        })
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
