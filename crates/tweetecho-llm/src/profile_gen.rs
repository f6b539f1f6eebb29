//! Voice-profile generation with a hard-coded default fallback.

use tweetecho_core::{
    EmojiUsage, EngagementTraits, EngagementTrends, Frequency, HashtagPattern, Positioning,
    SentenceAndVocab, TopPerformingTweets, VoiceProfile, VoiceProfileInput,
};

use crate::client::LlmClient;

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 800;

/// A generated profile plus a provenance flag.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedProfile {
    pub profile: VoiceProfile,
    /// True when the hard-coded default was substituted for model output.
    pub used_fallback: bool,
}

/// Generates a voice profile for `user_id` seeded with `seed_text` (a topic
/// or scraped page content).
///
/// Fail-open: any call failure or output that does not parse into a complete
/// profile yields [`default_profile`] with `used_fallback: true`. The
/// returned profile always carries the requested `user_id`, whatever the
/// model emitted.
pub async fn generate_profile(
    client: &LlmClient,
    user_id: &str,
    seed_text: &str,
) -> GeneratedProfile {
    let user = user_prompt(user_id, seed_text);

    match client
        .complete(SYSTEM_PROMPT, &user, TEMPERATURE, MAX_TOKENS)
        .await
    {
        Ok(content) => match parse_profile(user_id, &content) {
            Some(profile) => GeneratedProfile {
                profile,
                used_fallback: false,
            },
            None => {
                tracing::warn!(user_id, "model output was not a complete profile; using default");
                GeneratedProfile {
                    profile: default_profile(user_id),
                    used_fallback: true,
                }
            }
        },
        Err(e) => {
            tracing::warn!(user_id, error = %e, "profile generation failed; using default");
            GeneratedProfile {
                profile: default_profile(user_id),
                used_fallback: true,
            }
        }
    }
}

const SYSTEM_PROMPT: &str = "You are an AI assistant that generates user voice profiles for \
content personalization. Based on the provided topic or page content, generate a realistic \
voice profile in JSON format. The profile should include styles, patterns, and preferences \
that would make generated content more engaging. Return ONLY valid JSON with no explanations.";

fn user_prompt(user_id: &str, seed_text: &str) -> String {
    format!(
        r##"Generate a detailed voice profile for content related to: "{seed_text}".
Include writing style, hashtag patterns, emoji usage, sentence structures, and engagement trends.
Use this template structure:
{{
  "user_id": "{user_id}",
  "writing_style": ["style1", "style2"],
  "hashtag_pattern": {{
    "common_hashtags": ["#hashtag1", "#hashtag2"],
    "usage_frequency": "low|moderate|high",
    "positioning": "start|middle|end"
  }},
  "emoji_usage": {{
    "used": true,
    "common_emojis": ["emoji1", "emoji2"],
    "positioning": "start|middle|end",
    "frequency": "low|moderate|high"
  }},
  "sentence_and_vocab": {{
    "avg_length_chars": 140,
    "avg_length_words": 22,
    "common_structures": ["question", "statement"],
    "frequent_words": ["word1", "word2", "word3"]
  }},
  "top_performing_tweets": {{
    "likes_threshold": 100,
    "retweets_threshold": 20,
    "engagement_traits": {{
      "style": ["style1", "style2"],
      "length_range": "100-200 characters",
      "topics": ["related topic1", "related topic2"]
    }}
  }},
  "engagement_trends": {{
    "best_days": ["day1", "day2"],
    "best_times": ["timerange1", "timerange2"],
    "hot_topics": ["related hot topic1", "related hot topic2"]
  }}
}}"##
    )
}

/// Parses model output into a complete profile tagged with `user_id`.
///
/// Output is deserialized leniently (every structured field optional) and
/// then validated, so a response missing any of the six fields is rejected
/// rather than trusted.
fn parse_profile(user_id: &str, content: &str) -> Option<VoiceProfile> {
    let input: VoiceProfileInput = serde_json::from_str(content).ok()?;
    let mut profile = input.validate().ok()?;
    profile.id = None;
    profile.user_id = user_id.to_owned();
    profile.created_at = None;
    profile.updated_at = None;
    Some(profile)
}

/// The hard-coded default profile substituted on generation failure.
#[must_use]
pub fn default_profile(user_id: &str) -> VoiceProfile {
    VoiceProfile {
        id: None,
        user_id: user_id.to_owned(),
        writing_style: vec!["casual".into(), "informative".into()],
        hashtag_pattern: HashtagPattern {
            common_hashtags: vec!["#TechTalk".into(), "#Innovation".into()],
            usage_frequency: Frequency::Moderate,
            positioning: Positioning::End,
        },
        emoji_usage: EmojiUsage {
            used: true,
            common_emojis: vec!["💡".into(), "✨".into()],
            positioning: Positioning::End,
            frequency: Frequency::Low,
        },
        sentence_and_vocab: SentenceAndVocab {
            avg_length_chars: 140.0,
            avg_length_words: 22.0,
            common_structures: vec!["question".into(), "statement".into()],
            frequent_words: vec!["innovation".into(), "discover".into(), "learn".into()],
        },
        top_performing_tweets: TopPerformingTweets {
            likes_threshold: 100,
            retweets_threshold: 20,
            engagement_traits: EngagementTraits {
                style: vec!["informative".into(), "thought-provoking".into()],
                length_range: "120-160 characters".into(),
                topics: vec!["technology trends".into(), "innovation insights".into()],
            },
        },
        engagement_trends: EngagementTrends {
            best_days: vec!["Tuesday".into(), "Thursday".into()],
            best_times: vec!["10am-12pm".into(), "5pm-7pm".into()],
            hot_topics: vec!["emerging technology".into(), "industry insights".into()],
        },
        created_at: None,
        updated_at: None,
    }
}
