//! Draft-post generation with fail-open fallback.
//!
//! Post drafting must never hard-fail the request: any LLM failure, and any
//! response that does not parse into exactly [`POST_COUNT`] non-blank lines,
//! substitutes canned posts and flags the substitution.

use tweetecho_core::VoiceProfile;

use crate::client::LlmClient;

/// Number of draft posts every call returns, fallback included.
pub const POST_COUNT: usize = 3;

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 400;

/// Draft posts plus a provenance flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPosts {
    /// Always exactly [`POST_COUNT`] non-empty strings.
    pub posts: Vec<String>,
    /// True when the canned fallback was substituted for model output.
    pub used_fallback: bool,
}

/// Generates [`POST_COUNT`] draft posts for `seed_text`, steered by
/// `profile` when one is available.
///
/// Fail-open: on any call failure or malformed output this returns the
/// canned fallback set with `used_fallback: true` rather than an error.
pub async fn generate_posts(
    client: &LlmClient,
    seed_text: &str,
    profile: Option<&VoiceProfile>,
) -> GeneratedPosts {
    let system = system_prompt(profile);

    match client
        .complete(&system, seed_text, TEMPERATURE, MAX_TOKENS)
        .await
    {
        Ok(content) => match parse_posts(&content) {
            Some(posts) => GeneratedPosts {
                posts,
                used_fallback: false,
            },
            None => {
                tracing::warn!(
                    lines = content.lines().count(),
                    "model output did not yield exactly {POST_COUNT} posts; using fallback"
                );
                GeneratedPosts {
                    posts: fallback_posts(seed_text),
                    used_fallback: true,
                }
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "post generation failed; using fallback");
            GeneratedPosts {
                posts: fallback_posts(seed_text),
                used_fallback: true,
            }
        }
    }
}

fn system_prompt(profile: Option<&VoiceProfile>) -> String {
    let base = format!(
        "You are a creative writing assistant. Generate {POST_COUNT} unique, creative, and \
         engaging social media posts based on the user's input. Make the posts different in \
         style and tone. Each post should be concise (1-3 sentences only) and suitable for a \
         social platform. Return one post per line, nothing else."
    );

    match profile.and_then(|p| serde_json::to_string(p).ok()) {
        Some(json) => format!(
            "{base}\n\nMatch the voice described by this profile (writing style, hashtag and \
             emoji habits, sentence length, engagement patterns):\n{json}"
        ),
        None => base,
    }
}

/// Splits model output on newlines, keeps non-blank lines, and accepts the
/// result only when there are exactly [`POST_COUNT`] of them.
fn parse_posts(content: &str) -> Option<Vec<String>> {
    let posts: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect();

    (posts.len() == POST_COUNT).then_some(posts)
}

/// Canned drafts derived from the seed text, used when the model fails.
fn fallback_posts(seed_text: &str) -> Vec<String> {
    let topic: String = seed_text.chars().take(80).collect();
    let topic = topic.trim();
    vec![
        format!("Reflecting on \"{topic}\" today. What are your thoughts?"),
        format!("Just pondering about {topic}. Would love to hear other perspectives!"),
        format!("Been reading up on {topic} lately. The more you learn, the more there is to explore."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_posts_accepts_exactly_three_lines() {
        let posts = parse_posts("one\ntwo\nthree").unwrap();
        assert_eq!(posts, vec!["one", "two", "three"]);
    }

    #[test]
    fn parse_posts_ignores_blank_lines() {
        let posts = parse_posts("one\n\n  \ntwo\n\nthree\n").unwrap();
        assert_eq!(posts.len(), POST_COUNT);
    }

    #[test]
    fn parse_posts_rejects_two_lines() {
        assert!(parse_posts("one\ntwo").is_none());
    }

    #[test]
    fn parse_posts_rejects_four_lines() {
        assert!(parse_posts("one\ntwo\nthree\nfour").is_none());
    }

    #[test]
    fn parse_posts_rejects_empty_output() {
        assert!(parse_posts("").is_none());
        assert!(parse_posts("\n\n").is_none());
    }

    #[test]
    fn fallback_always_yields_three_non_empty_posts() {
        let posts = fallback_posts("rust async runtimes");
        assert_eq!(posts.len(), POST_COUNT);
        assert!(posts.iter().all(|p| !p.trim().is_empty()));
        assert!(posts[0].contains("rust async runtimes"));
    }

    #[test]
    fn fallback_truncates_very_long_seed_text() {
        let seed = "x".repeat(500);
        let posts = fallback_posts(&seed);
        assert!(posts.iter().all(|p| p.len() < 200));
    }

    #[test]
    fn system_prompt_embeds_profile_when_present() {
        assert!(!system_prompt(None).contains("voice described"));
    }
}
