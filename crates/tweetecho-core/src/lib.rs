mod app_config;
mod config;
mod profile;
mod web_content;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use profile::{
    EmojiUsage, EngagementTraits, EngagementTrends, Frequency, HashtagPattern, Positioning,
    ProfileError, SentenceAndVocab, TopPerformingTweets, VoiceProfile, VoiceProfileInput,
};
pub use web_content::WebContent;
