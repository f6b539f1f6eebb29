use async_trait::async_trait;

use tweetecho_core::VoiceProfile;
use tweetecho_db::DbError;
use tweetecho_llm::GeneratedProfile;

/// The authenticated principal, as reported by the session layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
}

/// Persistence seam over the voice-profile store.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Most-recently-created profile for the user; `None` is not an error.
    async fn latest_for_user(&self, user_id: &str) -> Result<Option<VoiceProfile>, DbError>;

    /// Persist a new profile row; the store assigns id and timestamps.
    async fn create(&self, profile: &VoiceProfile) -> Result<VoiceProfile, DbError>;

    /// Update an existing row in place (requires `profile.id`).
    async fn update(&self, profile: &VoiceProfile) -> Result<VoiceProfile, DbError>;
}

/// Generation seam. Infallible by contract: implementations are fail-open
/// and signal degradation through [`GeneratedProfile::used_fallback`].
#[async_trait]
pub trait ProfileGenerator: Send + Sync {
    async fn generate(&self, user_id: &str, seed_text: &str) -> GeneratedProfile;
}

/// Session seam: who is making this request, if anyone.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current_user(&self) -> Option<SessionUser>;
}
