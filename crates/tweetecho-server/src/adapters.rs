//! Production wiring for the reconciler's trait seams.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use tweetecho_core::VoiceProfile;
use tweetecho_db::DbError;
use tweetecho_llm::{GeneratedProfile, LlmClient};
use tweetecho_reconcile::{ProfileGenerator, ProfileStore, SessionProvider, SessionUser};

/// [`ProfileStore`] backed by the `voice_profiles` table.
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn latest_for_user(&self, user_id: &str) -> Result<Option<VoiceProfile>, DbError> {
        tweetecho_db::latest_voice_profile(&self.pool, user_id).await
    }

    async fn create(&self, profile: &VoiceProfile) -> Result<VoiceProfile, DbError> {
        tweetecho_db::create_voice_profile(&self.pool, profile).await
    }

    async fn update(&self, profile: &VoiceProfile) -> Result<VoiceProfile, DbError> {
        tweetecho_db::update_voice_profile(&self.pool, profile).await
    }
}

/// [`ProfileGenerator`] backed by the chat-completion client.
pub struct LlmProfileGenerator {
    llm: Arc<LlmClient>,
}

impl LlmProfileGenerator {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ProfileGenerator for LlmProfileGenerator {
    async fn generate(&self, user_id: &str, seed_text: &str) -> GeneratedProfile {
        tweetecho_llm::generate_profile(&self.llm, user_id, seed_text).await
    }
}

/// [`SessionProvider`] carrying the identity the session middleware resolved
/// for the current request.
pub struct RequestSession(pub Option<SessionUser>);

#[async_trait]
impl SessionProvider for RequestSession {
    async fn current_user(&self) -> Option<SessionUser> {
        self.0.clone()
    }
}
