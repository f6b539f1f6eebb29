use tweetecho_core::VoiceProfile;

use crate::traits::{ProfileGenerator, ProfileStore, SessionProvider};

/// User id used to seed generation when the request carries none.
/// Profiles generated under it are never persisted.
pub const ANONYMOUS_USER: &str = "anonymous";

/// One reconciliation request.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileRequest<'a> {
    /// The user the caller wants the profile resolved for, if any.
    pub user_id: Option<&'a str>,
    /// Topic or scraped page content seeding fresh generation.
    pub seed_text: &'a str,
    /// When true (and a user id is present), prefer the stored profile.
    pub use_stored_metadata: bool,
}

/// The resolved profile plus provenance flags.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledProfile {
    pub profile: VoiceProfile,
    /// True when a stored profile was reused as-is (no generation call).
    pub used_stored_metadata: bool,
    /// True when generation fell back to the hard-coded default profile.
    pub used_fallback: bool,
    /// True when the generated profile was written to the store.
    pub persisted: bool,
}

/// Resolves which voice profile to use for a generation request.
///
/// Policy: reuse a stored profile when the caller asks for it and one
/// exists; otherwise generate a fresh one and — only for an authorized user
/// — persist it, merging into the existing row when there is one (keeping
/// its `id`, `user_id`, and `created_at`) or creating a new row when there
/// is not.
///
/// Persistence never blocks the result: store failures during the merge or
/// create step are logged and the in-memory profile is returned with
/// `persisted: false`.
///
/// Authorization: the request's `user_id` is honored for persistence only
/// when the session's current user has that same id. Lookup for *reuse*
/// requires only the flag plus a request user id.
pub async fn reconcile_profile<S, G, A>(
    store: &S,
    generator: &G,
    session: &A,
    request: ReconcileRequest<'_>,
) -> ReconciledProfile
where
    S: ProfileStore,
    G: ProfileGenerator,
    A: SessionProvider,
{
    // START: prefer the stored profile when asked for one.
    if request.use_stored_metadata {
        if let Some(user_id) = request.user_id {
            match store.latest_for_user(user_id).await {
                Ok(Some(profile)) => {
                    tracing::debug!(user_id, "reusing stored voice profile");
                    return ReconciledProfile {
                        profile,
                        used_stored_metadata: true,
                        used_fallback: false,
                        persisted: false,
                    };
                }
                Ok(None) => {
                    tracing::debug!(user_id, "no stored voice profile; generating");
                }
                Err(e) => {
                    tracing::warn!(user_id, error = %e, "stored profile lookup failed; generating");
                }
            }
        }
    }

    // NEED_GENERATE
    let seed_user = request.user_id.unwrap_or(ANONYMOUS_USER);
    let generated = generator.generate(seed_user, request.seed_text).await;
    let used_fallback = generated.used_fallback;
    let mut profile = generated.profile;

    let authorized_user = authorized_user_id(session, request.user_id).await;
    let Some(user_id) = authorized_user else {
        if request.user_id.is_some() {
            tracing::debug!("request user not authorized; skipping profile persistence");
        }
        return ReconciledProfile {
            profile,
            used_stored_metadata: false,
            used_fallback,
            persisted: false,
        };
    };

    profile.user_id = user_id.to_owned();
    let persisted = persist_generated(store, user_id, &mut profile).await;

    ReconciledProfile {
        profile,
        used_stored_metadata: false,
        used_fallback,
        persisted,
    }
}

/// Returns the request user id when the session's current user matches it.
async fn authorized_user_id<'a, A: SessionProvider>(
    session: &A,
    requested: Option<&'a str>,
) -> Option<&'a str> {
    let requested = requested?;
    let current = session.current_user().await?;
    (current.id == requested).then_some(requested)
}

/// Writes the generated profile, merging into an existing row when one
/// exists. Returns whether a write succeeded; failures are logged only.
async fn persist_generated<S: ProfileStore>(
    store: &S,
    user_id: &str,
    profile: &mut VoiceProfile,
) -> bool {
    match store.latest_for_user(user_id).await {
        Ok(Some(existing)) => {
            let merged = existing.merged_with(profile.clone());
            match store.update(&merged).await {
                Ok(saved) => {
                    *profile = saved;
                    true
                }
                Err(e) => {
                    tracing::warn!(user_id, error = %e, "profile merge update failed; using in-memory profile");
                    *profile = merged;
                    false
                }
            }
        }
        Ok(None) => match store.create(profile).await {
            Ok(saved) => {
                *profile = saved;
                true
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "profile create failed; using in-memory profile");
                false
            }
        },
        Err(e) => {
            tracing::warn!(user_id, error = %e, "profile lookup before persist failed; skipping write");
            false
        }
    }
}
