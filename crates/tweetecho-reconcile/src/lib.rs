//! Profile reconciliation: resolve which voice profile a generation request
//! should use, preferring reuse over regeneration but always producing some
//! usable profile.
//!
//! The reconciler sits behind three trait seams — [`ProfileStore`],
//! [`ProfileGenerator`], and [`SessionProvider`] — so the decision logic can
//! be exercised with in-memory fakes. Production wiring lives in the server
//! crate.

mod reconcile;
mod traits;

pub use reconcile::{reconcile_profile, ReconcileRequest, ReconciledProfile, ANONYMOUS_USER};
pub use traits::{ProfileGenerator, ProfileStore, SessionProvider, SessionUser};
