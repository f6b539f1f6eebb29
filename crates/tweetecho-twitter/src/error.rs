use thiserror::Error;

/// Errors from the Twitter OAuth and publishing calls.
///
/// Unlike the LLM path, these are never absorbed into fallback output: a
/// failed token exchange or tweet is surfaced to the caller.
#[derive(Debug, Error)]
pub enum TwitterError {
    #[error("invalid authorize URL '{url}': {reason}")]
    InvalidAuthorizeUrl { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Twitter API returned status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("Twitter API response did not parse: {0}")]
    Deserialize(#[source] reqwest::Error),
}
