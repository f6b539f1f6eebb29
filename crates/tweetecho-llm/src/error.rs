use thiserror::Error;

/// Errors from the raw chat-completion call.
///
/// Callers in this crate absorb these into fallback output (fail-open);
/// they surface only in logs and in tests exercising [`crate::LlmClient`]
/// directly.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM service returned status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("LLM response did not parse: {0}")]
    Deserialize(#[source] reqwest::Error),

    #[error("LLM response contained no choices")]
    EmptyResponse,
}
