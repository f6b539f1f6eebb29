use thiserror::Error;

use crate::app_config::{AppConfig, Environment};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = require("DATABASE_URL")?;
    let firecrawl_api_key = require("FIRECRAWL_API_KEY")?;
    let llm_api_key = require("OPENAI_API_KEY")?;

    let env = parse_environment(&or_default("TWEETECHO_ENV", "development"));

    let bind_addr = parse_addr("TWEETECHO_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("TWEETECHO_LOG_LEVEL", "info");

    let firecrawl_api_url = or_default("FIRECRAWL_API_URL", "https://api.firecrawl.dev/v1/crawl");
    let llm_base_url = or_default("OPENAI_BASE_URL", "https://openrouter.ai/api/v1");
    let llm_model = or_default("TWEETECHO_LLM_MODEL", "anthropic/claude-3-opus-20240229");

    let db_max_connections = parse_u32("TWEETECHO_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("TWEETECHO_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("TWEETECHO_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let crawl_request_timeout_secs = parse_u64("TWEETECHO_CRAWL_REQUEST_TIMEOUT_SECS", "30")?;
    let crawl_poll_initial_delay_ms = parse_u64("TWEETECHO_CRAWL_POLL_INITIAL_DELAY_MS", "2000")?;
    let crawl_poll_multiplier = parse_f64("TWEETECHO_CRAWL_POLL_MULTIPLIER", "1.5")?;
    let crawl_poll_max_attempts = parse_u32("TWEETECHO_CRAWL_POLL_MAX_ATTEMPTS", "10")?;

    let llm_request_timeout_secs = parse_u64("TWEETECHO_LLM_REQUEST_TIMEOUT_SECS", "60")?;

    // Twitter publishing is opt-in: absent client id disables the feature,
    // but a client id with no secret or redirect is a misconfiguration.
    let twitter_client_id = lookup("TWITTER_CLIENT_ID").ok();
    let (twitter_client_secret, twitter_redirect_uri) = match &twitter_client_id {
        Some(_) => (
            Some(require("TWITTER_CLIENT_SECRET")?),
            Some(require("TWITTER_REDIRECT_URI")?),
        ),
        None => (None, None),
    };
    let twitter_api_url = or_default("TWITTER_API_URL", "https://api.twitter.com");
    let twitter_authorize_url = or_default(
        "TWITTER_AUTHORIZE_URL",
        "https://twitter.com/i/oauth2/authorize",
    );
    let twitter_request_timeout_secs = parse_u64("TWEETECHO_TWITTER_REQUEST_TIMEOUT_SECS", "30")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        firecrawl_api_key,
        firecrawl_api_url,
        llm_api_key,
        llm_base_url,
        llm_model,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        crawl_request_timeout_secs,
        crawl_poll_initial_delay_ms,
        crawl_poll_multiplier,
        crawl_poll_max_attempts,
        llm_request_timeout_secs,
        twitter_client_id,
        twitter_client_secret,
        twitter_redirect_uri,
        twitter_api_url,
        twitter_authorize_url,
        twitter_request_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
