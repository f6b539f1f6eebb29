mod adapters;
mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use tweetecho_crawl::{FirecrawlClient, PollConfig};
use tweetecho_llm::LlmClient;
use tweetecho_twitter::{TwitterClient, TwitterConfig};

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::SessionState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = tweetecho_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = tweetecho_db::PoolConfig::from_app_config(&config);
    let pool = tweetecho_db::connect_pool(&config.database_url, pool_config).await?;
    tweetecho_db::run_migrations(&pool).await?;

    let crawler = FirecrawlClient::new(
        &config.firecrawl_api_key,
        &config.firecrawl_api_url,
        config.crawl_request_timeout_secs,
        PollConfig {
            initial_delay_ms: config.crawl_poll_initial_delay_ms,
            multiplier: config.crawl_poll_multiplier,
            max_attempts: config.crawl_poll_max_attempts,
        },
    )?;
    let llm = LlmClient::new(
        &config.llm_api_key,
        &config.llm_base_url,
        &config.llm_model,
        config.llm_request_timeout_secs,
    )?;

    let twitter = build_twitter_client(&config)?;

    let session = SessionState::from_env(matches!(
        config.env,
        tweetecho_core::Environment::Development
    ))?;
    let app = build_app(
        AppState {
            pool,
            crawler: Arc::new(crawler),
            llm: Arc::new(llm),
            twitter,
        },
        session,
        default_rate_limit_state(),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Builds the Twitter client when credentials are configured; otherwise the
/// twitter endpoints stay mounted but answer 503.
fn build_twitter_client(
    config: &tweetecho_core::AppConfig,
) -> anyhow::Result<Option<Arc<TwitterClient>>> {
    let (Some(client_id), Some(client_secret), Some(redirect_uri)) = (
        &config.twitter_client_id,
        &config.twitter_client_secret,
        &config.twitter_redirect_uri,
    ) else {
        tracing::info!("twitter publishing disabled: TWITTER_CLIENT_ID not set");
        return Ok(None);
    };

    let client = TwitterClient::new(
        TwitterConfig {
            client_id: client_id.clone(),
            client_secret: client_secret.clone(),
            redirect_uri: redirect_uri.clone(),
            api_base_url: config.twitter_api_url.clone(),
            authorize_url: config.twitter_authorize_url.clone(),
        },
        config.twitter_request_timeout_secs,
    )?;
    Ok(Some(Arc::new(client)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
