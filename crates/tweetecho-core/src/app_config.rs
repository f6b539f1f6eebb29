use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub firecrawl_api_key: String,
    pub firecrawl_api_url: String,
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub crawl_request_timeout_secs: u64,
    pub crawl_poll_initial_delay_ms: u64,
    pub crawl_poll_multiplier: f64,
    pub crawl_poll_max_attempts: u32,
    pub llm_request_timeout_secs: u64,
    /// Twitter app credentials; publishing is disabled when unset.
    pub twitter_client_id: Option<String>,
    pub twitter_client_secret: Option<String>,
    pub twitter_redirect_uri: Option<String>,
    pub twitter_api_url: String,
    pub twitter_authorize_url: String,
    pub twitter_request_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("firecrawl_api_key", &"[redacted]")
            .field("firecrawl_api_url", &self.firecrawl_api_url)
            .field("llm_api_key", &"[redacted]")
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "crawl_request_timeout_secs",
                &self.crawl_request_timeout_secs,
            )
            .field(
                "crawl_poll_initial_delay_ms",
                &self.crawl_poll_initial_delay_ms,
            )
            .field("crawl_poll_multiplier", &self.crawl_poll_multiplier)
            .field("crawl_poll_max_attempts", &self.crawl_poll_max_attempts)
            .field("llm_request_timeout_secs", &self.llm_request_timeout_secs)
            .field("twitter_client_id", &self.twitter_client_id)
            .field(
                "twitter_client_secret",
                &self.twitter_client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("twitter_redirect_uri", &self.twitter_redirect_uri)
            .field("twitter_api_url", &self.twitter_api_url)
            .field("twitter_authorize_url", &self.twitter_authorize_url)
            .field(
                "twitter_request_timeout_secs",
                &self.twitter_request_timeout_secs,
            )
            .finish()
    }
}
