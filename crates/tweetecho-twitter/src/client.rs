//! Twitter OAuth 2.0 (PKCE) and tweet-publishing client.
//!
//! The connect flow is deliberately stateless on the server side: the PKCE
//! code verifier is generated here, handed to the caller alongside the
//! authorize URL, and echoed back on the token exchange. Nothing about an
//! in-flight authorization lives in process memory.
//!
//! Point `api_base_url` at a wiremock server in tests.

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::TwitterError;

/// Scopes requested when connecting an account: read/write tweets, read the
/// user, and a refresh token for publishing later.
pub const OAUTH_SCOPES: &[&str] = &["tweet.read", "tweet.write", "users.read", "offline.access"];

const CODE_VERIFIER_BYTES: usize = 32;
const STATE_BYTES: usize = 16;

#[derive(Debug, Clone)]
pub struct TwitterConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Callback the user is sent back to after consenting; must match the
    /// app registration exactly.
    pub redirect_uri: String,
    /// REST base, e.g. `https://api.twitter.com`.
    pub api_base_url: String,
    /// Browser-facing consent page, e.g.
    /// `https://twitter.com/i/oauth2/authorize`.
    pub authorize_url: String,
}

/// One freshly-minted connect attempt: the URL to send the user to, plus the
/// `state` and `code_verifier` the caller must hold on to and echo back.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
    pub code_verifier: String,
}

/// Tokens returned by the OAuth token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Serialize)]
struct TweetRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TweetResponse {
    data: TweetResponseData,
}

#[derive(Debug, Deserialize)]
struct TweetResponseData {
    id: String,
    #[serde(default)]
    text: String,
}

/// A successfully published tweet.
#[derive(Debug, Clone)]
pub struct PostedTweet {
    pub id: String,
    pub text: String,
}

impl PostedTweet {
    /// Permalink for the published tweet.
    #[must_use]
    pub fn url(&self) -> String {
        format!("https://twitter.com/i/web/status/{}", self.id)
    }
}

/// Client for the Twitter v2 API.
pub struct TwitterClient {
    client: Client,
    config: TwitterConfig,
    authorize_url: Url,
}

impl TwitterClient {
    /// Creates a client from app credentials and endpoint configuration.
    ///
    /// # Errors
    ///
    /// - [`TwitterError::InvalidAuthorizeUrl`] — the authorize URL does not
    ///   parse.
    /// - [`TwitterError::Http`] — the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(mut config: TwitterConfig, timeout_secs: u64) -> Result<Self, TwitterError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        let authorize_url =
            Url::parse(&config.authorize_url).map_err(|e| TwitterError::InvalidAuthorizeUrl {
                url: config.authorize_url.clone(),
                reason: e.to_string(),
            })?;
        config.api_base_url = config.api_base_url.trim_end_matches('/').to_owned();
        Ok(Self {
            client,
            config,
            authorize_url,
        })
    }

    /// Mints a new authorize URL with a fresh PKCE challenge.
    ///
    /// The returned `code_verifier` is the caller's to keep: it must come
    /// back on [`TwitterClient::exchange_code`] for the same attempt.
    #[must_use]
    pub fn authorization_request(&self) -> AuthorizationRequest {
        let code_verifier = random_urlsafe(CODE_VERIFIER_BYTES);
        let state = random_urlsafe(STATE_BYTES);

        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", &OAUTH_SCOPES.join(" "))
            .append_pair("state", &state)
            .append_pair("code_challenge", &code_challenge(&code_verifier))
            .append_pair("code_challenge_method", "S256");

        AuthorizationRequest {
            url: url.to_string(),
            state,
            code_verifier,
        }
    }

    /// Exchanges an authorization code (plus the verifier minted with it)
    /// for access and refresh tokens.
    ///
    /// # Errors
    ///
    /// - [`TwitterError::UnexpectedStatus`] — non-2xx response, including a
    ///   rejected code or verifier.
    /// - [`TwitterError::Http`] — transport failure.
    /// - [`TwitterError::Deserialize`] — body is not the expected JSON shape.
    pub async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenPair, TwitterError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code_verifier", code_verifier),
            ("client_id", self.config.client_id.as_str()),
        ];
        self.token_request(&params).await
    }

    /// Trades a refresh token for a new token pair.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`TwitterClient::exchange_code`].
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, TwitterError> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.config.client_id.as_str()),
        ];
        self.token_request(&params).await
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> Result<TokenPair, TwitterError> {
        let response = self
            .client
            .post(format!("{}/2/oauth2/token", self.config.api_base_url))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TwitterError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(TwitterError::Deserialize)
    }

    /// Publishes one tweet on behalf of the holder of `access_token`.
    ///
    /// # Errors
    ///
    /// - [`TwitterError::UnexpectedStatus`] — non-2xx response, including an
    ///   expired or insufficient token.
    /// - [`TwitterError::Http`] — transport failure.
    /// - [`TwitterError::Deserialize`] — body is not the expected JSON shape.
    pub async fn post_tweet(
        &self,
        access_token: &str,
        text: &str,
    ) -> Result<PostedTweet, TwitterError> {
        let response = self
            .client
            .post(format!("{}/2/tweets", self.config.api_base_url))
            .bearer_auth(access_token)
            .json(&TweetRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TwitterError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let parsed: TweetResponse = response.json().await.map_err(TwitterError::Deserialize)?;
        Ok(PostedTweet {
            id: parsed.data.id,
            text: parsed.data.text,
        })
    }
}

/// Random bytes, base64url-encoded without padding.
fn random_urlsafe(n_bytes: usize) -> String {
    let mut bytes = vec![0u8; n_bytes];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// S256 PKCE challenge for a verifier (RFC 7636 §4.2).
fn code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}
