mod client;
mod error;

pub use client::{
    AuthorizationRequest, PostedTweet, TokenPair, TwitterClient, TwitterConfig, OAUTH_SCOPES,
};
pub use error::TwitterError;
