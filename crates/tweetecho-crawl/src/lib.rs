pub mod client;
pub mod error;
pub mod poll;
pub mod types;

pub use client::{FirecrawlClient, ScrapedPage};
pub use error::CrawlError;
pub use poll::PollConfig;
