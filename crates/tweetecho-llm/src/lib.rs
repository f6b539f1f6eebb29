pub mod client;
pub mod error;
pub mod posts;
pub mod profile_gen;

pub use client::LlmClient;
pub use error::LlmError;
pub use posts::{generate_posts, GeneratedPosts, POST_COUNT};
pub use profile_gen::{generate_profile, GeneratedProfile};
