//! Wire types for the crawl service's JSON responses.

use serde::Deserialize;

/// Response to a job-creation request: `{"success": true, "id": "..."}`.
#[derive(Debug, Deserialize)]
pub struct CrawlSubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub id: Option<String>,
}

/// Response to a status check: `{"success", "status", "data": [...]}`.
#[derive(Debug, Deserialize)]
pub struct CrawlStatusResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: Vec<CrawlPage>,
}

/// One crawled page within a completed job.
#[derive(Debug, Deserialize)]
pub struct CrawlPage {
    #[serde(default)]
    pub markdown: Option<String>,
    #[serde(default)]
    pub metadata: Option<CrawlPageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct CrawlPageMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
