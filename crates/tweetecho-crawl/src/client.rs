use std::time::Duration;

use reqwest::Client;

use crate::error::CrawlError;
use crate::poll::PollConfig;
use crate::types::{CrawlPage, CrawlStatusResponse, CrawlSubmitResponse};

const DEFAULT_TITLE: &str = "No title";
const DEFAULT_DESCRIPTION: &str = "No description";
const DEFAULT_CONTENT: &str = "No content";

/// HTTP client for an asynchronous crawl service (Firecrawl-style API).
///
/// Masks the service's job-based workflow behind a single call:
/// [`FirecrawlClient::extract_content`] submits a crawl job, polls its status
/// with exponential backoff, and extracts the page content once the job
/// completes. There is no cancellation; a started poll loop runs to
/// completion or exhaustion.
pub struct FirecrawlClient {
    client: Client,
    api_key: String,
    /// Job-creation endpoint; status checks append `/{job_id}`.
    endpoint: String,
    poll: PollConfig,
}

/// Structured content extracted from a completed crawl job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedPage {
    pub title: String,
    pub description: String,
    pub markdown: String,
}

impl ScrapedPage {
    /// Renders the page as three labeled sections separated by blank lines.
    ///
    /// Downstream consumers split on the `Title:` / `Description:` /
    /// `Content:` labels, so the label text and blank-line separators are a
    /// load-bearing format, not cosmetic.
    #[must_use]
    pub fn structured(&self) -> String {
        format!(
            "Title: {}\n\nDescription: {}\n\nContent: {}",
            self.title, self.description, self.markdown
        )
    }
}

impl FirecrawlClient {
    /// Creates a client with the given API key, endpoint, request timeout,
    /// and polling policy.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::SubmissionFailed`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        api_key: &str,
        endpoint: &str,
        timeout_secs: u64,
        poll: PollConfig,
    ) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| CrawlError::SubmissionFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            poll,
        })
    }

    /// Turns a URL into structured page content.
    ///
    /// Submits a crawl job for `url`, polls job status (sleeping before
    /// every check, backing off per the configured [`PollConfig`]), and
    /// extracts title, description, and markdown body from the first result
    /// entry of the completed job. Absent values fall back to
    /// `"No title"` / `"No description"` / `"No content"`.
    ///
    /// A transport failure or non-2xx status on a *status check* is
    /// transient: it consumes one attempt and backs off like any other
    /// attempt, but does not abort the loop.
    ///
    /// # Errors
    ///
    /// - [`CrawlError::InvalidUrl`] — `url` is not a well-formed absolute
    ///   URL; no network call is made.
    /// - [`CrawlError::SubmissionFailed`] — the job-creation request failed;
    ///   not retried.
    /// - [`CrawlError::Timeout`] — every status check was consumed without a
    ///   completion signal.
    pub async fn extract_content(&self, url: &str) -> Result<ScrapedPage, CrawlError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| CrawlError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        tracing::info!(url = %parsed, "submitting crawl job");
        let job_id = self.submit(parsed.as_str()).await?;

        tracing::debug!(job_id, "polling crawl job status");
        let page = self.poll_until_complete(&job_id).await?;

        Ok(extract_page(page))
    }

    /// Submits a crawl job and returns its identifier.
    async fn submit(&self, url: &str) -> Result<String, CrawlError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await
            .map_err(|e| CrawlError::SubmissionFailed {
                reason: format!("crawl submission request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CrawlError::SubmissionFailed {
                reason: format!("crawl service returned {status}: {body}"),
            });
        }

        let submit: CrawlSubmitResponse =
            response
                .json()
                .await
                .map_err(|e| CrawlError::SubmissionFailed {
                    reason: format!("crawl submission response did not parse: {e}"),
                })?;

        match submit.id {
            Some(id) if submit.success => Ok(id),
            _ => Err(CrawlError::SubmissionFailed {
                reason: "crawl submission response lacked a job identifier".to_owned(),
            }),
        }
    }

    /// Polls job status until completion or until every attempt is consumed.
    ///
    /// Returns the first result entry of the completed job, or `None` inside
    /// the page when the job completed with an empty `data` array.
    async fn poll_until_complete(&self, job_id: &str) -> Result<Option<CrawlPage>, CrawlError> {
        let status_url = format!("{}/{}", self.endpoint, job_id);

        for (attempt, delay) in self.poll.delay_schedule().into_iter().enumerate() {
            tokio::time::sleep(delay).await;

            let response = match self
                .client
                .get(&status_url)
                .bearer_auth(&self.api_key)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(job_id, attempt, error = %e, "crawl status check failed");
                    continue;
                }
            };

            if !response.status().is_success() {
                tracing::warn!(
                    job_id,
                    attempt,
                    status = %response.status(),
                    "crawl status check returned non-success status"
                );
                continue;
            }

            let status: CrawlStatusResponse = match response.json().await {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(job_id, attempt, error = %e, "crawl status response did not parse");
                    continue;
                }
            };

            if status.success && status.status == "completed" {
                tracing::info!(job_id, attempt, "crawl job completed");
                return Ok(status.data.into_iter().next());
            }

            tracing::debug!(job_id, attempt, status = %status.status, "crawl job not complete yet");
        }

        Err(CrawlError::Timeout {
            job_id: job_id.to_owned(),
            attempts: self.poll.max_attempts,
        })
    }
}

/// Pulls title/description/markdown out of a completed job's first result
/// entry, substituting defaults for anything absent.
fn extract_page(page: Option<CrawlPage>) -> ScrapedPage {
    let (markdown, metadata) = match page {
        Some(p) => (p.markdown, p.metadata),
        None => (None, None),
    };
    let (title, description) = match metadata {
        Some(m) => (m.title, m.description),
        None => (None, None),
    };

    ScrapedPage {
        title: title.unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
        description: description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_owned()),
        markdown: markdown.unwrap_or_else(|| DEFAULT_CONTENT.to_owned()),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
