use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    /// The input did not parse as an absolute URL. No network call is made.
    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The job-creation request failed (transport error, non-success HTTP
    /// status, or a response lacking a job identifier). Not retried.
    #[error("crawl submission failed: {reason}")]
    SubmissionFailed { reason: String },

    /// All status-check attempts were exhausted without a completion signal.
    #[error("crawl job {job_id} did not complete within {attempts} status checks")]
    Timeout { job_id: String, attempts: u32 },
}
