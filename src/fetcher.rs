//! Page fetching with a fixed client identity
//!
//! One GET per frontier entry, no retries. A failed fetch becomes a per-entry
//! error recorded by the coordinator; it never aborts the batch.

use thiserror::Error;
use tracing::debug;

/// Identity sent with every request
pub const USER_AGENT: &str = concat!("jobscout/", env!("CARGO_PKG_VERSION"));

const ACCEPT: &str = "text/html,application/xhtml+xml";

/// Error type for fetch operations
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with a non-success status
    #[error("HTTP {0}")]
    Status(u16),

    /// Transport-level failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// HTTP fetcher for crawl targets
#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the raw markup behind `url`
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!(url, bytes = body.len(), "fetched page");
        Ok(body)
    }
}
