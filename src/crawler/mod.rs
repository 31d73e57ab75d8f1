//! Crawl orchestration
//!
//! The coordinator drains the frontier in batches, running the
//! fetch/extract/classify/discover pipeline per URL and collecting one
//! result per processed entry. Options are validated up front; per-URL
//! failures become `CrawlResult::Failure` entries rather than errors.

mod coordinator;

pub use coordinator::Coordinator;

use std::time::Duration;

use serde::Serialize;

use crate::error::Error;

/// Deepest crawl allowed
pub const MAX_DEPTH_BOUND: u32 = 3;

/// Most results one run may produce
pub const MAX_RESULT_LIMIT: usize = 500;

/// Tunable bounds for a crawl run
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Link-following hops past the seeds (0 means seeds only)
    pub max_depth: u32,

    /// Stop after this many processed URLs
    pub limit: usize,

    /// Whether accepted postings get an oracle summary
    pub summarize: bool,

    /// Frontier entries claimed per batch
    pub batch_size: usize,

    /// Deadline for one URL's full pipeline
    pub task_timeout: Duration,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: 1,
            limit: 50,
            summarize: true,
            batch_size: 10,
            task_timeout: Duration::from_secs(60),
        }
    }
}

impl CrawlOptions {
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_depth > MAX_DEPTH_BOUND {
            return Err(Error::InvalidRequest(format!(
                "max_depth must be at most {}, got {}",
                MAX_DEPTH_BOUND, self.max_depth
            )));
        }
        if self.limit == 0 || self.limit > MAX_RESULT_LIMIT {
            return Err(Error::InvalidRequest(format!(
                "limit must be between 1 and {}, got {}",
                MAX_RESULT_LIMIT, self.limit
            )));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidRequest(
                "batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// What one run accomplished
#[derive(Debug, Serialize)]
pub struct CrawlReport {
    /// Number of URLs processed this run
    pub count: usize,

    /// One entry per processed URL
    pub results: Vec<CrawlResult>,
}

/// Outcome for a single processed URL
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CrawlResult {
    Success(Box<PageSuccess>),
    Failure(PageFailure),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSuccess {
    pub url: String,
    pub success: bool,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub is_posting: bool,
    pub discovered_links: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFailure {
    pub url: String,
    pub success: bool,
    pub error: String,
}

impl CrawlResult {
    pub(crate) fn success(page: PageSuccess) -> Self {
        Self::Success(Box::new(page))
    }

    pub(crate) fn failure(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Failure(PageFailure {
            url: url.into(),
            success: false,
            error: error.into(),
        })
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Success(page) => &page.url,
            Self::Failure(page) => &page.url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_validate() {
        assert!(CrawlOptions::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_depth() {
        let options = CrawlOptions {
            max_depth: MAX_DEPTH_BOUND + 1,
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_limit() {
        for limit in [0, MAX_RESULT_LIMIT + 1] {
            let options = CrawlOptions {
                limit,
                ..Default::default()
            };
            assert!(matches!(
                options.validate(),
                Err(Error::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn test_result_serializes_success_flag() {
        let result = CrawlResult::failure("https://acme.com/jobs/1", "HTTP 500");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["url"], "https://acme.com/jobs/1");
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "HTTP 500");
    }

    #[test]
    fn test_success_serializes_discovered_link_urls() {
        let result = CrawlResult::success(PageSuccess {
            url: "https://acme.com/careers".to_string(),
            success: true,
            title: None,
            company: None,
            location: None,
            description: None,
            summary: None,
            metadata: None,
            is_posting: false,
            discovered_links: vec!["https://acme.com/jobs/1".to_string()],
        });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(
            json["discoveredLinks"],
            serde_json::json!(["https://acme.com/jobs/1"])
        );
    }
}
