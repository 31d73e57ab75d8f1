//! Durable crawl state
//!
//! Two URL-keyed tables back the pipeline: the `links` frontier (discovered
//! URLs with depth and crawl status) and the `jobs` table (accepted
//! postings). The frontier doubles as the resumption checkpoint: a restarted
//! process picks up whatever was never marked crawled.

mod database;
pub mod error;
mod schema;

pub use database::Database;
pub use error::DbError;

use serde::Serialize;

/// A discovered URL recorded in the frontier
#[derive(Debug, Clone)]
pub struct FrontierEntry {
    /// Normalized absolute URL, unique within the frontier
    pub url: String,

    /// URL of the page this one was discovered on, None for seeds
    pub parent_url: Option<String>,

    /// Link-following hops from the original seed; fixed at first discovery
    pub depth: u32,

    /// Unix timestamp of first discovery
    pub discovered_at: i64,

    /// Whether a fetch/extract attempt has completed for this URL
    pub crawled: bool,
}

/// A frontier entry claimed for processing
#[derive(Debug, Clone)]
pub struct PendingUrl {
    pub url: String,
    pub depth: u32,
}

/// An accepted job posting, at most one per URL
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    /// URL of the posting page, unique key
    pub url: String,

    /// Role title
    pub title: Option<String>,

    /// Hiring company
    pub company: Option<String>,

    /// Primary location
    pub location: Option<String>,

    /// Long normalized description text
    pub description: Option<String>,

    /// Short oracle-produced summary, when enabled
    pub summary: Option<String>,

    /// Open-ended attribute map from extraction
    pub metadata: Option<serde_json::Value>,

    /// Unix timestamp of first acceptance; preserved across reprocessing
    pub created_at: i64,
}
