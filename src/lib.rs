//! # jobscout - bounded, resumable job posting crawler
//!
//! Given a set of seed URLs, jobscout discovers in-domain pages, classifies
//! which ones are genuine single-role job postings (as opposed to listing or
//! career-hub pages), extracts structured fields with an LLM oracle, and
//! persists each accepted posting exactly once per URL.
//!
//! ## Features
//!
//! - Durable URL frontier with insert-if-absent dedup and depth tracking
//! - Depth-bounded, budget-bounded crawl coordination over batched tasks
//! - Oracle-backed field extraction with a strict-JSON contract and
//!   graceful degradation when the oracle misbehaves
//! - Ordered classification heuristic separating postings from listing pages
//! - Oracle-assisted link ranking with a keyword-heuristic fallback
//! - Crash-safe resumption: the frontier doubles as the checkpoint, so a
//!   restarted process only repeats work that was never marked crawled
//!
//! ## Example
//!
//! ```rust,no_run
//! use jobscout::crawler::{Coordinator, CrawlOptions};
//! use jobscout::model::Client;
//! use jobscout::store::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new_from_path("jobscout.db").await?;
//!     let client = Client::new_openai_from_env();
//!
//!     let coordinator =
//!         Coordinator::new(db, client.completion().clone(), CrawlOptions::default());
//!     let report = coordinator
//!         .run_crawl(&["https://acme.com/careers".to_string()])
//!         .await?;
//!
//!     println!("{} pages attempted", report.count);
//!     Ok(())
//! }
//! ```

mod error;

pub mod crawler;
pub mod discover;
pub mod extract;
pub mod fetcher;
pub mod model;
pub mod store;

pub use error::Error;

/// Re-export of common types for public use
pub mod prelude {
    pub use crate::crawler::{Coordinator, CrawlOptions, CrawlReport, CrawlResult};
    pub use crate::error::{Error, Result};
}
