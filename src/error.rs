//! Error types for the jobscout crate

use thiserror::Error;

/// Result type for jobscout operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for jobscout operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid caller input, rejected before any crawling starts
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Persistence layer failure, fatal to the current crawl pass
    #[error("Database error: {0}")]
    Database(String),

    /// Crawl coordination error
    #[error("Crawl error: {0}")]
    Crawl(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
