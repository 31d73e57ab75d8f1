//! Database schema for the crawl store
//!
//! Two tables, both URL-keyed: `links` is the frontier (and the resumption
//! checkpoint), `jobs` holds accepted postings. No other state is persisted.

use crate::store::error::DbError;
use libsql::{Connection, params};

/// Initialize the database schema
pub async fn initialize_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS links (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT NOT NULL UNIQUE,
            parent_url TEXT,
            depth INTEGER NOT NULL DEFAULT 0,
            discovered_at INTEGER NOT NULL,
            crawled INTEGER NOT NULL DEFAULT 0
        )",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create links table: {}", e)))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS jobs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT NOT NULL UNIQUE,
            title TEXT,
            company TEXT,
            location TEXT,
            description TEXT,
            summary TEXT,
            metadata TEXT,
            created_at INTEGER NOT NULL
        )",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create jobs table: {}", e)))?;

    // Every dequeue filters on crawled status
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_links_crawled ON links(crawled)",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create index on links: {}", e)))?;

    Ok(())
}
