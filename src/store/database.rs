//! Database operations for the crawl store

use crate::store::error::DbError;
use crate::store::schema;
use crate::store::{FrontierEntry, JobRecord, PendingUrl};
use chrono::Utc;
use libsql::{Connection, Row, Value, params};
use tracing::{debug, instrument};

/// Database manager for the frontier and job record stores
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database manager
    #[instrument(skip(conn))]
    pub async fn new(conn: Connection) -> Result<Self, DbError> {
        schema::initialize_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Create a new database manager from a path
    pub async fn new_from_path(path: &str) -> Result<Self, DbError> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DbError::Connection(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| DbError::Connection(format!("Failed to connect to database: {}", e)))?;

        Self::new(conn).await
    }

    /// Record a discovered URL in the frontier
    ///
    /// Insert-if-absent: a URL already present keeps its original parent and
    /// depth no matter how often it is rediscovered.
    pub async fn enqueue(
        &self,
        url: &str,
        parent_url: Option<&str>,
        depth: u32,
    ) -> Result<(), DbError> {
        let now = Utc::now().timestamp();

        self.conn
            .execute(
                "INSERT INTO links (url, parent_url, depth, discovered_at)
                 VALUES (?, ?, ?, ?)
                 ON CONFLICT(url) DO NOTHING",
                params![url, opt_text(parent_url), depth as i64, now],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to enqueue link: {}", e)))?;

        Ok(())
    }

    /// Claim up to `max` uncrawled entries in discovery order
    pub async fn dequeue_batch(&self, max: usize) -> Result<Vec<PendingUrl>, DbError> {
        let mut rows = self
            .conn
            .query(
                "SELECT url, depth FROM links WHERE crawled = 0 ORDER BY id LIMIT ?",
                params![max as i64],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to dequeue batch: {}", e)))?;

        let mut batch = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            let url: String = row
                .get(0)
                .map_err(|e| DbError::Data(format!("Failed to get url: {}", e)))?;
            let depth: i64 = row
                .get(1)
                .map_err(|e| DbError::Data(format!("Failed to get depth: {}", e)))?;
            batch.push(PendingUrl {
                url,
                depth: depth as u32,
            });
        }

        debug!(claimed = batch.len(), "dequeued frontier batch");
        Ok(batch)
    }

    /// Flag a frontier entry as processed; idempotent
    pub async fn mark_crawled(&self, url: &str) -> Result<(), DbError> {
        self.conn
            .execute("UPDATE links SET crawled = 1 WHERE url = ?", params![url])
            .await
            .map_err(|e| DbError::Query(format!("Failed to mark link crawled: {}", e)))?;

        Ok(())
    }

    /// Look up a frontier entry by URL
    pub async fn frontier_entry(&self, url: &str) -> Result<Option<FrontierEntry>, DbError> {
        let mut rows = self
            .conn
            .query(
                "SELECT url, parent_url, depth, discovered_at, crawled
                 FROM links
                 WHERE url = ?",
                params![url],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to get frontier entry: {}", e)))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_frontier_entry(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DbError::Data(format!("Failed to get frontier entry: {}", e))),
        }
    }

    /// Insert or fully replace the record stored for `record.url`
    ///
    /// Whole-record last-write-wins: all fields except `url` and
    /// `created_at` are overwritten, never merged field-by-field.
    pub async fn upsert_job(&self, record: &JobRecord) -> Result<(), DbError> {
        let metadata = record.metadata.as_ref().map(|m| m.to_string());

        self.conn
            .execute(
                "INSERT INTO jobs (url, title, company, location, description, summary, metadata, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(url) DO UPDATE SET
                 title = excluded.title,
                 company = excluded.company,
                 location = excluded.location,
                 description = excluded.description,
                 summary = excluded.summary,
                 metadata = excluded.metadata",
                params![
                    record.url.clone(),
                    opt_text(record.title.as_deref()),
                    opt_text(record.company.as_deref()),
                    opt_text(record.location.as_deref()),
                    opt_text(record.description.as_deref()),
                    opt_text(record.summary.as_deref()),
                    opt_text(metadata.as_deref()),
                    record.created_at,
                ],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to upsert job: {}", e)))?;

        Ok(())
    }

    /// List stored postings, most recent first
    #[instrument(skip(self))]
    pub async fn list_jobs(&self, limit: usize) -> Result<Vec<JobRecord>, DbError> {
        let mut rows = self
            .conn
            .query(
                "SELECT url, title, company, location, description, summary, metadata, created_at
                 FROM jobs
                 ORDER BY id DESC
                 LIMIT ?",
                params![limit as i64],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to list jobs: {}", e)))?;

        let mut jobs = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            jobs.push(row_to_job_record(&row)?);
        }

        Ok(jobs)
    }
}

fn opt_text(value: Option<&str>) -> Value {
    match value {
        Some(text) => Value::Text(text.to_string()),
        None => Value::Null,
    }
}

fn nullable_text(row: &Row, idx: i32) -> Result<Option<String>, DbError> {
    match row
        .get_value(idx)
        .map_err(|e| DbError::Data(format!("Failed to get column {}: {}", idx, e)))?
    {
        Value::Text(text) => Ok(Some(text)),
        Value::Null => Ok(None),
        other => Err(DbError::Data(format!(
            "Unexpected value in column {}: {:?}",
            idx, other
        ))),
    }
}

fn row_to_frontier_entry(row: &Row) -> Result<FrontierEntry, DbError> {
    let depth: i64 = row
        .get(2)
        .map_err(|e| DbError::Data(format!("Failed to get depth: {}", e)))?;
    let crawled: i64 = row
        .get(4)
        .map_err(|e| DbError::Data(format!("Failed to get crawled: {}", e)))?;

    Ok(FrontierEntry {
        url: row
            .get(0)
            .map_err(|e| DbError::Data(format!("Failed to get url: {}", e)))?,
        parent_url: nullable_text(row, 1)?,
        depth: depth as u32,
        discovered_at: row
            .get(3)
            .map_err(|e| DbError::Data(format!("Failed to get discovered_at: {}", e)))?,
        crawled: crawled != 0,
    })
}

fn row_to_job_record(row: &Row) -> Result<JobRecord, DbError> {
    let metadata = match nullable_text(row, 6)? {
        Some(raw) => Some(
            serde_json::from_str(&raw)
                .map_err(|e| DbError::Data(format!("Failed to parse metadata: {}", e)))?,
        ),
        None => None,
    };

    Ok(JobRecord {
        url: row
            .get(0)
            .map_err(|e| DbError::Data(format!("Failed to get url: {}", e)))?,
        title: nullable_text(row, 1)?,
        company: nullable_text(row, 2)?,
        location: nullable_text(row, 3)?,
        description: nullable_text(row, 4)?,
        summary: nullable_text(row, 5)?,
        metadata,
        created_at: row
            .get(7)
            .map_err(|e| DbError::Data(format!("Failed to get created_at: {}", e)))?,
    })
}
