use chrono::Utc;
use rig::completion::CompletionModel;
use tracing::{debug, info, instrument};
use url::Url;

use crate::crawler::{CrawlOptions, CrawlReport, CrawlResult, PageSuccess};
use crate::discover;
use crate::error::{Error, Result};
use crate::extract;
use crate::fetcher::Fetcher;
use crate::model::ratelimited_completion::RateLimitedCompletionModel;
use crate::store::{Database, JobRecord, PendingUrl};

/// Drives the crawl: claims frontier batches, runs the per-URL pipeline
/// concurrently, and persists accepted postings.
///
/// Store failures abort the run; everything downstream of the store (fetch,
/// oracle, parse) degrades to a per-URL failure result.
#[derive(Clone)]
pub struct Coordinator<C: CompletionModel + 'static> {
    db: Database,
    fetcher: Fetcher,
    model: RateLimitedCompletionModel<C>,
    options: CrawlOptions,
}

impl<C: CompletionModel + 'static> Coordinator<C> {
    pub fn new(db: Database, model: RateLimitedCompletionModel<C>, options: CrawlOptions) -> Self {
        Self {
            db,
            fetcher: Fetcher::new(),
            model,
            options,
        }
    }

    /// Seed the frontier and drain it until the limit is hit or it runs dry.
    ///
    /// Seeds enter at depth 0; already-known seed URLs keep their original
    /// depth. Every seed must be an absolute, parseable URL.
    #[instrument(skip(self, seeds), fields(seeds = seeds.len()))]
    pub async fn run_crawl(&self, seeds: &[String]) -> Result<CrawlReport> {
        self.options.validate()?;
        if seeds.is_empty() {
            return Err(Error::InvalidRequest(
                "at least one seed URL is required".to_string(),
            ));
        }
        for seed in seeds {
            let parsed = Url::parse(seed)
                .map_err(|e| Error::InvalidRequest(format!("invalid seed URL {}: {}", seed, e)))?;
            self.db.enqueue(parsed.as_str(), None, 0).await?;
        }
        self.drain().await
    }

    /// Drain whatever the frontier already holds, without new seeds.
    #[instrument(skip(self))]
    pub async fn resume(&self) -> Result<CrawlReport> {
        self.options.validate()?;
        self.drain().await
    }

    async fn drain(&self) -> Result<CrawlReport> {
        let mut results: Vec<CrawlResult> = Vec::new();
        while results.len() < self.options.limit {
            let want = self.options.batch_size.min(self.options.limit - results.len());
            let batch = self.db.dequeue_batch(want).await?;
            if batch.is_empty() {
                break;
            }

            let mut handles = Vec::with_capacity(batch.len());
            for entry in batch {
                let coordinator = self.clone();
                handles.push(tokio::spawn(
                    async move { coordinator.process_entry(entry).await },
                ));
            }
            for handle in handles {
                let outcome = handle
                    .await
                    .map_err(|e| Error::Crawl(format!("crawl task panicked: {}", e)))??;
                if let Some(result) = outcome {
                    results.push(result);
                }
            }
        }
        info!(processed = results.len(), "crawl pass finished");
        Ok(CrawlReport {
            count: results.len(),
            results,
        })
    }

    /// Run one frontier entry through the pipeline under the task deadline.
    ///
    /// Entries beyond the configured depth are retired without a fetch and
    /// produce no result. The entry is marked crawled exactly once, after
    /// the attempt finishes either way.
    async fn process_entry(self, entry: PendingUrl) -> Result<Option<CrawlResult>> {
        if entry.depth > self.options.max_depth {
            debug!(url = %entry.url, depth = entry.depth, "skipping entry beyond depth limit");
            self.db.mark_crawled(&entry.url).await?;
            return Ok(None);
        }

        let result = match tokio::time::timeout(self.options.task_timeout, self.scrape(&entry))
            .await
        {
            Ok(result) => result?,
            Err(_) => CrawlResult::failure(&entry.url, "deadline exceeded"),
        };

        self.db.mark_crawled(&entry.url).await?;
        Ok(Some(result))
    }

    async fn scrape(&self, entry: &PendingUrl) -> Result<CrawlResult> {
        let html = match self.fetcher.fetch(&entry.url).await {
            Ok(html) => html,
            Err(e) => {
                debug!(url = %entry.url, error = %e, "fetch failed");
                return Ok(CrawlResult::failure(&entry.url, e.to_string()));
            }
        };

        let candidate = extract::extract_job(&self.model, &entry.url, &html).await;
        let is_posting = extract::is_likely_posting(&entry.url, &candidate);

        // Leaf depth never discovers: its children could not be processed
        let mut selected = Vec::new();
        if entry.depth < self.options.max_depth {
            if let Ok(base) = Url::parse(&entry.url) {
                let candidates = discover::discover_links(&html, &base, discover::RAW_LINK_CAP);
                selected = discover::rank_links(&self.model, &base, &candidates).await;
            }
        }

        let summary = if is_posting {
            extract::summarize_description(
                &self.model,
                candidate.description.as_deref(),
                self.options.summarize,
            )
            .await
        } else {
            None
        };

        if is_posting {
            let record = JobRecord {
                url: entry.url.clone(),
                title: candidate.title.clone(),
                company: candidate.company.clone(),
                location: candidate.location.clone(),
                description: candidate.description.clone(),
                summary: summary.clone(),
                metadata: candidate.metadata.clone(),
                created_at: Utc::now().timestamp(),
            };
            self.db.upsert_job(&record).await?;
            info!(url = %entry.url, title = ?record.title, "stored job posting");
        }

        for url in &selected {
            self.db.enqueue(url, Some(&entry.url), entry.depth + 1).await?;
        }

        Ok(CrawlResult::success(PageSuccess {
            url: entry.url.clone(),
            success: true,
            title: candidate.title,
            company: candidate.company,
            location: candidate.location,
            description: candidate.description,
            summary,
            metadata: candidate.metadata,
            is_posting,
            discovered_links: selected,
        }))
    }
}
