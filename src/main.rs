//! # jobscout CLI
//!
//! Command-line entry point for the crawl pipeline:
//!
//! - `crawl`: seed the frontier with URLs and process up to the limit
//! - `resume`: continue draining a frontier left by an earlier run
//! - `jobs`: list postings already stored in the database
//!
//! Crawl reports print to stdout as JSON; logs go to stderr.

mod telemetry;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use jobscout::crawler::{Coordinator, CrawlOptions};
use jobscout::model::Client;
use jobscout::store::Database;
use tracing::instrument;

#[derive(Parser)]
#[command(author, version, about = "A bounded, resumable crawler that extracts structured job postings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl one or more seed URLs for job postings
    Crawl(CrawlArgs),

    /// Continue a crawl from the pending frontier
    Resume(ResumeArgs),

    /// List stored job postings
    Jobs(JobsArgs),
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Seed URLs to start from
    #[arg(required = true)]
    urls: Vec<String>,

    /// Link-following depth past the seeds
    #[arg(short = 'd', long, default_value = "1")]
    max_depth: u32,

    /// Maximum number of URLs to process
    #[arg(short, long, default_value = "50")]
    limit: usize,

    /// Skip summarizing accepted postings
    #[arg(long)]
    no_summarize: bool,

    /// Seconds allowed per URL
    #[arg(short, long, default_value = "60")]
    timeout: u64,

    /// Database path
    #[arg(long, default_value = "jobscout.db")]
    database: PathBuf,
}

#[derive(Args, Debug)]
struct ResumeArgs {
    /// Link-following depth past the seeds
    #[arg(short = 'd', long, default_value = "1")]
    max_depth: u32,

    /// Maximum number of URLs to process
    #[arg(short, long, default_value = "50")]
    limit: usize,

    /// Skip summarizing accepted postings
    #[arg(long)]
    no_summarize: bool,

    /// Seconds allowed per URL
    #[arg(short, long, default_value = "60")]
    timeout: u64,

    /// Database path
    #[arg(long, default_value = "jobscout.db")]
    database: PathBuf,
}

#[derive(Args, Debug)]
struct JobsArgs {
    /// Limit results
    #[arg(short, long, default_value = "20")]
    limit: usize,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Database path
    #[arg(long, default_value = "jobscout.db")]
    database: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing_subscriber();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Crawl(args)) => {
            crawl_command(args).await?;
        }
        Some(Commands::Resume(args)) => {
            resume_command(args).await?;
        }
        Some(Commands::Jobs(args)) => {
            jobs_command(args).await?;
        }
        None => {
            // If no command is provided, show help
            let _ = Cli::parse_from(["--help"]);
        }
    }

    Ok(())
}

fn options_from(max_depth: u32, limit: usize, no_summarize: bool, timeout: u64) -> CrawlOptions {
    CrawlOptions {
        max_depth,
        limit,
        summarize: !no_summarize,
        task_timeout: Duration::from_secs(timeout),
        ..Default::default()
    }
}

async fn open_database(path: &PathBuf) -> anyhow::Result<Database> {
    let path = path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("database path is not valid UTF-8"))?;
    Ok(Database::new_from_path(path).await?)
}

#[instrument]
async fn crawl_command(args: CrawlArgs) -> anyhow::Result<()> {
    let db = open_database(&args.database).await?;
    let client = Client::new_openai_from_env();
    let options = options_from(args.max_depth, args.limit, args.no_summarize, args.timeout);
    let coordinator = Coordinator::new(db, client.completion().clone(), options);

    let report = coordinator.run_crawl(&args.urls).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

#[instrument]
async fn resume_command(args: ResumeArgs) -> anyhow::Result<()> {
    let db = open_database(&args.database).await?;
    let client = Client::new_openai_from_env();
    let options = options_from(args.max_depth, args.limit, args.no_summarize, args.timeout);
    let coordinator = Coordinator::new(db, client.completion().clone(), options);

    let report = coordinator.resume().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

#[instrument]
async fn jobs_command(args: JobsArgs) -> anyhow::Result<()> {
    let db = open_database(&args.database).await?;
    let jobs = db.list_jobs(args.limit).await?;

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&jobs)?);
        }
        _ => {
            println!("Stored postings: {}", jobs.len());
            for (i, job) in jobs.iter().enumerate() {
                println!(
                    "{}. {} at {}",
                    i + 1,
                    job.title.as_deref().unwrap_or("(untitled)"),
                    job.company.as_deref().unwrap_or("(unknown company)")
                );
                println!("   URL: {}", job.url);
                if let Some(location) = &job.location {
                    println!("   Location: {}", location);
                }
                if let Some(summary) = &job.summary {
                    println!("   {}", summary);
                }
                println!();
            }
        }
    }

    Ok(())
}
