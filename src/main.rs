//! Heritage scraper CLI
//!
//! Appends Hebrew Wikipedia articles and Yizkor life stories to a CSV store.

use clap::Parser;
use heritage_scraper::config::ScraperConfigBuilder;
use heritage_scraper::{CsvFileSink, HttpFetcher, Pipeline, ScraperConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Scrape Hebrew Wikipedia and Yizkor memorial sites to heritage_import.csv
#[derive(Parser, Debug)]
#[command(name = "heritage-scrape")]
#[command(version)]
#[command(about = "Scrape Hebrew Wikipedia and Yizkor memorial sites to heritage_import.csv")]
struct Args {
    /// One or more URLs to scrape
    #[arg(required = true)]
    urls: Vec<String>,

    /// CSV store to append to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pause before each request in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Retries on transient HTTP failures
    #[arg(long)]
    retries: Option<u32>,

    /// Request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn build_config(args: &Args) -> anyhow::Result<ScraperConfig> {
    let mut builder = ScraperConfigBuilder::from_config(ScraperConfig::from_env()?);
    if let Some(path) = &args.output {
        builder = builder.csv_path(path.clone());
    }
    if let Some(ms) = args.delay_ms {
        builder = builder.polite_delay_ms(ms);
    }
    if let Some(retries) = args.retries {
        builder = builder.max_retries(retries);
    }
    if let Some(ms) = args.timeout_ms {
        builder = builder.timeout_ms(ms);
    }
    Ok(builder.build())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = build_config(&args)?;
    let csv_path = config.csv_path.clone();
    tracing::debug!("Configuration: {:?}", config);

    let sink = CsvFileSink::new(csv_path.clone());
    let mut pipeline = Pipeline::new(HttpFetcher::new(config)?, sink);

    println!("Processing {} URLs...", args.urls.len());
    println!("{}", "-".repeat(60));

    let summary = pipeline
        .run_batch(&args.urls, |_, outcome| println!("{}", outcome))
        .await;

    println!("{}", "-".repeat(60));
    println!(
        "Completed: {}/{} URLs successfully processed",
        summary.success_count(),
        summary.total()
    );
    if summary.success_count() > 0 {
        println!("Results appended to: {}", csv_path.display());
    }

    tracing::info!("{}", pipeline.metrics().summary());
    Ok(())
}
