use anyhow::Result;
use clap::Parser;
use gmaps_reviews::{OutputFormat, ReviewsScraper, ScrapeRequest, ScraperConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Scrape reviews for a single place from its map listing URL.
#[derive(Parser, Debug)]
#[command(name = "gmaps-reviews", version, about = "Google Maps reviews scraper")]
struct Cli {
    /// Google Maps URL of the place (must contain the 0x..:0x.. feature id)
    url: String,

    /// Stop after this many reviews (default: all the service will serve)
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Locale code passed to the service
    #[arg(long, default_value = "en")]
    hl: String,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file; when omitted, results are only counted and logged
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Proxy URL (http/https/socks5, credentials may be embedded)
    #[arg(long)]
    proxy: Option<String>,

    /// Seconds between successive page requests
    #[arg(long)]
    request_interval: Option<f64>,

    /// Attempt budget per page
    #[arg(long)]
    n_retries: Option<u32>,

    /// Seconds to wait before retrying a failed page
    #[arg(long)]
    retry_time: Option<f64>,

    /// Rotate browser identities randomly instead of in order
    #[arg(long)]
    random_impersonate: Option<bool>,

    /// Log filter, e.g. "debug" or "gmaps_reviews=trace" (RUST_LOG wins)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ScraperConfig::load()?;
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(interval) = cli.request_interval {
        config.request_interval = interval;
    }
    if let Some(retries) = cli.n_retries {
        config.n_retries = retries;
    }
    if let Some(retry_time) = cli.retry_time {
        config.retry_time = retry_time;
    }
    if let Some(random) = cli.random_impersonate {
        config.random_impersonate = random;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let scraper = ReviewsScraper::new(config)?;

    let mut request = ScrapeRequest::new(cli.url);
    request.n_reviews = cli.count;
    request.hl = cli.hl;
    request.output_format = cli.format;
    request.output_file = cli.output.clone();

    let reviews = scraper.scrape_reviews(&request).await?;

    info!(count = reviews.len(), "Scrape complete");
    match &cli.output {
        Some(path) => info!(path = %path.display(), "Output written"),
        None => info!("No output file requested; results were not persisted"),
    }

    Ok(())
}
