use crate::clients::{ClientPool, RquestTransport, Transport};
use crate::config::ScraperConfig;
use crate::error::{Error, Result};
use crate::extractors::normalize;
use crate::models::Review;
use crate::services::accumulator::ReviewAccumulator;
use crate::services::api::{RetryingFetcher, feature_id_from_url};
use crate::storage::{self, OutputFormat, TempStore};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

/// Cooperative cancellation signal, observed between pages. Cancelling
/// ends the session with whatever was accumulated, like any other early
/// termination.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One scrape job: the place URL plus bounds and output destination.
#[derive(Clone, Debug)]
pub struct ScrapeRequest {
    pub url: String,
    /// Stop once this many reviews are collected; `None` scrapes until the
    /// listing is exhausted.
    pub n_reviews: Option<usize>,
    pub hl: String,
    pub output_format: OutputFormat,
    /// Final artifact path; when `None` the result is only returned.
    pub output_file: Option<PathBuf>,
    pub cancel: CancelFlag,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            n_reviews: None,
            hl: "en".to_string(),
            output_format: OutputFormat::Json,
            output_file: None,
            cancel: CancelFlag::new(),
        }
    }
}

/// Drives the fetch → parse → normalize → absorb → persist loop for one
/// place until the listing is exhausted, the target count is reached, the
/// pagination stalls, the caller cancels, or the retry budget runs out.
pub struct ReviewsScraper {
    config: ScraperConfig,
    transport: Arc<dyn Transport>,
    temp_dir: PathBuf,
}

impl ReviewsScraper {
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let pool = ClientPool::new(config.proxy.as_deref(), config.random_impersonate)?;
        Ok(Self::with_transport(
            config,
            Arc::new(RquestTransport::new(pool)),
        ))
    }

    /// Build against a caller-supplied transport, e.g. a scripted one in
    /// tests.
    pub fn with_transport(config: ScraperConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            temp_dir: PathBuf::from("tmp"),
        }
    }

    /// Override where page-by-page snapshots are written (default `./tmp`).
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    /// Scrape reviews for one place. Later-page failures return what was
    /// gathered so far; only a failure on the very first page, with
    /// nothing accumulated, is reported as an error.
    pub async fn scrape_reviews(&self, request: &ScrapeRequest) -> Result<Vec<Review>> {
        let feature_id = feature_id_from_url(&request.url)
            .ok_or_else(|| Error::InvalidUrl(request.url.clone()))?;

        info!(feature_id = %feature_id, "Starting review scrape");
        if let Some(target) = request.n_reviews {
            info!(target, "Bounded scrape");
        }

        let mut fetcher = RetryingFetcher::new(
            self.transport.clone(),
            &self.config,
            feature_id.clone(),
            request.hl.clone(),
        );
        let snapshot = TempStore::new(&self.temp_dir, &feature_id, request.output_format);
        let mut accumulator = ReviewAccumulator::new();
        let mut token: Option<String> = None;
        let mut keep_snapshot = false;

        loop {
            if request.cancel.is_cancelled() {
                warn!(
                    collected = accumulator.len(),
                    "Cancelled; keeping partial results"
                );
                keep_snapshot = true;
                break;
            }

            let page = match fetcher.fetch_page(token.as_deref()).await {
                Ok(page) => page,
                Err(e) if accumulator.is_empty() => {
                    error!(error = %e, "Scrape failed before any review was collected");
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        collected = accumulator.len(),
                        recovery_file = %snapshot.path().display(),
                        "Terminating early; returning partial results"
                    );
                    keep_snapshot = true;
                    break;
                }
            };

            let retrieval_date = Utc::now();
            let reviews: Vec<Review> = page
                .raw_entries
                .iter()
                .map(|fragment| normalize(fragment, retrieval_date))
                .collect();
            let added = accumulator.absorb(reviews);

            if let Err(e) = snapshot.persist(accumulator.reviews()) {
                warn!(
                    error = %e,
                    path = %snapshot.path().display(),
                    "Snapshot write failed; continuing in memory"
                );
            }

            info!(
                page_new = added,
                collected = accumulator.len(),
                "Page processed"
            );

            token = page.next_token;

            if token.is_none() {
                info!(collected = accumulator.len(), "Listing exhausted");
                break;
            }
            if let Some(target) = request.n_reviews
                && accumulator.len() >= target
            {
                info!(target, "Target reached");
                break;
            }
            if added == 0 {
                warn!(
                    collected = accumulator.len(),
                    "Page contributed no new reviews; treating the token as stale"
                );
                break;
            }
        }

        let mut reviews = accumulator.into_reviews();
        if let Some(target) = request.n_reviews {
            reviews.truncate(target);
        }

        if let Some(path) = &request.output_file {
            storage::write_reviews(path, request.output_format, &reviews)?;
            info!(count = reviews.len(), path = %path.display(), "Saved final output");
        }

        if !keep_snapshot && let Err(e) = snapshot.remove() {
            warn!(error = %e, "Could not remove temporary snapshot");
        }

        Ok(reviews)
    }

    /// Blocking variant for non-async callers: the same sequential
    /// algorithm, run to completion on a private runtime. Must not be
    /// called from within an async context.
    pub fn scrape_reviews_blocking(&self, request: &ScrapeRequest) -> Result<Vec<Review>> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?
            .block_on(self.scrape_reviews(request))
    }
}
