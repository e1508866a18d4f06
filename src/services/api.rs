use crate::clients::Transport;
use crate::config::ScraperConfig;
use crate::error::{Error, Result};
use crate::extractors::parse_page;
use crate::models::ParsedPage;
use crate::services::rate_limit::RateLimiter;
use crate::utils::sleep_with_jitter;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

const BASE_URL: &str = "https://www.google.com/maps/rpc/listugcposts";
const PAGE_SIZE: u32 = 10;

static FEATURE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"0[xX][0-9a-fA-F]+:0[xX][0-9a-fA-F]+").expect("valid regex"));

/// Extract the place's feature id (`0x...:0x...`) from a listing URL.
pub fn feature_id_from_url(url: &str) -> Option<String> {
    FEATURE_ID.find(url).map(|m| m.as_str().to_string())
}

/// The protocol-buffer-shaped `pb` query parameter the listing endpoint
/// expects, mirroring observed browser traffic.
fn build_pb_param(feature_id: &str, page_token: &str, count: u32) -> String {
    let encoded = urlencoding::encode(feature_id);
    format!(
        "!1m6!1s{encoded}\
         !6m4!4m1!1e1!4m1!1e3\
         !2m2!1i{count}!2s{page_token}\
         !5m2!1stest!7e81\
         !8m9!2b1!3b1!5b1!7b1!12m4!1b1!2b1!4m1!1e1\
         !11m4!1e3!2e1!6m1!1i2!13m1!1e1"
    )
}

fn build_page_url(feature_id: &str, page_token: &str, hl: &str) -> String {
    let pb = build_pb_param(feature_id, page_token, PAGE_SIZE);
    format!("{BASE_URL}?authuser=0&hl={hl}&gl=us&pb={pb}")
}

fn request_headers(hl: &str) -> Vec<(&'static str, String)> {
    vec![
        ("accept", "*/*".to_string()),
        ("accept-language", format!("{hl}-US,{hl};q=0.9")),
        ("referer", "https://www.google.com/maps/".to_string()),
    ]
}

/// Fetches one listing page at a time, pacing requests through the rate
/// limiter and retrying transient failures within a per-page budget. A
/// body that fails structural parsing counts against the same budget as a
/// transport failure: both mean "try this page again".
pub struct RetryingFetcher {
    transport: Arc<dyn Transport>,
    limiter: RateLimiter,
    attempts_per_page: u32,
    retry_time: f64,
    feature_id: String,
    hl: String,
    attempts_on_page: u32,
}

impl RetryingFetcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        config: &ScraperConfig,
        feature_id: String,
        hl: String,
    ) -> Self {
        Self {
            transport,
            limiter: RateLimiter::new(config.request_interval),
            attempts_per_page: config.attempts_per_page(),
            retry_time: config.retry_time,
            feature_id,
            hl,
            attempts_on_page: 0,
        }
    }

    /// Attempts spent on the page currently being fetched. Resets to zero
    /// once a page comes back clean.
    pub fn attempts_on_page(&self) -> u32 {
        self.attempts_on_page
    }

    /// Fetch and decode the page identified by `token` (`None` for the
    /// first page). Non-retryable failures surface immediately; otherwise
    /// the budget is spent and [`Error::FetchExhausted`] carries the last
    /// observed failure.
    pub async fn fetch_page(&mut self, token: Option<&str>) -> Result<ParsedPage> {
        let url = build_page_url(&self.feature_id, token.unwrap_or_default(), &self.hl);
        let headers = request_headers(&self.hl);

        self.attempts_on_page = 0;
        let mut last_error = None;

        for attempt in 1..=self.attempts_per_page {
            self.attempts_on_page = attempt;
            self.limiter.wait().await;

            debug!(attempt, token = token.unwrap_or(""), "Requesting page");

            let result = match self.transport.get(&url, &headers).await {
                Ok(body) => parse_page(&body),
                Err(e) => Err(e),
            };

            match result {
                Ok(page) => {
                    self.attempts_on_page = 0;
                    return Ok(page);
                }
                Err(e) if !e.is_retryable() => {
                    warn!(error = %e, "Permanent rejection, not retrying");
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        attempt,
                        budget = self.attempts_per_page,
                        "Page fetch failed"
                    );
                    last_error = Some(e);
                    if attempt < self.attempts_per_page {
                        let retry_ms = (self.retry_time * 1000.0) as u64;
                        sleep_with_jitter(retry_ms, retry_ms / 4).await;
                    }
                }
            }
        }

        Err(Error::FetchExhausted {
            attempts: self.attempts_per_page,
            last_error: Box::new(last_error.expect("at least one attempt was made")),
        })
    }
}
