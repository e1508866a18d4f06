pub mod accumulator;
pub mod api;
pub mod engine;
pub mod rate_limit;

pub use accumulator::ReviewAccumulator;
pub use engine::{CancelFlag, ReviewsScraper, ScrapeRequest};
pub use rate_limit::RateLimiter;
