use std::time::Duration;
use tokio::time::Instant;

/// Enforces a minimum delay between successive requests. The interval is
/// measured from the moment the previous `wait` returned, so request
/// latency counts toward the gap. The first call never waits; a
/// non-positive interval disables throttling.
pub struct RateLimiter {
    interval: Duration,
    last: Option<Instant>,
}

impl RateLimiter {
    pub fn new(interval_secs: f64) -> Self {
        let interval = if interval_secs > 0.0 {
            Duration::from_secs_f64(interval_secs)
        } else {
            Duration::ZERO
        };
        Self {
            interval,
            last: None,
        }
    }

    pub async fn wait(&mut self) {
        if let Some(last) = self.last
            && !self.interval.is_zero()
        {
            tokio::time::sleep_until(last + self.interval).await;
        }
        self.last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_call_never_waits() {
        let mut limiter = RateLimiter::new(60.0);
        let start = Instant::now();
        limiter.wait().await;
        assert_eq!(Instant::now(), start);
    }

    #[tokio::test(start_paused = true)]
    async fn consecutive_calls_are_spaced_by_the_interval() {
        let mut limiter = RateLimiter::new(2.0);
        limiter.wait().await;
        let start = Instant::now();
        limiter.wait().await;
        assert_eq!(Instant::now() - start, Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_work_counts_toward_the_gap() {
        let mut limiter = RateLimiter::new(2.0);
        limiter.wait().await;
        tokio::time::sleep(Duration::from_secs(3)).await;
        let start = Instant::now();
        limiter.wait().await;
        // The interval already elapsed while "working"; no extra delay.
        assert_eq!(Instant::now(), start);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_disables_throttling() {
        let mut limiter = RateLimiter::new(0.0);
        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        limiter.wait().await;
        assert_eq!(Instant::now(), start);
    }
}
