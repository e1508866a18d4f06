use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

pub async fn sleep_with_jitter(base_ms: u64, jitter_ms: u64) {
    let jitter = rand::rng().random_range(0..=jitter_ms);
    tokio::time::sleep(std::time::Duration::from_millis(base_ms + jitter)).await;
}

static RELATIVE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*(minute|hour|day|week|month|year)s?\s+ago").expect("valid regex")
});

/// Resolve a relative date string like "2 weeks ago" against a reference
/// time. Only the numeric `"<n> <unit> ago"` phrasing is recognized;
/// months count as 30 days and years as 365. Anything else ("a year ago",
/// localized units, arbitrary text) resolves to `None`.
pub fn parse_relative_date(
    relative_date: &str,
    reference: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let normalized = relative_date.trim().to_lowercase();
    let caps = RELATIVE_DATE.captures(&normalized)?;

    let value: i64 = caps[1].parse().ok()?;
    let delta = match &caps[2] {
        "minute" => Duration::try_minutes(value),
        "hour" => Duration::try_hours(value),
        "day" => Duration::try_days(value),
        "week" => Duration::try_weeks(value),
        "month" => Duration::try_days(value.checked_mul(30)?),
        "year" => Duration::try_days(value.checked_mul(365)?),
        _ => None,
    }?;

    reference.checked_sub_signed(delta)
}
