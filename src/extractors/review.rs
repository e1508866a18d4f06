use crate::models::Review;
use crate::utils::parse_relative_date;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::warn;

// Positional layout of one review fragment, discovered from the service's
// responses. A fragment is an array: id, metadata, content, owner response.
const IDX_REVIEW_ID: usize = 0;

const IDX_METADATA: usize = 1;
const IDX_META_TIMESTAMP_MICROS: usize = 2;
const IDX_META_USER: usize = 4;
const IDX_USER_INFO: usize = 5;
const IDX_USER_NAME: usize = 0;
const IDX_USER_URL: usize = 2;
const IDX_USER_REVIEW_COUNT: usize = 10;
const IDX_META_RELATIVE_DATE: usize = 6;

const IDX_CONTENT: usize = 2;
const IDX_CONTENT_RATING: usize = 0;
const IDX_CONTENT_TEXT: usize = 15;

const IDX_RESPONSE: usize = 3;
const IDX_RESPONSE_TIMESTAMP_MICROS: usize = 1;
const IDX_RESPONSE_RELATIVE_DATE: usize = 3;
const IDX_RESPONSE_TEXT: usize = 14;

static LEADING_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Map one raw fragment into a [`Review`]. Malformed fields degrade to
/// null/empty with a warning; this never fails, so one bad review cannot
/// abort a page.
pub fn normalize(fragment: &Value, retrieval_date: DateTime<Utc>) -> Review {
    let review_id = match fragment.get(IDX_REVIEW_ID).and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => {
            warn!(fragment = %fragment, "Review fragment carries no id");
            String::new()
        }
    };

    let metadata = fragment.get(IDX_METADATA);
    let user_info = metadata
        .and_then(|m| m.get(IDX_META_USER))
        .and_then(|u| u.get(IDX_USER_INFO));

    let user_name = user_info
        .and_then(|u| u.get(IDX_USER_NAME))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let user_url = user_info
        .and_then(|u| u.get(IDX_USER_URL))
        .and_then(|urls| urls.get(0))
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string);

    let user_review_count = user_info
        .and_then(|u| u.get(IDX_USER_REVIEW_COUNT))
        .and_then(|counts| counts.get(0))
        .and_then(extract_count)
        .unwrap_or(0);

    let relative_date = metadata
        .and_then(|m| m.get(IDX_META_RELATIVE_DATE))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let content = fragment.get(IDX_CONTENT);

    let rating = content
        .and_then(|c| c.get(IDX_CONTENT_RATING))
        .and_then(|r| r.get(0))
        .and_then(Value::as_f64);

    let review_text = content
        .and_then(|c| c.get(IDX_CONTENT_TEXT))
        .and_then(|t| t.get(0))
        .and_then(|t| t.get(0))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    // Prefer the provider's own timestamp; fall back to relative-date
    // arithmetic, which is only day-approximate.
    let review_date = metadata
        .and_then(|m| m.get(IDX_META_TIMESTAMP_MICROS))
        .and_then(timestamp_micros)
        .or_else(|| parse_relative_date(&relative_date, retrieval_date));

    let response = fragment.get(IDX_RESPONSE).filter(|r| r.is_array());

    let owner_response_text = response
        .and_then(|r| r.get(IDX_RESPONSE_TEXT))
        .and_then(|t| t.get(0))
        .and_then(|t| t.get(0))
        .and_then(Value::as_str)
        .map(str::to_string);

    let owner_response_date = response.and_then(|r| {
        r.get(IDX_RESPONSE_TIMESTAMP_MICROS)
            .and_then(timestamp_micros)
            .or_else(|| {
                let relative = r
                    .get(IDX_RESPONSE_RELATIVE_DATE)
                    .and_then(Value::as_str)?;
                parse_relative_date(relative, retrieval_date)
            })
    });

    Review {
        review_id,
        user_name,
        user_url,
        user_review_count,
        rating,
        relative_date,
        review_text,
        review_date,
        owner_response_text,
        owner_response_date,
        retrieval_date,
    }
}

/// Unix timestamp in microseconds, as a number or numeric string.
fn timestamp_micros(value: &Value) -> Option<DateTime<Utc>> {
    let micros = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }?;
    let parsed = DateTime::from_timestamp_micros(micros);
    if parsed.is_none() {
        warn!(micros, "Review timestamp out of range");
    }
    parsed
}

/// Review counts arrive as text like "123 reviews".
fn extract_count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => LEADING_COUNT.find(s)?.as_str().parse().ok(),
        _ => None,
    }
}
