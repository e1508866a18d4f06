use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized review. `review_id` is the provider's stable identifier
/// and the dedup key within a scrape session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: String,
    pub user_name: String,
    pub user_url: Option<String>,
    pub user_review_count: u32,
    pub rating: Option<f64>,
    /// Date string as shown by the service, e.g. "2 weeks ago".
    pub relative_date: String,
    pub review_text: String,
    /// Absolute timestamp, best-effort: the provider's own timestamp when
    /// present, otherwise derived from `relative_date` and `retrieval_date`.
    pub review_date: Option<DateTime<Utc>>,
    pub owner_response_text: Option<String>,
    pub owner_response_date: Option<DateTime<Utc>>,
    /// When the page that produced this record was fetched. Fixed at creation.
    pub retrieval_date: DateTime<Utc>,
}
