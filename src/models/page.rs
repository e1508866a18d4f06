use serde_json::Value;

/// One decoded listing page: the continuation token for the next page
/// (`None` on the last page) and the untouched per-review fragments in
/// the order the service returned them.
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    pub next_token: Option<String>,
    pub raw_entries: Vec<Value>,
}

impl ParsedPage {
    /// An empty page with no continuation token is clean exhaustion,
    /// not an error.
    pub fn is_exhausted(&self) -> bool {
        self.next_token.is_none() && self.raw_entries.is_empty()
    }
}
