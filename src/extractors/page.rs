use crate::error::{Error, Result};
use crate::models::ParsedPage;
use serde_json::Value;
use tracing::warn;

/// Anti-hijacking prefix the service prepends to every JSON body.
const SECURITY_PREFIX: &str = ")]}'";

// Positional layout of one listing page. The payload is an array, not an
// object; these offsets are the schema.
const IDX_NEXT_PAGE_TOKEN: usize = 1;
const IDX_REVIEW_ITEMS: usize = 2;
const IDX_ITEM_FRAGMENT: usize = 0;

/// Decode one raw page body into the continuation token and the ordered
/// per-review fragments. Structural deviations at the page level are
/// [`Error::PageParse`]; a payload too short to carry items signals clean
/// exhaustion.
pub fn parse_page(raw_body: &str) -> Result<ParsedPage> {
    let body = raw_body.strip_prefix(SECURITY_PREFIX).unwrap_or(raw_body);

    let data: Value = serde_json::from_str(body.trim_start())
        .map_err(|e| Error::PageParse(format!("invalid JSON payload: {e}")))?;
    let Value::Array(data) = data else {
        return Err(Error::PageParse(
            "top-level payload is not an array".to_string(),
        ));
    };

    if data.len() <= IDX_REVIEW_ITEMS {
        return Ok(ParsedPage::default());
    }

    let next_token = match &data[IDX_NEXT_PAGE_TOKEN] {
        Value::String(token) if !token.is_empty() => Some(token.clone()),
        Value::String(_) | Value::Null => None,
        other => {
            return Err(Error::PageParse(format!(
                "continuation token slot holds {other:?}, expected string or null"
            )));
        }
    };

    let raw_entries = match &data[IDX_REVIEW_ITEMS] {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Array(fields) if !fields.is_empty() => {
                    Some(fields[IDX_ITEM_FRAGMENT].clone())
                }
                other => {
                    warn!(item = %other, "Skipping review item with unexpected shape");
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            return Err(Error::PageParse(format!(
                "review list slot holds {}, expected array or null",
                type_name(other)
            )));
        }
    };

    Ok(ParsedPage {
        next_token,
        raw_entries,
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page_body(token: Value, items: Value) -> String {
        format!(")]}}'\n{}", json!([null, token, items]))
    }

    #[test]
    fn extracts_token_and_fragments_in_order() {
        let body = page_body(
            json!("tok-2"),
            json!([[["id-1", null]], [["id-2", null]]]),
        );
        let page = parse_page(&body).unwrap();

        assert_eq!(page.next_token.as_deref(), Some("tok-2"));
        assert_eq!(page.raw_entries.len(), 2);
        assert_eq!(page.raw_entries[0][0], json!("id-1"));
        assert_eq!(page.raw_entries[1][0], json!("id-2"));
    }

    #[test]
    fn null_or_empty_token_means_last_page() {
        let page = parse_page(&page_body(json!(null), json!([[["id-1"]]]))).unwrap();
        assert_eq!(page.next_token, None);

        let page = parse_page(&page_body(json!(""), json!([[["id-1"]]]))).unwrap();
        assert_eq!(page.next_token, None);
    }

    #[test]
    fn short_payload_is_clean_exhaustion() {
        let page = parse_page(")]}'\n[null]").unwrap();
        assert!(page.is_exhausted());

        let page = parse_page("[]").unwrap();
        assert!(page.is_exhausted());
    }

    #[test]
    fn null_review_list_yields_no_entries() {
        let page = parse_page(&page_body(json!("tok"), json!(null))).unwrap();
        assert_eq!(page.next_token.as_deref(), Some("tok"));
        assert!(page.raw_entries.is_empty());
    }

    #[test]
    fn malformed_items_are_skipped_not_fatal() {
        let body = page_body(json!("tok"), json!([[["id-1"]], "stray", []]));
        let page = parse_page(&body).unwrap();
        assert_eq!(page.raw_entries.len(), 1);
    }

    #[test]
    fn structural_deviations_are_parse_errors() {
        assert!(matches!(
            parse_page("<html>blocked</html>"),
            Err(Error::PageParse(_))
        ));
        assert!(matches!(
            parse_page(r#"{"data": []}"#),
            Err(Error::PageParse(_))
        ));
        assert!(matches!(
            parse_page(&page_body(json!(42), json!([]))),
            Err(Error::PageParse(_))
        ));
        assert!(matches!(
            parse_page(&page_body(json!("tok"), json!("not-a-list"))),
            Err(Error::PageParse(_))
        ));
    }

    #[test]
    fn body_without_prefix_still_parses() {
        let body = json!([null, "tok", [[["id-1"]]]]).to_string();
        let page = parse_page(&body).unwrap();
        assert_eq!(page.next_token.as_deref(), Some("tok"));
    }
}
