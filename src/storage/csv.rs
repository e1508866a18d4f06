use crate::error::Result;
use crate::models::Review;
use std::path::Path;

/// One row per review with a header row, UTF-8. Field order follows the
/// record's declaration order.
pub fn write_csv(path: &Path, reviews: &[Review]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for review in reviews {
        writer.serialize(review)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample() -> Vec<Review> {
        let retrieved = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        vec![
            Review {
                review_id: "r1".to_string(),
                user_name: "Ada, \"the regular\"".to_string(),
                user_url: Some("https://maps.example/contrib/1".to_string()),
                user_review_count: 12,
                rating: Some(4.5),
                relative_date: "2 weeks ago".to_string(),
                review_text: "Line one\nline two, with commas".to_string(),
                review_date: Some(retrieved - chrono::Duration::days(14)),
                owner_response_text: Some("Thanks!".to_string()),
                owner_response_date: None,
                retrieval_date: retrieved,
            },
            Review {
                review_id: "r2".to_string(),
                user_name: "Grace".to_string(),
                user_url: None,
                user_review_count: 0,
                rating: None,
                relative_date: "a year ago".to_string(),
                review_text: String::new(),
                review_date: None,
                owner_response_text: None,
                owner_response_date: None,
                retrieval_date: retrieved,
            },
        ]
    }

    #[test]
    fn csv_round_trip_reparses_to_equal_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.csv");
        let reviews = sample();

        write_csv(&path, &reviews).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let restored: Vec<Review> = reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(restored, reviews);
    }

    #[test]
    fn header_row_lists_the_record_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.csv");
        write_csv(&path, &sample()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.get(0), Some("review_id"));
        assert_eq!(headers.get(4), Some("rating"));
        assert_eq!(headers.get(10), Some("retrieval_date"));
    }
}
