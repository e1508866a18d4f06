use crate::error::Result;
use crate::models::Review;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Pretty-printed UTF-8 JSON array of reviews.
pub fn write_json(path: &Path, reviews: &[Review]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, reviews)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    fn sample() -> Vec<Review> {
        let retrieved = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        vec![
            Review {
                review_id: "r1".to_string(),
                user_name: "Ada".to_string(),
                user_url: Some("https://maps.example/contrib/1".to_string()),
                user_review_count: 12,
                rating: Some(4.5),
                relative_date: "2 weeks ago".to_string(),
                review_text: "Quiet, good espresso; naïve décor \u{2615}".to_string(),
                review_date: Some(retrieved - chrono::Duration::days(14)),
                owner_response_text: Some("Thank you!".to_string()),
                owner_response_date: Some(retrieved - chrono::Duration::days(7)),
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
    fn json_round_trip_reconstructs_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.json");
        let reviews = sample();

        write_json(&path, &reviews).unwrap();

        let file = File::open(&path).unwrap();
        let restored: Vec<Review> = serde_json::from_reader(file).unwrap();
        assert_eq!(restored, reviews);
    }

    #[test]
    fn artifact_is_a_json_array_with_expected_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.json");
        write_json(&path, &sample()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value.is_array());
        let first = &value[0];
        for field in [
            "review_id",
            "user_name",
            "user_url",
            "user_review_count",
            "rating",
            "relative_date",
            "review_text",
            "review_date",
            "owner_response_text",
            "owner_response_date",
            "retrieval_date",
        ] {
            assert!(first.get(field).is_some(), "missing field {field}");
        }
    }
}
