use crate::models::Review;
use std::collections::HashSet;
use tracing::debug;

/// Insertion-ordered collection of reviews, deduplicated by `review_id`.
/// First occurrence wins: a later page replaying an already-seen id is
/// dropped, never overwritten.
#[derive(Default)]
pub struct ReviewAccumulator {
    reviews: Vec<Review>,
    seen: HashSet<String>,
}

impl ReviewAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the genuinely new entries, returning how many were added.
    /// A zero return on a non-empty page is the stall signal the engine
    /// uses to stop paginating.
    pub fn absorb(&mut self, entries: Vec<Review>) -> usize {
        let before = self.reviews.len();
        for review in entries {
            if self.seen.insert(review.review_id.clone()) {
                self.reviews.push(review);
            } else {
                debug!(review_id = %review.review_id, "Dropping duplicate review");
            }
        }
        self.reviews.len() - before
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn into_reviews(self) -> Vec<Review> {
        self.reviews
    }
}
