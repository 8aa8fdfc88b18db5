//! Recency-based review priority.
//!
//! `priority = days_since_last_review + (target_reviews - review_count) * review_weight`,
//! plus `wrong_penalty` when the last answer was wrong. Mastered entries and
//! entries without a review date score 0. The review-count term is not
//! floored, so an entry reviewed well past `target_reviews` can score below 0.

use super::PriorityPolicy;
use crate::types::{ReviewResult, VocabEntry};
use chrono::NaiveDate;

/// Recency policy with configurable weights.
#[derive(Debug, Clone)]
pub struct RecencyPolicy {
    pub target_reviews: i64,
    pub review_weight: i64,
    pub wrong_penalty: i64,
    /// Treat future-dated reviews as reviewed today instead of scoring negative days.
    pub clamp_future: bool,
}

impl Default for RecencyPolicy {
    fn default() -> Self {
        Self {
            target_reviews: 5,
            review_weight: 2,
            wrong_penalty: 10,
            clamp_future: true,
        }
    }
}

impl PriorityPolicy for RecencyPolicy {
    fn name(&self) -> &'static str {
        "recency"
    }

    fn priority(&self, entry: &VocabEntry, today: NaiveDate) -> i64 {
        if entry.is_mastered {
            return 0;
        }

        let Some(last_review) = entry.last_review else {
            return 0;
        };

        let days_since = self.days_since(last_review, today);
        let mut priority =
            days_since + (self.target_reviews - i64::from(entry.review_count)) * self.review_weight;
        if entry.last_result == Some(ReviewResult::Wrong) {
            priority += self.wrong_penalty;
        }
        priority
    }
}

impl RecencyPolicy {
    fn days_since(&self, last_review: NaiveDate, today: NaiveDate) -> i64 {
        let days = (today - last_review).num_days();
        if self.clamp_future {
            days.max(0)
        } else {
            days
        }
    }
}
