//! State transitions applied after a graded review or a learn action.
//!
//! Each transition must be applied exactly once per attempt: the review
//! count increment is cumulative.

use crate::types::{ReviewResult, VocabEntry};
use chrono::NaiveDate;

/// Apply the outcome of one graded review.
///
/// Mastery follows the latest answer alone: a correct answer sets it and a
/// wrong answer clears it.
pub fn apply_review_outcome(entry: &mut VocabEntry, correct: bool, today: NaiveDate) {
    entry.review_count = entry.review_count.saturating_add(1);
    entry.last_review = Some(today);
    entry.is_mastered = correct;
    entry.last_result = Some(ReviewResult::from_correct(correct));
}

/// Mark a new entry as learned without grading.
///
/// The result reads correct but the entry is deliberately not mastered.
pub fn apply_learn_outcome(entry: &mut VocabEntry, today: NaiveDate) {
    entry.review_count = 1;
    entry.last_review = Some(today);
    entry.last_result = Some(ReviewResult::Correct);
    entry.is_mastered = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntryStatus, Language, Level};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn entry() -> VocabEntry {
        VocabEntry::new("cat", Language::English, Level::MIN)
    }

    #[test]
    fn correct_review_sets_mastery() {
        let mut e = entry();
        apply_review_outcome(&mut e, true, day(2));
        assert_eq!(e.review_count, 1);
        assert_eq!(e.last_review, Some(day(2)));
        assert!(e.is_mastered);
        assert_eq!(e.last_result, Some(ReviewResult::Correct));
        assert_eq!(e.status(), EntryStatus::Reviewed);
    }

    #[test]
    fn wrong_after_correct_clears_mastery() {
        let mut e = entry();
        e.review_count = 4;
        apply_review_outcome(&mut e, true, day(3));
        apply_review_outcome(&mut e, false, day(3));
        assert!(!e.is_mastered);
        assert_eq!(e.last_result, Some(ReviewResult::Wrong));
        assert_eq!(e.review_count, 6);
    }

    #[test]
    fn same_outcome_same_day_gives_same_state_apart_from_count() {
        let mut once = entry();
        apply_review_outcome(&mut once, false, day(4));
        let mut twice = once.clone();
        apply_review_outcome(&mut twice, false, day(4));
        assert_eq!(twice.review_count, once.review_count + 1);
        twice.review_count = once.review_count;
        assert_eq!(twice, once);
    }

    #[test]
    fn learn_outcome_is_correct_but_not_mastered() {
        let mut e = entry();
        e.is_mastered = true;
        apply_learn_outcome(&mut e, day(5));
        assert_eq!(e.review_count, 1);
        assert_eq!(e.last_review, Some(day(5)));
        assert_eq!(e.last_result, Some(ReviewResult::Correct));
        assert!(!e.is_mastered);
    }
}
