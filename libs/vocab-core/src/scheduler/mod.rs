//! Review priority scheduling and batch selection.

pub mod recency;

pub use recency::RecencyPolicy;

use crate::history::CategoryAffinity;
use crate::types::{Language, LanguageFilter, Level, ScheduledEntry, VocabEntry};
use chrono::NaiveDate;
use serde::Serialize;

/// Default size of a review batch.
pub const DEFAULT_REVIEW_BATCH: usize = 10;

/// Default number of new entries offered per learn session.
pub const DEFAULT_LEARN_GOAL: usize = 5;

/// Trait for review priority policies.
pub trait PriorityPolicy: Send + Sync {
    /// Policy identifier.
    fn name(&self) -> &'static str;

    /// Urgency of reviewing `entry` on `today`. Higher is more urgent.
    fn priority(&self, entry: &VocabEntry, today: NaiveDate) -> i64;
}

/// Filters for a review batch.
#[derive(Debug, Clone)]
pub struct ReviewQuery {
    pub language: LanguageFilter,
    pub max_level: Level,
    pub top_n: usize,
}

impl ReviewQuery {
    pub fn new(language: LanguageFilter, max_level: Level) -> Self {
        Self {
            language,
            max_level,
            top_n: DEFAULT_REVIEW_BATCH,
        }
    }
}

/// An ordered batch plus how many entries were left out as unscheduled.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Selection {
    pub batch: Vec<ScheduledEntry>,
    /// Entries without a readable level, which never enter a batch.
    pub unscheduled: usize,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    pub fn into_entries(self) -> Vec<VocabEntry> {
        self.batch.into_iter().map(|s| s.entry).collect()
    }
}

fn within_level(entry: &VocabEntry, max_level: Level) -> Option<bool> {
    entry.level.map(|level| level <= max_level)
}

/// Sort descending by priority. `sort_by` is stable, so equal priorities
/// keep their input order.
fn rank(mut batch: Vec<ScheduledEntry>, limit: usize) -> Vec<ScheduledEntry> {
    batch.sort_by(|a, b| b.priority.cmp(&a.priority));
    batch.truncate(limit);
    batch
}

/// Priority of one entry under the default recency policy.
pub fn compute_priority(entry: &VocabEntry, today: NaiveDate) -> i64 {
    RecencyPolicy::default().priority(entry, today)
}

/// Select the most urgent reviewed entries under the default policy.
pub fn select_for_review(entries: &[VocabEntry], query: &ReviewQuery, today: NaiveDate) -> Selection {
    select_for_review_with(&RecencyPolicy::default(), entries, query, today)
}

/// Select the most urgent reviewed entries.
///
/// Only entries reviewed at least once take part; new entries go through
/// [`select_for_learning`].
pub fn select_for_review_with<P: PriorityPolicy + ?Sized>(
    policy: &P,
    entries: &[VocabEntry],
    query: &ReviewQuery,
    today: NaiveDate,
) -> Selection {
    let mut unscheduled = 0;
    let mut batch = Vec::new();

    for entry in entries {
        let Some(in_level) = within_level(entry, query.max_level) else {
            unscheduled += 1;
            continue;
        };
        if !in_level || entry.review_count == 0 || !query.language.matches(&entry.language) {
            continue;
        }
        batch.push(ScheduledEntry {
            priority: policy.priority(entry, today),
            entry: entry.clone(),
        });
    }

    let batch = rank(batch, query.top_n);
    tracing::debug!(
        policy = policy.name(),
        selected = batch.len(),
        unscheduled,
        "selected review batch"
    );
    Selection { batch, unscheduled }
}

/// Select new entries to learn, favouring the learner's frequent categories.
pub fn select_for_learning(
    entries: &[VocabEntry],
    language: &Language,
    max_level: Level,
    affinity: &CategoryAffinity,
    goal: usize,
) -> Selection {
    let mut unscheduled = 0;
    let mut batch = Vec::new();

    for entry in entries {
        let Some(in_level) = within_level(entry, max_level) else {
            unscheduled += 1;
            continue;
        };
        if !in_level || entry.review_count != 0 || &entry.language != language {
            continue;
        }
        batch.push(ScheduledEntry {
            priority: i64::from(affinity.weight(&entry.category)),
            entry: entry.clone(),
        });
    }

    let batch = rank(batch, goal);
    tracing::debug!(selected = batch.len(), unscheduled, "selected learn batch");
    Selection { batch, unscheduled }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{HistoryAction, HistoryEvent, AFFINITY_TOP_N};
    use crate::types::ReviewResult;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn reviewed(word: &str, days_ago: i64, level: u8) -> VocabEntry {
        let mut entry = VocabEntry::new(word, Language::English, Level::new(level).unwrap());
        entry.review_count = 1;
        entry.last_review = Some(today() - chrono::Duration::days(days_ago));
        entry
    }

    fn words(selection: &Selection) -> Vec<&str> {
        selection.batch.iter().map(|s| s.entry.word.as_str()).collect()
    }

    fn query() -> ReviewQuery {
        ReviewQuery::new(LanguageFilter::All, Level::MAX)
    }

    #[test]
    fn review_orders_by_priority_descending() {
        let entries = vec![
            reviewed("fresh", 0, 1),
            reviewed("stale", 20, 1),
            reviewed("middle", 5, 1),
        ];
        let selection = select_for_review(&entries, &query(), today());
        assert_eq!(words(&selection), vec!["stale", "middle", "fresh"]);
        assert_eq!(selection.batch[0].priority, 28);
    }

    #[test]
    fn compute_priority_uses_recency_policy() {
        let mut wrong = reviewed("slip", 4, 1);
        wrong.review_count = 3;
        wrong.last_result = Some(ReviewResult::Wrong);
        assert_eq!(compute_priority(&wrong, today()), 4 + 4 + 10);
    }

    #[test]
    fn review_ties_keep_input_order() {
        let entries: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|w| reviewed(w, 3, 1))
            .collect();
        let first = select_for_review(&entries, &query(), today());
        let second = select_for_review(&entries, &query(), today());
        assert_eq!(words(&first), vec!["a", "b", "c", "d"]);
        assert_eq!(words(&first), words(&second));
    }

    #[test]
    fn review_filters_language_level_and_new_entries() {
        let mut korean = reviewed("사과", 3, 1);
        korean.language = Language::Korean;
        let mut unleveled = reviewed("orphan", 3, 1);
        unleveled.level = None;
        let mut new_entry = reviewed("cat", 0, 3);
        new_entry.review_count = 0;
        new_entry.last_review = None;

        let entries = vec![
            reviewed("easy", 3, 1),
            reviewed("hard", 3, 4),
            korean,
            unleveled,
            new_entry,
        ];
        let q = ReviewQuery::new(LanguageFilter::Only(Language::English), Level::new(3).unwrap());
        let selection = select_for_review(&entries, &q, today());
        assert_eq!(words(&selection), vec!["easy"]);
        assert_eq!(selection.unscheduled, 1);
    }

    #[test]
    fn review_truncates_to_top_n() {
        let entries: Vec<_> = (0..15).map(|i| reviewed(&format!("w{i}"), i, 1)).collect();
        let selection = select_for_review(&entries, &query(), today());
        assert_eq!(selection.len(), DEFAULT_REVIEW_BATCH);
        assert_eq!(selection.batch[0].entry.word, "w14");
    }

    #[test]
    fn mastered_entries_sink_below_unmastered() {
        let mut mastered = reviewed("known", 30, 1);
        mastered.is_mastered = true;
        mastered.last_result = Some(ReviewResult::Correct);
        let entries = vec![mastered, reviewed("today", 0, 1)];
        let selection = select_for_review(&entries, &query(), today());
        assert_eq!(words(&selection), vec!["today", "known"]);
        assert_eq!(selection.batch[1].priority, 0);
    }

    #[test]
    fn new_cat_goes_to_learning_not_review() {
        let mut cat = VocabEntry::new("cat", Language::English, Level::new(3).unwrap());
        cat.last_review = None;
        let entries = vec![cat];

        let review = select_for_review(&entries, &query(), today());
        assert!(review.is_empty());

        let learn = select_for_learning(
            &entries,
            &Language::English,
            Level::MAX,
            &CategoryAffinity::default(),
            DEFAULT_LEARN_GOAL,
        );
        assert_eq!(words(&learn), vec!["cat"]);
    }

    #[test]
    fn learning_prefers_frequent_categories() {
        let mut entries = Vec::new();
        for (word, category) in [("red", "color"), ("bread", "food"), ("run", "action"), ("rice", "food")] {
            let mut e = VocabEntry::new(word, Language::English, Level::MIN);
            e.category = category.to_string();
            entries.push(e);
        }
        let events: Vec<_> = ["food", "food", "action"]
            .iter()
            .map(|c| HistoryEvent {
                action: HistoryAction::Learn,
                timestamp: today().and_hms_opt(8, 0, 0).unwrap(),
                word: "x".to_string(),
                category: c.to_string(),
                language: "English".to_string(),
            })
            .collect();
        let affinity = CategoryAffinity::from_events(&events, AFFINITY_TOP_N);

        let learn = select_for_learning(&entries, &Language::English, Level::MAX, &affinity, 3);
        assert_eq!(words(&learn), vec!["bread", "rice", "run"]);
    }

    #[test]
    fn learning_requires_exact_language_and_level() {
        let mut korean = VocabEntry::new("사과", Language::Korean, Level::MIN);
        korean.category = "food".to_string();
        let advanced = VocabEntry::new("ubiquitous", Language::English, Level::MAX);
        let entries = vec![korean, advanced];
        let learn = select_for_learning(
            &entries,
            &Language::English,
            Level::new(2).unwrap(),
            &CategoryAffinity::default(),
            DEFAULT_LEARN_GOAL,
        );
        assert!(learn.is_empty());
    }
}
