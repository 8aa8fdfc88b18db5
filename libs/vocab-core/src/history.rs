//! Aggregation over the append-only learning history.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of categories that receive a learning affinity weight.
pub const AFFINITY_TOP_N: usize = 3;

/// A logged learning action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Learn,
    Lookup,
    Wrong,
    Correct,
}

impl HistoryAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Learn => "learn",
            Self::Lookup => "lookup",
            Self::Wrong => "wrong",
            Self::Correct => "correct",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "learn" => Some(Self::Learn),
            "lookup" => Some(Self::Lookup),
            "wrong" => Some(Self::Wrong),
            "correct" => Some(Self::Correct),
            _ => None,
        }
    }
}

/// One history row. Never mutated once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub action: HistoryAction,
    pub timestamp: NaiveDateTime,
    pub word: String,
    pub category: String,
    pub language: String,
}

/// Frequency count in first-seen order, most common first.
///
/// Ties keep first-seen order because the sort is stable.
fn most_common<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for value in values {
        match index.get(value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Category weights derived from what the learner studied most.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryAffinity {
    /// Top categories with their learn counts, rank 0 first.
    ranked: Vec<(String, usize)>,
    top_n: usize,
}

impl CategoryAffinity {
    /// Count `learn` events per non-empty category and keep the top `top_n`.
    pub fn from_events(events: &[HistoryEvent], top_n: usize) -> Self {
        let categories = events
            .iter()
            .filter(|e| e.action == HistoryAction::Learn && !e.category.is_empty())
            .map(|e| e.category.as_str());

        let mut ranked = most_common(categories);
        ranked.truncate(top_n);
        Self { ranked, top_n }
    }

    /// `top_n - rank` for a ranked category, 0 otherwise.
    pub fn weight(&self, category: &str) -> u32 {
        self.ranked
            .iter()
            .position(|(name, _)| name == category)
            .map_or(0, |rank| (self.top_n - rank) as u32)
    }

    pub fn ranked(&self) -> &[(String, usize)] {
        &self.ranked
    }
}

/// Aggregate counts over the whole history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistorySummary {
    pub total_actions: usize,
    pub learned: usize,
    pub lookups: usize,
    pub correct: usize,
    pub wrong: usize,
    /// Share of correct answers among graded attempts, `None` without attempts.
    pub accuracy: Option<f64>,
    pub top_category: Option<(String, usize)>,
    pub top_wrong_category: Option<(String, usize)>,
    pub main_language: Option<String>,
}

impl HistorySummary {
    pub fn from_events(events: &[HistoryEvent]) -> Self {
        let count = |action: HistoryAction| events.iter().filter(|e| e.action == action).count();
        let categories_for = |action: HistoryAction| {
            most_common(
                events
                    .iter()
                    .filter(|e| e.action == action)
                    .map(|e| e.category.as_str()),
            )
            .into_iter()
            .next()
        };

        let correct = count(HistoryAction::Correct);
        let wrong = count(HistoryAction::Wrong);
        let answered = correct + wrong;

        Self {
            total_actions: events.len(),
            learned: count(HistoryAction::Learn),
            lookups: count(HistoryAction::Lookup),
            correct,
            wrong,
            accuracy: (answered > 0).then(|| correct as f64 / answered as f64),
            top_category: categories_for(HistoryAction::Learn),
            top_wrong_category: categories_for(HistoryAction::Wrong),
            main_language: most_common(events.iter().map(|e| e.language.as_str()))
                .into_iter()
                .next()
                .map(|(language, _)| language),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(action: HistoryAction, category: &str) -> HistoryEvent {
        HistoryEvent {
            action,
            timestamp: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            word: "w".to_string(),
            category: category.to_string(),
            language: "English".to_string(),
        }
    }

    #[test]
    fn affinity_counts_only_learn_events() {
        let events = vec![
            event(HistoryAction::Lookup, "food"),
            event(HistoryAction::Lookup, "food"),
            event(HistoryAction::Learn, "color"),
            event(HistoryAction::Wrong, "food"),
        ];
        let affinity = CategoryAffinity::from_events(&events, AFFINITY_TOP_N);
        assert_eq!(affinity.weight("color"), 3);
        assert_eq!(affinity.weight("food"), 0);
    }

    #[test]
    fn affinity_ranks_by_frequency_then_first_seen() {
        let events = vec![
            event(HistoryAction::Learn, "color"),
            event(HistoryAction::Learn, "food"),
            event(HistoryAction::Learn, "food"),
            event(HistoryAction::Learn, "action"),
            event(HistoryAction::Learn, "animal"),
            event(HistoryAction::Learn, ""),
        ];
        let affinity = CategoryAffinity::from_events(&events, AFFINITY_TOP_N);
        assert_eq!(affinity.weight("food"), 3);
        assert_eq!(affinity.weight("color"), 2);
        assert_eq!(affinity.weight("action"), 1);
        assert_eq!(affinity.weight("animal"), 0);
        assert_eq!(affinity.ranked().len(), 3);
    }

    #[test]
    fn summary_counts_and_accuracy() {
        let events = vec![
            event(HistoryAction::Learn, "food"),
            event(HistoryAction::Correct, "food"),
            event(HistoryAction::Correct, "color"),
            event(HistoryAction::Wrong, "color"),
            event(HistoryAction::Lookup, "food"),
        ];
        let summary = HistorySummary::from_events(&events);
        assert_eq!(summary.total_actions, 5);
        assert_eq!(summary.learned, 1);
        assert_eq!(summary.lookups, 1);
        assert_eq!(summary.accuracy, Some(2.0 / 3.0));
        assert_eq!(summary.top_category, Some(("food".to_string(), 1)));
        assert_eq!(summary.top_wrong_category, Some(("color".to_string(), 1)));
        assert_eq!(summary.main_language.as_deref(), Some("English"));
    }

    #[test]
    fn summary_without_attempts_has_no_accuracy() {
        let summary = HistorySummary::from_events(&[]);
        assert_eq!(summary.accuracy, None);
        assert_eq!(summary.top_category, None);
    }
}
