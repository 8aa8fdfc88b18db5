//! Study sessions: review batches, learn batches, lookups and additions.
//!
//! The trainer owns the order of operations. Each batch is loaded once,
//! graded in memory and written back with a single merge, so a learner who
//! stops early keeps every answer given so far.

use crate::config::{ConfigError, ConfigProvider};
use crate::history::{EventSink, EventSource, HistoryError};
use crate::store::date_utils::now_timestamp;
use crate::store::{AddOutcome, AugmentOutcome, MergeReport, StoreError, VocabRepository};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use vocab_core::history::{
    CategoryAffinity, HistoryAction, HistoryEvent, HistorySummary, AFFINITY_TOP_N,
};
use vocab_core::ingest::{Augmentation, NewEntry};
use vocab_core::lifecycle::{apply_learn_outcome, apply_review_outcome};
use vocab_core::progression::{correct_ratio, evaluate, resolve, Progression};
use vocab_core::scheduler::{
    select_for_learning, select_for_review, ReviewQuery, Selection, DEFAULT_REVIEW_BATCH,
};
use vocab_core::types::{
    normalize_key, Language, LanguageFilter, Level, ReviewResult, VocabEntry,
};

/// Number of entries in the recent mistakes list.
pub const RECENT_WRONG_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// A learner's answer for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Correct,
    Wrong,
    /// End the batch here; nothing after this entry is graded.
    Stop,
}

/// The interactive side of a session.
pub trait Learner {
    /// Grade one review entry.
    fn grade(&mut self, entry: &VocabEntry) -> Grade;

    /// `Correct` marks a new entry as learned, `Wrong` skips it.
    fn mark_learned(&mut self, entry: &VocabEntry) -> Grade;

    /// Answer an offer to move from `from` to `to` after scoring `ratio`.
    fn confirm_advance(&mut self, from: Level, to: Level, ratio: f64) -> bool;
}

/// Outcome of one review batch.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewReport {
    pub selected: usize,
    pub graded: Vec<VocabEntry>,
    /// False when the learner stopped before the end of the batch.
    pub completed: bool,
    /// Records the store could not read and left out of selection.
    pub skipped: usize,
    pub unscheduled: usize,
    pub merge: Option<MergeReport>,
    pub ratio: Option<f64>,
    pub progression: Option<Progression>,
    pub level: Level,
}

/// Outcome of one learn batch.
#[derive(Debug, Clone, Serialize)]
pub struct LearnReport {
    pub offered: usize,
    pub learned: Vec<VocabEntry>,
    pub unscheduled: usize,
    pub merge: Option<MergeReport>,
}

/// Session orchestration over a record store, an event log and the
/// learner configuration.
pub struct Trainer<R, S, C> {
    repository: R,
    events: S,
    config: C,
}

impl<R, S, C> Trainer<R, S, C>
where
    R: VocabRepository,
    S: EventSink + EventSource,
    C: ConfigProvider,
{
    pub fn new(repository: R, events: S, config: C) -> Self {
        Self {
            repository,
            events,
            config,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Append an event. A failed append never interrupts a session.
    fn record(&self, action: HistoryAction, entry: &VocabEntry) {
        let event = HistoryEvent {
            action,
            timestamp: now_timestamp(),
            word: entry.word.clone(),
            category: entry.category.clone(),
            language: entry.language.to_string(),
        };
        if let Err(e) = self.events.append(&event) {
            tracing::warn!(
                error = %e,
                action = action.as_str(),
                word = %entry.word,
                "failed to log history event"
            );
        }
    }

    fn persist(&self, changed: &[VocabEntry]) -> Result<Option<MergeReport>> {
        if changed.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.repository.merge_upsert(changed)?))
    }

    /// Entries the next review batch would contain, without grading them.
    pub fn due(&self, today: NaiveDate, top_n: Option<usize>) -> Result<Selection> {
        let config = self.config.current()?;
        let loaded = self.repository.load_all()?;
        let mut query = ReviewQuery::new(LanguageFilter::Only(config.language), config.user_level);
        query.top_n = top_n.unwrap_or(DEFAULT_REVIEW_BATCH);
        Ok(select_for_review(&loaded.entries, &query, today))
    }

    /// Run one review batch for the configured language and level.
    ///
    /// Graded entries are persisted even when the learner stops early.
    /// Progression is only evaluated for a completed, non-empty batch.
    pub fn review_batch<L: Learner + ?Sized>(
        &self,
        learner: &mut L,
        today: NaiveDate,
    ) -> Result<ReviewReport> {
        let config = self.config.current()?;
        let loaded = self.repository.load_all()?;
        let query =
            ReviewQuery::new(LanguageFilter::Only(config.language.clone()), config.user_level);

        let selection = select_for_review(&loaded.entries, &query, today);
        let selected = selection.len();
        let unscheduled = selection.unscheduled;

        let mut graded = Vec::with_capacity(selected);
        let mut completed = true;
        for mut entry in selection.into_entries() {
            let correct = match learner.grade(&entry) {
                Grade::Correct => true,
                Grade::Wrong => false,
                Grade::Stop => {
                    completed = false;
                    break;
                }
            };
            apply_review_outcome(&mut entry, correct, today);
            let action = if correct {
                HistoryAction::Correct
            } else {
                HistoryAction::Wrong
            };
            self.record(action, &entry);
            graded.push(entry);
        }

        let merge = self.persist(&graded)?;
        tracing::info!(selected, graded = graded.len(), completed, "review batch finished");

        let mut report = ReviewReport {
            selected,
            graded,
            completed,
            skipped: loaded.skipped.len(),
            unscheduled,
            merge,
            ratio: None,
            progression: None,
            level: config.user_level,
        };
        if !completed || report.graded.is_empty() {
            return Ok(report);
        }

        let current = config.user_level;
        let ratio = correct_ratio(&report.graded);
        let progression = evaluate(ratio, current);
        let accepted = match progression {
            Progression::Offer { to, .. } => learner.confirm_advance(current, to, ratio),
            _ => false,
        };
        let level = resolve(progression, current, accepted);
        if level != current {
            self.config.set_level(level)?;
        }

        report.ratio = Some(ratio);
        report.progression = Some(progression);
        report.level = level;
        Ok(report)
    }

    /// Offer up to `goal` new entries, favouring frequently learned categories.
    pub fn learn_batch<L: Learner + ?Sized>(
        &self,
        learner: &mut L,
        goal: usize,
        today: NaiveDate,
    ) -> Result<LearnReport> {
        let selection = self.learn_candidates(goal)?;
        let offered = selection.len();
        let unscheduled = selection.unscheduled;

        let mut learned = Vec::new();
        for mut entry in selection.into_entries() {
            match learner.mark_learned(&entry) {
                Grade::Correct => {
                    apply_learn_outcome(&mut entry, today);
                    self.record(HistoryAction::Learn, &entry);
                    learned.push(entry);
                }
                Grade::Wrong => continue,
                Grade::Stop => break,
            }
        }

        let merge = self.persist(&learned)?;
        tracing::info!(offered, learned = learned.len(), "learn batch finished");
        Ok(LearnReport {
            offered,
            learned,
            unscheduled,
            merge,
        })
    }

    /// New entries the next learn batch would offer.
    pub fn learn_candidates(&self, goal: usize) -> Result<Selection> {
        let config = self.config.current()?;
        let loaded = self.repository.load_all()?;
        let affinity = match self.events.read_all() {
            Ok(read) => CategoryAffinity::from_events(&read.events, AFFINITY_TOP_N),
            Err(e) => {
                tracing::warn!(error = %e, "history unreadable, ignoring category affinity");
                CategoryAffinity::default()
            }
        };
        Ok(select_for_learning(
            &loaded.entries,
            &config.language,
            config.user_level,
            &affinity,
            goal,
        ))
    }

    /// Find `word` in the configured language and log the lookup.
    pub fn lookup(&self, word: &str) -> Result<Option<VocabEntry>> {
        let config = self.config.current()?;
        if normalize_key(word).is_empty() {
            return Ok(None);
        }
        let found = self
            .repository
            .find_by_word(word)?
            .filter(|entry| entry.language == config.language);
        if let Some(entry) = &found {
            self.record(HistoryAction::Lookup, entry);
        }
        Ok(found)
    }

    /// Insert a new word, or augment the existing one with the same key.
    pub fn add(&self, new: &NewEntry, today: NaiveDate) -> Result<AddOutcome> {
        Ok(self.repository.add_entry(new, today)?)
    }

    pub fn augment(&self, word: &str, augmentation: &Augmentation) -> Result<AugmentOutcome> {
        Ok(self.repository.augment(word, augmentation)?)
    }

    /// Entries last answered wrong, most recently reviewed first.
    pub fn recent_wrong(&self, limit: usize) -> Result<Vec<VocabEntry>> {
        let mut wrong: Vec<_> = self
            .repository
            .load_all()?
            .entries
            .into_iter()
            .filter(|e| e.last_result == Some(ReviewResult::Wrong))
            .collect();
        wrong.sort_by(|a, b| b.last_review.cmp(&a.last_review));
        wrong.truncate(limit);
        Ok(wrong)
    }

    /// Aggregate the whole event log.
    pub fn summary(&self) -> Result<HistorySummary> {
        let read = self.events.read_all()?;
        Ok(HistorySummary::from_events(&read.events))
    }

    /// Set the learner level directly.
    pub fn set_level(&self, level: Level) -> Result<Level> {
        Ok(self.config.set_level(level)?.user_level)
    }

    /// Switch the study language used by review, learning and lookup.
    pub fn set_language(&self, language: Language) -> Result<Language> {
        Ok(self.config.set_language(language)?.language)
    }
}
