//! Core vocabulary-trainer library shared by the store and the CLI.
//!
//! Provides:
//! - Shared types (VocabEntry, Level, Language, etc.)
//! - Validation of new entries and duplicate-aware augmentation
//! - Review priority scheduling and batch selection
//! - Review/learn state transitions and level progression
//! - Aggregation over the learning history (category affinity, summary)

pub mod error;
pub mod history;
pub mod ingest;
pub mod lifecycle;
pub mod progression;
pub mod scheduler;
pub mod types;

pub use error::{MalformedRecord, Result, ValidationError};
pub use history::{CategoryAffinity, HistoryAction, HistoryEvent, HistorySummary};
pub use ingest::{augment, Augmentation, NewEntry};
pub use lifecycle::{apply_learn_outcome, apply_review_outcome};
pub use progression::{correct_ratio, evaluate, resolve, OfferTier, Progression};
pub use scheduler::{
    compute_priority, select_for_learning, select_for_review, PriorityPolicy, RecencyPolicy,
    ReviewQuery, Selection,
};
pub use types::{
    normalize_key, EntryStatus, Language, LanguageFilter, Level, ReviewResult, ScheduledEntry,
    VocabEntry,
};
