//! Level progression after a completed review batch.
//!
//! Pure decision logic: asking the learner to confirm an offer and storing
//! the new level are the caller's job.

use crate::types::{Level, ReviewResult, VocabEntry};
use serde::Serialize;

/// How strong an advancement offer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferTier {
    /// 90% or better.
    Strong,
    /// 80% or better.
    Good,
    /// 70% or better.
    Fair,
}

/// Outcome of evaluating a batch ratio at the current level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Progression {
    AtMaxLevel,
    AutoAdvance { to: Level },
    Offer { to: Level, tier: OfferTier },
    Stay,
}

/// Share of entries whose last result is correct, 0 for an empty batch.
pub fn correct_ratio(entries: &[VocabEntry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    let correct = entries
        .iter()
        .filter(|e| e.last_result == Some(ReviewResult::Correct))
        .count();
    correct as f64 / entries.len() as f64
}

/// Decide what a batch ratio means for the learner at `level`.
pub fn evaluate(ratio: f64, level: Level) -> Progression {
    let Some(to) = level.next() else {
        return Progression::AtMaxLevel;
    };

    if ratio >= 1.0 {
        Progression::AutoAdvance { to }
    } else if ratio >= 0.9 {
        Progression::Offer { to, tier: OfferTier::Strong }
    } else if ratio >= 0.8 {
        Progression::Offer { to, tier: OfferTier::Good }
    } else if ratio >= 0.7 {
        Progression::Offer { to, tier: OfferTier::Fair }
    } else {
        Progression::Stay
    }
}

/// Resulting level once the learner has answered any offer.
pub fn resolve(progression: Progression, current: Level, accepted: bool) -> Level {
    match progression {
        Progression::AutoAdvance { to } => to,
        Progression::Offer { to, .. } if accepted => to,
        _ => current,
    }
}
