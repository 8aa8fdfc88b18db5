//! Core types for the vocabulary trainer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalize a word into its store key (trimmed, case-insensitive).
pub fn normalize_key(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Target language of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    English,
    Korean,
    Other(String),
}

impl Default for Language {
    fn default() -> Self {
        Self::English
    }
}

impl Language {
    /// Parse persisted or typed text. Unknown languages are kept, capitalised.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("english") {
            Self::English
        } else if trimmed.eq_ignore_ascii_case("korean") {
            Self::Korean
        } else {
            Self::Other(capitalize(trimmed))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::English => "English",
            Self::Korean => "Korean",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Language {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.as_str().to_string()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Language filter used when selecting a review batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageFilter {
    All,
    Only(Language),
}

impl LanguageFilter {
    /// `""` and `"All"` select every language.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(Language::parse(trimmed))
        }
    }

    pub fn matches(&self, language: &Language) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == language,
        }
    }
}

/// Difficulty tier, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(1);
    pub const MAX: Level = Level(5);

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&value)
            .then_some(Self(value))
    }

    /// Parse persisted text. Only plain digits are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        trimmed.parse::<u8>().ok().and_then(Self::new)
    }

    /// The next tier, or `None` at the top.
    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    pub fn name(self) -> &'static str {
        match self.0 {
            1 => "Starter",
            2 => "Beginner",
            3 => "Pre-Intermediate",
            4 => "Intermediate",
            _ => "Advanced",
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<u8> for Level {
    type Error = crate::error::ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| crate::error::ValidationError::InvalidLevel {
            value: value.to_string(),
        })
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of the most recent attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewResult {
    Correct,
    Wrong,
}

impl ReviewResult {
    pub fn from_correct(correct: bool) -> Self {
        if correct {
            Self::Correct
        } else {
            Self::Wrong
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Wrong => "wrong",
        }
    }

    /// Parse persisted text; anything unrecognised means "no result".
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "correct" => Some(Self::Correct),
            "wrong" => Some(Self::Wrong),
            _ => None,
        }
    }
}

/// Where an entry sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    New,
    Reviewed,
}

/// One vocabulary record, keyed by its normalized word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub word: String,
    pub meaning: String,
    pub phonetic: String,
    pub language: Language,
    pub review_count: u32,
    /// `None` when never reviewed or unreadable on disk.
    pub last_review: Option<NaiveDate>,
    pub is_mastered: bool,
    pub last_result: Option<ReviewResult>,
    pub example: String,
    #[serde(rename = "type")]
    pub word_type: String,
    pub category: String,
    /// `None` marks the entry as unscheduled.
    pub level: Option<Level>,
}

impl VocabEntry {
    /// Create an unreviewed entry with empty descriptive fields.
    pub fn new(word: impl Into<String>, language: Language, level: Level) -> Self {
        Self {
            word: word.into(),
            meaning: String::new(),
            phonetic: String::new(),
            language,
            review_count: 0,
            last_review: None,
            is_mastered: false,
            last_result: None,
            example: String::new(),
            word_type: String::new(),
            category: String::new(),
            level: Some(level),
        }
    }

    pub fn key(&self) -> String {
        normalize_key(&self.word)
    }

    pub fn status(&self) -> EntryStatus {
        if self.review_count == 0 {
            EntryStatus::New
        } else {
            EntryStatus::Reviewed
        }
    }
}

/// An entry annotated with its scheduling priority.
///
/// The priority is derived on every pass and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledEntry {
    pub entry: VocabEntry,
    pub priority: i64,
}
