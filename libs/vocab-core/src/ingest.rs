//! Validation of new entries and the duplicate-aware augmentation path.
//!
//! Adding a word that already exists never inserts a second record. Instead
//! the new sub-meaning and example are appended to the existing record when
//! they carry content it does not already have.

use crate::error::{Result, ValidationError};
use crate::types::{Language, Level, VocabEntry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Separator between sub-meanings.
pub const MEANING_DELIMITER: &str = " | ";

/// Separator between example lines.
pub const EXAMPLE_DELIMITER: &str = "\n- ";

/// Raw "add" payload as supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewEntry {
    pub word: String,
    pub meaning: String,
    pub phonetic: String,
    pub language: String,
    #[serde(rename = "type")]
    pub word_type: String,
    pub category: String,
    pub example: String,
    pub level: String,
}

impl NewEntry {
    /// Validate and build the entry to insert.
    ///
    /// The entry starts unreviewed with `last_review = today`.
    pub fn validate(&self, today: NaiveDate) -> Result<VocabEntry> {
        let word = required("word", &self.word)?;
        let meaning = required("meaning", &self.meaning)?;
        let language = required("language", &self.language)?;
        let level = Level::parse(&self.level).ok_or_else(|| ValidationError::InvalidLevel {
            value: self.level.trim().to_string(),
        })?;

        Ok(VocabEntry {
            word,
            meaning,
            phonetic: self.phonetic.trim().to_string(),
            language: Language::parse(&language),
            review_count: 0,
            last_review: Some(today),
            is_mastered: false,
            last_result: None,
            example: self.example.trim().to_string(),
            word_type: self.word_type.trim().to_lowercase(),
            category: self.category.trim().to_lowercase(),
            level: Some(level),
        })
    }

    /// The augmentation to apply when this word already exists.
    pub fn as_augmentation(&self) -> Augmentation {
        Augmentation {
            meaning: Some(self.meaning.clone()),
            example: Some(self.example.clone()),
        }
    }
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField { field })
    } else {
        Ok(trimmed.to_string())
    }
}

/// Additional content for an existing entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Augmentation {
    pub meaning: Option<String>,
    pub example: Option<String>,
}

/// Append new content to `meaning` and `example`, returning whether anything changed.
///
/// A sub-meaning is added only when it is not already contained in the
/// existing meaning (case-insensitive). An example is added only when it is
/// not already contained verbatim. Fields are never replaced.
pub fn augment(meaning: &mut String, example: &mut String, augmentation: &Augmentation) -> bool {
    let mut changed = false;

    if let Some(addition) = non_blank(augmentation.meaning.as_deref()) {
        if !meaning.to_lowercase().contains(&addition.to_lowercase()) {
            append(meaning, MEANING_DELIMITER, addition);
            changed = true;
        }
    }

    if let Some(addition) = non_blank(augmentation.example.as_deref()) {
        if !example.contains(addition) {
            append(example, EXAMPLE_DELIMITER, addition);
            changed = true;
        }
    }

    changed
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn append(field: &mut String, delimiter: &str, addition: &str) {
    if !field.is_empty() {
        field.push_str(delimiter);
    }
    field.push_str(addition);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn cat() -> NewEntry {
        NewEntry {
            word: " cat ".to_string(),
            meaning: "con mèo".to_string(),
            phonetic: "/kæt/".to_string(),
            language: "english".to_string(),
            word_type: "Noun".to_string(),
            category: "Animal".to_string(),
            example: "The cat sleeps.".to_string(),
            level: "1".to_string(),
        }
    }

    #[test]
    fn validate_builds_unreviewed_entry() {
        let entry = cat().validate(today()).unwrap();
        assert_eq!(entry.word, "cat");
        assert_eq!(entry.language, Language::English);
        assert_eq!(entry.word_type, "noun");
        assert_eq!(entry.category, "animal");
        assert_eq!(entry.review_count, 0);
        assert_eq!(entry.last_review, Some(today()));
        assert_eq!(entry.level, Level::new(1));
        assert!(!entry.is_mastered);
        assert_eq!(entry.last_result, None);
    }

    #[test]
    fn validate_rejects_missing_meaning() {
        let input = NewEntry {
            meaning: "   ".to_string(),
            ..cat()
        };
        assert_eq!(
            input.validate(today()),
            Err(ValidationError::MissingField { field: "meaning" })
        );
    }

    #[test]
    fn validate_rejects_out_of_range_level() {
        let input = NewEntry {
            level: "6".to_string(),
            ..cat()
        };
        assert!(matches!(
            input.validate(today()),
            Err(ValidationError::InvalidLevel { .. })
        ));
    }

    #[test]
    fn augment_appends_new_content() {
        let mut meaning = "con mèo".to_string();
        let mut example = "The cat sleeps.".to_string();
        let changed = augment(
            &mut meaning,
            &mut example,
            &Augmentation {
                meaning: Some("mèo nhà".to_string()),
                example: Some("A cat purrs.".to_string()),
            },
        );
        assert!(changed);
        assert_eq!(meaning, "con mèo | mèo nhà");
        assert_eq!(example, "The cat sleeps.\n- A cat purrs.");
    }

    #[test]
    fn augment_skips_contained_meaning_case_insensitively() {
        let mut meaning = "Con Mèo | thú cưng".to_string();
        let mut example = String::new();
        let changed = augment(
            &mut meaning,
            &mut example,
            &Augmentation {
                meaning: Some("con mèo".to_string()),
                example: None,
            },
        );
        assert!(!changed);
        assert_eq!(meaning, "Con Mèo | thú cưng");
    }

    #[test]
    fn augment_is_idempotent() {
        let mut meaning = "con mèo".to_string();
        let mut example = "The cat sleeps.".to_string();
        let input = Augmentation {
            meaning: Some("mèo nhà".to_string()),
            example: Some("A cat purrs.".to_string()),
        };

        assert!(augment(&mut meaning, &mut example, &input));
        let after_first = (meaning.clone(), example.clone());
        assert!(!augment(&mut meaning, &mut example, &input));
        assert_eq!((meaning, example), after_first);
    }

    #[test]
    fn augment_ignores_blank_input() {
        let mut meaning = "con mèo".to_string();
        let mut example = String::new();
        let input = Augmentation {
            meaning: Some("  ".to_string()),
            example: Some(String::new()),
        };
        assert!(!augment(&mut meaning, &mut example, &input));
        assert_eq!(example, "");
    }
}
