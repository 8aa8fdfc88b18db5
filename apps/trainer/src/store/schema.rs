//! Persisted vocabulary table layout.

use crate::store::date_utils::{format_date, parse_date};
use serde::{Deserialize, Serialize};
use vocab_core::types::{normalize_key, Language, Level, ReviewResult, VocabEntry};
use vocab_core::MalformedRecord;

/// Column order of the vocabulary table. Rewrites always use this order.
pub const COLUMNS: [&str; 12] = [
    "word",
    "meaning",
    "phonetic",
    "language",
    "review_count",
    "last_review",
    "is_mastered",
    "last_result",
    "example",
    "type",
    "category",
    "level",
];

/// Column order of the history log.
pub const HISTORY_COLUMNS: [&str; 5] = ["action", "timestamp", "word", "category", "language"];

const MASTERED_TRUE: &str = "True";
const MASTERED_FALSE: &str = "False";

/// One row exactly as stored. Records no caller touches are written back
/// unchanged, malformed values included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabRecord {
    pub word: String,
    pub meaning: String,
    pub phonetic: String,
    pub language: String,
    pub review_count: String,
    pub last_review: String,
    pub is_mastered: String,
    pub last_result: String,
    pub example: String,
    #[serde(rename = "type")]
    pub word_type: String,
    pub category: String,
    pub level: String,
}

/// A record read into a typed entry, with any fields that had to be ignored.
#[derive(Debug, Clone)]
pub struct ParsedRecord {
    pub entry: VocabEntry,
    pub degraded: Vec<MalformedRecord>,
}

/// Where each known column sits in a stored table's header.
///
/// Rows are read by position, so a short row leaves its trailing columns
/// empty instead of failing.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    positions: [Option<usize>; COLUMNS.len()],
}

impl ColumnMap {
    /// `None` when the header has no `word` column.
    pub fn from_headers(headers: &csv::StringRecord) -> Option<Self> {
        let positions = COLUMNS.map(|column| headers.iter().position(|h| h == column));
        positions[0].map(|_| Self { positions })
    }

    pub fn record(&self, row: &csv::StringRecord) -> VocabRecord {
        let field = |column: usize| {
            self.positions[column]
                .and_then(|position| row.get(position))
                .unwrap_or("")
                .to_string()
        };
        VocabRecord {
            word: field(0),
            meaning: field(1),
            phonetic: field(2),
            language: field(3),
            review_count: field(4),
            last_review: field(5),
            is_mastered: field(6),
            last_result: field(7),
            example: field(8),
            word_type: field(9),
            category: field(10),
            level: field(11),
        }
    }
}

impl VocabRecord {
    pub fn key(&self) -> String {
        normalize_key(&self.word)
    }

    /// Build a fresh row for an inserted entry.
    pub fn from_entry(entry: &VocabEntry) -> Self {
        let mut record = Self {
            word: entry.word.trim().to_string(),
            ..Default::default()
        };
        record.merge_entry(entry);
        record
    }

    /// Overwrite this row with the fields the entry carries.
    ///
    /// The stored spelling of `word` is kept. `None` in `level`,
    /// `last_review` or `last_result` means the entry holds no value for that
    /// column, so the stored text stays as it is.
    pub fn merge_entry(&mut self, entry: &VocabEntry) {
        self.meaning = entry.meaning.clone();
        self.phonetic = entry.phonetic.clone();
        self.language = entry.language.to_string();
        self.review_count = entry.review_count.to_string();
        self.is_mastered = if entry.is_mastered {
            MASTERED_TRUE
        } else {
            MASTERED_FALSE
        }
        .to_string();
        self.example = entry.example.clone();
        self.word_type = entry.word_type.clone();
        self.category = entry.category.clone();

        if let Some(date) = entry.last_review {
            self.last_review = format_date(date);
        }
        if let Some(result) = entry.last_result {
            self.last_result = result.as_str().to_string();
        }
        if let Some(level) = entry.level {
            self.level = level.to_string();
        }
    }

    /// Read the typed view of this row.
    ///
    /// An unreadable `review_count` excludes the record. Other unreadable
    /// fields degrade to "no value" and are reported alongside the entry.
    pub fn to_entry(&self) -> Result<ParsedRecord, MalformedRecord> {
        let word = self.word.trim();
        if word.is_empty() {
            return Err(MalformedRecord::new("", "word", self.word.clone()));
        }

        let review_count = match self.review_count.trim() {
            "" => 0,
            raw => raw
                .parse::<u32>()
                .map_err(|_| MalformedRecord::new(word, "review_count", raw))?,
        };

        let mut degraded = Vec::new();

        let level = Level::parse(&self.level);
        if level.is_none() {
            degraded.push(MalformedRecord::new(word, "level", self.level.clone()));
        }

        let last_review = match self.last_review.trim() {
            "" => None,
            raw => {
                let parsed = parse_date(raw);
                if parsed.is_none() {
                    degraded.push(MalformedRecord::new(word, "last_review", raw));
                }
                parsed
            }
        };

        let last_result = match self.last_result.trim() {
            "" => None,
            raw => {
                let parsed = ReviewResult::parse(raw);
                if parsed.is_none() {
                    degraded.push(MalformedRecord::new(word, "last_result", raw));
                }
                parsed
            }
        };

        let is_mastered = match self.is_mastered.trim() {
            raw if raw.eq_ignore_ascii_case(MASTERED_TRUE) => true,
            raw if raw.is_empty() || raw.eq_ignore_ascii_case(MASTERED_FALSE) => false,
            raw => {
                degraded.push(MalformedRecord::new(word, "is_mastered", raw));
                false
            }
        };

        Ok(ParsedRecord {
            entry: VocabEntry {
                word: word.to_string(),
                meaning: self.meaning.clone(),
                phonetic: self.phonetic.clone(),
                language: Language::parse(&self.language),
                review_count,
                last_review,
                is_mastered,
                last_result,
                example: self.example.clone(),
                word_type: self.word_type.clone(),
                category: self.category.clone(),
                level,
            },
            degraded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record() -> VocabRecord {
        VocabRecord {
            word: "Cat".to_string(),
            meaning: "con mèo".to_string(),
            phonetic: "/kæt/".to_string(),
            language: "English".to_string(),
            review_count: "2".to_string(),
            last_review: "2024-05-01".to_string(),
            is_mastered: "False".to_string(),
            last_result: "wrong".to_string(),
            example: "The cat sleeps.".to_string(),
            word_type: "noun".to_string(),
            category: "animal".to_string(),
            level: "1".to_string(),
        }
    }

    #[test]
    fn columns_match_serialized_field_order() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(record()).unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().next().unwrap(), COLUMNS.join(","));
    }

    #[test]
    fn column_map_reads_by_header_position() {
        let headers = csv::StringRecord::from(vec!["level", "word", "notes", "meaning"]);
        let map = ColumnMap::from_headers(&headers).unwrap();
        let record = map.record(&csv::StringRecord::from(vec!["2", "cat", "x", "con mèo"]));
        assert_eq!(record.word, "cat");
        assert_eq!(record.meaning, "con mèo");
        assert_eq!(record.level, "2");
        assert_eq!(record.phonetic, "");

        let short = map.record(&csv::StringRecord::from(vec!["3", "dog"]));
        assert_eq!(short.word, "dog");
        assert_eq!(short.meaning, "");
    }

    #[test]
    fn column_map_requires_word() {
        let headers = csv::StringRecord::from(vec!["term", "meaning"]);
        assert!(ColumnMap::from_headers(&headers).is_none());
    }

    #[test]
    fn to_entry_reads_every_field() {
        let parsed = record().to_entry().unwrap();
        let entry = parsed.entry;
        assert!(parsed.degraded.is_empty());
        assert_eq!(entry.word, "Cat");
        assert_eq!(entry.review_count, 2);
        assert_eq!(entry.last_review, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(entry.last_result, Some(ReviewResult::Wrong));
        assert_eq!(entry.level, Level::new(1));
        assert!(!entry.is_mastered);
    }

    #[test]
    fn bad_review_count_excludes_record() {
        let bad = VocabRecord {
            review_count: "many".to_string(),
            ..record()
        };
        let err = bad.to_entry().unwrap_err();
        assert_eq!(err.field, "review_count");
    }

    #[test]
    fn bad_level_and_date_degrade() {
        let bad = VocabRecord {
            level: "hard".to_string(),
            last_review: "01/05/2024".to_string(),
            ..record()
        };
        let parsed = bad.to_entry().unwrap();
        assert_eq!(parsed.entry.level, None);
        assert_eq!(parsed.entry.last_review, None);
        let fields: Vec<_> = parsed.degraded.iter().map(|m| m.field).collect();
        assert_eq!(fields, vec!["level", "last_review"]);
    }

    #[test]
    fn merge_keeps_stored_text_for_absent_values() {
        let mut stored = VocabRecord {
            level: "hard".to_string(),
            ..record()
        };
        let mut entry = stored.to_entry().unwrap().entry;
        entry.is_mastered = true;
        stored.merge_entry(&entry);
        assert_eq!(stored.level, "hard");
        assert_eq!(stored.is_mastered, "True");
        assert_eq!(stored.word, "Cat");
    }
}
