//! Test fixtures and factory functions for creating test data.

use chrono::NaiveDate;
use vocab_core::ingest::NewEntry;
use vocab_trainer::cli::Answer;
use vocab_trainer::commands::PresetLearner;

pub const HEADER: &str =
    "word,meaning,phonetic,language,review_count,last_review,is_mastered,last_result,example,type,category,level";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
}

/// One CSV row for a reviewed English entry.
pub fn reviewed_row(word: &str, last_review: &str, level: u8) -> String {
    format!("{word},meaning of {word},,English,1,{last_review},False,correct,,noun,general,{level}")
}

/// A vocabulary table with `count` reviewed English entries at level 1.
pub fn reviewed_table(count: usize, level: u8) -> String {
    let mut lines = vec![HEADER.to_string()];
    lines.extend((0..count).map(|i| reviewed_row(&format!("word{i}"), "2024-05-01", level)));
    lines.join("\n") + "\n"
}

/// A valid "add" payload.
pub fn new_entry(word: &str, meaning: &str) -> NewEntry {
    NewEntry {
        word: word.to_string(),
        meaning: meaning.to_string(),
        language: "English".to_string(),
        level: "1".to_string(),
        word_type: "Noun".to_string(),
        category: "Animal".to_string(),
        example: format!("I saw a {word}."),
        ..Default::default()
    }
}

/// Learner that answers `correct` of `total` entries correctly, in order.
pub fn learner(correct: usize, total: usize, accept_advance: bool) -> PresetLearner {
    let answers = (0..total)
        .map(|i| if i < correct { Answer::Correct } else { Answer::Wrong })
        .collect();
    PresetLearner::new(answers, Vec::new(), accept_advance)
}

/// Convert `\n` line endings to the `\r\n` the store writes.
pub fn crlf(text: &str) -> String {
    text.replace('\n', "\r\n")
}
