//! Error types for vocab-core.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using ValidationError.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Errors that reject a new entry before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid level {value:?}: expected a whole number from 1 to 5")]
    InvalidLevel { value: String },
}

/// One persisted field that could not be read.
///
/// Never fatal: the record is either excluded from scheduling or loaded with
/// the field treated as "no signal".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("malformed {field} for {word:?}: {value:?}")]
pub struct MalformedRecord {
    pub word: String,
    pub field: &'static str,
    pub value: String,
}

impl MalformedRecord {
    pub fn new(word: impl Into<String>, field: &'static str, value: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            field,
            value: value.into(),
        }
    }
}
