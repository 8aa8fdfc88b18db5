//! Record store error types.

use thiserror::Error;
use vocab_core::ValidationError;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The medium could not be read. Distinct from an empty store.
    #[error("storage unavailable: {path}: {message}")]
    Unavailable { path: String, message: String },

    /// The persisted table is not a readable vocabulary table.
    #[error("corrupted store: {0}")]
    Corrupt(String),

    /// The write-back did not complete; the previous file is untouched.
    #[error("write-back failed, previous state kept: {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
