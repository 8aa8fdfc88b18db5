//! Vocabulary record store backed by a CSV table.

pub mod atomic;
pub mod date_utils;
pub mod error;
pub mod repository;
pub mod schema;

pub use error::StoreError;
pub use repository::{
    AddOutcome, AugmentOutcome, CsvRepository, LoadedEntries, MergeReport, VocabRepository,
};
pub use schema::{VocabRecord, COLUMNS};
