//! Repository pattern for vocabulary record access.

use crate::store::atomic::replace_file;
use crate::store::error::StoreError;
use crate::store::schema::{ColumnMap, VocabRecord, COLUMNS};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use vocab_core::ingest::{augment, Augmentation, NewEntry};
use vocab_core::types::{normalize_key, VocabEntry};
use vocab_core::{MalformedRecord, ValidationError};

type Result<T> = std::result::Result<T, StoreError>;

/// Entries read from the store plus what could not be read cleanly.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadedEntries {
    pub entries: Vec<VocabEntry>,
    /// Records left out of `entries`; they stay on disk untouched.
    pub skipped: Vec<MalformedRecord>,
    /// Unreadable fields on records that were still loaded.
    pub degraded: Vec<MalformedRecord>,
}

/// Counts from one merge-upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub updated: usize,
    pub inserted: usize,
    /// Changed entries rejected for having no word.
    pub skipped: usize,
    /// Records in the table after the write.
    pub total: usize,
}

/// Result of adding content to an existing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AugmentOutcome {
    Updated {
        word: String,
        meaning: String,
        example: String,
    },
    Unchanged {
        word: String,
    },
    NotFound,
}

/// Result of adding a word.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AddOutcome {
    Inserted { entry: VocabEntry },
    /// The word already existed; the add was redirected to augmentation.
    Duplicate { result: AugmentOutcome },
}

/// Repository for vocabulary entries.
pub trait VocabRepository {
    fn load_all(&self) -> Result<LoadedEntries>;
    fn find_by_word(&self, word: &str) -> Result<Option<VocabEntry>>;
    fn merge_upsert(&self, changed: &[VocabEntry]) -> Result<MergeReport>;
    fn add_entry(&self, new: &NewEntry, today: NaiveDate) -> Result<AddOutcome>;
    fn augment(&self, word: &str, augmentation: &Augmentation) -> Result<AugmentOutcome>;
}

/// In-memory copy of the full table, indexed by key (first occurrence wins).
struct RecordTable {
    records: Vec<VocabRecord>,
    index: HashMap<String, usize>,
}

impl RecordTable {
    fn from_records(records: Vec<VocabRecord>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            let key = record.key();
            if !key.is_empty() {
                index.entry(key).or_insert(position);
            }
        }
        Self { records, index }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    fn push(&mut self, record: VocabRecord) {
        self.index.insert(record.key(), self.records.len());
        self.records.push(record);
    }
}

/// CSV implementation of the vocabulary repository.
pub struct CsvRepository {
    path: PathBuf,
}

impl CsvRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    /// Read every raw record. A missing file is an empty store.
    fn read_records(&self) -> Result<Vec<VocabRecord>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Unavailable {
                    path: self.display_path(),
                    message: e.to_string(),
                })
            }
        };

        validate_substrate_bytes(&self.path, &bytes)?;
        parse_records(&bytes)
            .map_err(|message| StoreError::Corrupt(format!("{}: {message}", self.display_path())))
    }

    /// Replace the table with `records` in one atomic swap.
    fn write_records(&self, records: &[VocabRecord]) -> Result<()> {
        let write_failed = |message: String| StoreError::WriteFailed {
            path: self.display_path(),
            message,
        };

        let bytes = encode_records(records).map_err(write_failed)?;
        let reread = parse_records(&bytes).map_err(write_failed)?;
        if reread.len() != records.len() {
            return Err(write_failed(format!(
                "encoded {} of {} records",
                reread.len(),
                records.len()
            )));
        }

        replace_file(&self.path, &bytes).map_err(|e| write_failed(e.to_string()))
    }

    /// Load the full table, apply one mutation, and write back if it changed.
    ///
    /// The mutator returns `(value, changed)`; nothing is written when it
    /// fails or reports no change.
    fn mutate<T, F>(&self, mutator: F) -> Result<T>
    where
        F: FnOnce(&mut RecordTable) -> Result<(T, bool)>,
    {
        let mut table = RecordTable::from_records(self.read_records()?);
        let (value, changed) = mutator(&mut table)?;
        if changed {
            self.write_records(&table.records)?;
        }
        Ok(value)
    }
}

impl VocabRepository for CsvRepository {
    fn load_all(&self) -> Result<LoadedEntries> {
        let records = self.read_records()?;
        let mut loaded = LoadedEntries::default();
        let mut seen = HashSet::with_capacity(records.len());

        for record in &records {
            let key = record.key();
            if !key.is_empty() && !seen.insert(key) {
                loaded
                    .skipped
                    .push(MalformedRecord::new(record.word.trim(), "word", "duplicate key"));
                continue;
            }

            match record.to_entry() {
                Ok(parsed) => {
                    loaded.degraded.extend(parsed.degraded);
                    loaded.entries.push(parsed.entry);
                }
                Err(malformed) => loaded.skipped.push(malformed),
            }
        }

        for malformed in &loaded.skipped {
            tracing::warn!(%malformed, "skipping vocabulary record");
        }
        for malformed in &loaded.degraded {
            tracing::warn!(%malformed, "ignoring unreadable field");
        }

        Ok(loaded)
    }

    fn find_by_word(&self, word: &str) -> Result<Option<VocabEntry>> {
        let key = normalize_key(word);
        let records = self.read_records()?;
        let Some(record) = records.iter().find(|r| r.key() == key) else {
            return Ok(None);
        };

        match record.to_entry() {
            Ok(parsed) => Ok(Some(parsed.entry)),
            Err(malformed) => {
                tracing::warn!(%malformed, "stored entry is unreadable");
                Ok(None)
            }
        }
    }

    fn merge_upsert(&self, changed: &[VocabEntry]) -> Result<MergeReport> {
        let report = self.mutate(|table| {
            let mut report = MergeReport::default();

            for entry in changed {
                let key = entry.key();
                if key.is_empty() {
                    tracing::warn!(word = %entry.word, "skipping entry without a word");
                    report.skipped += 1;
                    continue;
                }

                match table.position(&key) {
                    Some(position) => {
                        table.records[position].merge_entry(entry);
                        report.updated += 1;
                    }
                    None => {
                        table.push(VocabRecord::from_entry(entry));
                        report.inserted += 1;
                    }
                }
            }

            report.total = table.records.len();
            let dirty = report.updated + report.inserted > 0;
            Ok((report, dirty))
        })?;

        tracing::info!(
            path = %self.display_path(),
            updated = report.updated,
            inserted = report.inserted,
            skipped = report.skipped,
            total = report.total,
            "merged vocabulary entries"
        );
        Ok(report)
    }

    fn add_entry(&self, new: &NewEntry, today: NaiveDate) -> Result<AddOutcome> {
        let key = normalize_key(&new.word);
        if key.is_empty() {
            return Err(ValidationError::MissingField { field: "word" }.into());
        }

        self.mutate(|table| {
            if let Some(position) = table.position(&key) {
                let result = augment_record(&mut table.records[position], &new.as_augmentation());
                let changed = matches!(result, AugmentOutcome::Updated { .. });
                return Ok((AddOutcome::Duplicate { result }, changed));
            }

            let entry = new.validate(today)?;
            table.push(VocabRecord::from_entry(&entry));
            tracing::info!(word = %entry.word, "added vocabulary entry");
            Ok((AddOutcome::Inserted { entry }, true))
        })
    }

    fn augment(&self, word: &str, augmentation: &Augmentation) -> Result<AugmentOutcome> {
        let key = normalize_key(word);
        self.mutate(|table| match table.position(&key) {
            Some(position) => {
                let result = augment_record(&mut table.records[position], augmentation);
                let changed = matches!(result, AugmentOutcome::Updated { .. });
                Ok((result, changed))
            }
            None => Ok((AugmentOutcome::NotFound, false)),
        })
    }
}

fn augment_record(record: &mut VocabRecord, augmentation: &Augmentation) -> AugmentOutcome {
    if augment(&mut record.meaning, &mut record.example, augmentation) {
        AugmentOutcome::Updated {
            word: record.word.clone(),
            meaning: record.meaning.clone(),
            example: record.example.clone(),
        }
    } else {
        AugmentOutcome::Unchanged {
            word: record.word.clone(),
        }
    }
}

fn parse_records(bytes: &[u8]) -> std::result::Result<Vec<VocabRecord>, String> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);
    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    let columns =
        ColumnMap::from_headers(&headers).ok_or_else(|| "header has no `word` column".to_string())?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| e.to_string())?;
        records.push(columns.record(&row));
    }
    Ok(records)
}

fn encode_records(records: &[VocabRecord]) -> std::result::Result<Vec<u8>, String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(COLUMNS).map_err(|e| e.to_string())?;
    for record in records {
        writer.serialize(record).map_err(|e| e.to_string())?;
    }
    writer.into_inner().map_err(|e| e.to_string())
}

fn validate_substrate_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if bytes.contains(&0) {
        return Err(StoreError::Corrupt(format!(
            "{}: contains NUL byte(s)",
            path.display()
        )));
    }
    if std::str::from_utf8(bytes).is_err() {
        return Err(StoreError::Corrupt(format!(
            "{}: contains non-UTF-8 byte sequence(s)",
            path.display()
        )));
    }
    Ok(())
}
