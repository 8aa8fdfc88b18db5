//! Append-only learning history stored as CSV.

use crate::store::date_utils::{format_timestamp, parse_timestamp};
use crate::store::schema::HISTORY_COLUMNS;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use vocab_core::history::{HistoryAction, HistoryEvent};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history unavailable: {path}: {message}")]
    Unavailable { path: String, message: String },

    #[error("history write failed: {path}: {message}")]
    WriteFailed { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, HistoryError>;

/// Destination for learning events. Callers do not read their own writes.
pub trait EventSink {
    fn append(&self, event: &HistoryEvent) -> Result<()>;
}

/// Read access to past learning events.
pub trait EventSource {
    fn read_all(&self) -> Result<EventLogRead>;
}

/// Events read back from the log plus the rows that could not be read.
#[derive(Debug, Clone, Default)]
pub struct EventLogRead {
    pub events: Vec<HistoryEvent>,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct EventRow {
    action: String,
    timestamp: String,
    word: String,
    category: String,
    language: String,
}

impl EventRow {
    fn from_event(event: &HistoryEvent) -> Self {
        Self {
            action: event.action.as_str().to_string(),
            timestamp: format_timestamp(event.timestamp),
            word: event.word.clone(),
            category: event.category.clone(),
            language: event.language.clone(),
        }
    }

    fn to_event(self) -> Option<HistoryEvent> {
        Some(HistoryEvent {
            action: HistoryAction::parse(&self.action)?,
            timestamp: parse_timestamp(&self.timestamp)?,
            word: self.word,
            category: self.category,
            language: self.language,
        })
    }
}

/// CSV-backed event log.
pub struct CsvEventLog {
    path: PathBuf,
}

impl CsvEventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

impl EventSource for CsvEventLog {
    /// Read the whole log. A missing file is an empty log.
    fn read_all(&self) -> Result<EventLogRead> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(EventLogRead::default()),
            Err(e) => {
                return Err(HistoryError::Unavailable {
                    path: self.display_path(),
                    message: e.to_string(),
                })
            }
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(bytes.as_slice());
        let mut read = EventLogRead::default();

        for row in reader.deserialize::<EventRow>() {
            match row.ok().and_then(EventRow::to_event) {
                Some(event) => read.events.push(event),
                None => read.skipped += 1,
            }
        }

        if read.skipped > 0 {
            tracing::warn!(
                path = %self.display_path(),
                skipped = read.skipped,
                "skipped unreadable history rows"
            );
        }
        Ok(read)
    }
}

impl EventSink for CsvEventLog {
    fn append(&self, event: &HistoryEvent) -> Result<()> {
        let write_failed = |message: String| HistoryError::WriteFailed {
            path: self.display_path(),
            message,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| write_failed(e.to_string()))?;
            }
        }

        let is_new = fs::metadata(&self.path).map_or(true, |m| m.len() == 0);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| write_failed(e.to_string()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::CRLF)
            .from_writer(file);
        if is_new {
            writer
                .write_record(HISTORY_COLUMNS)
                .map_err(|e| write_failed(e.to_string()))?;
        }
        writer
            .serialize(EventRow::from_event(event))
            .map_err(|e| write_failed(e.to_string()))?;
        writer.flush().map_err(|e| write_failed(e.to_string()))?;

        tracing::debug!(action = event.action.as_str(), word = %event.word, "logged history event");
        Ok(())
    }
}
