//! Application state and data file locations.

use crate::config::JsonConfigStore;
use crate::history::CsvEventLog;
use crate::session::Trainer;
use crate::store::CsvRepository;
use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "VOCAB_DATA_DIR";

const APP_DIR: &str = "vocab-trainer";
const VOCAB_FILE: &str = "vocab.csv";
const HISTORY_FILE: &str = "history.csv";
const CONFIG_FILE: &str = "config.json";

/// Locations of the three data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
}

impl AppPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// `VOCAB_DATA_DIR`, else the platform data directory, else the
    /// working directory.
    pub fn resolve() -> Self {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return Self::new(dir);
        }
        match dirs::data_local_dir() {
            Some(dir) => Self::new(dir.join(APP_DIR)),
            None => Self::new("."),
        }
    }

    pub fn vocab(&self) -> PathBuf {
        self.data_dir.join(VOCAB_FILE)
    }

    pub fn history(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }

    pub fn config(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }
}

/// The trainer wired to its file-backed collaborators.
pub type AppTrainer = Trainer<CsvRepository, CsvEventLog, JsonConfigStore>;

/// Global application state.
pub struct AppState {
    pub paths: AppPaths,
    pub trainer: AppTrainer,
}

impl AppState {
    pub fn new(paths: AppPaths) -> Self {
        let trainer = Trainer::new(
            CsvRepository::new(paths.vocab()),
            CsvEventLog::new(paths.history()),
            JsonConfigStore::new(paths.config()),
        );
        tracing::debug!(data_dir = %paths.data_dir.display(), "opened data directory");
        Self { paths, trainer }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_in_the_data_dir() {
        let paths = AppPaths::new("/tmp/vocab");
        assert_eq!(paths.vocab(), PathBuf::from("/tmp/vocab/vocab.csv"));
        assert_eq!(paths.history(), PathBuf::from("/tmp/vocab/history.csv"));
        assert_eq!(paths.config(), PathBuf::from("/tmp/vocab/config.json"));
    }
}
