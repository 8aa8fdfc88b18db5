//! Common test utilities for trainer integration tests.
//!
//! Every test gets its own temporary data directory; nothing touches the
//! learner's real files.

#![allow(dead_code)]

pub mod fixtures;

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use vocab_trainer::state::{AppPaths, AppState};

/// Isolated data directory with a trainer opened on it.
pub struct TestContext {
    pub dir: TempDir,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let state = AppState::new(AppPaths::new(dir.path()));
        Self { dir, state }
    }

    /// Context whose vocabulary file starts with `csv`.
    pub fn with_vocab(csv: &str) -> Self {
        let ctx = Self::new();
        fs::write(ctx.vocab_path(), csv).expect("seed vocab.csv");
        ctx
    }

    pub fn vocab_path(&self) -> PathBuf {
        self.state.paths.vocab()
    }

    pub fn history_path(&self) -> PathBuf {
        self.state.paths.history()
    }

    pub fn config_path(&self) -> PathBuf {
        self.state.paths.config()
    }

    pub fn vocab_text(&self) -> String {
        fs::read_to_string(self.vocab_path()).expect("read vocab.csv")
    }

    pub fn write_config(&self, json: &str) {
        fs::write(self.config_path(), json).expect("write config.json");
    }
}
