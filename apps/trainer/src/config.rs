//! Learner configuration persisted as JSON.

use crate::store::atomic::replace_file;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use vocab_core::types::{Language, Level};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config unavailable: {path}: {message}")]
    Unavailable { path: String, message: String },

    #[error("config is invalid: {path}: {message}")]
    Invalid { path: String, message: String },

    #[error("config write failed: {path}: {message}")]
    WriteFailed { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// The learner's study language, level and day boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    pub language: Language,
    pub user_level: Level,
    /// Hour of the day (0-23) at which a new study day starts.
    pub daily_reset_hour: u32,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            language: Language::English,
            user_level: Level::MIN,
            daily_reset_hour: 0,
        }
    }
}

/// Source of the current learner configuration.
pub trait ConfigProvider {
    fn current(&self) -> Result<LearnerConfig>;
    fn set_level(&self, level: Level) -> Result<LearnerConfig>;
    fn set_language(&self, language: Language) -> Result<LearnerConfig>;
}

/// `config.json` backed provider.
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    pub fn save(&self, config: &LearnerConfig) -> Result<()> {
        let write_failed = |message: String| ConfigError::WriteFailed {
            path: self.display_path(),
            message,
        };
        let json = serde_json::to_vec_pretty(config).map_err(|e| write_failed(e.to_string()))?;
        replace_file(&self.path, &json).map_err(|e| write_failed(e.to_string()))
    }

    /// Apply one change and save. An invalid file is repaired: fields that
    /// still read correctly are kept, the rest fall back to defaults.
    fn update(&self, change: impl FnOnce(&mut LearnerConfig)) -> Result<LearnerConfig> {
        let mut config = match self.current() {
            Err(ConfigError::Invalid { message, .. }) => {
                tracing::warn!(path = %self.display_path(), %message, "repairing invalid config");
                let bytes = fs::read(&self.path).unwrap_or_default();
                salvage(&bytes)
            }
            other => other?,
        };
        change(&mut config);
        self.save(&config)?;
        Ok(config)
    }
}

fn salvage(bytes: &[u8]) -> LearnerConfig {
    let mut config = LearnerConfig::default();
    let Ok(serde_json::Value::Object(fields)) =
        serde_json::from_slice::<serde_json::Value>(bytes)
    else {
        return config;
    };

    if let Some(language) = fields.get("language").and_then(|v| v.as_str()) {
        config.language = Language::parse(language);
    }
    if let Some(level) = fields
        .get("user_level")
        .and_then(|v| v.as_u64())
        .and_then(|n| u8::try_from(n).ok())
        .and_then(Level::new)
    {
        config.user_level = level;
    }
    if let Some(hour) = fields
        .get("daily_reset_hour")
        .and_then(|v| v.as_u64())
        .filter(|h| *h <= 23)
    {
        config.daily_reset_hour = hour as u32;
    }
    config
}

impl ConfigProvider for JsonConfigStore {
    fn current(&self) -> Result<LearnerConfig> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LearnerConfig::default()),
            Err(e) => {
                return Err(ConfigError::Unavailable {
                    path: self.display_path(),
                    message: e.to_string(),
                })
            }
        };

        let config: LearnerConfig =
            serde_json::from_slice(&bytes).map_err(|e| ConfigError::Invalid {
                path: self.display_path(),
                message: e.to_string(),
            })?;
        if config.daily_reset_hour > 23 {
            return Err(ConfigError::Invalid {
                path: self.display_path(),
                message: format!("daily_reset_hour {} is not an hour", config.daily_reset_hour),
            });
        }
        Ok(config)
    }

    fn set_level(&self, level: Level) -> Result<LearnerConfig> {
        let config = self.update(|config| config.user_level = level)?;
        tracing::info!(level = %level, name = level.name(), "learner level updated");
        Ok(config)
    }

    fn set_language(&self, language: Language) -> Result<LearnerConfig> {
        let config = self.update(|config| config.language = language)?;
        tracing::info!(language = %config.language, "study language updated");
        Ok(config)
    }
}
