//! Optional `config.toml` in the data directory
//!
//! ```toml
//! [storage]
//! flashcards_key = "aidict:flashcards"
//!
//! [history]
//! limit = 200
//!
//! [review]
//! session_limit = 30
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flashcards::FLASHCARDS_KEY;
use crate::history::{DEFAULT_HISTORY_LIMIT, HISTORY_KEY};

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub review: ReviewConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "StorageConfig::default_flashcards_key")]
    pub flashcards_key: String,
    #[serde(default = "StorageConfig::default_history_key")]
    pub history_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            flashcards_key: Self::default_flashcards_key(),
            history_key: Self::default_history_key(),
        }
    }
}

impl StorageConfig {
    fn default_flashcards_key() -> String {
        FLASHCARDS_KEY.to_string()
    }

    fn default_history_key() -> String {
        HISTORY_KEY.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_limit")]
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: Self::default_limit(),
        }
    }
}

impl HistoryConfig {
    fn default_limit() -> usize {
        DEFAULT_HISTORY_LIMIT
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Maximum number of due cards offered per session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_limit: Option<usize>,
}

impl Config {
    /// Load `config.toml` from `data_dir`; a missing file yields defaults
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
