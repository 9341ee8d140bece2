use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_SESSION_WINDOW_MS: i64 = 2 * 60 * 60 * 1000;

/// Runtime configuration, loadable from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the SQLite store.
    pub database_path: String,
    /// Two scores further apart than this (in milliseconds) never share a
    /// session.
    pub session_window_ms: i64,
    /// How many of a user's best PB ratings feed their profile rating.
    pub rating_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "saiten.db".to_string(),
            session_window_ms: DEFAULT_SESSION_WINDOW_MS,
            rating_depth: 20,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::Config(e.to_string()))
    }
}
