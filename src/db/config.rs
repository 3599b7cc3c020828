//! Connection configuration and backend selection
//!
//! Provides configuration types and factory functions for creating
//! database backends based on user configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use super::DatabaseBackend;

/// Path that selects a private in-memory database
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Configuration for one named connection
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    /// Which backend to use
    #[serde(default)]
    pub backend: BackendType,

    /// Path to database file, or `:memory:`
    #[serde(default = "default_sqlite_path")]
    pub path: String,

    /// Milliseconds a statement waits on a locked database
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

/// Backend type selection
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    #[default]
    Sqlite,
}

fn default_sqlite_path() -> String {
    "vault.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            backend: BackendType::Sqlite,
            path: default_sqlite_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl ConnectionConfig {
    /// Load configuration from string
    pub fn load_from_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).context("Failed to parse connection configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            anyhow::bail!("Connection 'path' must not be empty");
        }
        Ok(())
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Open database backend from this configuration
    pub fn open(&self) -> Result<DatabaseBackend> {
        match self.backend {
            BackendType::Sqlite if self.path == IN_MEMORY_PATH => {
                DatabaseBackend::open_sqlite_in_memory()
            }
            BackendType::Sqlite => DatabaseBackend::open_sqlite(&self.path, self.busy_timeout())
                .with_context(|| format!("Failed to open SQLite database at {}", self.path)),
        }
    }
}
