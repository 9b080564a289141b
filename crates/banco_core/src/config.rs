//! Process configuration with built-in defaults.
//!
//! # Responsibility
//! - Hold the store target and logging settings for one run.
//!
//! # Invariants
//! - Nothing is read from flags, environment or files; callers start from
//!   `AppConfig::default()` and override fields in code.

use crate::logging::default_log_level;
use std::path::PathBuf;

/// Default connection string: an ephemeral in-memory SQLite store.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `sqlite://` (memory) or `sqlite:///<path>` (file).
    pub database_url: String,
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: std::env::temp_dir().join("banco").join("logs"),
        }
    }
}
