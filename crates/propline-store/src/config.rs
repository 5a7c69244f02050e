//! Store configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for reading, writing and versioning properties files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory, next to the saved file, that receives versioned backups
    pub versioning_dir: String,
    /// Extension given to backup files
    pub backup_extension: String,
    /// Give up waiting for file access after this many milliseconds
    pub wait_timeout_ms: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            versioning_dir: "temp".to_string(),
            backup_extension: "properties".to_string(),
            wait_timeout_ms: None,
        }
    }
}

impl StoreConfig {
    pub fn wait_timeout(&self) -> Option<Duration> {
        self.wait_timeout_ms.map(Duration::from_millis)
    }

    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }
}
