//! Storage backend configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where the revenue data is read from.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON export files loaded into memory at startup
    #[default]
    Snapshot,
    /// PostgreSQL, configured by the `database` section
    Postgres,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory holding the JSON exports for the snapshot backend
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StorageBackend::Snapshot && self.snapshot_dir.as_os_str().is_empty() {
            return Err(ValidationError::EmptySnapshotDir);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            snapshot_dir: default_snapshot_dir(),
        }
    }
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("./data")
}
