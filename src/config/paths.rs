//! Path management for Pennywise
//!
//! ## Path Resolution Order
//!
//! 1. `PENNYWISE_DATA_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (e.g. `~/.config/pennywise` on Linux)

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;

use crate::error::PennywiseError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "PENNYWISE_DATA_DIR";

/// Manages all paths used by Pennywise
#[derive(Debug, Clone)]
pub struct PennywisePaths {
    base_dir: PathBuf,
}

impl PennywisePaths {
    /// Resolve the base directory from the environment or platform defaults
    pub fn new() -> Result<Self, PennywiseError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the backup directory (default target for exports)
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the application config file
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the record store
    pub fn store_file(&self) -> PathBuf {
        self.data_dir().join("store.json")
    }

    /// Default file name for an export taken at `at`
    pub fn export_file(&self, at: DateTime<Utc>) -> PathBuf {
        self.backup_dir()
            .join(format!("pennywise-backup-{}.json", at.format("%Y%m%d-%H%M%S")))
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), PennywiseError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PennywiseError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| PennywiseError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir()).map_err(|e| {
            PennywiseError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        Ok(())
    }

    /// Check if a store has been written at this location
    pub fn is_initialized(&self) -> bool {
        self.store_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, PennywiseError> {
    ProjectDirs::from("", "", "pennywise")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| PennywiseError::Config("Could not determine home directory".into()))
}
