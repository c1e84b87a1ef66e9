//! Application configuration for Pennywise
//!
//! Process-level preferences kept in `config.json`. This is separate from the
//! Settings record in the store, which is user data and travels with exports.

use serde::{Deserialize, Serialize};

use super::paths::PennywisePaths;
use crate::error::PennywiseError;
use crate::models::Currency;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency used when seeding the settings record of a fresh store
    #[serde(default)]
    pub default_currency: Currency,

    /// Log filter used when `PENNYWISE_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Pretty-print export documents
    #[serde(default = "default_pretty_export")]
    pub pretty_export: bool,

    /// Run the recurring expense processor when the CLI starts
    #[serde(default = "default_process_recurring")]
    pub process_recurring_on_start: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_pretty_export() -> bool {
    true
}

fn default_process_recurring() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_currency: Currency::default(),
            log_level: default_log_level(),
            pretty_export: default_pretty_export(),
            process_recurring_on_start: default_process_recurring(),
        }
    }
}

impl AppConfig {
    /// Load config from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &PennywisePaths) -> Result<Self, PennywiseError> {
        let config_path = paths.config_file();

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .map_err(|e| PennywiseError::Io(format!("Failed to read config file: {}", e)))?;

            serde_json::from_str(&contents)
                .map_err(|e| PennywiseError::Config(format!("Failed to parse config file: {}", e)))
        } else {
            // Not persisted until the caller saves
            Ok(AppConfig::default())
        }
    }

    /// Save config to disk
    pub fn save(&self, paths: &PennywisePaths) -> Result<(), PennywiseError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| PennywiseError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(paths.config_file(), contents)
            .map_err(|e| PennywiseError::Io(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.default_currency, Currency::Usd);
        assert_eq!(config.log_level, "warn");
        assert!(config.pretty_export);
        assert!(config.process_recurring_on_start);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PennywisePaths::with_base_dir(temp_dir.path().to_path_buf());

        let config = AppConfig {
            default_currency: Currency::Inr,
            log_level: "debug".into(),
            ..AppConfig::default()
        };
        config.save(&paths).unwrap();

        let loaded = AppConfig::load_or_create(&paths).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PennywisePaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.config_file(), r#"{"default_currency": "EUR"}"#).unwrap();

        let loaded = AppConfig::load_or_create(&paths).unwrap();
        assert_eq!(loaded.default_currency, Currency::Eur);
        assert!(loaded.pretty_export);
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PennywisePaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.config_file(), "{ nope").unwrap();

        let err = AppConfig::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, PennywiseError::Config(_)));
    }
}
