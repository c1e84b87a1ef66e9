//! Configuration module for Pennywise
//!
//! - Path resolution for config, data and backups
//! - Application configuration persistence

pub mod paths;
pub mod settings;

pub use paths::PennywisePaths;
pub use settings::AppConfig;
