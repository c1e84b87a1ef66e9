//! Settings service
//!
//! Reads and updates the settings singleton stored alongside the records.

use tracing::info;

use crate::error::PennywiseResult;
use crate::models::{Settings, SettingsUpdate};
use crate::storage::Storage;

/// Service for the settings singleton
pub struct SettingsService<'a> {
    storage: &'a Storage,
}

impl<'a> SettingsService<'a> {
    /// Create a new settings service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Current settings; defaults when the singleton is missing
    pub fn get_settings(&self) -> PennywiseResult<Settings> {
        Ok(self.storage.settings()?.unwrap_or_default())
    }

    /// Merge a partial update, creating the singleton if it is missing
    pub fn update_settings(&self, update: SettingsUpdate) -> PennywiseResult<Settings> {
        let mut settings = self.get_settings()?;
        settings.apply(update);

        self.storage.transaction(|s| s.put_settings(settings))?;

        info!(currency = %settings.currency, theme = %settings.theme, "updated settings");
        Ok(settings)
    }
}
