//! Storage initialization
//!
//! Handles first-run setup: the default categories and the settings
//! singleton. Runs once at process start.

use tracing::info;

use crate::error::PennywiseError;
use crate::models::{Currency, DefaultCategory, Settings};

use super::Storage;

/// Seed an empty store; does nothing when any record already exists
///
/// Returns true when seeding happened.
pub fn initialize(storage: &Storage, default_currency: Currency) -> Result<bool, PennywiseError> {
    if !storage.is_empty()? {
        return Ok(false);
    }

    storage.transaction(|s| {
        for default in DefaultCategory::all() {
            s.categories.put(default.to_category())?;
        }
        s.put_settings(Settings::with_currency(default_currency))
    })?;

    info!(
        categories = DefaultCategory::all().len(),
        currency = %default_currency,
        "seeded empty store"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PennywisePaths;
    use crate::models::{Category, Color, Icon, Theme};
    use tempfile::TempDir;

    #[test]
    fn test_initialize_seeds_defaults() {
        let storage = Storage::in_memory();

        assert!(initialize(&storage, Currency::Eur).unwrap());

        let categories = storage.categories.get_all().unwrap();
        let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names.len(), 4);
        for expected in ["Groceries", "Transport", "Bills", "Utilities"] {
            assert!(names.contains(&expected));
        }

        let settings = storage.settings().unwrap().unwrap();
        assert_eq!(settings.currency, Currency::Eur);
        assert_eq!(settings.theme, Theme::System);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let storage = Storage::in_memory();
        initialize(&storage, Currency::Usd).unwrap();
        assert!(!initialize(&storage, Currency::Usd).unwrap());
        assert_eq!(storage.categories.count().unwrap(), 4);
    }

    #[test]
    fn test_doesnt_seed_non_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PennywisePaths::with_base_dir(temp_dir.path().to_path_buf());

        {
            let storage = Storage::open(&paths).unwrap();
            storage
                .transaction(|s| s.categories.put(Category::new("Custom", Icon::Gift, Color::Pink)))
                .unwrap();
        }

        let storage = Storage::open(&paths).unwrap();
        assert!(!initialize(&storage, Currency::Usd).unwrap());

        let categories = storage.categories.get_all().unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Custom");
    }
}
