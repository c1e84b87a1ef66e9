//! Category service
//!
//! CRUD for spending categories. Deleting a category does not cascade: its
//! allocations and expenses stay in the store and drop out of derived views.

use tracing::{debug, info};

use crate::error::{PennywiseError, PennywiseResult};
use crate::models::{Category, CategoryId, CategoryUpdate, Color, Icon};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    pub fn create_category(&self, name: &str, icon: Icon, color: Color) -> PennywiseResult<Category> {
        let name = name.trim();
        self.ensure_unique_name(name, None)?;

        let category = Category::new(name, icon, color);
        category
            .validate()
            .map_err(|e| PennywiseError::Validation(e.to_string()))?;

        self.storage
            .transaction(|s| s.categories.put(category.clone()))?;

        info!(category_id = %category.id, name = %category.name, "created category");
        Ok(category)
    }

    /// A category by id
    pub fn get_category(&self, id: CategoryId) -> PennywiseResult<Category> {
        self.storage
            .categories
            .get(id)?
            .ok_or_else(|| PennywiseError::category_not_found(id.to_string()))
    }

    /// Find a category by id, short id or name (case-insensitive)
    pub fn find_category(&self, identifier: &str) -> PennywiseResult<Category> {
        let identifier = identifier.trim();

        if let Ok(id) = identifier.parse::<CategoryId>() {
            if let Some(category) = self.storage.categories.get(id)? {
                return Ok(category);
            }
        }

        let categories = self.list_categories()?;
        categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(identifier))
            .or_else(|| categories.iter().find(|c| c.id.short() == identifier))
            .cloned()
            .ok_or_else(|| PennywiseError::category_not_found(identifier))
    }

    /// All categories in creation order
    pub fn list_categories(&self) -> PennywiseResult<Vec<Category>> {
        self.storage.categories.get_all()
    }

    /// Merge a partial update into a category
    pub fn update_category(
        &self,
        id: CategoryId,
        mut update: CategoryUpdate,
    ) -> PennywiseResult<Category> {
        let mut category = self.get_category(id)?;

        if let Some(name) = update.name.take() {
            let name = name.trim().to_string();
            self.ensure_unique_name(&name, Some(id))?;
            update.name = Some(name);
        }

        category.apply(update);
        category
            .validate()
            .map_err(|e| PennywiseError::Validation(e.to_string()))?;

        self.storage
            .transaction(|s| s.categories.put(category.clone()))?;

        debug!(category_id = %id, "updated category");
        Ok(category)
    }

    /// Delete a category
    pub fn delete_category(&self, id: CategoryId) -> PennywiseResult<Category> {
        let removed = self
            .storage
            .transaction(|s| s.categories.delete(id))?
            .ok_or_else(|| PennywiseError::category_not_found(id.to_string()))?;

        info!(category_id = %id, name = %removed.name, "deleted category");
        Ok(removed)
    }

    fn ensure_unique_name(&self, name: &str, except: Option<CategoryId>) -> PennywiseResult<()> {
        let taken = self
            .list_categories()?
            .iter()
            .any(|c| Some(c.id) != except && c.name.eq_ignore_ascii_case(name));

        if taken {
            return Err(PennywiseError::Validation(format!(
                "A category named '{}' already exists",
                name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, BudgetAllocation, BudgetMonth, Currency, Money};

    fn seeded() -> Storage {
        let storage = Storage::in_memory();
        crate::storage::initialize(&storage, Currency::Usd).unwrap();
        storage
    }

    #[test]
    fn test_create_and_find() {
        let storage = seeded();
        let service = CategoryService::new(&storage);

        let created = service
            .create_category("  Dining Out ", Icon::Utensils, Color::Orange)
            .unwrap();
        assert_eq!(created.name, "Dining Out");
        assert!(!created.is_default);

        assert_eq!(service.find_category("dining out").unwrap().id, created.id);
        assert_eq!(
            service.find_category(&created.id.to_string()).unwrap().id,
            created.id
        );
        assert_eq!(service.find_category(&created.id.short()).unwrap().id, created.id);
        assert!(service.find_category("nothing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_duplicate_and_empty_names_rejected() {
        let storage = seeded();
        let service = CategoryService::new(&storage);

        assert!(service
            .create_category("groceries", Icon::Tag, Color::Gray)
            .unwrap_err()
            .is_validation());
        assert!(service
            .create_category("   ", Icon::Tag, Color::Gray)
            .unwrap_err()
            .is_validation());
        assert_eq!(service.list_categories().unwrap().len(), 4);
    }

    #[test]
    fn test_update_category() {
        let storage = seeded();
        let service = CategoryService::new(&storage);
        let bills = service.find_category("Bills").unwrap();

        let updated = service
            .update_category(
                bills.id,
                CategoryUpdate {
                    name: Some("Rent & Bills".into()),
                    color: Some(Color::Purple),
                    ..CategoryUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Rent & Bills");
        assert_eq!(updated.color, Color::Purple);
        assert_eq!(updated.icon, bills.icon);
        assert!(updated.is_default);

        // Renaming to its own name in another case is fine
        service
            .update_category(
                bills.id,
                CategoryUpdate {
                    name: Some("RENT & BILLS".into()),
                    ..CategoryUpdate::default()
                },
            )
            .unwrap();
    }

    #[test]
    fn test_delete_does_not_cascade() {
        let storage = seeded();
        let service = CategoryService::new(&storage);
        let transport = service.find_category("Transport").unwrap();

        let budget = Budget::new(BudgetMonth::parse("2025-01").unwrap(), Money::from(100));
        let allocation = BudgetAllocation::new(budget.id, transport.id, Money::from(50));
        storage
            .transaction(|s| {
                s.budgets.put(budget)?;
                s.allocations.put(allocation)
            })
            .unwrap();

        service.delete_category(transport.id).unwrap();

        assert!(service.get_category(transport.id).unwrap_err().is_not_found());
        assert_eq!(storage.allocations.count().unwrap(), 1);
        assert!(service.delete_category(transport.id).unwrap_err().is_not_found());
    }
}
