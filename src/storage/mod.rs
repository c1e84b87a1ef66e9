//! Storage layer for Pennywise
//!
//! One [`Table`] per record kind plus the settings singleton, all held in
//! memory and committed as a whole to a [`StorageBackend`]. Multi-record
//! writes go through [`Storage::transaction`] so they land together or not
//! at all.

pub mod backend;
pub mod file_io;
pub mod init;
pub mod record;
pub mod table;

pub use backend::{JsonFileBackend, MemoryBackend, StorageBackend, StoreData, STORE_SCHEMA_VERSION};
pub use init::initialize;
pub use record::{IndexName, Record, RecordKind};
pub use table::Table;

use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::config::paths::PennywisePaths;
use crate::error::PennywiseError;
use crate::models::{
    Budget, BudgetAllocation, BudgetId, BudgetMonth, Category, CategoryId, Expense, IncomeEntry,
    RecurringExpense, SavingsGoal, Settings,
};

/// The record store: every table plus the backend they are committed to
pub struct Storage {
    backend: Arc<dyn StorageBackend>,
    pub budgets: Table<Budget>,
    pub categories: Table<Category>,
    pub allocations: Table<BudgetAllocation>,
    pub expenses: Table<Expense>,
    pub incomes: Table<IncomeEntry>,
    pub recurring: Table<RecurringExpense>,
    pub savings_goals: Table<SavingsGoal>,
    settings: RwLock<Option<Settings>>,
}

impl Storage {
    /// Create an empty store over the given backend; call `load_all` to read it
    pub fn with_backend(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            budgets: Table::new(),
            categories: Table::new(),
            allocations: Table::new(),
            expenses: Table::new(),
            incomes: Table::new(),
            recurring: Table::new(),
            savings_goals: Table::new(),
            settings: RwLock::new(None),
        }
    }

    /// A store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::with_backend(Arc::new(MemoryBackend::new()))
    }

    /// Open the file-backed store under the given paths and load it
    pub fn open(paths: &PennywisePaths) -> Result<Self, PennywiseError> {
        paths.ensure_directories()?;
        let storage = Self::with_backend(Arc::new(JsonFileBackend::new(paths.store_file())));
        storage.load_all()?;
        Ok(storage)
    }

    /// Replace in-memory state with the last committed snapshot
    pub fn load_all(&self) -> Result<(), PennywiseError> {
        let data = self.backend.load()?;
        debug!(backend = %self.backend.describe(), "loaded store");
        self.restore(data)
    }

    /// Commit the current in-memory state
    pub fn save(&self) -> Result<(), PennywiseError> {
        self.backend.persist(&self.snapshot()?)
    }

    /// Copy every record out of the store
    pub fn snapshot(&self) -> Result<StoreData, PennywiseError> {
        Ok(StoreData {
            schema_version: STORE_SCHEMA_VERSION,
            budgets: self.budgets.get_all()?,
            categories: self.categories.get_all()?,
            allocations: self.allocations.get_all()?,
            expenses: self.expenses.get_all()?,
            incomes: self.incomes.get_all()?,
            recurring_expenses: self.recurring.get_all()?,
            savings_goals: self.savings_goals.get_all()?,
            settings: self.settings()?,
        })
    }

    /// Replace every table with the contents of a snapshot
    pub fn restore(&self, data: StoreData) -> Result<(), PennywiseError> {
        self.budgets.replace_all(data.budgets)?;
        self.categories.replace_all(data.categories)?;
        self.allocations.replace_all(data.allocations)?;
        self.expenses.replace_all(data.expenses)?;
        self.incomes.replace_all(data.incomes)?;
        self.recurring.replace_all(data.recurring_expenses)?;
        self.savings_goals.replace_all(data.savings_goals)?;
        *self.settings_lock_write()? = data.settings;
        Ok(())
    }

    /// Remove every record of every kind, settings included
    pub fn clear_all(&self) -> Result<(), PennywiseError> {
        self.restore(StoreData::default())
    }

    /// Run `f` as one unit of work
    ///
    /// On success the resulting state is committed to the backend. If `f`
    /// fails, or the commit fails, the in-memory state is rolled back to what
    /// it was before `f` ran and the error is returned.
    pub fn transaction<T, F>(&self, f: F) -> Result<T, PennywiseError>
    where
        F: FnOnce(&Storage) -> Result<T, PennywiseError>,
    {
        let before = self.snapshot()?;

        match f(self).and_then(|value| self.save().map(|_| value)) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(error = %err, "rolling back store transaction");
                self.restore(before)?;
                Err(err)
            }
        }
    }

    /// True when no record of any kind exists
    pub fn is_empty(&self) -> Result<bool, PennywiseError> {
        Ok(self.budgets.count()? == 0
            && self.categories.count()? == 0
            && self.allocations.count()? == 0
            && self.expenses.count()? == 0
            && self.incomes.count()? == 0
            && self.recurring.count()? == 0
            && self.savings_goals.count()? == 0
            && self.settings()?.is_none())
    }

    fn settings_lock_write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, Option<Settings>>, PennywiseError> {
        self.settings
            .write()
            .map_err(|e| PennywiseError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// The settings singleton, if present
    pub fn settings(&self) -> Result<Option<Settings>, PennywiseError> {
        let settings = self
            .settings
            .read()
            .map_err(|e| PennywiseError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(*settings)
    }

    /// Write the settings singleton
    pub fn put_settings(&self, settings: Settings) -> Result<(), PennywiseError> {
        *self.settings_lock_write()? = Some(settings);
        Ok(())
    }

    /// Budgets recorded for a month (at most one under normal flows)
    pub fn budgets_for_month(&self, month: BudgetMonth) -> Result<Vec<Budget>, PennywiseError> {
        self.budgets
            .get_by_index(IndexName::ByMonth, &month.to_string())
    }

    /// Allocations belonging to a budget
    pub fn allocations_for_budget(
        &self,
        budget_id: BudgetId,
    ) -> Result<Vec<BudgetAllocation>, PennywiseError> {
        self.allocations
            .get_by_index(IndexName::ByBudget, &budget_id.to_string())
    }

    /// Expenses belonging to a budget
    pub fn expenses_for_budget(&self, budget_id: BudgetId) -> Result<Vec<Expense>, PennywiseError> {
        self.expenses
            .get_by_index(IndexName::ByBudget, &budget_id.to_string())
    }

    /// Expenses recorded against a category, across all budgets
    pub fn expenses_for_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Expense>, PennywiseError> {
        self.expenses
            .get_by_index(IndexName::ByCategory, &category_id.to_string())
    }

    /// Income entries belonging to a budget
    pub fn incomes_for_budget(
        &self,
        budget_id: BudgetId,
    ) -> Result<Vec<IncomeEntry>, PennywiseError> {
        self.incomes
            .get_by_index(IndexName::ByBudget, &budget_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, Money};
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PennywisePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(&paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("backups").exists());
        assert!(storage.is_empty().unwrap());
    }

    #[test]
    fn test_transaction_commits_and_reloads() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PennywisePaths::with_base_dir(temp_dir.path().to_path_buf());
        let month = BudgetMonth::parse("2025-01").unwrap();

        {
            let storage = Storage::open(&paths).unwrap();
            storage
                .transaction(|s| s.budgets.put(Budget::new(month, Money::from(100))))
                .unwrap();
        }

        let reopened = Storage::open(&paths).unwrap();
        let found = reopened.budgets_for_month(month).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].monthly_income, Money::from(100));
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let storage = Storage::in_memory();
        let month = BudgetMonth::parse("2025-01").unwrap();

        let result: Result<(), _> = storage.transaction(|s| {
            s.budgets.put(Budget::new(month, Money::from(100)))?;
            Err(PennywiseError::Validation("nope".into()))
        });

        assert!(result.is_err());
        assert_eq!(storage.budgets.count().unwrap(), 0);
    }

    #[test]
    fn test_commit_failure_rolls_back() {
        let backend = Arc::new(MemoryBackend::new());
        let storage = Storage::with_backend(backend.clone());
        backend.set_fail_persist(true);

        let result = storage.transaction(|s| s.put_settings(Settings::with_currency(Currency::Jpy)));

        assert!(result.unwrap_err().is_storage_fault());
        assert!(storage.settings().unwrap().is_none());
        assert!(backend.committed().unwrap().settings.is_none());
    }

    #[test]
    fn test_clear_all() {
        let storage = Storage::in_memory();
        storage.put_settings(Settings::default()).unwrap();
        storage
            .budgets
            .put(Budget::new(BudgetMonth::parse("2025-01").unwrap(), Money::zero()))
            .unwrap();
        assert!(!storage.is_empty().unwrap());

        storage.clear_all().unwrap();
        assert!(storage.is_empty().unwrap());
    }
}
