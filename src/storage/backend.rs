//! Persistence backends
//!
//! The store keeps every table in memory and hands a complete [`StoreData`]
//! snapshot to a backend on each commit. Swapping the backend changes where
//! data lives without touching any caller.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::PennywiseError;
use crate::models::{
    Budget, BudgetAllocation, Category, Expense, IncomeEntry, RecurringExpense, SavingsGoal,
    Settings,
};

use super::file_io::{read_json_optional, write_json_atomic};

/// Current on-disk layout version
pub const STORE_SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    STORE_SCHEMA_VERSION
}

/// Everything the store holds, as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub allocations: Vec<BudgetAllocation>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub incomes: Vec<IncomeEntry>,
    #[serde(default)]
    pub recurring_expenses: Vec<RecurringExpense>,
    #[serde(default)]
    pub savings_goals: Vec<SavingsGoal>,
    #[serde(default)]
    pub settings: Option<Settings>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            schema_version: STORE_SCHEMA_VERSION,
            budgets: Vec::new(),
            categories: Vec::new(),
            allocations: Vec::new(),
            expenses: Vec::new(),
            incomes: Vec::new(),
            recurring_expenses: Vec::new(),
            savings_goals: Vec::new(),
            settings: None,
        }
    }
}

/// Where committed store snapshots live
pub trait StorageBackend: Send + Sync {
    /// Load the last committed snapshot; an empty store if none exists yet
    fn load(&self) -> Result<StoreData, PennywiseError>;

    /// Durably replace the committed snapshot
    fn persist(&self, data: &StoreData) -> Result<(), PennywiseError>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Single JSON file, replaced atomically on every commit
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl StorageBackend for JsonFileBackend {
    fn load(&self) -> Result<StoreData, PennywiseError> {
        let data: Option<StoreData> = read_json_optional(&self.path)?;
        let data = data.unwrap_or_default();

        if data.schema_version > STORE_SCHEMA_VERSION {
            return Err(PennywiseError::Storage(format!(
                "{} was written by a newer version (schema {}, supported {})",
                self.path.display(),
                data.schema_version,
                STORE_SCHEMA_VERSION
            )));
        }

        Ok(data)
    }

    fn persist(&self, data: &StoreData) -> Result<(), PennywiseError> {
        write_json_atomic(&self.path, data, false)
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}

/// Process-local backend for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryBackend {
    data: Mutex<StoreData>,
    fail_persist: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent persist fail, simulating a storage fault
    pub fn set_fail_persist(&self, fail: bool) {
        self.fail_persist.store(fail, Ordering::SeqCst);
    }

    /// The last committed snapshot
    pub fn committed(&self) -> Result<StoreData, PennywiseError> {
        self.data
            .lock()
            .map(|d| d.clone())
            .map_err(|e| PennywiseError::Storage(format!("Failed to acquire lock: {}", e)))
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self) -> Result<StoreData, PennywiseError> {
        self.committed()
    }

    fn persist(&self, data: &StoreData) -> Result<(), PennywiseError> {
        if self.fail_persist.load(Ordering::SeqCst) {
            return Err(PennywiseError::Storage("Simulated write failure".into()));
        }
        let mut committed = self
            .data
            .lock()
            .map_err(|e| PennywiseError::Storage(format!("Failed to acquire lock: {}", e)))?;
        *committed = data.clone();
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Currency;
    use tempfile::TempDir;

    #[test]
    fn test_json_backend_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(temp_dir.path().join("store.json"));
        let data = backend.load().unwrap();
        assert!(data.budgets.is_empty());
        assert!(data.settings.is_none());
    }

    #[test]
    fn test_json_backend_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(temp_dir.path().join("store.json"));

        let data = StoreData {
            settings: Some(Settings::with_currency(Currency::Eur)),
            ..StoreData::default()
        };
        backend.persist(&data).unwrap();

        assert_eq!(backend.load().unwrap(), data);
    }

    #[test]
    fn test_json_backend_rejects_newer_schema() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        std::fs::write(&path, r#"{"schema_version": 99}"#).unwrap();

        let err = JsonFileBackend::new(path).load().unwrap_err();
        assert!(err.is_storage_fault());
    }

    #[test]
    fn test_memory_backend_failure_keeps_last_commit() {
        let backend = MemoryBackend::new();
        let first = StoreData {
            settings: Some(Settings::default()),
            ..StoreData::default()
        };
        backend.persist(&first).unwrap();

        backend.set_fail_persist(true);
        assert!(backend.persist(&StoreData::default()).is_err());
        assert_eq!(backend.load().unwrap(), first);
    }
}
