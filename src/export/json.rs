//! JSON snapshot export and import
//!
//! A snapshot carries every record kind plus the settings block, an export
//! timestamp and a format version. Importing one replaces the whole store in
//! a single transaction; a document that fails to parse or validate leaves
//! the store untouched.

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{PennywiseError, PennywiseResult};
use crate::models::{
    Budget, BudgetAllocation, Category, Currency, Expense, IncomeEntry, Money, RecurringExpense,
    SavingsGoal, Settings,
};
use crate::storage::file_io::write_json_atomic;
use crate::storage::{Record, Storage, StoreData, STORE_SCHEMA_VERSION};

/// Current snapshot format version
pub const EXPORT_VERSION: u32 = 1;

/// A complete, self-describing copy of the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub budgets: Vec<Budget>,
    pub categories: Vec<Category>,
    pub allocations: Vec<BudgetAllocation>,
    pub expenses: Vec<Expense>,
    pub incomes: Vec<IncomeEntry>,
    pub recurring_expenses: Vec<RecurringExpense>,
    pub savings_goals: Vec<SavingsGoal>,

    /// Absent in documents written before settings were exported
    #[serde(default)]
    pub settings: Option<Settings>,

    #[serde(rename = "exportDate")]
    pub export_date: DateTime<Utc>,

    pub version: u32,
}

/// What an import restored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub budgets: usize,
    pub categories: usize,
    pub allocations: usize,
    pub expenses: usize,
    pub incomes: usize,
    pub recurring_expenses: usize,
    pub savings_goals: usize,
    /// False when the document had no settings block and defaults were used
    pub settings_restored: bool,
}

impl ImportReport {
    pub fn total_records(&self) -> usize {
        self.budgets
            + self.categories
            + self.allocations
            + self.expenses
            + self.incomes
            + self.recurring_expenses
            + self.savings_goals
    }
}

impl SnapshotDocument {
    /// Snapshot the current store
    pub fn from_storage(storage: &Storage) -> PennywiseResult<Self> {
        let data = storage.snapshot()?;
        Ok(Self {
            budgets: data.budgets,
            categories: data.categories,
            allocations: data.allocations,
            expenses: data.expenses,
            incomes: data.incomes,
            recurring_expenses: data.recurring_expenses,
            savings_goals: data.savings_goals,
            settings: data.settings,
            export_date: Utc::now(),
            version: EXPORT_VERSION,
        })
    }

    /// Check the document is something this version can restore
    ///
    /// References between records are not checked; dangling ones are
    /// tolerated the same way the live store tolerates them.
    pub fn validate(&self) -> Result<(), String> {
        if self.version == 0 || self.version > EXPORT_VERSION {
            return Err(format!(
                "Unsupported backup version {} (expected at most {})",
                self.version, EXPORT_VERSION
            ));
        }

        unique_ids(&self.budgets)?;
        unique_ids(&self.categories)?;
        unique_ids(&self.allocations)?;
        unique_ids(&self.expenses)?;
        unique_ids(&self.incomes)?;
        unique_ids(&self.recurring_expenses)?;
        unique_ids(&self.savings_goals)?;

        amounts_within_limit(&self.budgets, |b| vec![b.monthly_income, b.rollover()])?;
        amounts_within_limit(&self.allocations, |a| vec![a.allocated_amount])?;
        amounts_within_limit(&self.expenses, |e| vec![e.amount])?;
        amounts_within_limit(&self.incomes, |i| vec![i.amount])?;
        amounts_within_limit(&self.recurring_expenses, |r| vec![r.amount])?;
        amounts_within_limit(&self.savings_goals, |g| {
            vec![g.target_amount, g.current_amount]
        })?;

        let mut months = HashSet::new();
        for budget in &self.budgets {
            if !months.insert(budget.month) {
                return Err(format!("More than one budget for {}", budget.month));
            }
        }

        Ok(())
    }

    fn report(&self, settings_restored: bool) -> ImportReport {
        ImportReport {
            budgets: self.budgets.len(),
            categories: self.categories.len(),
            allocations: self.allocations.len(),
            expenses: self.expenses.len(),
            incomes: self.incomes.len(),
            recurring_expenses: self.recurring_expenses.len(),
            savings_goals: self.savings_goals.len(),
            settings_restored,
        }
    }

    fn into_store_data(self, fallback_currency: Currency) -> StoreData {
        StoreData {
            schema_version: STORE_SCHEMA_VERSION,
            budgets: self.budgets,
            categories: self.categories,
            allocations: self.allocations,
            expenses: self.expenses,
            incomes: self.incomes,
            recurring_expenses: self.recurring_expenses,
            savings_goals: self.savings_goals,
            settings: Some(
                self.settings
                    .unwrap_or_else(|| Settings::with_currency(fallback_currency)),
            ),
        }
    }
}

fn unique_ids<R: Record>(records: &[R]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.id()) {
            return Err(format!("Duplicate {} id {}", R::KIND, record.id()));
        }
    }
    Ok(())
}

fn amounts_within_limit<R: Record>(
    records: &[R],
    amounts: impl Fn(&R) -> Vec<Money>,
) -> Result<(), String> {
    for record in records {
        if amounts(record).iter().any(|a| !a.is_within_limit()) {
            return Err(format!(
                "Amount out of range in {} {} (limit {})",
                R::KIND,
                record.id(),
                Money::limit()
            ));
        }
    }
    Ok(())
}

/// Snapshot the current store
pub fn export_document(storage: &Storage) -> PennywiseResult<SnapshotDocument> {
    SnapshotDocument::from_storage(storage)
}

/// Write a snapshot of the store as JSON
pub fn export_json<W: Write>(storage: &Storage, writer: &mut W, pretty: bool) -> PennywiseResult<()> {
    let document = export_document(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &document)
    } else {
        serde_json::to_writer(writer, &document)
    }?;

    Ok(())
}

/// Write a snapshot of the store to a file
pub fn export_to_file<P: AsRef<Path>>(
    storage: &Storage,
    path: P,
    pretty: bool,
) -> PennywiseResult<SnapshotDocument> {
    let document = export_document(storage)?;
    write_json_atomic(path.as_ref(), &document, pretty)?;

    info!(
        path = %path.as_ref().display(),
        budgets = document.budgets.len(),
        expenses = document.expenses.len(),
        "exported snapshot"
    );
    Ok(document)
}

/// Parse and validate a snapshot without touching any store
pub fn parse_document(json: &str) -> PennywiseResult<SnapshotDocument> {
    let document: SnapshotDocument =
        serde_json::from_str(json).map_err(|e| PennywiseError::ImportFormat(e.to_string()))?;
    document.validate().map_err(PennywiseError::ImportFormat)?;
    Ok(document)
}

/// Replace the whole store with the contents of a snapshot
///
/// When the document has no settings block, settings are reset to defaults
/// with `fallback_currency`.
pub fn import_json(
    storage: &Storage,
    json: &str,
    fallback_currency: Currency,
) -> PennywiseResult<ImportReport> {
    let document = parse_document(json)?;

    let settings_restored = document.settings.is_some();
    if !settings_restored {
        warn!(currency = %fallback_currency, "backup has no settings; using defaults");
    }
    let report = document.report(settings_restored);
    let data = document.into_store_data(fallback_currency);

    storage.transaction(|s| {
        s.clear_all()?;
        s.restore(data)
    })?;

    info!(records = report.total_records(), "imported snapshot");
    Ok(report)
}

/// Replace the whole store with a snapshot read from a file
pub fn import_from_file<P: AsRef<Path>>(
    storage: &Storage,
    path: P,
    fallback_currency: Currency,
) -> PennywiseResult<ImportReport> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .map_err(|e| PennywiseError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    import_json(storage, &json, fallback_currency)
}
