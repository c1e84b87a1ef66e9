//! Export and import CLI commands

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::{AppConfig, PennywisePaths};
use crate::error::PennywiseResult;
use crate::export::{export_to_file, import_from_file};
use crate::storage::Storage;

/// Write a snapshot of the whole store
///
/// Without `output`, the file goes into the data directory's export folder
/// under a timestamped name.
pub fn handle_export(
    storage: &Storage,
    paths: &PennywisePaths,
    config: &AppConfig,
    output: Option<PathBuf>,
    compact: bool,
) -> PennywiseResult<()> {
    let path = output.unwrap_or_else(|| paths.export_file(Utc::now()));
    let pretty = config.pretty_export && !compact;

    let document = export_to_file(storage, &path, pretty)?;
    println!("Exported to {}", path.display());
    println!(
        "  {} budget(s), {} category(ies), {} expense(s)",
        document.budgets.len(),
        document.categories.len(),
        document.expenses.len()
    );

    Ok(())
}

/// Replace the whole store with a snapshot file
pub fn handle_import(storage: &Storage, config: &AppConfig, file: &Path) -> PennywiseResult<()> {
    let report = import_from_file(storage, file, config.default_currency)?;

    println!("Imported {}", file.display());
    println!("  Budgets:            {}", report.budgets);
    println!("  Categories:         {}", report.categories);
    println!("  Allocations:        {}", report.allocations);
    println!("  Expenses:           {}", report.expenses);
    println!("  Income entries:     {}", report.incomes);
    println!("  Recurring expenses: {}", report.recurring_expenses);
    println!("  Savings goals:      {}", report.savings_goals);
    if !report.settings_restored {
        println!("  No settings in backup; defaults applied");
    }

    Ok(())
}
