//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod allocate;
pub mod budget;
pub mod category;
pub mod expense;
pub mod goal;
pub mod recurring;
pub mod settings;
pub mod snapshot;
pub mod summary;

pub use allocate::{handle_allocate_command, AllocateCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use recurring::{handle_recurring_command, RecurringCommands};
pub use settings::{handle_settings_command, SettingsCommands};
pub use snapshot::{handle_export, handle_import};
pub use summary::handle_summary;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{PennywiseError, PennywiseResult};
use crate::models::{Budget, BudgetMonth, Currency, Money};
use crate::services::{BudgetService, SettingsService};
use crate::storage::{Record, Storage};

/// Parse "YYYY-MM", defaulting to the current month
pub(crate) fn parse_month(month: Option<&str>) -> PennywiseResult<BudgetMonth> {
    match month {
        Some(s) => BudgetMonth::parse(s).map_err(|e| PennywiseError::Validation(e.to_string())),
        None => Ok(BudgetMonth::current()),
    }
}

/// Parse an amount typed by the user
pub(crate) fn parse_amount(s: &str) -> PennywiseResult<Money> {
    Money::parse(s).map_err(|e| PennywiseError::Validation(format!("Invalid amount: {}", e)))
}

/// Parse "YYYY-MM-DD" as midnight UTC
pub(crate) fn parse_date(s: &str) -> PennywiseResult<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        PennywiseError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", s))
    })?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// The budget for a month, or a not-found error naming the month
pub(crate) fn require_budget(storage: &Storage, month: BudgetMonth) -> PennywiseResult<Budget> {
    BudgetService::new(storage)
        .get_budget(month)?
        .ok_or_else(|| PennywiseError::budget_not_found(month.to_string()))
}

/// The currency amounts are shown in
pub(crate) fn currency(storage: &Storage) -> PennywiseResult<Currency> {
    Ok(SettingsService::new(storage).get_settings()?.currency)
}

/// Find a record by full id or by the short form shown in tables
pub(crate) fn resolve_record<R, F>(records: Vec<R>, input: &str, not_found: F) -> PennywiseResult<R>
where
    R: Record,
    F: FnOnce(String) -> PennywiseError,
{
    let input = input.trim();
    let mut matches = records
        .into_iter()
        .filter(|r| id_matches(&r.id().to_string(), input));

    match (matches.next(), matches.next()) {
        (Some(record), None) => Ok(record),
        (Some(_), Some(_)) => Err(PennywiseError::Validation(format!(
            "'{}' matches more than one {}",
            input,
            R::KIND
        ))),
        (None, _) => Err(not_found(input.to_string())),
    }
}

fn id_matches(full: &str, input: &str) -> bool {
    let needle = match input.split_once('-') {
        Some((prefix, rest)) if prefix.len() == 3 && prefix.chars().all(|c| c.is_ascii_alphabetic()) => {
            rest
        }
        _ => input,
    };
    needle.len() >= 8 && full.starts_with(&needle.to_ascii_lowercase())
}
