//! Recurring expense templates
//!
//! A recurring expense periodically materializes into a concrete expense.
//! `last_processed` records the last time that happened and only moves
//! forward.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, RecurringExpenseId};
use super::money::Money;
use super::month::BudgetMonth;

/// How often a recurring expense repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown frequency: {}", s)),
        }
    }
}

/// Where a recurring item stands relative to the current period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurringState {
    Inactive,
    NotStarted,
    NeverProcessed,
    ProcessedThisPeriod,
    /// Processed in an earlier period and due again
    Due,
}

impl RecurringState {
    pub fn is_due(&self) -> bool {
        matches!(self, Self::NeverProcessed | Self::Due)
    }
}

/// A template that periodically materializes into expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringExpense {
    pub id: RecurringExpenseId,
    pub amount: Money,
    pub description: String,
    pub category_id: CategoryId,
    pub frequency: Frequency,
    pub start_date: DateTime<Utc>,
    pub active: bool,
    #[serde(default)]
    pub last_processed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl RecurringExpense {
    /// Create a new active recurring expense
    pub fn new(
        description: impl Into<String>,
        category_id: CategoryId,
        amount: Money,
        frequency: Frequency,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecurringExpenseId::new(),
            amount,
            description: description.into(),
            category_id,
            frequency,
            start_date,
            active: true,
            last_processed: None,
            created_at: Utc::now(),
        }
    }

    /// Classify this item against `today`
    ///
    /// Only monthly items have a period check. Daily, weekly and yearly items
    /// are due on their first run and report `ProcessedThisPeriod` after that.
    pub fn state_on(&self, today: NaiveDate) -> RecurringState {
        if !self.active {
            return RecurringState::Inactive;
        }
        if self.start_date.date_naive() > today {
            return RecurringState::NotStarted;
        }

        let Some(last) = self.last_processed else {
            return RecurringState::NeverProcessed;
        };

        match self.frequency {
            Frequency::Monthly
                if BudgetMonth::of_instant(last) < BudgetMonth::containing(today) =>
            {
                RecurringState::Due
            }
            _ => RecurringState::ProcessedThisPeriod,
        }
    }

    /// Record a posting at `at`; never moves `last_processed` backwards
    pub fn mark_processed(&mut self, at: DateTime<Utc>) {
        match self.last_processed {
            Some(last) if last >= at => {}
            _ => self.last_processed = Some(at),
        }
    }

    /// Description used for the materialized expense
    pub fn expense_description(&self) -> String {
        format!("Recurring: {}", self.description)
    }

    /// Validate the template
    pub fn validate(&self) -> Result<(), RecurringValidationError> {
        if self.description.trim().is_empty() {
            return Err(RecurringValidationError::EmptyDescription);
        }
        if !self.amount.is_positive() {
            return Err(RecurringValidationError::NonPositiveAmount);
        }
        if !self.amount.is_within_limit() {
            return Err(RecurringValidationError::AmountTooLarge);
        }
        Ok(())
    }
}

/// Input for creating a recurring expense
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecurringExpense {
    pub description: String,
    pub category_id: CategoryId,
    pub amount: Money,
    pub frequency: Frequency,
    /// Defaults to now
    pub start_date: Option<DateTime<Utc>>,
}

/// Partial update for a recurring expense
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecurringExpenseUpdate {
    pub amount: Option<Money>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub frequency: Option<Frequency>,
    pub start_date: Option<DateTime<Utc>>,
    pub active: Option<bool>,
}

impl RecurringExpense {
    /// Apply a partial update field by field
    pub fn apply(&mut self, update: RecurringExpenseUpdate) {
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(frequency) = update.frequency {
            self.frequency = frequency;
        }
        if let Some(start_date) = update.start_date {
            self.start_date = start_date;
        }
        if let Some(active) = update.active {
            self.active = active;
        }
    }
}

/// Validation errors for recurring expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurringValidationError {
    EmptyDescription,
    NonPositiveAmount,
    AmountTooLarge,
}

impl fmt::Display for RecurringValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Recurring expense needs a description"),
            Self::NonPositiveAmount => write!(f, "Recurring amount must be greater than zero"),
            Self::AmountTooLarge => write!(f, "Recurring amount cannot exceed {}", Money::limit()),
        }
    }
}

impl std::error::Error for RecurringValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rent(frequency: Frequency) -> RecurringExpense {
        RecurringExpense::new("Rent", CategoryId::new(), Money::from(1000), frequency, at(2025, 1, 1))
    }

    #[test]
    fn test_never_processed_is_due() {
        let item = rent(Frequency::Monthly);
        assert_eq!(item.state_on(day(2025, 2, 10)), RecurringState::NeverProcessed);
        assert!(item.state_on(day(2025, 2, 10)).is_due());
    }

    #[test]
    fn test_monthly_due_once_per_month() {
        let mut item = rent(Frequency::Monthly);
        item.mark_processed(at(2025, 2, 10));

        assert_eq!(item.state_on(day(2025, 2, 28)), RecurringState::ProcessedThisPeriod);
        assert_eq!(item.state_on(day(2025, 3, 1)), RecurringState::Due);
    }

    #[test]
    fn test_other_frequencies_only_first_run() {
        for frequency in [Frequency::Daily, Frequency::Weekly, Frequency::Yearly] {
            let mut item = rent(frequency);
            assert!(item.state_on(day(2025, 1, 2)).is_due());
            item.mark_processed(at(2025, 1, 2));
            assert!(!item.state_on(day(2026, 6, 1)).is_due());
        }
    }

    #[test]
    fn test_inactive_and_future_start() {
        let mut item = rent(Frequency::Monthly);
        assert_eq!(item.state_on(day(2024, 12, 31)), RecurringState::NotStarted);

        item.active = false;
        assert_eq!(item.state_on(day(2025, 5, 1)), RecurringState::Inactive);
    }

    #[test]
    fn test_last_processed_only_moves_forward() {
        let mut item = rent(Frequency::Monthly);
        item.mark_processed(at(2025, 3, 1));
        item.mark_processed(at(2025, 2, 1));
        assert_eq!(item.last_processed, Some(at(2025, 3, 1)));
    }

    #[test]
    fn test_expense_description() {
        assert_eq!(rent(Frequency::Monthly).expense_description(), "Recurring: Rent");
    }
}
