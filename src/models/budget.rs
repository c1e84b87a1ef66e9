//! Budget model
//!
//! A budget is the record of one calendar month's income and optional
//! rollover. At most one budget exists per month.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::BudgetId;
use super::money::Money;
use super::month::BudgetMonth;

/// One calendar month's income and rollover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: BudgetId,

    /// Income for the month, including any top-ups
    pub monthly_income: Money,

    /// The month this budget covers; never changed after creation
    pub month: BudgetMonth,

    /// Leftover carried in from the previous month
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_month_rollover: Option<Money>,

    pub created_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new budget for a month
    pub fn new(month: BudgetMonth, monthly_income: Money) -> Self {
        Self {
            id: BudgetId::new(),
            monthly_income,
            month,
            previous_month_rollover: None,
            created_at: Utc::now(),
        }
    }

    /// Rollover amount, zero when none was recorded
    pub fn rollover(&self) -> Money {
        self.previous_month_rollover.unwrap_or_default()
    }

    /// Income plus rollover
    pub fn total_available(&self) -> Money {
        self.monthly_income + self.rollover()
    }

    /// Apply a partial update field by field
    pub fn apply(&mut self, update: BudgetUpdate) {
        if let Some(income) = update.monthly_income {
            self.monthly_income = income;
        }
        if let Some(rollover) = update.previous_month_rollover {
            self.previous_month_rollover = rollover;
        }
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.monthly_income.is_negative() {
            return Err(BudgetValidationError::NegativeIncome);
        }
        if self.rollover().is_negative() {
            return Err(BudgetValidationError::NegativeRollover);
        }
        if !self.monthly_income.is_within_limit() || !self.rollover().is_within_limit() {
            return Err(BudgetValidationError::AmountTooLarge);
        }
        Ok(())
    }
}

/// Input for creating a budget
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub monthly_income: Money,
    pub month: BudgetMonth,
}

impl NewBudget {
    pub fn new(month: BudgetMonth, monthly_income: Money) -> Self {
        Self {
            monthly_income,
            month,
        }
    }
}

/// Partial update for a budget
///
/// The month is deliberately absent: a budget never moves between months.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetUpdate {
    pub monthly_income: Option<Money>,
    /// `Some(None)` clears the rollover
    pub previous_month_rollover: Option<Option<Money>>,
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NegativeIncome,
    NegativeRollover,
    AmountTooLarge,
}

impl std::fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeIncome => write!(f, "Monthly income cannot be negative"),
            Self::NegativeRollover => write!(f, "Rollover cannot be negative"),
            Self::AmountTooLarge => {
                write!(f, "Budget amounts cannot exceed {}", Money::limit())
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn jan() -> BudgetMonth {
        BudgetMonth::parse("2025-01").unwrap()
    }

    #[test]
    fn test_total_available_includes_rollover() {
        let mut budget = Budget::new(jan(), Money::from(100000));
        assert_eq!(budget.total_available(), Money::from(100000));

        budget.previous_month_rollover = Some(Money::from(40000));
        assert_eq!(budget.total_available(), Money::from(140000));
    }

    #[test]
    fn test_apply_update() {
        let mut budget = Budget::new(jan(), Money::from(100));
        budget.previous_month_rollover = Some(Money::from(5));

        budget.apply(BudgetUpdate {
            monthly_income: Some(Money::new(dec!(250.50))),
            previous_month_rollover: None,
        });
        assert_eq!(budget.monthly_income, Money::new(dec!(250.50)));
        assert_eq!(budget.rollover(), Money::from(5));

        budget.apply(BudgetUpdate {
            monthly_income: None,
            previous_month_rollover: Some(None),
        });
        assert!(budget.previous_month_rollover.is_none());
    }

    #[test]
    fn test_validate() {
        let budget = Budget::new(jan(), Money::from(-1));
        assert_eq!(budget.validate(), Err(BudgetValidationError::NegativeIncome));

        let mut budget = Budget::new(jan(), Money::limit());
        assert!(budget.validate().is_ok());
        budget.previous_month_rollover = Some(Money::new(rust_decimal::Decimal::MAX));
        assert_eq!(budget.validate(), Err(BudgetValidationError::AmountTooLarge));
    }

    #[test]
    fn test_camel_case_serialization() {
        let mut budget = Budget::new(jan(), Money::from(100000));
        budget.previous_month_rollover = Some(Money::from(40000));
        let value = serde_json::to_value(&budget).unwrap();

        assert_eq!(value["monthlyIncome"], "100000");
        assert_eq!(value["previousMonthRollover"], "40000");
        assert_eq!(value["month"], "2025-01");
        assert!(value["createdAt"].is_string());
    }
}
