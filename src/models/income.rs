//! Income ledger model
//!
//! Every income top-up appends an entry; entries are never edited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BudgetId, IncomeId};
use super::money::Money;

/// An append-only record of income added to a budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeEntry {
    pub id: IncomeId,
    pub budget_id: BudgetId,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl IncomeEntry {
    /// Create a new income entry dated now
    pub fn new(budget_id: BudgetId, amount: Money, note: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: IncomeId::new(),
            budget_id,
            amount,
            note,
            date: now,
            created_at: now,
        }
    }

    /// Validate the income entry
    pub fn validate(&self) -> Result<(), IncomeValidationError> {
        if !self.amount.is_positive() {
            return Err(IncomeValidationError::NonPositiveAmount);
        }
        if !self.amount.is_within_limit() {
            return Err(IncomeValidationError::AmountTooLarge);
        }
        Ok(())
    }
}

/// Validation errors for income entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomeValidationError {
    NonPositiveAmount,
    AmountTooLarge,
}

impl std::fmt::Display for IncomeValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveAmount => write!(f, "Income amount must be greater than zero"),
            Self::AmountTooLarge => write!(f, "Income amount cannot exceed {}", Money::limit()),
        }
    }
}

impl std::error::Error for IncomeValidationError {}
