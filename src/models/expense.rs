//! Expense model
//!
//! An actual spend recorded against a category within a month's budget.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BudgetId, CategoryId, ExpenseId};
use super::money::Money;

/// A spend recorded against a category and budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub amount: Money,
    #[serde(default)]
    pub description: Option<String>,
    pub category_id: CategoryId,
    pub budget_id: BudgetId,

    /// When the spend happened; user-editable
    pub date: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense dated now
    pub fn new(budget_id: BudgetId, category_id: CategoryId, amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            amount,
            description: None,
            category_id,
            budget_id,
            date: now,
            created_at: now,
        }
    }

    /// Builder-style description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder-style date
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Apply a partial update field by field
    pub fn apply(&mut self, update: ExpenseUpdate) {
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
    }
}

/// Input for creating an expense
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub budget_id: BudgetId,
    pub category_id: CategoryId,
    pub amount: Money,
    pub description: Option<String>,
    /// Defaults to now
    pub date: Option<DateTime<Utc>>,
}

/// Partial update for an expense
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    pub amount: Option<Money>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    pub category_id: Option<CategoryId>,
    pub date: Option<DateTime<Utc>>,
}
