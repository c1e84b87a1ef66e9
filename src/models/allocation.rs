//! Budget allocation model
//!
//! Tracks how much of a month's budget is planned for each category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AllocationId, BudgetId, CategoryId};
use super::money::Money;

/// A planned spending cap for one category within one budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAllocation {
    pub id: AllocationId,
    pub budget_id: BudgetId,
    pub category_id: CategoryId,
    pub allocated_amount: Money,
    pub created_at: DateTime<Utc>,
}

impl BudgetAllocation {
    /// Create an allocation with an initial amount
    pub fn new(budget_id: BudgetId, category_id: CategoryId, allocated_amount: Money) -> Self {
        Self {
            id: AllocationId::new(),
            budget_id,
            category_id,
            allocated_amount,
            created_at: Utc::now(),
        }
    }

    /// Clone this allocation into another budget under a fresh id
    pub fn copy_to(&self, budget_id: BudgetId) -> Self {
        Self::new(budget_id, self.category_id, self.allocated_amount)
    }
}

/// One entry of a batch allocation edit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProposedAllocation {
    pub category_id: CategoryId,
    pub amount: Money,
}

impl ProposedAllocation {
    pub fn new(category_id: CategoryId, amount: impl Into<Money>) -> Self {
        Self {
            category_id,
            amount: amount.into(),
        }
    }
}

/// What a batch allocation edit changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationChanges {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl AllocationChanges {
    pub fn is_empty(&self) -> bool {
        self.created == 0 && self.updated == 0 && self.deleted == 0
    }
}
