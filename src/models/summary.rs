//! Derived views
//!
//! Computed on demand from raw records and never persisted.

use serde::Serialize;

use super::category::Category;
use super::ids::BudgetId;
use super::money::Money;
use super::month::BudgetMonth;

/// A category with its allocation and spending for one budget
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithAllocation {
    #[serde(flatten)]
    pub category: Category,
    pub allocated: Money,
    pub spent: Money,
    pub remaining: Money,
    pub transaction_count: usize,
}

impl CategoryWithAllocation {
    pub fn is_overspent(&self) -> bool {
        self.remaining.is_negative()
    }
}

/// Headline figures for one budget
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub budget_id: BudgetId,
    pub month: BudgetMonth,
    pub monthly_income: Money,
    pub rollover: Money,
    /// Income plus rollover
    pub monthly_budget: Money,
    pub total_allocated: Money,
    pub total_spent: Money,
    /// Total available minus total allocated; negative when over-allocated
    pub remaining_budget: Money,
    pub unallocated_amount: Money,
    /// Days left in the real current month, whatever month the budget covers
    pub days_left: u32,
    /// Categories with a non-zero allocation
    pub category_count: usize,
}

/// What the preceding month left over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PreviousMonthRemaining {
    /// Allocated minus spent; may be negative
    pub remaining: Money,
    pub was_overspent: bool,
    /// `max(0, remaining)`
    pub rollover: Money,
}

impl PreviousMonthRemaining {
    pub fn from_totals(total_allocated: Money, total_spent: Money) -> Self {
        let remaining = total_allocated - total_spent;
        Self {
            remaining,
            was_overspent: total_spent > total_allocated,
            rollover: remaining.max_zero(),
        }
    }
}
