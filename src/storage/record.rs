//! Record kinds held by the store
//!
//! Each kind declares its id type and the secondary index keys it should be
//! reachable under. The store keeps those indexes current on every write.

use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::models::{
    AllocationId, Budget, BudgetAllocation, BudgetId, Category, CategoryId, Expense, ExpenseId,
    IncomeEntry, IncomeId, RecurringExpense, RecurringExpenseId, SavingsGoal, SavingsGoalId,
};

/// The kinds of record the store holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Budget,
    Category,
    Allocation,
    Expense,
    Income,
    RecurringExpense,
    SavingsGoal,
    Settings,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Budget => "budget",
            Self::Category => "category",
            Self::Allocation => "allocation",
            Self::Expense => "expense",
            Self::Income => "income",
            Self::RecurringExpense => "recurring expense",
            Self::SavingsGoal => "savings goal",
            Self::Settings => "settings",
        };
        write!(f, "{}", name)
    }
}

/// Secondary indexes maintained by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndexName {
    /// Budget by "YYYY-MM"
    ByMonth,
    /// Allocation, expense and income by budget id
    ByBudget,
    /// Expense by category id
    ByCategory,
}

/// A record kind that can live in a [`Table`](super::table::Table)
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync {
    type Id: Copy + Eq + Hash + Ord + fmt::Display + Send + Sync;

    const KIND: RecordKind;

    fn id(&self) -> Self::Id;

    fn created_at(&self) -> DateTime<Utc>;

    /// Index keys this record is reachable under
    fn index_keys(&self) -> Vec<(IndexName, String)> {
        Vec::new()
    }
}

impl Record for Budget {
    type Id = BudgetId;
    const KIND: RecordKind = RecordKind::Budget;

    fn id(&self) -> BudgetId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn index_keys(&self) -> Vec<(IndexName, String)> {
        vec![(IndexName::ByMonth, self.month.to_string())]
    }
}

impl Record for Category {
    type Id = CategoryId;
    const KIND: RecordKind = RecordKind::Category;

    fn id(&self) -> CategoryId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for BudgetAllocation {
    type Id = AllocationId;
    const KIND: RecordKind = RecordKind::Allocation;

    fn id(&self) -> AllocationId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn index_keys(&self) -> Vec<(IndexName, String)> {
        vec![(IndexName::ByBudget, self.budget_id.to_string())]
    }
}

impl Record for Expense {
    type Id = ExpenseId;
    const KIND: RecordKind = RecordKind::Expense;

    fn id(&self) -> ExpenseId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn index_keys(&self) -> Vec<(IndexName, String)> {
        vec![
            (IndexName::ByBudget, self.budget_id.to_string()),
            (IndexName::ByCategory, self.category_id.to_string()),
        ]
    }
}

impl Record for IncomeEntry {
    type Id = IncomeId;
    const KIND: RecordKind = RecordKind::Income;

    fn id(&self) -> IncomeId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn index_keys(&self) -> Vec<(IndexName, String)> {
        vec![(IndexName::ByBudget, self.budget_id.to_string())]
    }
}

impl Record for RecurringExpense {
    type Id = RecurringExpenseId;
    const KIND: RecordKind = RecordKind::RecurringExpense;

    fn id(&self) -> RecurringExpenseId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for SavingsGoal {
    type Id = SavingsGoalId;
    const KIND: RecordKind = RecordKind::SavingsGoal;

    fn id(&self) -> SavingsGoalId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
