//! Core data models for Pennywise
//!
//! This module contains the record kinds held by the store (budgets,
//! categories, allocations, expenses, income, recurring expenses, savings
//! goals, settings) and the derived views computed from them.

pub mod allocation;
pub mod budget;
pub mod category;
pub mod expense;
pub mod ids;
pub mod income;
pub mod money;
pub mod month;
pub mod recurring;
pub mod savings_goal;
pub mod settings;
pub mod summary;

pub use allocation::{AllocationChanges, BudgetAllocation, ProposedAllocation};
pub use budget::{Budget, BudgetUpdate, NewBudget};
pub use category::{Category, CategoryUpdate, Color, DefaultCategory, Icon};
pub use expense::{Expense, ExpenseUpdate, NewExpense};
pub use ids::{
    AllocationId, BudgetId, CategoryId, ExpenseId, IncomeId, RecurringExpenseId, SavingsGoalId,
};
pub use income::IncomeEntry;
pub use money::Money;
pub use month::BudgetMonth;
pub use recurring::{
    Frequency, NewRecurringExpense, RecurringExpense, RecurringExpenseUpdate, RecurringState,
};
pub use savings_goal::{SavingsGoal, SavingsGoalUpdate};
pub use settings::{Currency, Settings, SettingsUpdate, Theme};
pub use summary::{BudgetSummary, CategoryWithAllocation, PreviousMonthRemaining};
