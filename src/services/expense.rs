//! Expense service
//!
//! Records spending against a budget and a category.

use tracing::{debug, info};

use crate::error::{PennywiseError, PennywiseResult};
use crate::models::{BudgetId, CategoryId, Expense, ExpenseId, ExpenseUpdate, NewExpense};
use crate::storage::Storage;

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record an expense
    ///
    /// The budget and category must exist. Amounts are not range-checked, so
    /// refunds can be recorded as negative expenses.
    pub fn add_expense(&self, input: NewExpense) -> PennywiseResult<Expense> {
        if !input.amount.is_within_limit() {
            return Err(PennywiseError::amount_too_large());
        }
        self.ensure_refs(input.budget_id, input.category_id)?;

        let mut expense = Expense::new(input.budget_id, input.category_id, input.amount);
        if let Some(description) = clean(input.description) {
            expense = expense.with_description(description);
        }
        if let Some(date) = input.date {
            expense = expense.with_date(date);
        }

        self.storage.transaction(|s| s.expenses.put(expense.clone()))?;

        info!(
            expense_id = %expense.id,
            budget_id = %expense.budget_id,
            amount = %expense.amount,
            "added expense"
        );
        Ok(expense)
    }

    /// An expense by id
    pub fn get_expense(&self, id: ExpenseId) -> PennywiseResult<Expense> {
        self.storage
            .expenses
            .get(id)?
            .ok_or_else(|| PennywiseError::expense_not_found(id.to_string()))
    }

    /// Merge a partial update into an expense
    pub fn update_expense(&self, id: ExpenseId, mut update: ExpenseUpdate) -> PennywiseResult<Expense> {
        let mut expense = self.get_expense(id)?;

        if update.amount.is_some_and(|amount| !amount.is_within_limit()) {
            return Err(PennywiseError::amount_too_large());
        }
        if let Some(category_id) = update.category_id {
            if !self.storage.categories.contains(category_id)? {
                return Err(PennywiseError::category_not_found(category_id.to_string()));
            }
        }
        update.description = update.description.map(clean);

        expense.apply(update);
        self.storage.transaction(|s| s.expenses.put(expense.clone()))?;

        debug!(expense_id = %id, "updated expense");
        Ok(expense)
    }

    /// Delete an expense
    pub fn delete_expense(&self, id: ExpenseId) -> PennywiseResult<Expense> {
        let removed = self
            .storage
            .transaction(|s| s.expenses.delete(id))?
            .ok_or_else(|| PennywiseError::expense_not_found(id.to_string()))?;

        debug!(expense_id = %id, "deleted expense");
        Ok(removed)
    }

    /// Expenses of a budget, most recent date first
    pub fn list_expenses(&self, budget_id: BudgetId) -> PennywiseResult<Vec<Expense>> {
        let mut expenses = self.storage.expenses_for_budget(budget_id)?;
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(expenses)
    }

    /// Expenses of one category within a budget, most recent date first
    pub fn list_by_category(
        &self,
        budget_id: BudgetId,
        category_id: CategoryId,
    ) -> PennywiseResult<Vec<Expense>> {
        let mut expenses: Vec<_> = self
            .storage
            .expenses_for_category(category_id)?
            .into_iter()
            .filter(|e| e.budget_id == budget_id)
            .collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(expenses)
    }

    /// Delete every expense of a budget; returns how many were removed
    pub fn reset_expenses(&self, budget_id: BudgetId) -> PennywiseResult<usize> {
        let removed = self.storage.transaction(|s| {
            s.expenses
                .delete_by_index(crate::storage::IndexName::ByBudget, &budget_id.to_string())
        })?;

        info!(budget_id = %budget_id, removed, "reset expenses");
        Ok(removed)
    }

    fn ensure_refs(&self, budget_id: BudgetId, category_id: CategoryId) -> PennywiseResult<()> {
        if !self.storage.budgets.contains(budget_id)? {
            return Err(PennywiseError::budget_not_found(budget_id.to_string()));
        }
        if !self.storage.categories.contains(category_id)? {
            return Err(PennywiseError::category_not_found(category_id.to_string()));
        }
        Ok(())
    }
}

fn clean(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
