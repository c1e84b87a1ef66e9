//! Budget service
//!
//! Owns the month lifecycle: one budget per calendar month and rollover from
//! the preceding month.

use tracing::{debug, info};

use crate::error::{PennywiseError, PennywiseResult};
use crate::models::{
    Budget, BudgetId, BudgetMonth, BudgetUpdate, Money, NewBudget, PreviousMonthRemaining,
};
use crate::storage::Storage;

use super::allocation::copy_allocation_rows;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

/// Result of opening a new month
#[derive(Debug, Clone)]
pub struct OpenedMonth {
    pub budget: Budget,
    pub rollover: PreviousMonthRemaining,
    /// Allocations carried over from the previous month's plan
    pub copied_allocations: usize,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The budget for a month, if one exists
    pub fn get_budget(&self, month: BudgetMonth) -> PennywiseResult<Option<Budget>> {
        // Replace-on-create keeps this to one entry; prefer the newest otherwise
        Ok(self.storage.budgets_for_month(month)?.pop())
    }

    /// The budget for the current calendar month, if one exists
    pub fn get_current_budget(&self) -> PennywiseResult<Option<Budget>> {
        self.get_budget(BudgetMonth::current())
    }

    /// A budget by id
    pub fn get_budget_by_id(&self, id: BudgetId) -> PennywiseResult<Budget> {
        self.storage
            .budgets
            .get(id)?
            .ok_or_else(|| PennywiseError::budget_not_found(id.to_string()))
    }

    /// All budgets, oldest month first
    pub fn list_budgets(&self) -> PennywiseResult<Vec<Budget>> {
        let mut budgets = self.storage.budgets.get_all()?;
        budgets.sort_by(|a, b| a.month.cmp(&b.month));
        Ok(budgets)
    }

    /// Create the budget for a month, replacing any existing one
    ///
    /// Allocations and expenses of a replaced budget are left in place.
    pub fn create_budget(&self, input: NewBudget) -> PennywiseResult<Budget> {
        let budget = Budget::new(input.month, input.monthly_income);
        self.replace_month(budget)
    }

    /// Create the budget for a month, carrying in the previous month's leftover
    pub fn create_budget_with_rollover(&self, input: NewBudget) -> PennywiseResult<Budget> {
        let previous = self.calculate_previous_month_remaining(input.month)?;

        let mut budget = Budget::new(input.month, input.monthly_income);
        budget.previous_month_rollover = Some(previous.rollover);
        self.replace_month(budget)
    }

    fn replace_month(&self, budget: Budget) -> PennywiseResult<Budget> {
        budget
            .validate()
            .map_err(|e| PennywiseError::Validation(e.to_string()))?;

        let replaced = self.storage.transaction(|s| write_month(s, &budget))?;

        info!(
            month = %budget.month,
            budget_id = %budget.id,
            income = %budget.monthly_income,
            rollover = %budget.rollover(),
            replaced,
            "created budget"
        );
        Ok(budget)
    }

    /// Merge a partial update into an existing budget
    pub fn update_budget(&self, id: BudgetId, update: BudgetUpdate) -> PennywiseResult<Budget> {
        let mut budget = self.get_budget_by_id(id)?;
        budget.apply(update);
        budget
            .validate()
            .map_err(|e| PennywiseError::Validation(e.to_string()))?;

        self.storage.transaction(|s| s.budgets.put(budget.clone()))?;
        debug!(budget_id = %id, "updated budget");
        Ok(budget)
    }

    /// What the month before `month` left over
    ///
    /// All-zero when there is no budget for the preceding month.
    pub fn calculate_previous_month_remaining(
        &self,
        month: BudgetMonth,
    ) -> PennywiseResult<PreviousMonthRemaining> {
        let Some(previous) = self.get_budget(month.prev())? else {
            return Ok(PreviousMonthRemaining::default());
        };

        let total_allocated = self.total_allocated(previous.id)?;
        let expenses = self.storage.expenses_for_budget(previous.id)?;
        let total_spent = Money::checked_sum(expenses.iter().map(|e| e.amount))
            .ok_or_else(PennywiseError::amount_too_large)?;
        if total_allocated.checked_sub(total_spent).is_none() {
            return Err(PennywiseError::amount_too_large());
        }

        Ok(PreviousMonthRemaining::from_totals(total_allocated, total_spent))
    }

    /// Total allocated in the month before `month`; zero if it has no budget
    pub fn get_previous_month_total_allocated(&self, month: BudgetMonth) -> PennywiseResult<Money> {
        match self.get_budget(month.prev())? {
            Some(previous) => self.total_allocated(previous.id),
            None => Ok(Money::zero()),
        }
    }

    fn total_allocated(&self, budget_id: BudgetId) -> PennywiseResult<Money> {
        let allocations = self.storage.allocations_for_budget(budget_id)?;
        Money::checked_sum(allocations.iter().map(|a| a.allocated_amount))
            .ok_or_else(PennywiseError::amount_too_large)
    }

    /// Start a month: create it with rollover and, when the new total covers
    /// last month's plan, copy last month's allocations into it
    ///
    /// The new budget and the copied allocations are committed together.
    pub fn open_month(&self, input: NewBudget) -> PennywiseResult<OpenedMonth> {
        let month = input.month;
        let previous_allocated = self.get_previous_month_total_allocated(month)?;
        let previous_budget = self.get_budget(month.prev())?;
        let rollover = self.calculate_previous_month_remaining(month)?;

        let mut budget = Budget::new(month, input.monthly_income);
        budget.previous_month_rollover = Some(rollover.rollover);
        budget
            .validate()
            .map_err(|e| PennywiseError::Validation(e.to_string()))?;

        let copy_from = previous_budget
            .filter(|_| {
                previous_allocated.is_positive() && budget.total_available() >= previous_allocated
            })
            .map(|previous| previous.id);

        let (replaced, copied_allocations) = self.storage.transaction(|s| {
            let replaced = write_month(s, &budget)?;
            let copied = match copy_from {
                Some(from) => copy_allocation_rows(s, from, budget.id)?,
                None => 0,
            };
            Ok((replaced, copied))
        })?;

        info!(
            month = %budget.month,
            budget_id = %budget.id,
            income = %budget.monthly_income,
            rollover = %budget.rollover(),
            replaced,
            copied = copied_allocations,
            "opened month"
        );

        Ok(OpenedMonth {
            budget,
            rollover,
            copied_allocations,
        })
    }
}

/// Make `budget` the only budget of its month within an open transaction
///
/// Returns how many budgets it replaced.
fn write_month(s: &Storage, budget: &Budget) -> PennywiseResult<usize> {
    let existing = s.budgets_for_month(budget.month)?;
    for old in &existing {
        s.budgets.delete(old.id)?;
    }
    s.budgets.put(budget.clone())?;
    Ok(existing.len())
}
