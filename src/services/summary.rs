//! Derived views over a budget
//!
//! Everything here is recomputed from raw records on every call.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Utc};

use crate::error::{PennywiseError, PennywiseResult};
use crate::models::{BudgetId, BudgetMonth, BudgetSummary, CategoryId, CategoryWithAllocation, Money};
use crate::storage::Storage;

/// Service computing per-category and whole-budget views
pub struct SummaryService<'a> {
    storage: &'a Storage,
}

#[derive(Default)]
struct Spend {
    total: Money,
    count: usize,
}

impl<'a> SummaryService<'a> {
    /// Create a new summary service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Categories that have money allocated in this budget, with their spend
    ///
    /// Categories with nothing allocated are left out even when they have
    /// expenses recorded against them.
    pub fn get_categories_with_allocations(
        &self,
        budget_id: BudgetId,
    ) -> PennywiseResult<Vec<CategoryWithAllocation>> {
        let mut allocated: HashMap<CategoryId, Money> = HashMap::new();
        for allocation in self.storage.allocations_for_budget(budget_id)? {
            let total = allocated.entry(allocation.category_id).or_default();
            *total = checked(total.checked_add(allocation.allocated_amount))?;
        }

        let mut spent: HashMap<CategoryId, Spend> = HashMap::new();
        for expense in self.storage.expenses_for_budget(budget_id)? {
            let entry = spent.entry(expense.category_id).or_default();
            entry.total = checked(entry.total.checked_add(expense.amount))?;
            entry.count += 1;
        }

        let mut views = Vec::new();
        for category in self.storage.categories.get_all()? {
            let allocated = allocated.get(&category.id).copied().unwrap_or_default();
            if allocated.is_zero() {
                continue;
            }
            let spend = spent.remove(&category.id).unwrap_or_default();
            views.push(CategoryWithAllocation {
                category,
                allocated,
                spent: spend.total,
                remaining: checked(allocated.checked_sub(spend.total))?,
                transaction_count: spend.count,
            });
        }

        Ok(views)
    }

    /// Headline figures for a budget
    pub fn get_budget_summary(&self, budget_id: BudgetId) -> PennywiseResult<BudgetSummary> {
        self.get_budget_summary_on(budget_id, Utc::now().date_naive())
    }

    /// Headline figures for a budget, with days left counted from `today`
    ///
    /// `days_left` is measured within the month containing `today`, not the
    /// budget's own month.
    pub fn get_budget_summary_on(
        &self,
        budget_id: BudgetId,
        today: NaiveDate,
    ) -> PennywiseResult<BudgetSummary> {
        let budget = self
            .storage
            .budgets
            .get(budget_id)?
            .ok_or_else(|| PennywiseError::budget_not_found(budget_id.to_string()))?;

        let allocations = self.storage.allocations_for_budget(budget_id)?;
        let total_allocated = checked(Money::checked_sum(
            allocations.iter().map(|a| a.allocated_amount),
        ))?;
        let expenses = self.storage.expenses_for_budget(budget_id)?;
        let total_spent = checked(Money::checked_sum(expenses.iter().map(|e| e.amount)))?;

        let monthly_budget = checked(budget.monthly_income.checked_add(budget.rollover()))?;
        let remaining_budget = checked(monthly_budget.checked_sub(total_allocated))?;
        let category_count = self.get_categories_with_allocations(budget_id)?.len();

        Ok(BudgetSummary {
            budget_id,
            month: budget.month,
            monthly_income: budget.monthly_income,
            rollover: budget.rollover(),
            monthly_budget,
            total_allocated,
            total_spent,
            remaining_budget,
            unallocated_amount: remaining_budget.max_zero(),
            days_left: days_left_in_month(today),
            category_count,
        })
    }
}

fn checked(amount: Option<Money>) -> PennywiseResult<Money> {
    amount.ok_or_else(PennywiseError::amount_too_large)
}

fn days_left_in_month(today: NaiveDate) -> u32 {
    BudgetMonth::containing(today)
        .last_day()
        .day()
        .saturating_sub(today.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, BudgetAllocation, Category, Color, Expense, Icon};
    use rust_decimal_macros::dec;

    struct Fixture {
        storage: Storage,
        budget: Budget,
        groceries: Category,
        transport: Category,
        bills: Category,
    }

    fn fixture() -> Fixture {
        let storage = Storage::in_memory();
        let mut budget = Budget::new(BudgetMonth::parse("2025-02").unwrap(), Money::from(100000));
        budget.previous_month_rollover = Some(Money::from(40000));
        let groceries = Category::new("Groceries", Icon::ShoppingCart, Color::Green);
        let transport = Category::new("Transport", Icon::Car, Color::Blue);
        let bills = Category::new("Bills", Icon::Receipt, Color::Red);

        storage
            .transaction(|s| {
                s.budgets.put(budget.clone())?;
                s.categories.put(groceries.clone())?;
                s.categories.put(transport.clone())?;
                s.categories.put(bills.clone())?;
                s.allocations.put(BudgetAllocation::new(
                    budget.id,
                    groceries.id,
                    Money::from(40000),
                ))?;
                s.allocations.put(BudgetAllocation::new(
                    budget.id,
                    transport.id,
                    Money::from(20000),
                ))?;
                s.expenses.put(Expense::new(
                    budget.id,
                    groceries.id,
                    Money::new(dec!(12000.50)),
                ))?;
                s.expenses.put(Expense::new(budget.id, groceries.id, Money::from(3000)))?;
                // Spend on a category with no allocation
                s.expenses.put(Expense::new(budget.id, bills.id, Money::from(999)))
            })
            .unwrap();

        Fixture {
            storage,
            budget,
            groceries,
            transport,
            bills,
        }
    }

    #[test]
    fn test_categories_with_allocations() {
        let f = fixture();
        let views = SummaryService::new(&f.storage)
            .get_categories_with_allocations(f.budget.id)
            .unwrap();

        assert_eq!(views.len(), 2);
        assert!(views.iter().all(|v| v.category.id != f.bills.id));

        let groceries = views.iter().find(|v| v.category.id == f.groceries.id).unwrap();
        assert_eq!(groceries.allocated, Money::from(40000));
        assert_eq!(groceries.spent, Money::new(dec!(15000.50)));
        assert_eq!(groceries.remaining, Money::new(dec!(24999.50)));
        assert_eq!(groceries.transaction_count, 2);

        let transport = views.iter().find(|v| v.category.id == f.transport.id).unwrap();
        assert_eq!(transport.spent, Money::zero());
        assert_eq!(transport.transaction_count, 0);
        assert!(!transport.is_overspent());
    }

    #[test]
    fn test_budget_summary() {
        let f = fixture();
        let today = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        let summary = SummaryService::new(&f.storage)
            .get_budget_summary_on(f.budget.id, today)
            .unwrap();

        assert_eq!(summary.monthly_income, Money::from(100000));
        assert_eq!(summary.rollover, Money::from(40000));
        assert_eq!(summary.monthly_budget, Money::from(140000));
        assert_eq!(summary.total_allocated, Money::from(60000));
        assert_eq!(summary.total_spent, Money::new(dec!(15999.50)));
        assert_eq!(summary.remaining_budget, Money::from(80000));
        assert_eq!(summary.unallocated_amount, Money::from(80000));
        assert_eq!(summary.days_left, 18);
        assert_eq!(summary.category_count, 2);
    }

    #[test]
    fn test_over_allocated_budget_has_no_unallocated_money() {
        let f = fixture();
        let mut budget = f.budget.clone();
        budget.monthly_income = Money::from(10000);
        budget.previous_month_rollover = None;
        f.storage.transaction(|s| s.budgets.put(budget)).unwrap();

        let summary = SummaryService::new(&f.storage)
            .get_budget_summary(f.budget.id)
            .unwrap();
        assert_eq!(summary.remaining_budget, Money::from(-50000));
        assert_eq!(summary.unallocated_amount, Money::zero());
    }

    #[test]
    fn test_days_left_uses_given_day_not_budget_month() {
        let f = fixture();
        let service = SummaryService::new(&f.storage);

        let last_day = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            service.get_budget_summary_on(f.budget.id, last_day).unwrap().days_left,
            0
        );

        let leap = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(
            service.get_budget_summary_on(f.budget.id, leap).unwrap().days_left,
            28
        );
    }

    #[test]
    fn test_summary_for_missing_budget() {
        let f = fixture();
        let err = SummaryService::new(&f.storage)
            .get_budget_summary(BudgetId::new())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_empty_budget_summary() {
        let storage = Storage::in_memory();
        let budget = Budget::new(BudgetMonth::parse("2025-03").unwrap(), Money::zero());
        storage.transaction(|s| s.budgets.put(budget.clone())).unwrap();

        let summary = SummaryService::new(&storage)
            .get_budget_summary(budget.id)
            .unwrap();
        assert_eq!(summary.total_allocated, Money::zero());
        assert_eq!(summary.total_spent, Money::zero());
        assert_eq!(summary.category_count, 0);
    }

    #[test]
    fn test_overflowing_records_give_an_error_not_a_panic() {
        let f = fixture();
        let huge = Money::new(rust_decimal::Decimal::MAX);
        f.storage
            .transaction(|s| {
                s.expenses
                    .put(Expense::new(f.budget.id, f.transport.id, huge))?;
                s.expenses
                    .put(Expense::new(f.budget.id, f.transport.id, huge))
            })
            .unwrap();
        let service = SummaryService::new(&f.storage);

        assert!(service
            .get_categories_with_allocations(f.budget.id)
            .unwrap_err()
            .is_validation());
        assert!(service
            .get_budget_summary(f.budget.id)
            .unwrap_err()
            .is_validation());
    }
}
