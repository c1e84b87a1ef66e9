//! Income service
//!
//! Mid-month income top-ups. Each top-up raises the budget's
//! `monthlyIncome` and leaves an [`IncomeEntry`] behind as its record.

use tracing::info;

use crate::error::{PennywiseError, PennywiseResult};
use crate::models::{Budget, BudgetId, IncomeEntry, Money};
use crate::storage::Storage;

/// Service for income entries
pub struct IncomeService<'a> {
    storage: &'a Storage,
}

impl<'a> IncomeService<'a> {
    /// Create a new income service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add income to a budget
    ///
    /// The budget update and the new entry are committed together.
    pub fn add_income(
        &self,
        budget_id: BudgetId,
        amount: Money,
        note: Option<String>,
    ) -> PennywiseResult<(Budget, IncomeEntry)> {
        let mut budget = self
            .storage
            .budgets
            .get(budget_id)?
            .ok_or_else(|| PennywiseError::budget_not_found(budget_id.to_string()))?;

        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let entry = IncomeEntry::new(budget_id, amount, note);
        entry
            .validate()
            .map_err(|e| PennywiseError::Validation(e.to_string()))?;

        budget.monthly_income = budget
            .monthly_income
            .checked_add(amount)
            .filter(Money::is_within_limit)
            .ok_or_else(PennywiseError::amount_too_large)?;

        self.storage.transaction(|s| {
            s.budgets.put(budget.clone())?;
            s.incomes.put(entry.clone())
        })?;

        info!(
            budget_id = %budget_id,
            amount = %amount,
            income = %budget.monthly_income,
            "added income"
        );
        Ok((budget, entry))
    }

    /// Income entries of a budget, oldest first
    pub fn list_incomes(&self, budget_id: BudgetId) -> PennywiseResult<Vec<IncomeEntry>> {
        self.storage.incomes_for_budget(budget_id)
    }

    /// Sum of a budget's income entries
    pub fn total_income(&self, budget_id: BudgetId) -> PennywiseResult<Money> {
        let incomes = self.list_incomes(budget_id)?;
        Money::checked_sum(incomes.iter().map(|i| i.amount))
            .ok_or_else(PennywiseError::amount_too_large)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BudgetMonth;
    use crate::storage::MemoryBackend;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn with_budget(storage: &Storage, income: i64) -> Budget {
        let budget = Budget::new(BudgetMonth::parse("2025-01").unwrap(), Money::from(income));
        storage.transaction(|s| s.budgets.put(budget.clone())).unwrap();
        budget
    }

    #[test]
    fn test_add_income() {
        let storage = Storage::in_memory();
        let budget = with_budget(&storage, 1000);
        let service = IncomeService::new(&storage);

        let (updated, entry) = service
            .add_income(budget.id, Money::new(dec!(250.10)), Some(" Bonus ".into()))
            .unwrap();

        assert_eq!(updated.monthly_income, Money::new(dec!(1250.10)));
        assert_eq!(entry.note.as_deref(), Some("Bonus"));
        assert_eq!(
            storage.budgets.get(budget.id).unwrap().unwrap().monthly_income,
            Money::new(dec!(1250.10))
        );

        service.add_income(budget.id, Money::from(50), None).unwrap();
        assert_eq!(service.list_incomes(budget.id).unwrap().len(), 2);
        assert_eq!(
            service.total_income(budget.id).unwrap(),
            Money::new(dec!(300.10))
        );
    }

    #[test]
    fn test_add_income_rejects_non_positive() {
        let storage = Storage::in_memory();
        let budget = with_budget(&storage, 1000);
        let service = IncomeService::new(&storage);

        assert!(service
            .add_income(budget.id, Money::zero(), None)
            .unwrap_err()
            .is_validation());
        assert!(service
            .add_income(budget.id, Money::from(-10), None)
            .unwrap_err()
            .is_validation());
        assert!(service.list_incomes(budget.id).unwrap().is_empty());
    }

    #[test]
    fn test_add_income_past_limit_leaves_budget_unchanged() {
        let storage = Storage::in_memory();
        let budget = with_budget(&storage, 0);
        let service = IncomeService::new(&storage);

        service.add_income(budget.id, Money::limit(), None).unwrap();
        let err = service
            .add_income(budget.id, Money::limit(), None)
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .add_income(budget.id, Money::new(rust_decimal::Decimal::MAX), None)
            .unwrap_err();
        assert!(err.is_validation());

        assert_eq!(
            storage.budgets.get(budget.id).unwrap().unwrap().monthly_income,
            Money::limit()
        );
        assert_eq!(service.list_incomes(budget.id).unwrap().len(), 1);
    }

    #[test]
    fn test_add_income_to_missing_budget() {
        let storage = Storage::in_memory();
        let err = IncomeService::new(&storage)
            .add_income(BudgetId::new(), Money::from(10), None)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_add_income_is_all_or_nothing() {
        let backend = Arc::new(MemoryBackend::new());
        let storage = Storage::with_backend(backend.clone());
        let budget = with_budget(&storage, 1000);
        let service = IncomeService::new(&storage);

        backend.set_fail_persist(true);
        let err = service
            .add_income(budget.id, Money::from(500), None)
            .unwrap_err();
        assert!(err.is_storage_fault());

        assert_eq!(
            storage.budgets.get(budget.id).unwrap().unwrap().monthly_income,
            Money::from(1000)
        );
        assert!(service.list_incomes(budget.id).unwrap().is_empty());
    }
}
