//! Allocation service
//!
//! Plans how a budget's money is split across categories. The total planned
//! for a budget never exceeds its income plus rollover.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::{PennywiseError, PennywiseResult};
use crate::models::{
    AllocationChanges, AllocationId, Budget, BudgetAllocation, BudgetId, CategoryId, Money,
    ProposedAllocation,
};
use crate::storage::Storage;

/// Service for allocation management
pub struct AllocationService<'a> {
    storage: &'a Storage,
}

impl<'a> AllocationService<'a> {
    /// Create a new allocation service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Allocations of a budget, oldest first
    pub fn list_allocations(&self, budget_id: BudgetId) -> PennywiseResult<Vec<BudgetAllocation>> {
        self.storage.allocations_for_budget(budget_id)
    }

    /// Sum of every allocation in a budget
    pub fn total_allocated(&self, budget_id: BudgetId) -> PennywiseResult<Money> {
        let allocations = self.list_allocations(budget_id)?;
        Money::checked_sum(allocations.iter().map(|a| a.allocated_amount))
            .ok_or_else(PennywiseError::amount_too_large)
    }

    /// Apply a batch of per-category amounts to a budget
    ///
    /// A zero amount removes the category's allocation, a changed amount
    /// updates it in place and a new positive amount creates one. Categories
    /// left out of the batch keep their current allocation. The whole batch
    /// is rejected if the resulting plan would exceed the funds available.
    pub fn save_allocations(
        &self,
        budget_id: BudgetId,
        proposed: &[ProposedAllocation],
    ) -> PennywiseResult<AllocationChanges> {
        let budget = self.budget(budget_id)?;

        let mut batch: HashMap<CategoryId, Money> = HashMap::new();
        for item in proposed {
            if item.amount.is_negative() {
                return Err(PennywiseError::Validation(format!(
                    "Allocation for category {} cannot be negative",
                    item.category_id.short()
                )));
            }
            if !item.amount.is_within_limit() {
                return Err(PennywiseError::amount_too_large());
            }
            if batch.insert(item.category_id, item.amount).is_some() {
                return Err(PennywiseError::Validation(format!(
                    "Category {} appears more than once",
                    item.category_id.short()
                )));
            }
            if item.amount.is_positive() && !self.storage.categories.contains(item.category_id)? {
                return Err(PennywiseError::category_not_found(item.category_id.to_string()));
            }
        }

        let existing = self.list_allocations(budget_id)?;
        let untouched = existing
            .iter()
            .filter(|a| !batch.contains_key(&a.category_id))
            .map(|a| a.allocated_amount);
        let proposed_total = Money::checked_sum(untouched.chain(batch.values().copied()))
            .ok_or_else(PennywiseError::amount_too_large)?;
        check_cap(&budget, proposed_total)?;

        let mut by_category: HashMap<CategoryId, Vec<BudgetAllocation>> = HashMap::new();
        for allocation in existing {
            by_category
                .entry(allocation.category_id)
                .or_default()
                .push(allocation);
        }

        let changes = self.storage.transaction(|s| {
            let mut changes = AllocationChanges::default();

            for item in proposed {
                let rows = by_category.remove(&item.category_id).unwrap_or_default();
                let mut rows = rows.into_iter();

                match rows.next() {
                    Some(row) if item.amount.is_zero() => {
                        s.allocations.delete(row.id)?;
                        changes.deleted += 1;
                    }
                    Some(mut row) => {
                        if row.allocated_amount != item.amount {
                            row.allocated_amount = item.amount;
                            s.allocations.put(row)?;
                            changes.updated += 1;
                        }
                    }
                    None if item.amount.is_positive() => {
                        s.allocations.put(BudgetAllocation::new(
                            budget_id,
                            item.category_id,
                            item.amount,
                        ))?;
                        changes.created += 1;
                    }
                    None => {}
                }

                // Collapse duplicate rows left behind by older data
                for extra in rows {
                    s.allocations.delete(extra.id)?;
                    changes.deleted += 1;
                }
            }

            Ok(changes)
        })?;

        info!(
            budget_id = %budget_id,
            created = changes.created,
            updated = changes.updated,
            deleted = changes.deleted,
            total = %proposed_total,
            "saved allocations"
        );
        Ok(changes)
    }

    /// Set one category's allocation; zero removes it
    pub fn set_allocation(
        &self,
        budget_id: BudgetId,
        category_id: CategoryId,
        amount: Money,
    ) -> PennywiseResult<AllocationChanges> {
        self.save_allocations(budget_id, &[ProposedAllocation::new(category_id, amount)])
    }

    /// Remove a single allocation row
    pub fn delete_allocation(&self, id: AllocationId) -> PennywiseResult<BudgetAllocation> {
        let removed = self
            .storage
            .transaction(|s| s.allocations.delete(id))?
            .ok_or_else(|| PennywiseError::allocation_not_found(id.to_string()))?;

        debug!(allocation_id = %id, "deleted allocation");
        Ok(removed)
    }

    /// Copy every allocation of one budget into another
    ///
    /// A category that already has an allocation in the destination is
    /// updated rather than duplicated. Returns how many rows were written.
    pub fn copy_allocations(&self, from: BudgetId, to: BudgetId) -> PennywiseResult<usize> {
        let written = self
            .storage
            .transaction(|s| copy_allocation_rows(s, from, to))?;

        info!(from = %from, to = %to, written, "copied allocations");
        Ok(written)
    }

    fn budget(&self, id: BudgetId) -> PennywiseResult<Budget> {
        self.storage
            .budgets
            .get(id)?
            .ok_or_else(|| PennywiseError::budget_not_found(id.to_string()))
    }
}

/// Copy `from`'s allocations into `to` within an open transaction
///
/// Source rows sharing a category are folded into one row holding their
/// sum, so the destination ends up with at most one row per category.
pub(crate) fn copy_allocation_rows(
    s: &Storage,
    from: BudgetId,
    to: BudgetId,
) -> PennywiseResult<usize> {
    let mut folded: Vec<BudgetAllocation> = Vec::new();
    let mut position: HashMap<CategoryId, usize> = HashMap::new();
    for allocation in s.allocations_for_budget(from)? {
        match position.get(&allocation.category_id) {
            Some(&index) => {
                let row = &mut folded[index];
                row.allocated_amount = row
                    .allocated_amount
                    .checked_add(allocation.allocated_amount)
                    .filter(Money::is_within_limit)
                    .ok_or_else(PennywiseError::amount_too_large)?;
            }
            None => {
                position.insert(allocation.category_id, folded.len());
                folded.push(allocation);
            }
        }
    }

    let mut destination: HashMap<CategoryId, BudgetAllocation> = HashMap::new();
    for allocation in s.allocations_for_budget(to)? {
        destination.entry(allocation.category_id).or_insert(allocation);
    }

    let mut written = 0;
    for allocation in folded {
        match destination.remove(&allocation.category_id) {
            Some(mut existing) => {
                existing.allocated_amount = allocation.allocated_amount;
                s.allocations.put(existing)?;
            }
            None => s.allocations.put(allocation.copy_to(to))?,
        }
        written += 1;
    }
    Ok(written)
}

fn check_cap(budget: &Budget, proposed: Money) -> PennywiseResult<()> {
    let available = budget
        .monthly_income
        .checked_add(budget.rollover())
        .ok_or_else(PennywiseError::amount_too_large)?;
    if proposed > available {
        return Err(PennywiseError::OverBudget {
            proposed,
            available,
        });
    }
    Ok(())
}
