//! Recurring expense service and processor
//!
//! Templates are managed with the usual CRUD calls. [`RecurringService::process_due`]
//! runs once per startup and posts an expense into the current month's budget
//! for every template that is due. Each posting is its own transaction, so a
//! bad item is logged and skipped without undoing the ones already posted.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{PennywiseError, PennywiseResult};
use crate::models::{
    BudgetId, BudgetMonth, Expense, ExpenseId, Frequency, NewRecurringExpense, RecurringExpense,
    RecurringExpenseId, RecurringExpenseUpdate, RecurringState,
};
use crate::services::BudgetService;
use crate::storage::Storage;

/// Service for recurring expense templates
pub struct RecurringService<'a> {
    storage: &'a Storage,
}

/// Outcome of one processor pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessReport {
    pub month: Option<BudgetMonth>,
    /// Budget the expenses were posted to; `None` when the pass was aborted
    pub budget_id: Option<BudgetId>,
    pub posted: Vec<ExpenseId>,
    /// Items that were not due
    pub skipped: usize,
    pub failed: Vec<(RecurringExpenseId, String)>,
}

impl ProcessReport {
    /// True when there was no budget to post into
    pub fn aborted(&self) -> bool {
        self.budget_id.is_none()
    }
}

impl<'a> RecurringService<'a> {
    /// Create a new recurring service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new active template
    pub fn create(&self, input: NewRecurringExpense) -> PennywiseResult<RecurringExpense> {
        if !self.storage.categories.contains(input.category_id)? {
            return Err(PennywiseError::category_not_found(input.category_id.to_string()));
        }

        let item = RecurringExpense::new(
            input.description.trim(),
            input.category_id,
            input.amount,
            input.frequency,
            input.start_date.unwrap_or_else(Utc::now),
        );
        item.validate()
            .map_err(|e| PennywiseError::Validation(e.to_string()))?;

        self.storage.transaction(|s| s.recurring.put(item.clone()))?;

        if item.frequency != Frequency::Monthly {
            warn!(
                recurring_id = %item.id,
                frequency = %item.frequency,
                "only monthly items repeat; this one posts once"
            );
        }
        info!(recurring_id = %item.id, amount = %item.amount, "created recurring expense");
        Ok(item)
    }

    /// A template by id
    pub fn get(&self, id: RecurringExpenseId) -> PennywiseResult<RecurringExpense> {
        self.storage
            .recurring
            .get(id)?
            .ok_or_else(|| PennywiseError::recurring_not_found(id.to_string()))
    }

    /// All templates in creation order
    pub fn list(&self) -> PennywiseResult<Vec<RecurringExpense>> {
        self.storage.recurring.get_all()
    }

    /// Merge a partial update into a template
    pub fn update(
        &self,
        id: RecurringExpenseId,
        update: RecurringExpenseUpdate,
    ) -> PennywiseResult<RecurringExpense> {
        let mut item = self.get(id)?;

        if let Some(category_id) = update.category_id {
            if !self.storage.categories.contains(category_id)? {
                return Err(PennywiseError::category_not_found(category_id.to_string()));
            }
        }

        item.apply(update);
        item.description = item.description.trim().to_string();
        item.validate()
            .map_err(|e| PennywiseError::Validation(e.to_string()))?;

        self.storage.transaction(|s| s.recurring.put(item.clone()))?;
        debug!(recurring_id = %id, "updated recurring expense");
        Ok(item)
    }

    /// Pause or resume a template
    pub fn set_active(&self, id: RecurringExpenseId, active: bool) -> PennywiseResult<RecurringExpense> {
        self.update(
            id,
            RecurringExpenseUpdate {
                active: Some(active),
                ..RecurringExpenseUpdate::default()
            },
        )
    }

    /// Delete a template; expenses it already posted stay
    pub fn delete(&self, id: RecurringExpenseId) -> PennywiseResult<RecurringExpense> {
        let removed = self
            .storage
            .transaction(|s| s.recurring.delete(id))?
            .ok_or_else(|| PennywiseError::recurring_not_found(id.to_string()))?;

        info!(recurring_id = %id, "deleted recurring expense");
        Ok(removed)
    }

    /// Post every due template into the current month's budget
    pub fn process_due(&self) -> PennywiseResult<ProcessReport> {
        self.process_due_at(Utc::now())
    }

    /// Post every template due at `now` into the budget for `now`'s month
    ///
    /// Does nothing when that month has no budget.
    pub fn process_due_at(&self, now: DateTime<Utc>) -> PennywiseResult<ProcessReport> {
        let month = BudgetMonth::of_instant(now);
        let today = now.date_naive();

        let mut report = ProcessReport {
            month: Some(month),
            ..ProcessReport::default()
        };

        let Some(budget) = BudgetService::new(self.storage).get_budget(month)? else {
            info!(month = %month, "no budget for current month; recurring expenses not processed");
            return Ok(report);
        };
        report.budget_id = Some(budget.id);

        for item in self.list()? {
            let state = item.state_on(today);
            if !state.is_due() {
                if state == RecurringState::ProcessedThisPeriod && item.frequency != Frequency::Monthly {
                    warn!(
                        recurring_id = %item.id,
                        frequency = %item.frequency,
                        "frequency has no period check; not posting again"
                    );
                }
                report.skipped += 1;
                continue;
            }

            match self.post(&item, budget.id, now) {
                Ok(expense_id) => {
                    debug!(recurring_id = %item.id, expense_id = %expense_id, "posted recurring expense");
                    report.posted.push(expense_id);
                }
                Err(e) => {
                    warn!(recurring_id = %item.id, error = %e, "failed to post recurring expense");
                    report.failed.push((item.id, e.to_string()));
                }
            }
        }

        info!(
            month = %month,
            posted = report.posted.len(),
            skipped = report.skipped,
            failed = report.failed.len(),
            "processed recurring expenses"
        );
        Ok(report)
    }

    fn post(
        &self,
        item: &RecurringExpense,
        budget_id: BudgetId,
        now: DateTime<Utc>,
    ) -> PennywiseResult<ExpenseId> {
        item.validate()
            .map_err(|e| PennywiseError::Validation(e.to_string()))?;

        let expense = Expense::new(budget_id, item.category_id, item.amount)
            .with_description(item.expense_description())
            .with_date(now);
        let expense_id = expense.id;

        let mut processed = item.clone();
        processed.mark_processed(now);

        self.storage.transaction(|s| {
            s.expenses.put(expense)?;
            s.recurring.put(processed)
        })?;

        Ok(expense_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, Category, Color, Icon, Money};
    use crate::storage::MemoryBackend;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 8, 0, 0).unwrap()
    }

    fn with_category(storage: &Storage) -> Category {
        let category = Category::new("Subscriptions", Icon::Receipt, Color::Purple);
        storage
            .transaction(|s| s.categories.put(category.clone()))
            .unwrap();
        category
    }

    fn with_budget(storage: &Storage, month: &str) -> Budget {
        let budget = Budget::new(BudgetMonth::parse(month).unwrap(), Money::from(1000));
        storage.transaction(|s| s.budgets.put(budget.clone())).unwrap();
        budget
    }

    fn monthly(category: &Category, start: DateTime<Utc>) -> NewRecurringExpense {
        NewRecurringExpense {
            description: "Streaming".into(),
            category_id: category.id,
            amount: Money::from(15),
            frequency: Frequency::Monthly,
            start_date: Some(start),
        }
    }

    #[test]
    fn test_create_and_update() {
        let storage = Storage::in_memory();
        let category = with_category(&storage);
        let service = RecurringService::new(&storage);

        let item = service.create(monthly(&category, at(2025, 1, 1))).unwrap();
        assert!(item.active);
        assert!(item.last_processed.is_none());

        let paused = service.set_active(item.id, false).unwrap();
        assert!(!paused.active);

        let updated = service
            .update(
                item.id,
                RecurringExpenseUpdate {
                    amount: Some(Money::from(18)),
                    ..RecurringExpenseUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount, Money::from(18));
        assert!(!updated.active);
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_create_validates() {
        let storage = Storage::in_memory();
        let category = with_category(&storage);
        let service = RecurringService::new(&storage);

        let err = service
            .create(NewRecurringExpense {
                amount: Money::zero(),
                ..monthly(&category, at(2025, 1, 1))
            })
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .create(NewRecurringExpense {
                category_id: crate::models::CategoryId::new(),
                ..monthly(&category, at(2025, 1, 1))
            })
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_process_posts_once_per_month() {
        let storage = Storage::in_memory();
        let category = with_category(&storage);
        let budget = with_budget(&storage, "2025-03");
        let service = RecurringService::new(&storage);
        let item = service.create(monthly(&category, at(2025, 1, 1))).unwrap();

        let first = service.process_due_at(at(2025, 3, 2)).unwrap();
        assert_eq!(first.budget_id, Some(budget.id));
        assert_eq!(first.posted.len(), 1);

        let second = service.process_due_at(at(2025, 3, 20)).unwrap();
        assert!(second.posted.is_empty());
        assert_eq!(second.skipped, 1);

        let expenses = storage.expenses_for_budget(budget.id).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].description.as_deref(), Some("Recurring: Streaming"));
        assert_eq!(expenses[0].amount, Money::from(15));
        assert_eq!(expenses[0].category_id, category.id);
        assert_eq!(expenses[0].date, at(2025, 3, 2));

        let stored = service.get(item.id).unwrap();
        assert_eq!(stored.last_processed, Some(at(2025, 3, 2)));
    }

    #[test]
    fn test_next_month_is_due_again() {
        let storage = Storage::in_memory();
        let category = with_category(&storage);
        with_budget(&storage, "2025-03");
        let april = with_budget(&storage, "2025-04");
        let service = RecurringService::new(&storage);
        service.create(monthly(&category, at(2025, 1, 1))).unwrap();

        service.process_due_at(at(2025, 3, 2)).unwrap();
        let report = service.process_due_at(at(2025, 4, 1)).unwrap();

        assert_eq!(report.posted.len(), 1);
        assert_eq!(storage.expenses_for_budget(april.id).unwrap().len(), 1);
    }

    #[test]
    fn test_no_budget_aborts() {
        let storage = Storage::in_memory();
        let category = with_category(&storage);
        let service = RecurringService::new(&storage);
        let item = service.create(monthly(&category, at(2025, 1, 1))).unwrap();

        let report = service.process_due_at(at(2025, 3, 2)).unwrap();
        assert!(report.aborted());
        assert!(report.posted.is_empty());
        assert_eq!(storage.expenses.count().unwrap(), 0);
        assert!(service.get(item.id).unwrap().last_processed.is_none());
    }

    #[test]
    fn test_skips_inactive_and_future_items() {
        let storage = Storage::in_memory();
        let category = with_category(&storage);
        with_budget(&storage, "2025-03");
        let service = RecurringService::new(&storage);

        let paused = service.create(monthly(&category, at(2025, 1, 1))).unwrap();
        service.set_active(paused.id, false).unwrap();
        service.create(monthly(&category, at(2025, 6, 1))).unwrap();

        let report = service.process_due_at(at(2025, 3, 2)).unwrap();
        assert!(report.posted.is_empty());
        assert_eq!(report.skipped, 2);
    }

    #[test]
    fn test_non_monthly_items_post_only_once() {
        let storage = Storage::in_memory();
        let category = with_category(&storage);
        with_budget(&storage, "2025-03");
        with_budget(&storage, "2025-04");
        let service = RecurringService::new(&storage);
        service
            .create(NewRecurringExpense {
                frequency: Frequency::Weekly,
                ..monthly(&category, at(2025, 1, 1))
            })
            .unwrap();

        assert_eq!(service.process_due_at(at(2025, 3, 2)).unwrap().posted.len(), 1);
        assert!(service.process_due_at(at(2025, 4, 2)).unwrap().posted.is_empty());
    }

    #[test]
    fn test_failed_item_does_not_stop_the_pass() {
        let storage = Storage::in_memory();
        let category = with_category(&storage);
        with_budget(&storage, "2025-03");
        let service = RecurringService::new(&storage);
        service.create(monthly(&category, at(2025, 1, 1))).unwrap();

        // An imported template with a zero amount cannot be posted
        let mut broken = RecurringExpense::new(
            "Broken",
            category.id,
            Money::from(1),
            Frequency::Monthly,
            at(2025, 1, 1),
        );
        broken.amount = Money::zero();
        storage.transaction(|s| s.recurring.put(broken.clone())).unwrap();

        let report = service.process_due_at(at(2025, 3, 2)).unwrap();
        assert_eq!(report.posted.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, broken.id);
        assert!(service.get(broken.id).unwrap().last_processed.is_none());
    }

    #[test]
    fn test_storage_fault_is_reported_per_item() {
        let backend = Arc::new(MemoryBackend::new());
        let storage = Storage::with_backend(backend.clone());
        let category = with_category(&storage);
        with_budget(&storage, "2025-03");
        let service = RecurringService::new(&storage);
        let item = service.create(monthly(&category, at(2025, 1, 1))).unwrap();

        backend.set_fail_persist(true);
        let report = service.process_due_at(at(2025, 3, 2)).unwrap();

        assert!(report.posted.is_empty());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(storage.expenses.count().unwrap(), 0);
        assert!(service.get(item.id).unwrap().last_processed.is_none());
    }

    #[test]
    fn test_delete() {
        let storage = Storage::in_memory();
        let category = with_category(&storage);
        let service = RecurringService::new(&storage);
        let item = service.create(monthly(&category, at(2025, 1, 1))).unwrap();

        service.delete(item.id).unwrap();
        assert!(service.get(item.id).unwrap_err().is_not_found());
        assert!(service.delete(item.id).unwrap_err().is_not_found());
    }
}
