//! Savings goal service

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{PennywiseError, PennywiseResult};
use crate::models::{Color, Icon, Money, SavingsGoal, SavingsGoalId, SavingsGoalUpdate};
use crate::storage::Storage;

/// Service for savings goals
pub struct SavingsGoalService<'a> {
    storage: &'a Storage,
}

impl<'a> SavingsGoalService<'a> {
    /// Create a new savings goal service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a goal with nothing saved yet
    pub fn create(
        &self,
        name: &str,
        target_amount: Money,
        target_date: Option<NaiveDate>,
        icon: Option<Icon>,
        color: Option<Color>,
    ) -> PennywiseResult<SavingsGoal> {
        let mut goal = SavingsGoal::new(name.trim(), target_amount);
        goal.target_date = target_date;
        if let Some(icon) = icon {
            goal.icon = icon;
        }
        if let Some(color) = color {
            goal.color = color;
        }
        goal.validate()
            .map_err(|e| PennywiseError::Validation(e.to_string()))?;

        self.storage
            .transaction(|s| s.savings_goals.put(goal.clone()))?;

        info!(goal_id = %goal.id, target = %goal.target_amount, "created savings goal");
        Ok(goal)
    }

    /// A goal by id
    pub fn get(&self, id: SavingsGoalId) -> PennywiseResult<SavingsGoal> {
        self.storage
            .savings_goals
            .get(id)?
            .ok_or_else(|| PennywiseError::savings_goal_not_found(id.to_string()))
    }

    /// All goals in creation order
    pub fn list(&self) -> PennywiseResult<Vec<SavingsGoal>> {
        self.storage.savings_goals.get_all()
    }

    /// Merge a partial update into a goal
    pub fn update(&self, id: SavingsGoalId, update: SavingsGoalUpdate) -> PennywiseResult<SavingsGoal> {
        let mut goal = self.get(id)?;
        goal.apply(update);
        goal.name = goal.name.trim().to_string();
        goal.validate()
            .map_err(|e| PennywiseError::Validation(e.to_string()))?;

        self.storage
            .transaction(|s| s.savings_goals.put(goal.clone()))?;
        debug!(goal_id = %id, "updated savings goal");
        Ok(goal)
    }

    /// Add to (or, with a negative amount, withdraw from) a goal's balance
    ///
    /// Saving past the target is allowed; the balance can't go below zero.
    pub fn contribute(&self, id: SavingsGoalId, amount: Money) -> PennywiseResult<SavingsGoal> {
        if amount.is_zero() {
            return Err(PennywiseError::Validation(
                "Contribution amount cannot be zero".into(),
            ));
        }

        let goal = self.get(id)?;
        let updated = self.update(
            id,
            SavingsGoalUpdate {
                current_amount: Some(
                    goal.current_amount
                        .checked_add(amount)
                        .ok_or_else(PennywiseError::amount_too_large)?,
                ),
                ..SavingsGoalUpdate::default()
            },
        )?;

        info!(goal_id = %id, amount = %amount, balance = %updated.current_amount, "contributed to savings goal");
        Ok(updated)
    }

    /// Progress toward the target in percent; may exceed 100
    pub fn progress(&self, id: SavingsGoalId) -> PennywiseResult<Decimal> {
        Ok(self.get(id)?.progress_percent())
    }

    /// Delete a goal
    pub fn delete(&self, id: SavingsGoalId) -> PennywiseResult<SavingsGoal> {
        let removed = self
            .storage
            .transaction(|s| s.savings_goals.delete(id))?
            .ok_or_else(|| PennywiseError::savings_goal_not_found(id.to_string()))?;

        info!(goal_id = %id, "deleted savings goal");
        Ok(removed)
    }
}
