//! Savings goal model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::{Color, Icon};
use super::ids::SavingsGoalId;
use super::money::Money;

/// A savings target; saving past the target is allowed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: SavingsGoalId,
    pub name: String,
    pub target_amount: Money,
    pub current_amount: Money,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    pub icon: Icon,
    pub color: Color,
    pub created_at: DateTime<Utc>,
}

impl SavingsGoal {
    pub fn new(name: impl Into<String>, target_amount: Money) -> Self {
        Self {
            id: SavingsGoalId::new(),
            name: name.into(),
            target_amount,
            current_amount: Money::zero(),
            target_date: None,
            icon: Icon::PiggyBank,
            color: Color::Teal,
            created_at: Utc::now(),
        }
    }

    /// Progress toward the target as a percentage, uncapped
    pub fn progress_percent(&self) -> Decimal {
        if self.target_amount.is_zero() {
            return Decimal::ZERO;
        }
        (self.current_amount.amount() * Decimal::ONE_HUNDRED / self.target_amount.amount())
            .round_dp(1)
    }

    pub fn is_reached(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Amount still needed; zero once reached
    pub fn remaining(&self) -> Money {
        (self.target_amount - self.current_amount).max_zero()
    }

    /// Validate the goal
    pub fn validate(&self) -> Result<(), SavingsGoalValidationError> {
        if self.name.trim().is_empty() {
            return Err(SavingsGoalValidationError::EmptyName);
        }
        if !self.target_amount.is_positive() {
            return Err(SavingsGoalValidationError::NonPositiveTarget);
        }
        if self.current_amount.is_negative() {
            return Err(SavingsGoalValidationError::NegativeBalance);
        }
        if !self.target_amount.is_within_limit() || !self.current_amount.is_within_limit() {
            return Err(SavingsGoalValidationError::AmountTooLarge);
        }
        Ok(())
    }

    /// Apply a partial update field by field
    pub fn apply(&mut self, update: SavingsGoalUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(target) = update.target_amount {
            self.target_amount = target;
        }
        if let Some(current) = update.current_amount {
            self.current_amount = current;
        }
        if let Some(target_date) = update.target_date {
            self.target_date = target_date;
        }
        if let Some(icon) = update.icon {
            self.icon = icon;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
    }
}

/// Partial update for a savings goal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavingsGoalUpdate {
    pub name: Option<String>,
    pub target_amount: Option<Money>,
    pub current_amount: Option<Money>,
    /// `Some(None)` clears the target date
    pub target_date: Option<Option<NaiveDate>>,
    pub icon: Option<Icon>,
    pub color: Option<Color>,
}

/// Validation errors for savings goals
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavingsGoalValidationError {
    EmptyName,
    NonPositiveTarget,
    NegativeBalance,
    AmountTooLarge,
}

impl std::fmt::Display for SavingsGoalValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Savings goal name cannot be empty"),
            Self::NonPositiveTarget => write!(f, "Target amount must be greater than zero"),
            Self::NegativeBalance => write!(f, "Saved amount cannot be negative"),
            Self::AmountTooLarge => write!(f, "Goal amounts cannot exceed {}", Money::limit()),
        }
    }
}

impl std::error::Error for SavingsGoalValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_progress_can_exceed_target() {
        let mut goal = SavingsGoal::new("Bike", Money::from(200));
        goal.current_amount = Money::from(50);
        assert_eq!(goal.progress_percent(), dec!(25.0));
        assert!(!goal.is_reached());
        assert_eq!(goal.remaining(), Money::from(150));

        goal.current_amount = Money::from(300);
        assert_eq!(goal.progress_percent(), dec!(150.0));
        assert!(goal.is_reached());
        assert_eq!(goal.remaining(), Money::zero());
        assert!(goal.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let goal = SavingsGoal::new("", Money::from(10));
        assert_eq!(goal.validate(), Err(SavingsGoalValidationError::EmptyName));

        let goal = SavingsGoal::new("Trip", Money::zero());
        assert_eq!(goal.validate(), Err(SavingsGoalValidationError::NonPositiveTarget));

        let mut goal = SavingsGoal::new("Trip", Money::from(10));
        goal.current_amount = Money::new(dec!(1000000000000000.01));
        assert_eq!(goal.validate(), Err(SavingsGoalValidationError::AmountTooLarge));
    }
}
