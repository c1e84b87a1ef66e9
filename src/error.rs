//! Custom error types for Pennywise
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::models::Money;

/// The main error type for Pennywise operations
#[derive(Error, Debug)]
pub enum PennywiseError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models and user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// A proposed allocation plan exceeds the funds available for the month
    #[error("Total allocations exceed monthly budget: proposed {proposed}, available {available}")]
    OverBudget { proposed: Money, available: Money },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Backup document could not be parsed or is structurally invalid
    #[error("Invalid backup file: {0}")]
    ImportFormat(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PennywiseError {
    /// Create a validation error for an amount or total past [`Money::limit`]
    pub fn amount_too_large() -> Self {
        Self::Validation(format!("Amount too large (limit {})", Money::limit()))
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for allocations
    pub fn allocation_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Allocation",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for recurring expenses
    pub fn recurring_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Recurring expense",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for savings goals
    pub fn savings_goal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Savings goal",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::OverBudget { .. })
    }

    /// Check if this is a storage-layer fault
    pub fn is_storage_fault(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Io(_) | Self::Json(_))
    }
}

impl From<std::io::Error> for PennywiseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PennywiseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Pennywise operations
pub type PennywiseResult<T> = Result<T, PennywiseError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display() {
        let err = PennywiseError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = PennywiseError::budget_not_found("2025-01");
        assert_eq!(err.to_string(), "Budget not found: 2025-01");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_over_budget_is_validation() {
        let err = PennywiseError::OverBudget {
            proposed: Money::new(dec!(110000)),
            available: Money::new(dec!(100000)),
        };
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Total allocations exceed monthly budget: proposed 110000, available 100000"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PennywiseError = io_err.into();
        assert!(matches!(err, PennywiseError::Io(_)));
        assert!(err.is_storage_fault());
    }
}
