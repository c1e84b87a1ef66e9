//! Service layer for Pennywise
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, derived views, and cross-record operations.

pub mod allocation;
pub mod budget;
pub mod category;
pub mod expense;
pub mod income;
pub mod recurring;
pub mod savings;
pub mod settings;
pub mod summary;

pub use allocation::AllocationService;
pub use budget::{BudgetService, OpenedMonth};
pub use category::CategoryService;
pub use expense::ExpenseService;
pub use income::IncomeService;
pub use recurring::{ProcessReport, RecurringService};
pub use savings::SavingsGoalService;
pub use settings::SettingsService;
pub use summary::SummaryService;
