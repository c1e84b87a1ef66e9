//! Display formatting for terminal output
//!
//! Turns records and derived views into `tabled` tables and short detail
//! blocks. Every amount is printed with the configured currency symbol.

pub mod budget;
pub mod category;
pub mod expense;
pub mod recurring;
pub mod savings;

pub use budget::{format_budget_list, format_budget_summary, format_income_list};
pub use category::{format_allocation_table, format_category_list};
pub use expense::format_expense_list;
pub use recurring::{format_process_report, format_recurring_list};
pub use savings::format_goal_list;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Currency, Money};

/// Format an amount with the currency symbol
pub fn money(amount: Money, currency: Currency) -> String {
    amount.format_with_symbol(currency.symbol())
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}
