//! Expense CLI commands

use clap::Subcommand;

use super::{currency, parse_amount, parse_date, parse_month, require_budget, resolve_record};
use crate::display::{format_expense_list, money};
use crate::error::{PennywiseError, PennywiseResult};
use crate::models::{BudgetMonth, ExpenseUpdate, NewExpense};
use crate::services::{CategoryService, ExpenseService};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Amount spent (negative for a refund)
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// What the money was spent on
        #[arg(short, long)]
        description: Option<String>,
        /// Date of the expense (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
        /// Budget month (YYYY-MM, defaults to the month of the date)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// List a month's expenses, most recent first
    List {
        /// Budget month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
        /// Only show one category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Edit an expense
    Edit {
        /// Expense ID
        id: String,
        /// New amount
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
        /// New category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// New description
        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description
        #[arg(long)]
        clear_description: bool,
        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: String,
    },

    /// Delete every expense of a month
    Reset {
        /// Budget month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
        /// Required to confirm the reset
        #[arg(long)]
        force: bool,
    },
}

/// Handle an expense command
pub fn handle_expense_command(storage: &Storage, cmd: ExpenseCommands) -> PennywiseResult<()> {
    let service = ExpenseService::new(storage);
    let categories = CategoryService::new(storage);
    let currency = currency(storage)?;

    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            description,
            date,
            month,
        } => {
            let date = date.as_deref().map(parse_date).transpose()?;
            let month = match (month, date) {
                (Some(m), _) => parse_month(Some(&m))?,
                (None, Some(d)) => BudgetMonth::of_instant(d),
                (None, None) => BudgetMonth::current(),
            };
            let budget = require_budget(storage, month)?;
            let category = categories.find_category(&category)?;

            let expense = service.add_expense(NewExpense {
                budget_id: budget.id,
                category_id: category.id,
                amount: parse_amount(&amount)?,
                description,
                date,
            })?;

            println!(
                "Recorded {} in {} ({})",
                money(expense.amount, currency),
                category.name,
                month.label()
            );
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::List { month, category } => {
            let budget = require_budget(storage, parse_month(month.as_deref())?)?;
            let expenses = match category {
                Some(c) => {
                    let category = categories.find_category(&c)?;
                    service.list_by_category(budget.id, category.id)?
                }
                None => service.list_expenses(budget.id)?,
            };

            println!("Expenses: {}", budget.month.label());
            print!(
                "{}",
                format_expense_list(&expenses, &categories.list_categories()?, currency)
            );
        }

        ExpenseCommands::Edit {
            id,
            amount,
            category,
            description,
            clear_description,
            date,
        } => {
            let expense = resolve_record(storage.expenses.get_all()?, &id, |id| {
                PennywiseError::expense_not_found(id)
            })?;

            let update = ExpenseUpdate {
                amount: amount.as_deref().map(parse_amount).transpose()?,
                description: if clear_description {
                    Some(None)
                } else {
                    description.map(Some)
                },
                category_id: match category {
                    Some(c) => Some(categories.find_category(&c)?.id),
                    None => None,
                },
                date: date.as_deref().map(parse_date).transpose()?,
            };
            if update == ExpenseUpdate::default() {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = service.update_expense(expense.id, update)?;
            println!("Updated expense {}", updated.id.short());
        }

        ExpenseCommands::Delete { id } => {
            let expense = resolve_record(storage.expenses.get_all()?, &id, |id| {
                PennywiseError::expense_not_found(id)
            })?;
            service.delete_expense(expense.id)?;
            println!("Deleted expense {}", expense.id.short());
        }

        ExpenseCommands::Reset { month, force } => {
            let budget = require_budget(storage, parse_month(month.as_deref())?)?;
            if !force {
                return Err(PennywiseError::Validation(format!(
                    "This deletes every expense of {}; pass --force to confirm",
                    budget.month.label()
                )));
            }

            let removed = service.reset_expenses(budget.id)?;
            println!("Deleted {} expense(s) from {}", removed, budget.month.label());
        }
    }

    Ok(())
}
