//! Budget CLI commands
//!
//! Implements CLI commands for the month lifecycle: creating a month's
//! budget, carrying rollover forward and topping up income.

use clap::Subcommand;

use super::{currency, parse_amount, parse_month, require_budget};
use crate::display::{format_budget_list, format_income_list, money};
use crate::error::PennywiseResult;
use crate::models::{BudgetUpdate, NewBudget};
use crate::services::{BudgetService, IncomeService};
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show a month's budget and the income added to it
    Show {
        /// Budget month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Create a month's budget, replacing any existing one
    Create {
        /// Monthly income (e.g., "2500" or "2500.00")
        income: String,
        /// Budget month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
        /// Carry in what the previous month left over
        #[arg(long)]
        rollover: bool,
    },

    /// Start a month: rollover plus last month's allocations when affordable
    Open {
        /// Monthly income
        income: String,
        /// Budget month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Add income to a month's budget
    Income {
        /// Amount to add
        amount: String,
        /// What the income was for
        #[arg(short, long)]
        note: Option<String>,
        /// Budget month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Change a month's income or rollover
    Update {
        /// New monthly income
        #[arg(long)]
        income: Option<String>,
        /// New rollover amount
        #[arg(long, conflicts_with = "clear_rollover")]
        rollover: Option<String>,
        /// Remove the rollover
        #[arg(long)]
        clear_rollover: bool,
        /// Budget month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// List all budgets
    List,
}

/// Handle a budget command
pub fn handle_budget_command(storage: &Storage, cmd: BudgetCommands) -> PennywiseResult<()> {
    let service = BudgetService::new(storage);
    let currency = currency(storage)?;

    match cmd {
        BudgetCommands::Show { month } => {
            let month = parse_month(month.as_deref())?;
            let budget = require_budget(storage, month)?;

            println!("Budget: {}", month.label());
            println!("  Income:    {}", money(budget.monthly_income, currency));
            println!("  Rollover:  {}", money(budget.rollover(), currency));
            println!("  Available: {}", money(budget.total_available(), currency));
            println!("  ID:        {}", budget.id);
            println!();
            print!(
                "{}",
                format_income_list(&IncomeService::new(storage).list_incomes(budget.id)?, currency)
            );
        }

        BudgetCommands::Create {
            income,
            month,
            rollover,
        } => {
            let input = NewBudget::new(parse_month(month.as_deref())?, parse_amount(&income)?);
            let budget = if rollover {
                service.create_budget_with_rollover(input)?
            } else {
                service.create_budget(input)?
            };

            println!("Created budget for {}", budget.month.label());
            println!("  Income:    {}", money(budget.monthly_income, currency));
            if rollover {
                println!("  Rollover:  {}", money(budget.rollover(), currency));
            }
        }

        BudgetCommands::Open { income, month } => {
            let input = NewBudget::new(parse_month(month.as_deref())?, parse_amount(&income)?);
            let opened = service.open_month(input)?;

            println!("Opened {}", opened.budget.month.label());
            println!("  Income:    {}", money(opened.budget.monthly_income, currency));
            if opened.rollover.was_overspent {
                println!(
                    "  Last month was overspent by {}; nothing rolls over",
                    money(-opened.rollover.remaining, currency)
                );
            } else {
                println!("  Rollover:  {}", money(opened.rollover.rollover, currency));
            }
            println!("  Available: {}", money(opened.budget.total_available(), currency));
            if opened.copied_allocations > 0 {
                println!(
                    "  Copied {} allocation(s) from last month",
                    opened.copied_allocations
                );
            }
        }

        BudgetCommands::Income {
            amount,
            note,
            month,
        } => {
            let budget = require_budget(storage, parse_month(month.as_deref())?)?;
            let (budget, entry) =
                IncomeService::new(storage).add_income(budget.id, parse_amount(&amount)?, note)?;

            println!(
                "Added {} to {}",
                money(entry.amount, currency),
                budget.month.label()
            );
            println!("  Income is now {}", money(budget.monthly_income, currency));
        }

        BudgetCommands::Update {
            income,
            rollover,
            clear_rollover,
            month,
        } => {
            let budget = require_budget(storage, parse_month(month.as_deref())?)?;

            let previous_month_rollover = if clear_rollover {
                Some(None)
            } else {
                rollover.as_deref().map(parse_amount).transpose()?.map(Some)
            };
            let update = BudgetUpdate {
                monthly_income: income.as_deref().map(parse_amount).transpose()?,
                previous_month_rollover,
            };

            let budget = service.update_budget(budget.id, update)?;
            println!("Updated budget for {}", budget.month.label());
            println!("  Income:    {}", money(budget.monthly_income, currency));
            println!("  Rollover:  {}", money(budget.rollover(), currency));
        }

        BudgetCommands::List => {
            print!("{}", format_budget_list(&service.list_budgets()?, currency));
        }
    }

    Ok(())
}
