//! Savings goal CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use super::{currency, parse_amount, resolve_record};
use crate::display::{format_goal_list, money};
use crate::error::{PennywiseError, PennywiseResult};
use crate::models::{Color, Icon, SavingsGoal};
use crate::services::SavingsGoalService;
use crate::storage::Storage;

/// Savings goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Add {
        /// Goal name
        name: String,
        /// Amount to save
        target: String,
        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        by: Option<String>,
        /// Icon tag
        #[arg(long)]
        icon: Option<Icon>,
        /// Colour tag
        #[arg(long)]
        color: Option<Color>,
    },

    /// List savings goals with progress
    List,

    /// Add to (or withdraw from, with a negative amount) a goal
    Contribute {
        /// Goal name or ID
        goal: String,
        /// Amount to add
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Delete a savings goal
    Delete {
        /// Goal name or ID
        goal: String,
    },
}

fn find(service: &SavingsGoalService, goal: &str) -> PennywiseResult<SavingsGoal> {
    let goals = service.list()?;
    if let Some(found) = goals
        .iter()
        .find(|g| g.name.eq_ignore_ascii_case(goal.trim()))
    {
        return Ok(found.clone());
    }
    resolve_record(goals, goal, |id| PennywiseError::savings_goal_not_found(id))
}

/// Handle a savings goal command
pub fn handle_goal_command(storage: &Storage, cmd: GoalCommands) -> PennywiseResult<()> {
    let service = SavingsGoalService::new(storage);
    let currency = currency(storage)?;

    match cmd {
        GoalCommands::Add {
            name,
            target,
            by,
            icon,
            color,
        } => {
            let target_date = by
                .as_deref()
                .map(|s| {
                    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
                        PennywiseError::Validation(format!(
                            "Invalid date '{}', expected YYYY-MM-DD",
                            s
                        ))
                    })
                })
                .transpose()?;

            let goal = service.create(&name, parse_amount(&target)?, target_date, icon, color)?;
            println!("Created savings goal: {}", goal.name);
            println!("  Target: {}", money(goal.target_amount, currency));
            println!("  ID: {}", goal.id);
        }

        GoalCommands::List => {
            print!("{}", format_goal_list(&service.list()?, currency));
        }

        GoalCommands::Contribute { goal, amount } => {
            let goal = find(&service, &goal)?;
            let updated = service.contribute(goal.id, parse_amount(&amount)?)?;

            println!(
                "{}: {} of {} ({}%)",
                updated.name,
                money(updated.current_amount, currency),
                money(updated.target_amount, currency),
                updated.progress_percent()
            );
            if updated.is_reached() {
                println!("  Goal reached!");
            }
        }

        GoalCommands::Delete { goal } => {
            let goal = find(&service, &goal)?;
            service.delete(goal.id)?;
            println!("Deleted savings goal: {}", goal.name);
        }
    }

    Ok(())
}
