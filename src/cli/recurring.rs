//! Recurring expense CLI commands

use clap::Subcommand;

use super::{currency, parse_amount, parse_date, resolve_record};
use crate::display::{format_process_report, format_recurring_list};
use crate::error::{PennywiseError, PennywiseResult};
use crate::models::{Frequency, NewRecurringExpense, RecurringExpense};
use crate::services::{CategoryService, RecurringService};
use crate::storage::Storage;

/// Recurring expense subcommands
#[derive(Subcommand)]
pub enum RecurringCommands {
    /// Create a recurring expense
    Add {
        /// Description (posted as "Recurring: <description>")
        description: String,
        /// Amount posted each time
        amount: String,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// How often it repeats; only monthly items repeat, others post once
        #[arg(long, default_value_t = Frequency::Monthly)]
        frequency: Frequency,
        /// First date it is due (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        start: Option<String>,
    },

    /// List recurring expenses
    List,

    /// Stop posting a recurring expense
    Pause {
        /// Recurring expense ID
        id: String,
    },

    /// Resume posting a paused recurring expense
    Resume {
        /// Recurring expense ID
        id: String,
    },

    /// Delete a recurring expense (posted expenses are kept)
    Delete {
        /// Recurring expense ID
        id: String,
    },

    /// Post every due recurring expense into the current month
    Process,
}

fn find(storage: &Storage, id: &str) -> PennywiseResult<RecurringExpense> {
    resolve_record(storage.recurring.get_all()?, id, |id| {
        PennywiseError::recurring_not_found(id)
    })
}

/// Handle a recurring expense command
pub fn handle_recurring_command(storage: &Storage, cmd: RecurringCommands) -> PennywiseResult<()> {
    let service = RecurringService::new(storage);
    let categories = CategoryService::new(storage);

    match cmd {
        RecurringCommands::Add {
            description,
            amount,
            category,
            frequency,
            start,
        } => {
            let category = categories.find_category(&category)?;
            let item = service.create(NewRecurringExpense {
                description,
                category_id: category.id,
                amount: parse_amount(&amount)?,
                frequency,
                start_date: start.as_deref().map(parse_date).transpose()?,
            })?;

            println!("Created recurring expense: {}", item.description);
            println!("  Starts: {}", item.start_date.format("%Y-%m-%d"));
            println!("  ID: {}", item.id);
        }

        RecurringCommands::List => {
            print!(
                "{}",
                format_recurring_list(
                    &service.list()?,
                    &categories.list_categories()?,
                    currency(storage)?
                )
            );
        }

        RecurringCommands::Pause { id } => {
            let item = service.set_active(find(storage, &id)?.id, false)?;
            println!("Paused: {}", item.description);
        }

        RecurringCommands::Resume { id } => {
            let item = service.set_active(find(storage, &id)?.id, true)?;
            println!("Resumed: {}", item.description);
        }

        RecurringCommands::Delete { id } => {
            let item = service.delete(find(storage, &id)?.id)?;
            println!("Deleted recurring expense: {}", item.description);
        }

        RecurringCommands::Process => {
            print!("{}", format_process_report(&service.process_due()?));
        }
    }

    Ok(())
}
