//! Allocation CLI commands

use clap::Subcommand;

use super::{currency, parse_amount, parse_month, require_budget};
use crate::display::format_allocation_table;
use crate::error::{PennywiseError, PennywiseResult};
use crate::models::ProposedAllocation;
use crate::services::{AllocationService, CategoryService, SummaryService};
use crate::storage::Storage;

/// Allocation subcommands
#[derive(Subcommand)]
pub enum AllocateCommands {
    /// Set category allocations in one batch (0 removes one)
    Set {
        /// One or more CATEGORY=AMOUNT pairs, e.g. Groceries=400
        #[arg(required = true, num_args = 1..)]
        entries: Vec<String>,
        /// Budget month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Show allocations with spending for a month
    List {
        /// Budget month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Copy every allocation from one month into another
    Copy {
        /// Source month (YYYY-MM)
        from: String,
        /// Destination month (YYYY-MM)
        to: String,
    },
}

/// Handle an allocation command
pub fn handle_allocate_command(storage: &Storage, cmd: AllocateCommands) -> PennywiseResult<()> {
    let service = AllocationService::new(storage);

    match cmd {
        AllocateCommands::Set { entries, month } => {
            let budget = require_budget(storage, parse_month(month.as_deref())?)?;
            let categories = CategoryService::new(storage);

            let mut proposed = Vec::with_capacity(entries.len());
            for entry in &entries {
                let (name, amount) = entry.rsplit_once('=').ok_or_else(|| {
                    PennywiseError::Validation(format!(
                        "Expected CATEGORY=AMOUNT, got '{}'",
                        entry
                    ))
                })?;
                let category = categories.find_category(name)?;
                proposed.push(ProposedAllocation::new(category.id, parse_amount(amount)?));
            }

            let changes = service.save_allocations(budget.id, &proposed)?;
            if changes.is_empty() {
                println!("Allocations unchanged");
            } else {
                println!(
                    "Saved allocations for {}: {} created, {} updated, {} removed",
                    budget.month.label(),
                    changes.created,
                    changes.updated,
                    changes.deleted
                );
            }
        }

        AllocateCommands::List { month } => {
            let budget = require_budget(storage, parse_month(month.as_deref())?)?;
            let views = SummaryService::new(storage).get_categories_with_allocations(budget.id)?;

            println!("Allocations: {}", budget.month.label());
            print!("{}", format_allocation_table(&views, currency(storage)?));
        }

        AllocateCommands::Copy { from, to } => {
            let source = require_budget(storage, parse_month(Some(&from))?)?;
            let target = require_budget(storage, parse_month(Some(&to))?)?;

            let written = service.copy_allocations(source.id, target.id)?;
            println!(
                "Copied {} allocation(s) from {} to {}",
                written,
                source.month.label(),
                target.month.label()
            );
        }
    }

    Ok(())
}
