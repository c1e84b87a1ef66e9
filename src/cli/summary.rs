//! Summary CLI command

use super::{currency, parse_month, require_budget};
use crate::display::{format_allocation_table, format_budget_summary};
use crate::error::PennywiseResult;
use crate::services::SummaryService;
use crate::storage::Storage;

/// Print a month's headline figures followed by its category table
pub fn handle_summary(storage: &Storage, month: Option<&str>) -> PennywiseResult<()> {
    let budget = require_budget(storage, parse_month(month)?)?;
    let currency = currency(storage)?;
    let service = SummaryService::new(storage);

    print!(
        "{}",
        format_budget_summary(&service.get_budget_summary(budget.id)?, currency)
    );
    println!();
    print!(
        "{}",
        format_allocation_table(&service.get_categories_with_allocations(budget.id)?, currency)
    );

    Ok(())
}
