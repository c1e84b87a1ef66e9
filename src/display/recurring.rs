//! Recurring expense display formatting

use std::collections::HashMap;

use tabled::Tabled;

use super::{money, render};
use crate::models::{Category, CategoryId, Currency, RecurringExpense};
use crate::services::ProcessReport;

#[derive(Tabled)]
struct RecurringRow {
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Every")]
    frequency: String,
    #[tabled(rename = "Last posted")]
    last_processed: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format recurring expense templates as a table
pub fn format_recurring_list(
    items: &[RecurringExpense],
    categories: &[Category],
    currency: Currency,
) -> String {
    if items.is_empty() {
        return "No recurring expenses.\n".to_string();
    }

    let names: HashMap<CategoryId, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let rows = items
        .iter()
        .map(|r| RecurringRow {
            description: r.description.clone(),
            amount: money(r.amount, currency),
            category: names
                .get(&r.category_id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| "(deleted)".to_string()),
            frequency: r.frequency.to_string(),
            last_processed: r
                .last_processed
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "never".to_string()),
            status: if r.active { "active" } else { "paused" },
            id: r.id.short(),
        })
        .collect();

    render(rows)
}

/// One-paragraph description of a processor pass
pub fn format_process_report(report: &ProcessReport) -> String {
    let Some(month) = report.month else {
        return "Recurring expenses were not processed.\n".to_string();
    };

    if report.aborted() {
        return format!(
            "No budget for {}; recurring expenses were not posted.\n",
            month.label()
        );
    }

    let mut output = format!(
        "Posted {} recurring expense(s) into {} ({} not due).\n",
        report.posted.len(),
        month.label(),
        report.skipped
    );
    for (id, reason) in &report.failed {
        output.push_str(&format!("  Failed {}: {}\n", id.short(), reason));
    }
    output
}
