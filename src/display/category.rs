//! Category display formatting
//!
//! Plain category lists and the per-category allocation view.

use tabled::Tabled;

use super::{money, render};
use crate::models::{Category, CategoryWithAllocation, Currency, Money};

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Icon")]
    icon: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format categories as a table
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'pennywise init' to create default categories.\n"
            .to_string();
    }

    let rows = categories
        .iter()
        .map(|c| CategoryRow {
            name: if c.is_default {
                format!("{} (default)", c.name)
            } else {
                c.name.clone()
            },
            icon: c.icon.to_string(),
            color: c.color.to_string(),
            id: c.id.short(),
        })
        .collect();

    render(rows)
}

#[derive(Tabled)]
struct AllocationRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Allocated")]
    allocated: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Txns")]
    count: usize,
    #[tabled(rename = "")]
    status: &'static str,
}

/// Format the per-category allocation view with a totals row
pub fn format_allocation_table(views: &[CategoryWithAllocation], currency: Currency) -> String {
    if views.is_empty() {
        return "Nothing allocated yet.\n\nRun 'pennywise allocate set <category>=<amount>'.\n"
            .to_string();
    }

    let mut rows: Vec<AllocationRow> = views
        .iter()
        .map(|v| AllocationRow {
            name: v.category.name.clone(),
            allocated: money(v.allocated, currency),
            spent: money(v.spent, currency),
            remaining: money(v.remaining, currency),
            count: v.transaction_count,
            status: if v.is_overspent() { "⚠" } else { "" },
        })
        .collect();

    let allocated: Money = views.iter().map(|v| v.allocated).sum();
    let spent: Money = views.iter().map(|v| v.spent).sum();
    rows.push(AllocationRow {
        name: "TOTAL".to_string(),
        allocated: money(allocated, currency),
        spent: money(spent, currency),
        remaining: money(allocated - spent, currency),
        count: views.iter().map(|v| v.transaction_count).sum(),
        status: "",
    });

    render(rows)
}
