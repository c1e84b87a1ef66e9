//! Budget display formatting

use tabled::Tabled;

use super::{money, render};
use crate::models::{Budget, BudgetSummary, Currency, IncomeEntry};

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Rollover")]
    rollover: String,
    #[tabled(rename = "Available")]
    available: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format budgets as a table, one row per month
pub fn format_budget_list(budgets: &[Budget], currency: Currency) -> String {
    if budgets.is_empty() {
        return "No budgets yet.\n\nRun 'pennywise budget create <income>' to start this month.\n"
            .to_string();
    }

    let rows = budgets
        .iter()
        .map(|b| BudgetRow {
            month: b.month.label(),
            income: money(b.monthly_income, currency),
            rollover: money(b.rollover(), currency),
            available: money(b.total_available(), currency),
            id: b.id.short(),
        })
        .collect();

    render(rows)
}

/// Format the headline figures of a budget
pub fn format_budget_summary(summary: &BudgetSummary, currency: Currency) -> String {
    let mut output = String::new();

    output.push_str(&format!("Budget: {}\n", summary.month.label()));
    output.push_str(&format!("{}\n", "=".repeat(40)));
    output.push_str(&format!(
        "  Income:        {:>14}\n",
        money(summary.monthly_income, currency)
    ));
    output.push_str(&format!(
        "  Rollover:      {:>14}\n",
        money(summary.rollover, currency)
    ));
    output.push_str(&format!(
        "  Available:     {:>14}\n",
        money(summary.monthly_budget, currency)
    ));
    output.push_str(&format!(
        "  Allocated:     {:>14}\n",
        money(summary.total_allocated, currency)
    ));
    output.push_str(&format!(
        "  Spent:         {:>14}\n",
        money(summary.total_spent, currency)
    ));
    output.push_str(&format!(
        "  Unallocated:   {:>14}\n",
        money(summary.unallocated_amount, currency)
    ));
    if summary.remaining_budget.is_negative() {
        output.push_str(&format!(
            "  Over-allocated by {}\n",
            money(-summary.remaining_budget, currency)
        ));
    }
    output.push_str(&format!("  Categories:    {:>14}\n", summary.category_count));
    output.push_str(&format!("  Days left:     {:>14}\n", summary.days_left));

    output
}

#[derive(Tabled)]
struct IncomeRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Note")]
    note: String,
}

/// Format income entries as a table
pub fn format_income_list(entries: &[IncomeEntry], currency: Currency) -> String {
    if entries.is_empty() {
        return "No income added this month.\n".to_string();
    }

    let rows = entries
        .iter()
        .map(|e| IncomeRow {
            date: e.date.format("%Y-%m-%d").to_string(),
            amount: money(e.amount, currency),
            note: e.note.clone().unwrap_or_default(),
        })
        .collect();

    render(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetId, BudgetMonth, Money};

    #[test]
    fn test_summary_block() {
        let summary = BudgetSummary {
            budget_id: BudgetId::new(),
            month: BudgetMonth::parse("2025-02").unwrap(),
            monthly_income: Money::from(1000),
            rollover: Money::from(400),
            monthly_budget: Money::from(1400),
            total_allocated: Money::from(1500),
            total_spent: Money::from(50),
            remaining_budget: Money::from(-100),
            unallocated_amount: Money::zero(),
            days_left: 3,
            category_count: 2,
        };

        let output = format_budget_summary(&summary, Currency::Usd);
        assert!(output.contains("$1400.00"));
        assert!(output.contains("Over-allocated by $100.00"));
        assert!(output.contains(&summary.month.label()));
    }

    #[test]
    fn test_empty_lists() {
        assert!(format_budget_list(&[], Currency::Usd).contains("No budgets yet"));
        assert!(format_income_list(&[], Currency::Usd).contains("No income"));
    }

    #[test]
    fn test_budget_table_has_row_per_budget() {
        let budgets = vec![
            Budget::new(BudgetMonth::parse("2025-01").unwrap(), Money::from(10)),
            Budget::new(BudgetMonth::parse("2025-02").unwrap(), Money::from(20)),
        ];
        let output = format_budget_list(&budgets, Currency::Gbp);
        assert!(output.contains("£10.00"));
        assert!(output.contains("£20.00"));
        assert!(output.contains("Month"));
    }
}
