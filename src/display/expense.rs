//! Expense display formatting

use std::collections::HashMap;

use tabled::Tabled;

use super::{money, render};
use crate::models::{Category, CategoryId, Currency, Expense, Money};

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format expenses as a table with a total line
///
/// Expenses whose category no longer exists show as "(deleted)".
pub fn format_expense_list(
    expenses: &[Expense],
    categories: &[Category],
    currency: Currency,
) -> String {
    if expenses.is_empty() {
        return "No expenses recorded.\n".to_string();
    }

    let names: HashMap<CategoryId, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let rows = expenses
        .iter()
        .map(|e| ExpenseRow {
            date: e.date.format("%Y-%m-%d").to_string(),
            category: names
                .get(&e.category_id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| "(deleted)".to_string()),
            description: e.description.clone().unwrap_or_default(),
            amount: money(e.amount, currency),
            id: e.id.short(),
        })
        .collect();

    let total: Money = expenses.iter().map(|e| e.amount).sum();
    format!(
        "{}{} expense(s), total {}\n",
        render(rows),
        expenses.len(),
        money(total, currency)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetId, Color, Icon};

    #[test]
    fn test_expense_list() {
        let food = Category::new("Food", Icon::Utensils, Color::Orange);
        let budget = BudgetId::new();
        let expenses = vec![
            Expense::new(budget, food.id, Money::from(12)).with_description("Lunch"),
            Expense::new(budget, CategoryId::new(), Money::from(3)),
        ];

        let output = format_expense_list(&expenses, &[food], Currency::Usd);
        assert!(output.contains("Lunch"));
        assert!(output.contains("(deleted)"));
        assert!(output.contains("2 expense(s), total $15.00"));
    }

    #[test]
    fn test_empty() {
        assert_eq!(
            format_expense_list(&[], &[], Currency::Usd),
            "No expenses recorded.\n"
        );
    }
}
