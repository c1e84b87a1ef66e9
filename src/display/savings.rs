//! Savings goal display formatting

use tabled::Tabled;

use super::{money, render};
use crate::models::{Currency, SavingsGoal};

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "Goal")]
    name: String,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "By")]
    target_date: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format savings goals as a table
pub fn format_goal_list(goals: &[SavingsGoal], currency: Currency) -> String {
    if goals.is_empty() {
        return "No savings goals.\n".to_string();
    }

    let rows = goals
        .iter()
        .map(|g| GoalRow {
            name: g.name.clone(),
            saved: money(g.current_amount, currency),
            target: money(g.target_amount, currency),
            progress: if g.is_reached() {
                format!("{}% ✓", g.progress_percent())
            } else {
                format!("{}%", g.progress_percent())
            },
            target_date: g
                .target_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            id: g.id.short(),
        })
        .collect();

    render(rows)
}
