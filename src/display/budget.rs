//! Budget display formatting
//!
//! Shows each budget's limit, spend, remaining amount and progress tier.

use crate::models::Budget;
use crate::services::BudgetProgress;

/// Format budgets with their progress as a table
///
/// `progress` holds one entry per budget, or `None` when progress could not
/// be computed (a zero limit); those rows show `n/a`.
pub fn format_budget_table(rows: &[(Budget, Option<BudgetProgress>)], symbol: &str) -> String {
    if rows.is_empty() {
        return "No budgets.\n".to_string();
    }

    let name_width = rows
        .iter()
        .map(|(b, _)| b.name.chars().count())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<8}  {:>12}  {:>12}  {:>12}  {:>5}  {:>7}  {}\n",
        "Budget",
        "Type",
        "Limit",
        "Spent",
        "Remaining",
        "Items",
        "Used",
        "Tier",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<8}  {:->12}  {:->12}  {:->12}  {:->5}  {:->7}  {:-<8}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for (budget, progress) in rows {
        let (used, tier) = match progress {
            Some(p) => (format!("{:.1}%", p.percent), p.tier.to_string()),
            None => ("n/a".to_string(), "n/a".to_string()),
        };

        output.push_str(&format!(
            "{:<name_width$}  {:<8}  {:>12}  {:>12}  {:>12}  {:>5}  {:>7}  {}\n",
            budget.name,
            budget.account_type.to_string(),
            budget.amount.format_with_symbol(symbol),
            budget.total_spend.format_with_symbol(symbol),
            budget.remaining().format_with_symbol(symbol),
            budget.total_items,
            used,
            tier,
            name_width = name_width,
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountType, BudgetId, Money, NewBudget};
    use crate::services::query::progress_of;

    fn budget(spent_cents: i64, items: u32) -> Budget {
        let mut budget = NewBudget::new("Groceries", Money::from_units(500), AccountType::Personal)
            .into_budget(BudgetId::from_raw(1));
        budget.total_spend = Money::from_cents(spent_cents);
        budget.total_items = items;
        budget
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(format_budget_table(&[], "$"), "No budgets.\n");
    }

    #[test]
    fn test_progress_row() {
        let budget = budget(55000, 2);
        let progress = progress_of(&budget).ok();
        let table = format_budget_table(&[(budget, progress)], "$");

        let row = table.lines().nth(2).unwrap();
        assert!(row.starts_with("Groceries"));
        assert!(row.contains("$550.00"));
        assert!(row.contains("$0.00"));
        assert!(row.contains("100.0%"));
        assert!(row.ends_with("critical"));
    }
}
