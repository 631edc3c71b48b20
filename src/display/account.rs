//! Account display formatting
//!
//! Formats account summaries for terminal output.

use crate::models::Money;
use crate::services::AccountSummary;

/// Format account summaries as a table with a totals row
pub fn format_account_table(summaries: &[AccountSummary], symbol: &str) -> String {
    if summaries.is_empty() {
        return "No accounts.\n".to_string();
    }

    let name_width = summaries
        .iter()
        .map(|s| s.account.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<8}  {:>5}  {:>5}  {:>12}  {:>12}  {:>12}\n",
        "Account",
        "Type",
        "Cats",
        "Txns",
        "Income",
        "Expenses",
        "Net",
        name_width = name_width,
    ));
    output.push_str(&separator(name_width));

    for summary in summaries {
        output.push_str(&format!(
            "{:<name_width$}  {:<8}  {:>5}  {:>5}  {:>12}  {:>12}  {:>12}\n",
            summary.account.name,
            summary.account.account_type.to_string(),
            summary.category_count,
            summary.transaction_count,
            summary.income_total.format_with_symbol(symbol),
            summary.expense_total.format_with_symbol(symbol),
            summary.net.format_with_symbol(symbol),
            name_width = name_width,
        ));
    }

    let income: Money = summaries.iter().map(|s| s.income_total).sum();
    let expenses: Money = summaries.iter().map(|s| s.expense_total).sum();
    let net: Money = summaries.iter().map(|s| s.net).sum();

    output.push_str(&separator(name_width));
    output.push_str(&format!(
        "{:<name_width$}  {:<8}  {:>5}  {:>5}  {:>12}  {:>12}  {:>12}\n",
        "TOTAL",
        "",
        "",
        "",
        income.format_with_symbol(symbol),
        expenses.format_with_symbol(symbol),
        net.format_with_symbol(symbol),
        name_width = name_width,
    ));

    output
}

fn separator(name_width: usize) -> String {
    format!(
        "{:-<name_width$}  {:-<8}  {:->5}  {:->5}  {:->12}  {:->12}  {:->12}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, AccountType, NewAccount};

    fn summary(name: &str, income: i64, expenses: i64) -> AccountSummary {
        AccountSummary {
            account: NewAccount::new(name, AccountType::Business).into_account(AccountId::from_raw(1)),
            income_total: Money::from_cents(income),
            expense_total: Money::from_cents(expenses),
            net: Money::from_cents(income - expenses),
            category_count: 2,
            transaction_count: 3,
        }
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(format_account_table(&[], "$"), "No accounts.\n");
    }

    #[test]
    fn test_rows_and_totals() {
        let table = format_account_table(
            &[summary("Studio", 300000, 10000), summary("Shop", 0, 2500)],
            "$",
        );

        assert!(table.contains("Studio"));
        assert!(table.contains("Business"));
        assert!(table.contains("$2900.00"));
        assert!(table.contains("-$25.00"));

        let total = table.lines().last().unwrap();
        assert!(total.starts_with("TOTAL"));
        assert!(total.contains("$2875.00"));
    }
}
