//! Transaction display formatting
//!
//! Formats one page of an account's transactions as a register.

use crate::models::Transaction;
use crate::services::Page;

const NAME_WIDTH: usize = 24;

/// Format a single transaction for display (register row)
pub fn format_transaction_row(txn: &Transaction, symbol: &str) -> String {
    format!(
        "{} {:<7} {} {:>12}",
        txn.movement.created_at.format("%Y-%m-%d"),
        txn.kind.to_string(),
        truncate(txn.name(), NAME_WIDTH),
        txn.amount().format_with_symbol(symbol)
    )
}

/// Format a page of an account's transactions, newest first
pub fn format_transaction_page(
    account_name: &str,
    page: &Page<Transaction>,
    symbol: &str,
) -> String {
    let mut output = format!(
        "{} transactions (page {} of {}, {} total)\n",
        account_name,
        page.page,
        page.total_pages(),
        page.total
    );

    if page.items.is_empty() {
        output.push_str("No transactions found.\n");
        return output;
    }

    output.push_str(&format!(
        "{:10} {:<7} {:<name_width$} {:>12}\n",
        "Date",
        "Kind",
        "Name",
        "Amount",
        name_width = NAME_WIDTH,
    ));
    output.push_str(&"-".repeat(10 + 1 + 7 + 1 + NAME_WIDTH + 1 + 12));
    output.push('\n');

    for txn in &page.items {
        output.push_str(&format_transaction_row(txn, symbol));
        output.push('\n');
    }

    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
