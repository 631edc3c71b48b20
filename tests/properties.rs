//! Properties that hold for every sequence of commands

use ledger_engine::models::{
    AccountId, AccountType, BudgetExpenseId, BudgetId, CategoryId, Money, MoneyMovement,
    NewAccount, NewBudget, NewBudgetExpense, NewCategory, NewTransaction, TransactionId,
    TransactionKind,
};
use ledger_engine::{Ledger, LedgerResult};
use proptest::prelude::*;

/// Ids are small so that commands hit live, deleted and never-created records
#[derive(Debug, Clone)]
enum Op {
    CreateAccount(bool),
    DeleteAccount(u64),
    CreateCategory(u64),
    DeleteCategory(u64),
    CreateTransaction(u64, u64, i64),
    DeleteTransaction(u64),
    CreateBudget(i64),
    DeleteBudget(u64),
    AddExpense(u64, i64),
    RemoveExpense(u64),
}

fn id_strategy() -> impl Strategy<Value = u64> {
    1u64..8
}

/// Mostly everyday amounts, with some near the top of the range so that
/// rollup overflow is exercised
fn cents_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![
        1 => -500i64..=0,
        6 => 1i64..50_000,
        1 => (i64::MAX / 4)..=i64::MAX,
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(Op::CreateAccount),
        id_strategy().prop_map(Op::DeleteAccount),
        id_strategy().prop_map(Op::CreateCategory),
        id_strategy().prop_map(Op::DeleteCategory),
        (id_strategy(), id_strategy(), cents_strategy())
            .prop_map(|(a, c, cents)| Op::CreateTransaction(a, c, cents)),
        id_strategy().prop_map(Op::DeleteTransaction),
        cents_strategy().prop_map(Op::CreateBudget),
        id_strategy().prop_map(Op::DeleteBudget),
        (id_strategy(), cents_strategy()).prop_map(|(b, cents)| Op::AddExpense(b, cents)),
        id_strategy().prop_map(Op::RemoveExpense),
    ]
}

/// Apply one op, returning the raw id of a created record
fn apply(ledger: &Ledger, op: &Op) -> LedgerResult<Option<u64>> {
    let created = match op {
        Op::CreateAccount(business) => {
            let account_type = if *business {
                AccountType::Business
            } else {
                AccountType::Personal
            };
            Some(ledger.create_account(NewAccount::new("Account", account_type))?.raw())
        }
        Op::DeleteAccount(id) => {
            ledger.delete_account(AccountId::from_raw(*id))?;
            None
        }
        Op::CreateCategory(account) => Some(
            ledger
                .create_category(NewCategory::new("Category", AccountId::from_raw(*account)))?
                .raw(),
        ),
        Op::DeleteCategory(id) => {
            ledger.delete_category(CategoryId::from_raw(*id))?;
            None
        }
        Op::CreateTransaction(account, category, cents) => Some(
            ledger
                .create_transaction(NewTransaction::new(
                    TransactionKind::Expense,
                    AccountId::from_raw(*account),
                    CategoryId::from_raw(*category),
                    MoneyMovement::new("Purchase", Money::from_cents(*cents)),
                ))?
                .raw(),
        ),
        Op::DeleteTransaction(id) => {
            ledger.delete_transaction(TransactionId::from_raw(*id))?;
            None
        }
        Op::CreateBudget(cents) => Some(
            ledger
                .create_budget(NewBudget::new(
                    "Budget",
                    Money::from_cents(*cents),
                    AccountType::Personal,
                ))?
                .raw(),
        ),
        Op::DeleteBudget(id) => {
            ledger.delete_budget(BudgetId::from_raw(*id))?;
            None
        }
        Op::AddExpense(budget, cents) => Some(
            ledger
                .create_budget_expense(NewBudgetExpense::new(
                    BudgetId::from_raw(*budget),
                    MoneyMovement::new("Item", Money::from_cents(*cents)),
                ))?
                .raw(),
        ),
        Op::RemoveExpense(id) => {
            ledger.delete_budget_expense(BudgetExpenseId::from_raw(*id))?;
            None
        }
    };
    Ok(created)
}

fn kind_index(op: &Op) -> usize {
    match op {
        Op::CreateAccount(_) | Op::DeleteAccount(_) => 0,
        Op::CreateCategory(_) | Op::DeleteCategory(_) => 1,
        Op::CreateTransaction(..) | Op::DeleteTransaction(_) => 2,
        Op::CreateBudget(_) | Op::DeleteBudget(_) => 3,
        Op::AddExpense(..) | Op::RemoveExpense(_) => 4,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every reachable state passes the full consistency check
    #[test]
    fn prop_command_sequences_stay_consistent(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let ledger = Ledger::new();

        for op in &ops {
            let _ = apply(&ledger, op);
            let issues = ledger.verify().unwrap();
            prop_assert!(issues.is_empty(), "after {:?}: {:?}", op, issues);
        }
    }

    /// A rejected command changes nothing
    #[test]
    fn prop_rejections_leave_no_trace(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let ledger = Ledger::new();

        for op in &ops {
            let before = ledger.snapshot().unwrap();
            if apply(&ledger, op).is_err() {
                let after = ledger.snapshot().unwrap();
                prop_assert_eq!(before.record_count(), after.record_count());
                for budget in before.budgets.iter() {
                    let now = after.budgets.get(budget.id).unwrap();
                    prop_assert_eq!(now.total_spend, budget.total_spend);
                    prop_assert_eq!(now.total_items, budget.total_items);
                }
            }
        }
    }

    /// Ids are assigned in increasing order and never handed out twice
    #[test]
    fn prop_ids_never_reused(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let ledger = Ledger::new();
        let mut last = [0u64; 5];

        for op in &ops {
            if let Ok(Some(raw)) = apply(&ledger, op) {
                let slot = &mut last[kind_index(op)];
                prop_assert!(raw > *slot, "{:?} reused id {}", op, raw);
                *slot = raw;
            }
        }
    }

    /// Progress is always a finite percentage between 0 and 100
    #[test]
    fn prop_progress_is_bounded(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let ledger = Ledger::new();
        for op in &ops {
            let _ = apply(&ledger, op);
        }

        for budget in ledger.budgets().unwrap() {
            let progress = ledger.budget_progress(budget.id).unwrap();
            prop_assert!(progress.percent.is_finite());
            prop_assert!((0.0..=100.0).contains(&progress.percent));
            prop_assert!(!progress.remaining.is_negative());
        }
    }

    /// Deleting a budget removes exactly its own expenses
    #[test]
    fn prop_budget_delete_cascades(
        amounts in prop::collection::vec(1i64..10_000, 0..20),
        other in prop::collection::vec(1i64..10_000, 0..5),
    ) {
        let ledger = Ledger::new();
        let target = ledger
            .create_budget(NewBudget::new("Target", Money::from_units(100), AccountType::Personal))
            .unwrap();
        let kept = ledger
            .create_budget(NewBudget::new("Kept", Money::from_units(100), AccountType::Business))
            .unwrap();

        for cents in &amounts {
            ledger
                .create_budget_expense(NewBudgetExpense::new(
                    target,
                    MoneyMovement::new("Item", Money::from_cents(*cents)),
                ))
                .unwrap();
        }
        for cents in &other {
            ledger
                .create_budget_expense(NewBudgetExpense::new(
                    kept,
                    MoneyMovement::new("Item", Money::from_cents(*cents)),
                ))
                .unwrap();
        }

        ledger.delete_budget(target).unwrap();

        let store = ledger.snapshot().unwrap();
        prop_assert_eq!(store.budget_expenses.len(), other.len());
        prop_assert!(store.budget_expenses.iter().all(|e| e.budget_id == kept));
        let kept = ledger.budget(kept).unwrap();
        prop_assert_eq!(kept.total_spend.cents(), other.iter().sum::<i64>());
    }
}
