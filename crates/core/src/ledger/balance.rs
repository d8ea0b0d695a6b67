//! Expected balance replay for reconciliation.

use racha_shared::types::{AccountId, Money};

use crate::model::{Transaction, TransactionKind};

/// Replays a transaction history against an initial balance.
///
/// Income adds, expenses subtract, transfers subtract from the source and
/// add to the destination. Mirrors and transactions paid by someone else
/// are skipped, matching the integrity-audit exemptions.
///
/// The result is a reconciliation signal: drift versus the stored
/// `Account::balance` is reported, never auto-corrected.
#[must_use]
pub fn expected_balance(
    account_id: AccountId,
    transactions: &[Transaction],
    initial_balance: Money,
) -> Money {
    let mut balance = initial_balance;

    for txn in transactions {
        if txn.is_mirror() || txn.is_paid_by_other() {
            continue;
        }

        match txn.kind {
            TransactionKind::Income { account_id: Some(id) } if id == account_id => {
                balance += txn.amount;
            }
            TransactionKind::Expense { account_id: Some(id) } if id == account_id => {
                balance -= txn.amount;
            }
            TransactionKind::Transfer {
                account_id: source,
                destination_account_id,
            } => {
                if source == account_id {
                    balance -= txn.amount;
                }
                if destination_account_id == Some(account_id) {
                    balance += txn.amount;
                }
            }
            _ => {}
        }
    }

    balance
}
