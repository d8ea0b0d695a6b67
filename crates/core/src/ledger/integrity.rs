//! Ledger integrity verification.
//!
//! Problems found here are reported, never raised: the result carries an
//! orphan list for a maintenance tool to act on asynchronously.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use racha_shared::types::{AccountId, Money, TransactionId};

use super::service::LedgerService;
use crate::ledger::entry::LedgerEntry;
use crate::model::{Account, Transaction};

/// A transaction referencing an account that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanedTransaction {
    /// The offending transaction.
    pub transaction_id: TransactionId,
    /// Its description, for human-readable reports.
    pub description: String,
    /// What is broken about it.
    pub error: String,
}

/// Outcome of an integrity audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityResult {
    /// Sum of all entry amounts on the debit side.
    pub total_debits: Money,
    /// Sum of all entry amounts on the credit side.
    pub total_credits: Money,
    /// Sum of every trial-balance item's `debit - credit`.
    pub trial_balance_sum: Money,
    /// Whether `trial_balance_sum` is within one minor unit of zero.
    pub is_balanced: bool,
    /// Transactions with dangling account references.
    pub orphaned_transactions: Vec<OrphanedTransaction>,
}

/// Audits generated entries and raw transactions for corruption.
///
/// Because each entry contributes the same amount to one debit bucket and
/// one credit bucket, `total_debits == total_credits` holds by
/// construction; those fields are kept for report parity. The check that
/// can actually fail is `trial_balance_sum`: a nonzero sum signals a bug
/// in entry generation.
///
/// Separately, raw transactions are scanned for dangling account
/// references. Mirrors and transactions paid by someone else are exempt:
/// they are not expected to carry a direct account reference.
#[must_use]
pub fn verify_integrity(
    entries: &[LedgerEntry],
    transactions: &[Transaction],
    accounts: &[Account],
) -> IntegrityResult {
    let total = Money::sum(entries.iter().map(|e| e.amount));

    let trial_balance_sum = Money::sum(
        LedgerService::trial_balance(entries)
            .iter()
            .map(|item| item.balance),
    );

    let known: HashSet<AccountId> = accounts.iter().map(|a| a.id).collect();
    let mut orphaned_transactions = Vec::new();

    for txn in transactions {
        if txn.is_mirror() || txn.is_paid_by_other() {
            continue;
        }

        if let Some(account_id) = txn.account_id()
            && !known.contains(&account_id)
        {
            orphaned_transactions.push(OrphanedTransaction {
                transaction_id: txn.id,
                description: txn.description.clone(),
                error: format!("references missing account {account_id}"),
            });
        }

        if let Some(destination_id) = txn.destination_account_id()
            && !known.contains(&destination_id)
        {
            orphaned_transactions.push(OrphanedTransaction {
                transaction_id: txn.id,
                description: txn.description.clone(),
                error: format!("transfer references missing destination account {destination_id}"),
            });
        }
    }

    IntegrityResult {
        total_debits: total,
        total_credits: total,
        trial_balance_sum,
        is_balanced: trial_balance_sum.approx_eq(Money::ZERO),
        orphaned_transactions,
    }
}
