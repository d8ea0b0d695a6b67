//! Derived ledger entry types.
//!
//! Ledger entries are derived from the transaction history on demand and
//! never persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use racha_shared::types::Money;

/// One derived debit/credit pair.
///
/// Every qualifying transaction yields exactly one entry; the same amount
/// lands in both the debit and credit buckets named here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Transaction date.
    pub date: NaiveDate,
    /// Transaction description.
    pub description: String,
    /// Name of the debited account or category.
    pub debit_account: String,
    /// Name of the credited account or category.
    pub credit_account: String,
    /// Entry amount.
    pub amount: Money,
}

/// Accumulated debit/credit totals for one account or category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceItem {
    /// Account or category name.
    pub name: String,
    /// Total debited against this name.
    pub debit: Money,
    /// Total credited against this name.
    pub credit: Money,
    /// `debit - credit`; the sum over all items must be zero.
    pub balance: Money,
}
