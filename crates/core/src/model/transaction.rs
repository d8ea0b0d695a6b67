//! Transaction record with a tagged kind.
//!
//! The kind enum carries only the fields its variant needs: a transfer is
//! the only transaction with a destination account, so only the transfer
//! variant has one. This is enforced at construction time instead of being
//! checked ad hoc downstream.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use racha_shared::types::{AccountId, CategoryId, Money, TransactionId, UserId};

/// Discriminated transaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Money going out. `account_id` is `None` for shared-only records
    /// (e.g. mirrors) that are not tied to a balance-carrying account.
    Expense {
        /// Account the expense was paid from, when any.
        account_id: Option<AccountId>,
    },
    /// Money coming in.
    Income {
        /// Account receiving the amount, when any.
        account_id: Option<AccountId>,
    },
    /// Movement between accounts. `destination_account_id` is `None` for
    /// transfers out to an external account.
    Transfer {
        /// Source account.
        account_id: AccountId,
        /// Destination account; `None` means external.
        destination_account_id: Option<AccountId>,
    },
}

/// A financial event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// The user whose ledger this transaction belongs to.
    pub owner_id: UserId,
    /// Transaction amount (always positive for well-formed records).
    pub amount: Money,
    /// Human-readable description.
    pub description: String,
    /// Transaction date.
    pub date: NaiveDate,
    /// Optional category.
    pub category_id: Option<CategoryId>,
    /// Whether this transaction is shared (has splits).
    pub is_shared: bool,
    /// Who fronted the money, when not the owner.
    pub payer_id: Option<UserId>,
    /// For a mirror: the shared source transaction it derives from.
    /// Mirrors are owned by the mirroring process and never edited directly.
    pub source_transaction_id: Option<TransactionId>,
    /// Discriminated kind with kind-specific account references.
    pub kind: TransactionKind,
}

impl Transaction {
    /// Returns true if this transaction is a mirror of a shared source.
    #[must_use]
    pub const fn is_mirror(&self) -> bool {
        self.source_transaction_id.is_some()
    }

    /// Returns true if someone other than the owner fronted the money.
    ///
    /// Such transactions carry no direct account reference on the owner's
    /// side and are exempt from orphan checks.
    #[must_use]
    pub fn is_paid_by_other(&self) -> bool {
        self.payer_id.is_some_and(|payer| payer != self.owner_id)
    }

    /// Primary account reference (source account for transfers).
    #[must_use]
    pub const fn account_id(&self) -> Option<AccountId> {
        match self.kind {
            TransactionKind::Expense { account_id } | TransactionKind::Income { account_id } => {
                account_id
            }
            TransactionKind::Transfer { account_id, .. } => Some(account_id),
        }
    }

    /// Destination account reference; only transfers have one.
    #[must_use]
    pub const fn destination_account_id(&self) -> Option<AccountId> {
        match self.kind {
            TransactionKind::Transfer {
                destination_account_id,
                ..
            } => destination_account_id,
            TransactionKind::Expense { .. } | TransactionKind::Income { .. } => None,
        }
    }
}
