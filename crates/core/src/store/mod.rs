//! Persistent-store boundary.
//!
//! The core never talks to a database directly; it calls this trait. The
//! embedding application provides an implementation backed by its managed
//! store. [`MemoryStore`] is a complete in-process implementation used by
//! tests and embeddable callers.
//!
//! The store offers no multi-statement transactions. Multi-step write
//! sequences in the services are ordered so the least damaging step runs
//! first, with explicit compensating actions for the rest.

pub mod error;
pub mod memory;
pub mod outbox;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use racha_shared::types::{AccountId, Money, OutboxId, SplitId, TransactionId};

use crate::model::{Account, Split, Transaction};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use outbox::{DrainReport, OutboxAction, OutboxEntry, OutboxProcessor};

/// Typed operations over the three collections backing the core
/// (`transactions`, `transaction_splits`, `accounts`) plus the outbox.
///
/// Reads of single records return [`StoreError::NotFound`] for missing ids;
/// list reads return empty vectors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    // ========== transactions ==========

    /// Reads one transaction.
    async fn transaction(&self, id: TransactionId) -> Result<Transaction, StoreError>;

    /// Reads all mirrors of a source transaction.
    async fn transactions_by_source(
        &self,
        source_id: TransactionId,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// Inserts a transaction, returning the stored record.
    async fn insert_transaction(
        &self,
        transaction: Transaction,
    ) -> Result<Transaction, StoreError>;

    /// Inserts several transactions, returning the stored records.
    async fn insert_transactions(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// Replaces a stored transaction.
    async fn update_transaction(&self, transaction: Transaction) -> Result<(), StoreError>;

    /// Deletes a transaction. Deleting a missing id is not an error.
    async fn delete_transaction(&self, id: TransactionId) -> Result<(), StoreError>;

    // ========== splits ==========

    /// Reads one split.
    async fn split(&self, id: SplitId) -> Result<Split, StoreError>;

    /// Reads all splits of a transaction.
    async fn splits_for_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Vec<Split>, StoreError>;

    /// Inserts splits created with their parent transaction.
    async fn insert_splits(&self, splits: Vec<Split>) -> Result<Vec<Split>, StoreError>;

    /// Conditionally marks a split settled, only if it is currently
    /// unsettled (`update .. where is_settled = false`).
    ///
    /// Returns `Ok(true)` when the split was claimed, `Ok(false)` when the
    /// conditional update matched zero rows because the split was already
    /// settled. This is the store-level guard against double settlement.
    async fn mark_split_settled(
        &self,
        id: SplitId,
        settled_transaction_id: TransactionId,
        settled_at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Resets a split's settlement linkage to the unsettled state.
    /// Idempotent: clearing an already-unsettled split succeeds.
    async fn clear_split_settlement(&self, id: SplitId) -> Result<(), StoreError>;

    /// Deletes all splits of a transaction.
    async fn delete_splits_for_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<(), StoreError>;

    // ========== accounts ==========

    /// Reads one account.
    async fn account(&self, id: AccountId) -> Result<Account, StoreError>;

    /// Adjusts an account balance by a signed delta as a read-modify-write
    /// on the stored value, never on a cached one.
    async fn adjust_account_balance(
        &self,
        id: AccountId,
        delta: Money,
    ) -> Result<(), StoreError>;

    // ========== outbox ==========

    /// Persists an outbox entry for the maintenance sweep.
    async fn enqueue_outbox(&self, entry: OutboxEntry) -> Result<(), StoreError>;

    /// Reads all pending outbox entries, oldest first.
    async fn pending_outbox(&self) -> Result<Vec<OutboxEntry>, StoreError>;

    /// Removes a completed outbox entry.
    async fn complete_outbox(&self, id: OutboxId) -> Result<(), StoreError>;

    /// Increments the attempt counter of a failed outbox entry.
    async fn record_outbox_attempt(&self, id: OutboxId) -> Result<(), StoreError>;
}
