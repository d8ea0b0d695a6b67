//! In-memory store implementation.
//!
//! Complete implementation of [`Store`] over process memory. Used by the
//! test suite and by embeddable callers that do not need persistence.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use racha_shared::types::{AccountId, Money, OutboxId, SplitId, TransactionId};

use super::outbox::OutboxEntry;
use super::{Store, StoreError};
use crate::model::{Account, Split, Transaction};

#[derive(Debug, Default)]
struct Inner {
    transactions: HashMap<TransactionId, Transaction>,
    splits: HashMap<SplitId, Split>,
    accounts: HashMap<AccountId, Account>,
    outbox: Vec<OutboxEntry>,
}

/// In-memory [`Store`] implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))
    }

    /// Seeds an account. Accounts are created by the surrounding
    /// application, not by this core, so seeding sits outside the trait.
    pub fn seed_account(&self, account: Account) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.accounts.insert(account.id, account);
        Ok(())
    }

    /// Removes an account, simulating an out-of-band hard delete.
    pub fn remove_account(&self, id: AccountId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.accounts.remove(&id);
        Ok(())
    }

    /// Returns every stored transaction, unordered.
    pub fn all_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.transactions.values().cloned().collect())
    }

    /// Returns every stored split, unordered.
    pub fn all_splits(&self) -> Result<Vec<Split>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.splits.values().cloned().collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn transaction(&self, id: TransactionId) -> Result<Transaction, StoreError> {
        let inner = self.lock()?;
        inner.transactions.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn transactions_by_source(
        &self,
        source_id: TransactionId,
    ) -> Result<Vec<Transaction>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .transactions
            .values()
            .filter(|t| t.source_transaction_id == Some(source_id))
            .cloned()
            .collect())
    }

    async fn insert_transaction(
        &self,
        transaction: Transaction,
    ) -> Result<Transaction, StoreError> {
        let mut inner = self.lock()?;
        inner.transactions.insert(transaction.id, transaction.clone());
        Ok(transaction)
    }

    async fn insert_transactions(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut inner = self.lock()?;
        for transaction in &transactions {
            inner.transactions.insert(transaction.id, transaction.clone());
        }
        Ok(transactions)
    }

    async fn update_transaction(&self, transaction: Transaction) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        match inner.transactions.get_mut(&transaction.id) {
            Some(stored) => {
                *stored = transaction;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete_transaction(&self, id: TransactionId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.transactions.remove(&id);
        Ok(())
    }

    async fn split(&self, id: SplitId) -> Result<Split, StoreError> {
        let inner = self.lock()?;
        inner.splits.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn splits_for_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Vec<Split>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .splits
            .values()
            .filter(|s| s.transaction_id == transaction_id)
            .cloned()
            .collect())
    }

    async fn insert_splits(&self, splits: Vec<Split>) -> Result<Vec<Split>, StoreError> {
        let mut inner = self.lock()?;
        for split in &splits {
            inner.splits.insert(split.id, split.clone());
        }
        Ok(splits)
    }

    async fn mark_split_settled(
        &self,
        id: SplitId,
        settled_transaction_id: TransactionId,
        settled_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        let split = inner.splits.get_mut(&id).ok_or(StoreError::NotFound)?;
        if split.is_settled {
            return Ok(false);
        }
        split.is_settled = true;
        split.settled_at = Some(settled_at);
        split.settled_transaction_id = Some(settled_transaction_id);
        Ok(true)
    }

    async fn clear_split_settlement(&self, id: SplitId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let split = inner.splits.get_mut(&id).ok_or(StoreError::NotFound)?;
        split.is_settled = false;
        split.settled_at = None;
        split.settled_transaction_id = None;
        Ok(())
    }

    async fn delete_splits_for_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.splits.retain(|_, s| s.transaction_id != transaction_id);
        Ok(())
    }

    async fn account(&self, id: AccountId) -> Result<Account, StoreError> {
        let inner = self.lock()?;
        inner.accounts.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn adjust_account_balance(
        &self,
        id: AccountId,
        delta: Money,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let account = inner.accounts.get_mut(&id).ok_or(StoreError::NotFound)?;
        account.balance += delta;
        Ok(())
    }

    async fn enqueue_outbox(&self, entry: OutboxEntry) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.outbox.push(entry);
        Ok(())
    }

    async fn pending_outbox(&self) -> Result<Vec<OutboxEntry>, StoreError> {
        let inner = self.lock()?;
        // OutboxId is uuid-v7, so sorting by id is oldest-first.
        let mut entries = inner.outbox.clone();
        entries.sort_by_key(|e| e.id.into_inner());
        Ok(entries)
    }

    async fn complete_outbox(&self, id: OutboxId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.outbox.retain(|e| e.id != id);
        Ok(())
    }

    async fn record_outbox_attempt(&self, id: OutboxId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        match inner.outbox.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.attempts += 1;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }
}
