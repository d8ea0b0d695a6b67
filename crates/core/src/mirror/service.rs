//! Mirror creation, synchronization, and cascade deletion.

use std::sync::Arc;

use tracing::info;

use racha_shared::types::TransactionId;

use crate::model::{Split, Transaction, TransactionKind};
use crate::store::{Store, StoreError};

use super::error::MirrorError;

/// Keeps each non-payer member's personal view of a shared expense in
/// lockstep with the source transaction.
///
/// A mirror is an EXPENSE record owned by the member, carrying that
/// member's split amount and the source's date, description, and
/// category. `source_transaction_id` links it back; it carries no account
/// so it never moves a balance. The payer's own share stays implicit in
/// the source transaction and gets no mirror.
pub struct MirrorSync {
    store: Arc<dyn Store>,
}

impl MirrorSync {
    /// Creates a synchronizer over a store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates one mirror per non-payer split holder of a freshly shared
    /// transaction.
    ///
    /// # Errors
    ///
    /// `MirrorOfMirror` when the source is itself a mirror; store errors
    /// are wrapped.
    pub async fn create_mirrors(
        &self,
        source: &Transaction,
        splits: &[Split],
    ) -> Result<Vec<Transaction>, MirrorError> {
        if source.is_mirror() {
            return Err(MirrorError::MirrorOfMirror(source.id));
        }

        let payer = source.payer_id.unwrap_or(source.owner_id);
        let mirrors: Vec<Transaction> = splits
            .iter()
            .filter(|split| split.member_id != payer)
            .map(|split| Self::mirror_for(source, split))
            .collect();

        if mirrors.is_empty() {
            return Ok(Vec::new());
        }

        let stored = self.store.insert_transactions(mirrors).await?;
        info!(
            source_id = %source.id,
            mirrors = stored.len(),
            "Mirrors created for shared transaction"
        );
        Ok(stored)
    }

    /// Brings existing mirrors back in lockstep with an edited source:
    /// patches amount/date/description/category per member, creates
    /// mirrors for members added to the splits, deletes mirrors for
    /// members no longer in them.
    ///
    /// # Errors
    ///
    /// `MirrorOfMirror` when the source is itself a mirror; store errors
    /// are wrapped.
    pub async fn sync_mirrors(
        &self,
        source: &Transaction,
        splits: &[Split],
    ) -> Result<(), MirrorError> {
        if source.is_mirror() {
            return Err(MirrorError::MirrorOfMirror(source.id));
        }

        let payer = source.payer_id.unwrap_or(source.owner_id);
        let existing = self.store.transactions_by_source(source.id).await?;

        let mut patched = 0usize;
        let mut created = 0usize;
        let mut deleted = 0usize;

        for split in splits.iter().filter(|split| split.member_id != payer) {
            match existing.iter().find(|m| m.owner_id == split.member_id) {
                Some(mirror) => {
                    let mut updated = mirror.clone();
                    updated.amount = split.amount;
                    updated.date = source.date;
                    updated.description = source.description.clone();
                    updated.category_id = source.category_id;
                    updated.payer_id = Some(payer);
                    if updated != *mirror {
                        self.store.update_transaction(updated).await?;
                        patched += 1;
                    }
                }
                None => {
                    self.store
                        .insert_transaction(Self::mirror_for(source, split))
                        .await?;
                    created += 1;
                }
            }
        }

        for mirror in &existing {
            let still_member = splits
                .iter()
                .any(|split| split.member_id != payer && split.member_id == mirror.owner_id);
            if !still_member {
                self.store.delete_transaction(mirror.id).await?;
                deleted += 1;
            }
        }

        info!(
            source_id = %source.id,
            patched, created, deleted,
            "Mirrors synchronized"
        );
        Ok(())
    }

    /// Deletes a shared transaction with its dependents, splits first,
    /// then mirrors, then the source itself. No mirror is ever left
    /// pointing at a deleted source.
    ///
    /// # Errors
    ///
    /// `SourceNotFound` for a missing id, `MirrorReadOnly` when the id
    /// names a mirror; store errors are wrapped.
    pub async fn delete_source(&self, source_id: TransactionId) -> Result<(), MirrorError> {
        let source = match self.store.transaction(source_id).await {
            Ok(txn) => txn,
            Err(StoreError::NotFound) => return Err(MirrorError::SourceNotFound(source_id)),
            Err(err) => return Err(err.into()),
        };
        self.ensure_editable(&source)?;

        self.store.delete_splits_for_transaction(source_id).await?;

        let mirrors = self.store.transactions_by_source(source_id).await?;
        for mirror in &mirrors {
            self.store.delete_transaction(mirror.id).await?;
        }

        self.store.delete_transaction(source_id).await?;

        info!(
            source_id = %source_id,
            mirrors = mirrors.len(),
            "Shared transaction deleted with cascade"
        );
        Ok(())
    }

    /// Rejects direct edits to a mirror. Call before any user-initiated
    /// update or delete of a transaction.
    ///
    /// # Errors
    ///
    /// `MirrorReadOnly` when the transaction is a mirror.
    pub fn ensure_editable(&self, transaction: &Transaction) -> Result<(), MirrorError> {
        if transaction.is_mirror() {
            return Err(MirrorError::MirrorReadOnly(transaction.id));
        }
        Ok(())
    }

    fn mirror_for(source: &Transaction, split: &Split) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            owner_id: split.member_id,
            amount: split.amount,
            description: source.description.clone(),
            date: source.date,
            category_id: source.category_id,
            is_shared: false,
            payer_id: Some(source.payer_id.unwrap_or(source.owner_id)),
            source_transaction_id: Some(source.id),
            kind: TransactionKind::Expense { account_id: None },
        }
    }
}
