//! Settle and unsettle flows.
//!
//! Write ordering in `settle` follows the principle that the least
//! damaging step commits first: the income transaction exists before the
//! split points at it, and the balance moves last. A failure between
//! steps runs the registered compensating actions so no unlinked
//! settlement transaction survives the call. A balance failure after the
//! split is claimed is reported but not rolled back; reconciliation
//! catches the drift.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use racha_shared::config::SettlementConfig;
use racha_shared::types::{AccountId, Money, SplitId, TransactionId};

use crate::model::{Split, Transaction, TransactionKind};
use crate::store::{Store, StoreError};

use super::compensation::{CompensationAction, CompensationLog};
use super::error::SettlementError;
use super::types::{SettleRequest, SettlementResult};

/// State machine for split repayments.
pub struct SettlementService {
    store: Arc<dyn Store>,
    config: SettlementConfig,
}

impl SettlementService {
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_config(store, SettlementConfig::default())
    }

    /// Creates a service with an explicit configuration.
    #[must_use]
    pub fn with_config(store: Arc<dyn Store>, config: SettlementConfig) -> Self {
        Self { store, config }
    }

    /// Settles one split: creates the income transaction, claims the
    /// split, credits the receiving account.
    ///
    /// # Errors
    ///
    /// `AlreadySettled` when the split was paid before or during the call
    /// (the conditional claim catches the race). `SplitNotFound` /
    /// `AccountNotFound` before any write. `Persistence` when a store step
    /// fails with committed steps compensated; `CleanupFailed` when the
    /// compensation itself fails.
    pub async fn settle(
        &self,
        request: SettleRequest,
        receiving_account_id: AccountId,
    ) -> Result<SettlementResult, SettlementError> {
        self.store
            .account(receiving_account_id)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => SettlementError::AccountNotFound(receiving_account_id),
                other => SettlementError::Persistence {
                    step: "read receiving account",
                    source: other,
                },
            })?;

        let split = self.read_split(request.split_id).await?;
        if split.transaction_id != request.transaction_id {
            // The caller named a split under the wrong shared transaction.
            return Err(SettlementError::SplitNotFound(split.id));
        }
        if split.is_settled {
            return Err(SettlementError::AlreadySettled(split.id));
        }

        let settled_at = Utc::now();
        let mut comp = CompensationLog::new();

        let income = self
            .store
            .insert_transaction(Transaction {
                id: TransactionId::new(),
                owner_id: request.receiver_id,
                amount: request.amount,
                description: format!(
                    "Recebimento: {} (de {})",
                    request.original_description, request.payer_display_name
                ),
                date: settled_at.date_naive(),
                category_id: None,
                is_shared: false,
                payer_id: None,
                source_transaction_id: None,
                kind: TransactionKind::Income {
                    account_id: Some(receiving_account_id),
                },
            })
            .await
            .map_err(|err| SettlementError::Persistence {
                step: "create settlement income",
                source: err,
            })?;
        comp.push(CompensationAction::DeleteTransaction(income.id));

        match self
            .store
            .mark_split_settled(split.id, income.id, settled_at)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                // Lost the race to a concurrent settle.
                return Err(self
                    .fail(
                        comp,
                        "mark split settled",
                        SettlementError::AlreadySettled(split.id),
                    )
                    .await);
            }
            Err(err) => {
                return Err(self
                    .fail(
                        comp,
                        "mark split settled",
                        SettlementError::Persistence {
                            step: "mark split settled",
                            source: err,
                        },
                    )
                    .await);
            }
        }

        self.store
            .adjust_account_balance(receiving_account_id, request.amount)
            .await
            .map_err(|err| {
                error!(
                    account_id = %receiving_account_id,
                    split_id = %split.id,
                    error = %err,
                    "Balance credit failed after settlement committed, reconciliation will flag the drift"
                );
                SettlementError::Persistence {
                    step: "credit receiving account",
                    source: err,
                }
            })?;

        info!(
            split_id = %split.id,
            income_transaction_id = %income.id,
            amount = %request.amount,
            "Split settled"
        );

        Ok(SettlementResult {
            settled_split_ids: vec![split.id],
            income_transaction_id: income.id,
            amount: request.amount,
            settled_at,
        })
    }

    /// Settles a batch of splits with one consolidated income transaction.
    ///
    /// All-or-nothing precheck: if any split in the batch is already
    /// settled, the whole batch fails with `PartiallyAlreadySettled` and
    /// nothing is written.
    ///
    /// # Errors
    ///
    /// `EmptyBatch` / `BatchTooLarge` on the item list itself, otherwise
    /// as [`settle`](Self::settle).
    pub async fn settle_multiple(
        &self,
        items: Vec<SettleRequest>,
        receiving_account_id: AccountId,
    ) -> Result<SettlementResult, SettlementError> {
        if items.is_empty() {
            return Err(SettlementError::EmptyBatch);
        }
        if items.len() > self.config.max_batch_size {
            return Err(SettlementError::BatchTooLarge {
                size: items.len(),
                max: self.config.max_batch_size,
            });
        }

        self.store
            .account(receiving_account_id)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => SettlementError::AccountNotFound(receiving_account_id),
                other => SettlementError::Persistence {
                    step: "read receiving account",
                    source: other,
                },
            })?;

        let mut already_settled = Vec::new();
        for item in &items {
            let split = self.read_split(item.split_id).await?;
            if split.transaction_id != item.transaction_id {
                return Err(SettlementError::SplitNotFound(split.id));
            }
            if split.is_settled {
                already_settled.push(split.id);
            }
        }
        if !already_settled.is_empty() {
            return Err(SettlementError::PartiallyAlreadySettled {
                settled: already_settled,
            });
        }

        let total = Money::sum(items.iter().map(|item| item.amount));
        let settled_at = Utc::now();
        let mut comp = CompensationLog::new();

        let income = self
            .store
            .insert_transaction(Transaction {
                id: TransactionId::new(),
                owner_id: items[0].receiver_id,
                amount: total,
                description: format!(
                    "Recebimento consolidado de {} ({} itens)",
                    items[0].payer_display_name,
                    items.len()
                ),
                date: settled_at.date_naive(),
                category_id: None,
                is_shared: false,
                payer_id: None,
                source_transaction_id: None,
                kind: TransactionKind::Income {
                    account_id: Some(receiving_account_id),
                },
            })
            .await
            .map_err(|err| SettlementError::Persistence {
                step: "create consolidated income",
                source: err,
            })?;
        comp.push(CompensationAction::DeleteTransaction(income.id));

        let mut settled_ids = Vec::with_capacity(items.len());
        for item in &items {
            match self
                .store
                .mark_split_settled(item.split_id, income.id, settled_at)
                .await
            {
                Ok(true) => {
                    comp.push(CompensationAction::ClearSplitSettlement(item.split_id));
                    settled_ids.push(item.split_id);
                }
                Ok(false) => {
                    return Err(self
                        .fail(
                            comp,
                            "mark batch split settled",
                            SettlementError::AlreadySettled(item.split_id),
                        )
                        .await);
                }
                Err(err) => {
                    return Err(self
                        .fail(
                            comp,
                            "mark batch split settled",
                            SettlementError::Persistence {
                                step: "mark batch split settled",
                                source: err,
                            },
                        )
                        .await);
                }
            }
        }

        self.store
            .adjust_account_balance(receiving_account_id, total)
            .await
            .map_err(|err| {
                error!(
                    account_id = %receiving_account_id,
                    error = %err,
                    "Balance credit failed after batch settlement committed, reconciliation will flag the drift"
                );
                SettlementError::Persistence {
                    step: "credit receiving account",
                    source: err,
                }
            })?;

        info!(
            income_transaction_id = %income.id,
            splits = settled_ids.len(),
            amount = %total,
            "Batch settled"
        );

        Ok(SettlementResult {
            settled_split_ids: settled_ids,
            income_transaction_id: income.id,
            amount: total,
            settled_at,
        })
    }

    /// Reverses a settlement: debits the account, deletes the settlement
    /// transaction, resets the split to pending.
    ///
    /// Unsettling a split that is not settled is a no-op. A settlement
    /// transaction deleted out-of-band is tolerated; the split linkage is
    /// still reset.
    ///
    /// # Errors
    ///
    /// `SplitNotFound` for a missing split, `Persistence` for store
    /// failures.
    pub async fn unsettle(&self, split_id: SplitId) -> Result<(), SettlementError> {
        let split = self.read_split(split_id).await?;
        if !split.is_settled {
            return Ok(());
        }

        if let Some(txn_id) = split.settled_transaction_id {
            match self.store.transaction(txn_id).await {
                Ok(txn) => {
                    if let Some(account_id) = txn.account_id() {
                        self.store
                            .adjust_account_balance(account_id, -txn.amount)
                            .await
                            .map_err(|err| SettlementError::Persistence {
                                step: "debit receiving account",
                                source: err,
                            })?;
                    }
                    self.store.delete_transaction(txn_id).await.map_err(|err| {
                        SettlementError::Persistence {
                            step: "delete settlement income",
                            source: err,
                        }
                    })?;
                }
                // Deleted out-of-band; only the linkage is left to reset.
                Err(StoreError::NotFound) => {}
                Err(err) => {
                    return Err(SettlementError::Persistence {
                        step: "read settlement income",
                        source: err,
                    });
                }
            }
        }

        self.store
            .clear_split_settlement(split_id)
            .await
            .map_err(|err| SettlementError::Persistence {
                step: "clear split settlement",
                source: err,
            })?;

        info!(split_id = %split_id, "Split unsettled");
        Ok(())
    }

    /// Reverses a batch of settlements with one balance adjustment per
    /// distinct account.
    ///
    /// # Errors
    ///
    /// `BatchTooLarge` on the id list, otherwise as
    /// [`unsettle`](Self::unsettle). An empty list is a no-op.
    pub async fn unsettle_multiple(&self, split_ids: Vec<SplitId>) -> Result<(), SettlementError> {
        if split_ids.is_empty() {
            return Ok(());
        }
        if split_ids.len() > self.config.max_batch_size {
            return Err(SettlementError::BatchTooLarge {
                size: split_ids.len(),
                max: self.config.max_batch_size,
            });
        }

        // The consolidated-settlement case links many splits to one
        // transaction, so dedupe before touching balances.
        let mut settlement_txn_ids = Vec::new();
        let mut to_clear = Vec::new();
        for split_id in split_ids {
            let split = self.read_split(split_id).await?;
            if !split.is_settled {
                continue;
            }
            to_clear.push(split.id);
            if let Some(txn_id) = split.settled_transaction_id
                && !settlement_txn_ids.contains(&txn_id)
            {
                settlement_txn_ids.push(txn_id);
            }
        }

        let mut deltas: HashMap<AccountId, Money> = HashMap::new();
        let mut to_delete = Vec::new();
        for txn_id in settlement_txn_ids {
            match self.store.transaction(txn_id).await {
                Ok(txn) => {
                    if let Some(account_id) = txn.account_id() {
                        *deltas.entry(account_id).or_insert(Money::ZERO) -= txn.amount;
                    }
                    to_delete.push(txn_id);
                }
                Err(StoreError::NotFound) => {}
                Err(err) => {
                    return Err(SettlementError::Persistence {
                        step: "read settlement income",
                        source: err,
                    });
                }
            }
        }

        for (account_id, delta) in deltas {
            self.store
                .adjust_account_balance(account_id, delta)
                .await
                .map_err(|err| SettlementError::Persistence {
                    step: "debit receiving account",
                    source: err,
                })?;
        }

        for txn_id in to_delete {
            self.store.delete_transaction(txn_id).await.map_err(|err| {
                SettlementError::Persistence {
                    step: "delete settlement income",
                    source: err,
                }
            })?;
        }

        for split_id in &to_clear {
            self.store
                .clear_split_settlement(*split_id)
                .await
                .map_err(|err| SettlementError::Persistence {
                    step: "clear split settlement",
                    source: err,
                })?;
        }

        info!(splits = to_clear.len(), "Batch unsettled");
        Ok(())
    }

    async fn read_split(&self, id: SplitId) -> Result<Split, SettlementError> {
        self.store.split(id).await.map_err(|err| match err {
            StoreError::NotFound => SettlementError::SplitNotFound(id),
            other => SettlementError::Persistence {
                step: "read split",
                source: other,
            },
        })
    }

    /// Unwinds the compensation log and folds an unwind failure into the
    /// error the caller sees.
    async fn fail(
        &self,
        comp: CompensationLog,
        step: &'static str,
        cause: SettlementError,
    ) -> SettlementError {
        match comp.unwind(self.store.as_ref()).await {
            Ok(()) => cause,
            Err(detail) => SettlementError::CleanupFailed {
                step,
                detail: format!("{cause}; cleanup: {detail}"),
            },
        }
    }
}
