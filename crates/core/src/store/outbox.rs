//! Persisted outbox for deferred cleanup work.
//!
//! When a compensating delete fails, the settlement service cannot retry
//! inline (the caller is already receiving an error). The undo action is
//! persisted here and executed later by [`OutboxProcessor::drain`], which
//! the embedding application runs from its scheduler.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use racha_shared::types::{OutboxId, SplitId, TransactionId};

use super::{Store, StoreError};

/// A deferred store action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboxAction {
    /// Delete a transaction that a failed compensation left behind.
    DeleteTransaction(TransactionId),
    /// Reset a split's settlement linkage that a failed compensation
    /// left claimed.
    ClearSplitSettlement(SplitId),
}

/// A persisted unit of deferred work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxEntry {
    /// Entry ID (uuid-v7, so ids order by creation time).
    pub id: OutboxId,
    /// The action to perform.
    pub action: OutboxAction,
    /// When the entry was enqueued.
    pub created_at: DateTime<Utc>,
    /// How many drain attempts have failed so far.
    pub attempts: u32,
}

impl OutboxEntry {
    /// Creates a fresh entry for an action.
    #[must_use]
    pub fn new(action: OutboxAction) -> Self {
        Self {
            id: OutboxId::new(),
            action,
            created_at: Utc::now(),
            attempts: 0,
        }
    }
}

/// Outcome of one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Entries executed and removed.
    pub completed: usize,
    /// Entries that failed again and stay queued.
    pub failed: usize,
}

/// Executes pending outbox entries.
///
/// One `drain` call is one scheduler tick; scheduling cadence belongs to
/// the embedding application.
pub struct OutboxProcessor {
    store: Arc<dyn Store>,
}

impl OutboxProcessor {
    /// Creates a processor over a store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Executes every pending entry once, oldest first.
    ///
    /// A failed entry keeps its place in the queue with an incremented
    /// attempt counter.
    ///
    /// # Errors
    ///
    /// Returns an error only when the queue itself cannot be read; entry
    /// execution failures are counted in the report instead.
    pub async fn drain(&self) -> Result<DrainReport, StoreError> {
        let pending = self.store.pending_outbox().await?;
        let mut report = DrainReport::default();

        for entry in pending {
            match self.execute(entry.action).await {
                Ok(()) => {
                    self.store.complete_outbox(entry.id).await?;
                    report.completed += 1;
                    info!(outbox_id = %entry.id, action = ?entry.action, "Outbox entry completed");
                }
                Err(err) => {
                    self.store.record_outbox_attempt(entry.id).await?;
                    report.failed += 1;
                    warn!(
                        outbox_id = %entry.id,
                        action = ?entry.action,
                        attempts = entry.attempts + 1,
                        error = %err,
                        "Outbox entry failed, will retry on next drain"
                    );
                }
            }
        }

        Ok(report)
    }

    async fn execute(&self, action: OutboxAction) -> Result<(), StoreError> {
        match action {
            OutboxAction::DeleteTransaction(id) => match self.store.delete_transaction(id).await {
                // Already gone: the cleanup goal is met.
                Ok(()) | Err(StoreError::NotFound) => Ok(()),
                Err(err) => Err(err),
            },
            OutboxAction::ClearSplitSettlement(id) => {
                match self.store.clear_split_settlement(id).await {
                    // A deleted split needs no unclaiming.
                    Ok(()) | Err(StoreError::NotFound) => Ok(()),
                    Err(err) => Err(err),
                }
            }
        }
    }
}
