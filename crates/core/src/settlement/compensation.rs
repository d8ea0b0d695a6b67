//! Ordered compensating-action log for multi-step settlement writes.
//!
//! Each mutating step that may need undoing registers its compensating
//! action after committing. On failure the log unwinds in reverse order.
//! A compensating action that itself fails is never silently swallowed:
//! it is logged loudly and persisted to the outbox for the maintenance
//! sweep, and the caller is told cleanup failed.

use tracing::error;

use racha_shared::types::{SplitId, TransactionId};

use crate::store::{OutboxAction, OutboxEntry, Store, StoreError};

/// One undo step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompensationAction {
    /// Delete a settlement income transaction created earlier in the call.
    DeleteTransaction(TransactionId),
    /// Unclaim a split marked settled earlier in the call.
    ClearSplitSettlement(SplitId),
}

impl From<CompensationAction> for OutboxAction {
    fn from(action: CompensationAction) -> Self {
        match action {
            CompensationAction::DeleteTransaction(id) => Self::DeleteTransaction(id),
            CompensationAction::ClearSplitSettlement(id) => Self::ClearSplitSettlement(id),
        }
    }
}

/// Ordered list of compensating actions, executed in reverse on failure.
#[derive(Debug, Default)]
pub(crate) struct CompensationLog {
    actions: Vec<CompensationAction>,
}

impl CompensationLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers the undo for a step that just committed.
    pub(crate) fn push(&mut self, action: CompensationAction) {
        self.actions.push(action);
    }

    /// Executes all registered actions, most recent first.
    ///
    /// # Errors
    ///
    /// Returns a description of every action that could not be applied.
    /// Each such action is already enqueued to the outbox (best effort)
    /// before this returns.
    pub(crate) async fn unwind(self, store: &dyn Store) -> Result<(), String> {
        let mut failures = Vec::new();

        for action in self.actions.into_iter().rev() {
            let Err(err) = Self::apply(store, action).await else {
                continue;
            };

            error!(
                ?action,
                error = %err,
                "Compensating action failed, store may hold orphaned settlement state"
            );

            match store.enqueue_outbox(OutboxEntry::new(action.into())).await {
                Ok(()) => failures.push(format!("{action:?}: {err} (queued for retry)")),
                Err(enqueue_err) => {
                    error!(
                        ?action,
                        error = %enqueue_err,
                        "Failed to enqueue compensation to outbox"
                    );
                    failures.push(format!(
                        "{action:?}: {err} (outbox enqueue also failed: {enqueue_err})"
                    ));
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures.join("; "))
        }
    }

    async fn apply(store: &dyn Store, action: CompensationAction) -> Result<(), StoreError> {
        match action {
            CompensationAction::DeleteTransaction(id) => {
                match store.delete_transaction(id).await {
                    Ok(()) | Err(StoreError::NotFound) => Ok(()),
                    Err(err) => Err(err),
                }
            }
            CompensationAction::ClearSplitSettlement(id) => {
                match store.clear_split_settlement(id).await {
                    Ok(()) | Err(StoreError::NotFound) => Ok(()),
                    Err(err) => Err(err),
                }
            }
        }
    }
}
