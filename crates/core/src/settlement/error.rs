//! Settlement error taxonomy.

use thiserror::Error;

use racha_shared::types::{AccountId, SplitId};

use crate::store::StoreError;

/// Errors that can occur during settlement operations.
///
/// Validation errors (`AlreadySettled`, `PartiallyAlreadySettled`, the
/// not-found variants, batch limits) are raised before any write. Store
/// errors between the income insert and the split claim trigger the
/// documented compensating actions before surfacing as `Persistence`; if
/// the compensation itself fails the caller gets `CleanupFailed` instead.
/// A failed balance credit after the claim is the one `Persistence` case
/// left committed on purpose (see the variant doc).
#[derive(Debug, Error)]
pub enum SettlementError {
    /// This split has already been paid.
    #[error("Split {0} is already settled")]
    AlreadySettled(SplitId),

    /// At least one split in the batch has already been paid; nothing in
    /// the batch was committed.
    #[error("{} split(s) in the batch are already settled", settled.len())]
    PartiallyAlreadySettled {
        /// The already-settled splits.
        settled: Vec<SplitId>,
    },

    /// Split not found.
    #[error("Split not found: {0}")]
    SplitNotFound(SplitId),

    /// Receiving account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Batch operations accept no empty item list.
    #[error("Batch contains no items")]
    EmptyBatch,

    /// The batch exceeds the configured maximum.
    #[error("Batch of {size} items exceeds the maximum of {max}")]
    BatchTooLarge {
        /// Items in the rejected batch.
        size: usize,
        /// Configured maximum.
        max: usize,
    },

    /// A store operation failed. Steps committed before the failure were
    /// compensated, with one exception: a balance credit that fails after
    /// the split is claimed stays committed, and reconciliation flags the
    /// resulting drift.
    #[error("Store failure during '{step}'")]
    Persistence {
        /// The settlement step that failed.
        step: &'static str,
        /// The underlying store error.
        #[source]
        source: StoreError,
    },

    /// A store operation failed and the compensating cleanup also failed.
    /// The store may hold an orphaned settlement transaction; a pending
    /// outbox entry records the remaining cleanup for the maintenance
    /// sweep, but the state needs manual review.
    #[error("Operation failed during '{step}' and cleanup also failed - manual review required: {detail}")]
    CleanupFailed {
        /// The settlement step that failed.
        step: &'static str,
        /// What failed, including the cleanup failure.
        detail: String,
    },
}

impl SettlementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadySettled(_) => "ALREADY_SETTLED",
            Self::PartiallyAlreadySettled { .. } => "PARTIALLY_ALREADY_SETTLED",
            Self::SplitNotFound(_) => "SPLIT_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::EmptyBatch => "EMPTY_BATCH",
            Self::BatchTooLarge { .. } => "BATCH_TOO_LARGE",
            Self::Persistence { .. } => "PERSISTENCE_FAILURE",
            Self::CleanupFailed { .. } => "CLEANUP_FAILED",
        }
    }

    /// True when the split state is guaranteed unchanged by the failed call.
    #[must_use]
    pub const fn leaves_state_clean(&self) -> bool {
        !matches!(self, Self::CleanupFailed { .. })
    }
}
