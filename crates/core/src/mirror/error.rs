//! Mirror synchronization errors.

use thiserror::Error;

use racha_shared::types::TransactionId;

use crate::store::StoreError;

/// Errors from mirror maintenance.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Mirrors are derived records; edits go through the source.
    #[error("Transaction {0} is a mirror and cannot be edited directly")]
    MirrorReadOnly(TransactionId),

    /// A mirror cannot itself be mirrored.
    #[error("Transaction {0} is already a mirror and cannot have mirrors of its own")]
    MirrorOfMirror(TransactionId),

    /// The source transaction does not exist.
    #[error("Source transaction not found: {0}")]
    SourceNotFound(TransactionId),

    /// Underlying store failure.
    #[error("Store failure during mirror sync")]
    Store(#[from] StoreError),
}

impl MirrorError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MirrorReadOnly(_) => "MIRROR_READ_ONLY",
            Self::MirrorOfMirror(_) => "MIRROR_OF_MIRROR",
            Self::SourceNotFound(_) => "SOURCE_NOT_FOUND",
            Self::Store(_) => "STORE_FAILURE",
        }
    }
}
