//! Store error types.

use thiserror::Error;

/// Errors surfaced by the persistent store collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("Record not found")]
    NotFound,

    /// The operation timed out. Retry policy belongs to the store client;
    /// callers only need to distinguish this for loud reporting.
    #[error("Store operation timed out")]
    Timeout,

    /// Any other backend failure.
    #[error("Store backend error: {0}")]
    Backend(String),
}
