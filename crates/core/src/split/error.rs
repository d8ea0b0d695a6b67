//! Split computation error types.

use rust_decimal::Decimal;
use thiserror::Error;

use racha_shared::types::Money;

/// Errors that can occur while computing or validating splits.
///
/// All of these are detected before any write is issued.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitError {
    /// Share percentages deviate from 100 by more than 0.01.
    #[error("Share percentages must sum to 100, got {sum}")]
    InvalidShareSum {
        /// The actual percentage sum.
        sum: Decimal,
    },

    /// Assigned split amounts exceed the transaction total beyond the
    /// one-minor-unit rounding tolerance.
    #[error("Split amounts ({assigned}) exceed transaction total ({total})")]
    SplitExceedsTotal {
        /// Sum of the split amounts.
        assigned: Money,
        /// The transaction total.
        total: Money,
    },
}

impl SplitError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidShareSum { .. } => "INVALID_SHARE_SUM",
            Self::SplitExceedsTotal { .. } => "SPLIT_EXCEEDS_TOTAL",
        }
    }
}
