//! One party's share of a shared transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use racha_shared::types::{Money, SplitId, TransactionId, UserId};

/// One party's monetary share of a shared [`Transaction`].
///
/// Splits are created atomically with their parent transaction and mutated
/// only by the settlement service. For a given transaction the percentages
/// sum to 100 (within 0.01) and the amounts never exceed the transaction
/// total by more than one minor unit.
///
/// [`Transaction`]: crate::model::Transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    /// Split ID.
    pub id: SplitId,
    /// The shared transaction this split belongs to.
    pub transaction_id: TransactionId,
    /// The member responsible for this share.
    pub member_id: UserId,
    /// Share of the total, 0-100.
    pub percentage: Decimal,
    /// Monetary amount derived from the percentage.
    pub amount: Money,
    /// Whether this share has been repaid.
    pub is_settled: bool,
    /// When the share was repaid.
    pub settled_at: Option<DateTime<Utc>>,
    /// The income transaction created when this share was repaid.
    pub settled_transaction_id: Option<TransactionId>,
}

impl Split {
    /// Creates an unsettled split.
    #[must_use]
    pub fn new(
        transaction_id: TransactionId,
        member_id: UserId,
        percentage: Decimal,
        amount: Money,
    ) -> Self {
        Self {
            id: SplitId::new(),
            transaction_id,
            member_id,
            percentage,
            amount,
            is_settled: false,
            settled_at: None,
            settled_transaction_id: None,
        }
    }
}
