//! Settlement request and result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use racha_shared::types::{Money, SplitId, TransactionId, UserId};

/// Request to settle one split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleRequest {
    /// The split being repaid.
    pub split_id: SplitId,
    /// The shared transaction the split belongs to. Settlement rejects
    /// the request when the stored split names a different transaction.
    pub transaction_id: TransactionId,
    /// The amount being repaid (the split amount).
    pub amount: Money,
    /// The user receiving the repayment; owns the income transaction.
    pub receiver_id: UserId,
    /// Display name of the member paying back, for the description.
    pub payer_display_name: String,
    /// Description of the original shared transaction.
    pub original_description: String,
}

/// Outcome of a successful settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    /// The splits marked settled.
    pub settled_split_ids: Vec<SplitId>,
    /// The income transaction recording the repayment. Batch settlements
    /// create exactly one consolidated transaction for all splits.
    pub income_transaction_id: TransactionId,
    /// Total amount credited to the receiving account.
    pub amount: Money,
    /// Settlement timestamp shared by all splits in the call.
    pub settled_at: DateTime<Utc>,
}
