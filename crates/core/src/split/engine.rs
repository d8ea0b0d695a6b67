//! Split computation over a shared transaction total.

use rust_decimal::Decimal;

use racha_shared::types::{Money, TransactionId, UserId};

use super::error::SplitError;
use crate::model::Split;

/// Allowed deviation of a percentage sum from 100.
const SHARE_SUM_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2); // 0.01

/// One party's requested share of a shared transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareInput {
    /// The member taking this share.
    pub member_id: UserId,
    /// Share of the total, 0-100.
    pub percentage: Decimal,
}

/// Stateless split computation service.
///
/// Given a transaction total and percentage shares, produces validated
/// [`Split`] records whose amounts sum exactly to the total.
pub struct SplitEngine;

impl SplitEngine {
    /// Computes splits for a transaction total.
    ///
    /// Amounts come from [`Money::distribute_by_percentage`], so the
    /// rounding residual lands on the last listed share. A single
    /// 100% share is valid and produces one split equal to the total.
    /// An empty share list produces no splits.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidShareSum`] if the non-empty share
    /// percentages deviate from 100 by more than 0.01.
    pub fn compute_splits(
        transaction_id: TransactionId,
        total: Money,
        shares: &[ShareInput],
    ) -> Result<Vec<Split>, SplitError> {
        if shares.is_empty() {
            return Ok(vec![]);
        }

        let sum: Decimal = shares.iter().map(|s| s.percentage).sum();
        if (sum - Decimal::ONE_HUNDRED).abs() > SHARE_SUM_TOLERANCE {
            return Err(SplitError::InvalidShareSum { sum });
        }

        let percentages: Vec<Decimal> = shares.iter().map(|s| s.percentage).collect();
        let amounts = total.distribute_by_percentage(&percentages);

        Ok(shares
            .iter()
            .zip(amounts)
            .map(|(share, amount)| {
                Split::new(transaction_id, share.member_id, share.percentage, amount)
            })
            .collect())
    }

    /// Validates that split amounts do not exceed the transaction total.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::SplitExceedsTotal`] when the assigned amounts
    /// exceed the total by more than one minor unit.
    pub fn validate_against_total(total: Money, splits: &[Split]) -> Result<(), SplitError> {
        let assigned = Money::sum(splits.iter().map(|s| s.amount));
        if assigned.minor_units() > total.minor_units() + 1 {
            return Err(SplitError::SplitExceedsTotal { assigned, total });
        }
        Ok(())
    }

    /// Computes splits for an installment series.
    ///
    /// Each installment is an independent total: the share percentages are
    /// applied to that installment's own amount, never to the original full
    /// total, so per-installment rounding stays consistent with single
    /// transactions.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidShareSum`] under the same rules as
    /// [`SplitEngine::compute_splits`].
    pub fn compute_installment_splits(
        installments: &[(TransactionId, Money)],
        shares: &[ShareInput],
    ) -> Result<Vec<Vec<Split>>, SplitError> {
        installments
            .iter()
            .map(|(transaction_id, amount)| Self::compute_splits(*transaction_id, *amount, shares))
            .collect()
    }
}
