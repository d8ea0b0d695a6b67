//! Property-based tests for SplitEngine.
//!
//! Properties covered:
//! - For valid shares, split amounts always sum exactly to the total
//! - Computed splits always pass `validate_against_total`
//! - Share sums outside the tolerance are always rejected

use proptest::prelude::*;
use rust_decimal::Decimal;

use racha_shared::types::{Money, TransactionId, UserId};

use super::engine::{ShareInput, SplitEngine};
use super::error::SplitError;

/// Strategy for positive totals up to 1,000,000.00.
fn positive_total() -> impl Strategy<Value = Money> {
    (1i64..100_000_000i64).prop_map(Money::from_minor_units)
}

/// Strategy for 1-8 shares whose percentages sum exactly to 100.
fn valid_shares() -> impl Strategy<Value = Vec<ShareInput>> {
    proptest::collection::vec(1u32..10_000u32, 1..8).prop_map(|weights| {
        let total: u64 = weights.iter().map(|w| u64::from(*w)).sum();
        let total = Decimal::from(total);
        let mut percentages: Vec<Decimal> = weights
            .iter()
            .map(|w| (Decimal::from(*w) * Decimal::ONE_HUNDRED / total).round_dp(4))
            .collect();
        let sum: Decimal = percentages.iter().copied().sum();
        if let Some(last) = percentages.last_mut() {
            *last += Decimal::ONE_HUNDRED - sum;
        }
        percentages
            .into_iter()
            .map(|percentage| ShareInput {
                member_id: UserId::new(),
                percentage,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn split_amounts_sum_exactly_to_total(
        total in positive_total(),
        shares in valid_shares(),
    ) {
        let splits =
            SplitEngine::compute_splits(TransactionId::new(), total, &shares).unwrap();
        prop_assert_eq!(splits.len(), shares.len());
        prop_assert_eq!(Money::sum(splits.iter().map(|s| s.amount)), total);
    }

    #[test]
    fn computed_splits_always_validate(
        total in positive_total(),
        shares in valid_shares(),
    ) {
        let splits =
            SplitEngine::compute_splits(TransactionId::new(), total, &shares).unwrap();
        prop_assert!(SplitEngine::validate_against_total(total, &splits).is_ok());
    }

    #[test]
    fn share_sum_off_by_more_than_tolerance_is_rejected(
        total in positive_total(),
        deviation in 2i64..5_000i64,
    ) {
        // A single share of (100 +/- deviation-in-hundredths) percent.
        let percentage = Decimal::ONE_HUNDRED + Decimal::new(deviation, 2);
        let shares = [ShareInput { member_id: UserId::new(), percentage }];
        let result = SplitEngine::compute_splits(TransactionId::new(), total, &shares);
        prop_assert!(
            matches!(result, Err(SplitError::InvalidShareSum { .. })),
            "expected InvalidShareSum, got {result:?}",
        );
    }
}
