//! Property-based tests for the Money type.
//!
//! Properties covered:
//! - Addition/subtraction are exact inverses (no drift)
//! - Decimal conversion round-trips for any two-decimal value
//! - Percentage distribution always sums exactly to the total

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::money::Money;

/// Strategy for amounts between -1,000,000.00 and 1,000,000.00.
fn any_amount() -> impl Strategy<Value = Money> {
    (-100_000_000i64..100_000_000i64).prop_map(Money::from_minor_units)
}

/// Strategy for positive totals up to 1,000,000.00.
fn positive_total() -> impl Strategy<Value = Money> {
    (1i64..100_000_000i64).prop_map(Money::from_minor_units)
}

/// Strategy for a percentage vector that sums exactly to 100.
fn shares_summing_to_100() -> impl Strategy<Value = Vec<Decimal>> {
    proptest::collection::vec(1u32..10_000u32, 1..8).prop_map(|weights| {
        let total: u64 = weights.iter().map(|w| u64::from(*w)).sum();
        let total = Decimal::from(total);
        let mut shares: Vec<Decimal> = weights
            .iter()
            .map(|w| (Decimal::from(*w) * Decimal::ONE_HUNDRED / total).round_dp(4))
            .collect();
        // Force the vector to sum to exactly 100 by adjusting the last share.
        let sum: Decimal = shares.iter().copied().sum();
        if let Some(last) = shares.last_mut() {
            *last += Decimal::ONE_HUNDRED - sum;
        }
        shares
    })
}

proptest! {
    #[test]
    fn add_then_subtract_is_identity(a in any_amount(), b in any_amount()) {
        prop_assert_eq!((a + b) - b, a);
        prop_assert_eq!((a + b) - a, b);
    }

    #[test]
    fn decimal_round_trip_is_lossless(a in any_amount()) {
        let through = Money::try_from_decimal(a.to_decimal()).unwrap();
        prop_assert_eq!(through, a);
    }

    #[test]
    fn distribution_sums_exactly_to_total(
        total in positive_total(),
        shares in shares_summing_to_100(),
    ) {
        let parts = total.distribute_by_percentage(&shares);
        prop_assert_eq!(parts.len(), shares.len());
        prop_assert_eq!(Money::sum(parts.iter().copied()), total);
    }

    #[test]
    fn distribution_residual_lands_only_on_last(
        total in positive_total(),
        shares in shares_summing_to_100(),
    ) {
        let parts = total.distribute_by_percentage(&shares);
        // Every share except the last equals its direct percentage_of value.
        for (part, share) in parts.iter().zip(&shares).take(parts.len() - 1) {
            prop_assert_eq!(*part, total.percentage_of(*share));
        }
    }
}
