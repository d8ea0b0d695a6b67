//! Fixed-point money type backed by integer minor units.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All arithmetic happens on an `i64` count of minor units (cents);
//! `rust_decimal::Decimal` appears only at the conversion boundary and
//! for rate math, rounded half-to-even at the cent.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of decimal places carried by [`Money`].
pub const MONEY_SCALE: u32 = 2;

/// Minor units per major unit (cents per real).
const MINOR_PER_MAJOR: i64 = 100;

/// Errors from money arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// Division by a zero divisor.
    #[error("Division by zero")]
    DivisionByZero,

    /// A decimal value does not fit in the minor-unit representation.
    #[error("Amount out of range: {0}")]
    OutOfRange(Decimal),
}

/// A monetary amount stored as an integer count of minor units.
///
/// Immutable value type. Comparisons and ordering operate on the exact
/// minor-unit count; use [`Money::approx_eq`] for the one-cent tolerance
/// used by reconciliation checks. All arithmetic saturates at the `i64`
/// range, keeping the sign, instead of wrapping or panicking.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates a money value from a raw minor-unit count.
    #[must_use]
    pub const fn from_minor_units(units: i64) -> Self {
        Self(units)
    }

    /// Returns the raw minor-unit count.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Converts a decimal amount into minor units, rounding half-to-even
    /// at the cent.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::OutOfRange`] if the value does not fit in an
    /// `i64` count of minor units.
    pub fn try_from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        let minor = (value * Decimal::from(MINOR_PER_MAJOR))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
        minor
            .to_i64()
            .map(Self)
            .ok_or(MoneyError::OutOfRange(value))
    }

    /// Returns the amount as a decimal with exactly two decimal places.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, MONEY_SCALE)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Multiplies by a decimal rate, rounding the result half-to-even at
    /// the cent. Saturates at the `i64` range, keeping the sign.
    #[must_use]
    pub fn multiply(self, rate: Decimal) -> Self {
        let product = (self.to_decimal() * rate)
            .round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven);
        Self(clamp_minor(product * Decimal::from(MINOR_PER_MAJOR)))
    }

    /// Divides by a decimal divisor, rounding half-to-even at the cent.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::DivisionByZero`] when `divisor` is zero.
    pub fn divide(self, divisor: Decimal) -> Result<Self, MoneyError> {
        if divisor.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        let quotient = (self.to_decimal() / divisor)
            .round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven);
        Ok(Self(clamp_minor(quotient * Decimal::from(MINOR_PER_MAJOR))))
    }

    /// Returns the amount corresponding to `percent` percent of this value.
    #[must_use]
    pub fn percentage_of(self, percent: Decimal) -> Self {
        self.multiply(percent / Decimal::ONE_HUNDRED)
    }

    /// Sums an iterator of amounts in minor units, converting once.
    ///
    /// Accumulates in `i128` so intermediate sums never wrap; the final
    /// result saturates at the `i64` range, keeping the sign.
    #[must_use]
    pub fn sum<I>(amounts: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let total: i128 = amounts.into_iter().map(|m| i128::from(m.0)).sum();
        Self(i64::try_from(total).unwrap_or(if total < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Returns true if the two amounts differ by at most one minor unit.
    ///
    /// This is the tolerance used by reconciliation and split validation.
    #[must_use]
    pub const fn approx_eq(self, other: Self) -> bool {
        (self.0 as i128 - other.0 as i128).abs() <= 1
    }

    /// Distributes this total across percentage shares so the parts sum
    /// exactly to the total.
    ///
    /// Each part is computed with [`Money::percentage_of`]; the rounding
    /// residual (`total - sum(parts)`) is absorbed by the **last** share.
    /// This tie-break is deterministic and contractual: the last listed
    /// party always carries the remainder.
    #[must_use]
    pub fn distribute_by_percentage(self, percentages: &[Decimal]) -> Vec<Self> {
        if percentages.is_empty() {
            return vec![];
        }

        let mut parts: Vec<Self> = percentages
            .iter()
            .map(|p| self.percentage_of(*p))
            .collect();

        let assigned = Self::sum(parts.iter().copied());
        let residual = self.0 - assigned.0;
        if let Some(last) = parts.last_mut() {
            last.0 += residual;
        }

        parts
    }
}

/// Clamps a minor-unit decimal into the `i64` range, keeping the sign.
fn clamp_minor(minor: Decimal) -> i64 {
    minor.to_i64().unwrap_or(if minor.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl std::ops::Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl std::ops::SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl std::ops::Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self::sum(iter)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::try_from_decimal(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.to_decimal()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0.125), 12)] // 12.5 cents rounds down to even
    #[case(dec!(0.135), 14)] // 13.5 cents rounds up to even
    #[case(dec!(0.005), 0)]
    #[case(dec!(0.015), 2)]
    #[case(dec!(-0.125), -12)]
    fn test_from_decimal_rounds_half_to_even(#[case] value: Decimal, #[case] cents: i64) {
        assert_eq!(
            Money::try_from_decimal(value).unwrap(),
            Money::from_minor_units(cents)
        );
    }

    #[test]
    fn test_decimal_round_trip() {
        let money = Money::try_from_decimal(dec!(1234.56)).unwrap();
        assert_eq!(money.minor_units(), 123_456);
        assert_eq!(money.to_decimal(), dec!(1234.56));
    }

    #[test]
    fn test_from_decimal_out_of_range() {
        let huge = Decimal::MAX;
        assert!(matches!(
            Money::try_from_decimal(huge),
            Err(MoneyError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_add_subtract_exact() {
        let a = Money::try_from_decimal(dec!(0.10)).unwrap();
        let b = Money::try_from_decimal(dec!(0.20)).unwrap();
        // The classic float failure: 0.1 + 0.2 == 0.3 exactly here.
        assert_eq!((a + b).to_decimal(), dec!(0.30));
        assert_eq!((a + b - a), b);
    }

    #[test]
    fn test_thousand_cent_additions_do_not_drift() {
        let cent = Money::try_from_decimal(dec!(0.01)).unwrap();
        let mut total = Money::ZERO;
        for _ in 0..1000 {
            total += cent;
        }
        assert_eq!(total.to_decimal(), dec!(10.00));
    }

    #[test]
    fn test_multiply_by_rate() {
        let money = Money::from_minor_units(10_000); // 100.00
        assert_eq!(money.multiply(dec!(0.5)), Money::from_minor_units(5_000));
        assert_eq!(money.multiply(dec!(1)), money);
    }

    #[test]
    fn test_divide() {
        let money = Money::from_minor_units(10_000);
        assert_eq!(
            money.divide(dec!(3)).unwrap(),
            Money::from_minor_units(3_333)
        );
    }

    #[test]
    fn test_divide_by_zero() {
        let money = Money::from_minor_units(100);
        assert_eq!(money.divide(dec!(0)), Err(MoneyError::DivisionByZero));
    }

    #[test]
    fn test_percentage_of() {
        let money = Money::from_minor_units(10_000); // 100.00
        assert_eq!(
            money.percentage_of(dec!(33.33)),
            Money::from_minor_units(3_333)
        );
        assert_eq!(money.percentage_of(dec!(100)), money);
    }

    #[test]
    fn test_sum_converts_once() {
        let amounts = vec![
            Money::from_minor_units(1),
            Money::from_minor_units(2),
            Money::from_minor_units(3),
        ];
        assert_eq!(Money::sum(amounts), Money::from_minor_units(6));
        assert_eq!(Money::sum(std::iter::empty::<Money>()), Money::ZERO);
    }

    #[test]
    fn test_add_and_subtract_saturate_at_the_range_edges() {
        let max = Money::from_minor_units(i64::MAX);
        let min = Money::from_minor_units(i64::MIN);
        let cent = Money::from_minor_units(1);

        assert_eq!(max + cent, max);
        assert_eq!(min - cent, min);
        assert_eq!(-min, max);

        let mut total = max;
        total += cent;
        assert_eq!(total, max);
        let mut total = min;
        total -= cent;
        assert_eq!(total, min);
    }

    #[test]
    fn test_multiply_saturates_keeping_the_sign() {
        let max = Money::from_minor_units(i64::MAX);
        assert_eq!(max.multiply(dec!(2)), max);
        assert_eq!(
            max.multiply(dec!(-2)),
            Money::from_minor_units(i64::MIN)
        );
    }

    #[test]
    fn test_sum_saturates_keeping_the_sign() {
        let max = Money::from_minor_units(i64::MAX);
        let min = Money::from_minor_units(i64::MIN);
        assert_eq!(Money::sum([max, max]), max);
        assert_eq!(Money::sum([min, min]), min);
    }

    #[test]
    fn test_approx_eq_one_cent_tolerance() {
        let a = Money::from_minor_units(100);
        assert!(a.approx_eq(Money::from_minor_units(101)));
        assert!(a.approx_eq(Money::from_minor_units(99)));
        assert!(!a.approx_eq(Money::from_minor_units(102)));
    }

    #[test]
    fn test_distribute_empty() {
        let total = Money::from_minor_units(10_000);
        assert!(total.distribute_by_percentage(&[]).is_empty());
    }

    #[test]
    fn test_distribute_thirds_residual_on_last() {
        // 100.00 at [33.33, 33.33, 33.34] -> [33.33, 33.33, 33.34]
        let total = Money::from_minor_units(10_000);
        let parts = total.distribute_by_percentage(&[dec!(33.33), dec!(33.33), dec!(33.34)]);
        assert_eq!(
            parts,
            vec![
                Money::from_minor_units(3_333),
                Money::from_minor_units(3_333),
                Money::from_minor_units(3_334),
            ]
        );
        assert_eq!(Money::sum(parts), total);
    }

    #[test]
    fn test_distribute_residual_always_lands_on_last() {
        // 100.01 split three equal ways: per-share rounding leaves the odd
        // cent, which must land on the final share.
        let total = Money::from_minor_units(10_001);
        let third = dec!(100) / dec!(3);
        let parts = total.distribute_by_percentage(&[third, third, third]);
        assert_eq!(Money::sum(parts.iter().copied()), total);
        assert_eq!(parts[0], parts[1]);
        assert_ne!(parts[1], parts[2]);
    }

    #[test]
    fn test_distribute_single_share() {
        let total = Money::from_minor_units(4_500);
        let parts = total.distribute_by_percentage(&[dec!(100)]);
        assert_eq!(parts, vec![total]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor_units(123_456).to_string(), "1234.56");
        assert_eq!(Money::from_minor_units(-50).to_string(), "-0.50");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }
}
