//! Fixed-point reward accumulator.
//!
//! Every reward-rate calculation is `value * SCALE / divisor` on integers.
//! Division truncates toward zero, so for any set of stakes the sum of the
//! computed entitlements never exceeds what was injected. What truncation
//! drops is dust: per injection it is less than one base unit per
//! participant plus `total_staked / SCALE` units. The second term is below
//! one unit for any pool under `SCALE` base units, so the dust of an
//! injection is at most one unit per participant. Dust stays in pool custody
//! and is never paid out.
//!
//! The accumulator is an arbitrary-precision integer. It only grows, and a
//! long-lived pool with small stakes and large injections would outrun any
//! fixed width at this scale. Amounts stay `u128`; converting an entitlement
//! back is the one place overflow can surface.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PoolError, Result};

/// Value in integer base units (e.g. wei).
pub type Amount = u128;

pub const PRECISION_DIGITS: u32 = 36;

/// Fixed-point scale of the accumulator. A one-unit injection still moves
/// the rate in any pool holding fewer than `SCALE` base units (10^18 ether
/// when amounts are wei).
pub const SCALE: u128 = 10u128.pow(PRECISION_DIGITS);

/// Cumulative reward per unit of stake, scaled by [`SCALE`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardRate(BigUint);

impl RewardRate {
    pub fn zero() -> Self {
        RewardRate(BigUint::zero())
    }

    pub fn from_scaled(raw: impl Into<BigUint>) -> Self {
        RewardRate(raw.into())
    }

    pub fn scaled(&self) -> &BigUint {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Rate increase produced by injecting `amount` over `total_staked`.
    pub fn increment(amount: Amount, total_staked: Amount) -> Result<Self> {
        if total_staked == 0 {
            return Err(PoolError::ArithmeticOverflow("division by zero"));
        }
        Ok(RewardRate(
            BigUint::from(amount) * BigUint::from(SCALE) / BigUint::from(total_staked),
        ))
    }

    pub fn add(&self, other: &RewardRate) -> Self {
        RewardRate(&self.0 + &other.0)
    }

    /// Rate accrued since `checkpoint`. A checkpoint ahead of the
    /// accumulator means the ledger is corrupt.
    pub fn delta_since(&self, checkpoint: &RewardRate) -> Result<Self> {
        if checkpoint.0 > self.0 {
            return Err(PoolError::InvariantViolation(format!(
                "checkpoint {} ahead of accumulator {}",
                checkpoint, self
            )));
        }
        Ok(RewardRate(&self.0 - &checkpoint.0))
    }

    /// Reward owed to `staked` units over this rate delta, rounded down.
    pub fn entitlement(&self, staked: Amount) -> Result<Amount> {
        if staked == 0 || self.0.is_zero() {
            return Ok(0);
        }
        let owed = BigUint::from(staked) * &self.0 / BigUint::from(SCALE);
        owed.to_u128()
            .ok_or(PoolError::ArithmeticOverflow("entitlement"))
    }
}

impl fmt::Display for RewardRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = BigUint::from(SCALE);
        let whole = &self.0 / &scale;
        let frac = &self.0 % &scale;
        write!(f, "{}.{:0>width$}", whole, frac.to_string(), width = PRECISION_DIGITS as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ETHER: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_increment_is_exact_for_even_split() {
        let rate = RewardRate::increment(200, 400).unwrap();
        assert_eq!(rate, RewardRate::from_scaled(SCALE / 2));
        assert_eq!(rate.entitlement(100).unwrap(), 50);
        assert_eq!(rate.entitlement(300).unwrap(), 150);
    }

    #[test]
    fn test_single_unit_injection_moves_rate() {
        let rate = RewardRate::increment(1, SCALE).unwrap();
        assert_eq!(rate, RewardRate::from_scaled(1u8));

        // One wei into a 400 ether pool
        let rate = RewardRate::increment(1, 400 * ETHER).unwrap();
        assert_eq!(rate, RewardRate::from_scaled(2_500_000_000_000_000u128));
        assert!(rate > RewardRate::zero());
    }

    #[test]
    fn test_truncation_rounds_down() {
        // 100 / 3 per unit: three equal stakers each get 33, one unit of dust
        let rate = RewardRate::increment(100, 3).unwrap();
        let each = rate.entitlement(1).unwrap();
        assert_eq!(each, 33);
        assert!(each * 3 <= 100);
    }

    #[test]
    fn test_wide_values() {
        let big = 100 * ETHER * ETHER;
        let rate = RewardRate::increment(big, big).unwrap();
        assert_eq!(rate, RewardRate::from_scaled(SCALE));
        assert_eq!(rate.entitlement(big).unwrap(), big);

        // Accumulator grows past u128 without trouble
        let huge = RewardRate::increment(u128::MAX, 1).unwrap();
        assert!(huge.scaled() > &BigUint::from(u128::MAX));
        assert_eq!(huge.entitlement(1).unwrap(), u128::MAX);
    }

    #[test]
    fn test_unrepresentable_entitlement_is_overflow() {
        let rate = RewardRate::increment(u128::MAX, 1).unwrap();
        let err = rate.entitlement(2).unwrap_err();
        assert_eq!(err, PoolError::ArithmeticOverflow("entitlement"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_division_by_zero_is_rejected() {
        assert!(RewardRate::increment(1, 0).is_err());
    }

    #[test]
    fn test_delta_since_rejects_future_checkpoint() {
        let now = RewardRate::from_scaled(10u8);
        let ahead = RewardRate::from_scaled(11u8);
        assert_eq!(
            now.delta_since(&RewardRate::from_scaled(4u8)).unwrap(),
            RewardRate::from_scaled(6u8)
        );
        assert!(matches!(
            now.delta_since(&ahead),
            Err(PoolError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            RewardRate::from_scaled(SCALE / 2).to_string(),
            format!("0.5{}", "0".repeat(35))
        );
        assert_eq!(
            RewardRate::from_scaled(3 * SCALE).to_string(),
            format!("3.{}", "0".repeat(36))
        );
    }

    proptest! {
        #[test]
        fn split_never_over_allocates(
            stakes in prop::collection::vec(1u128..=1_000_000_000 * ETHER, 1..20),
            amount in 1u128..=1_000_000_000 * ETHER,
        ) {
            let total: u128 = stakes.iter().sum();
            let rate = RewardRate::increment(amount, total).unwrap();
            let paid: u128 = stakes.iter().map(|s| rate.entitlement(*s).unwrap()).sum();
            prop_assert!(paid <= amount);
            prop_assert!(amount - paid <= stakes.len() as u128);
        }
    }
}
