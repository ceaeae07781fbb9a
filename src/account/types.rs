//! Participant account definitions

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

use crate::accumulator::{Amount, RewardRate};
use crate::error::{PoolError, Result};

/// Default caller identifier - human-readable name
pub type AccountId = String;

/// Opaque caller identity. The ledger only compares and hashes it.
pub trait Identity: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Identity for T {}

/// Per-participant ledger record
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ParticipantAccount {
    /// Principal contributed to the pool's total stake
    pub staked: Amount,

    /// Accumulator value at the last settlement
    pub checkpoint: RewardRate,

    /// Reward already computed and not yet withdrawn or compounded
    pub settled_reward: Amount,

    /// Every reward ever settled to this account, kept across withdrawals
    pub lifetime_rewards: Amount,

    pub deposit_count: u64,
}

impl ParticipantAccount {
    /// Reward accrued since the checkpoint, without touching state.
    pub fn pending(&self, rate: &RewardRate) -> Result<Amount> {
        rate.delta_since(&self.checkpoint)?.entitlement(self.staked)
    }

    /// Fold the accrued delta into `settled_reward` and move the checkpoint
    /// up to `rate`. Returns the delta.
    ///
    /// Must run before `staked` changes. A second call at the same rate
    /// settles nothing.
    pub fn settle(&mut self, rate: &RewardRate) -> Result<Amount> {
        let delta = self.pending(rate)?;
        self.settled_reward = self
            .settled_reward
            .checked_add(delta)
            .ok_or(PoolError::ArithmeticOverflow("settled reward"))?;
        self.lifetime_rewards = self
            .lifetime_rewards
            .checked_add(delta)
            .ok_or(PoolError::ArithmeticOverflow("lifetime rewards"))?;
        self.checkpoint = rate.clone();
        Ok(delta)
    }

    /// Settled plus unsettled reward at `rate`.
    pub fn total_reward(&self, rate: &RewardRate) -> Result<Amount> {
        self.settled_reward
            .checked_add(self.pending(rate)?)
            .ok_or(PoolError::ArithmeticOverflow("reward"))
    }

    /// Reset after a full withdrawal. The account stays registered.
    pub fn reset(&mut self) {
        self.staked = 0;
        self.settled_reward = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.staked == 0 && self.settled_reward == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::SCALE;

    fn rate(units: u128) -> RewardRate {
        RewardRate::from_scaled(units * SCALE)
    }

    #[test]
    fn test_settle_moves_checkpoint() {
        let mut account = ParticipantAccount {
            staked: 100,
            ..Default::default()
        };

        let delta = account.settle(&rate(2)).unwrap();
        assert_eq!(delta, 200);
        assert_eq!(account.settled_reward, 200);
        assert_eq!(account.checkpoint, rate(2));
    }

    #[test]
    fn test_settle_is_idempotent() {
        let mut account = ParticipantAccount {
            staked: 100,
            ..Default::default()
        };
        account.settle(&rate(3)).unwrap();
        let snapshot = account.clone();

        assert_eq!(account.settle(&rate(3)).unwrap(), 0);
        assert_eq!(account, snapshot);
    }

    #[test]
    fn test_pending_does_not_mutate() {
        let account = ParticipantAccount {
            staked: 10,
            checkpoint: rate(1),
            settled_reward: 5,
            ..Default::default()
        };
        assert_eq!(account.pending(&rate(4)).unwrap(), 30);
        assert_eq!(account.total_reward(&rate(4)).unwrap(), 35);
        assert_eq!(account.settled_reward, 5);
    }

    #[test]
    fn test_reset_keeps_lifetime_rewards() {
        let mut account = ParticipantAccount {
            staked: 50,
            ..Default::default()
        };
        account.settle(&rate(1)).unwrap();
        account.reset();

        assert!(account.is_empty());
        assert_eq!(account.lifetime_rewards, 50);
    }
}
