use serde::{Deserialize, Serialize};

use crate::accumulator::{Amount, RewardRate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub total_staked: Amount,
    pub acc_reward_per_share: RewardRate,
    pub participants: u64,
    pub injections: u64,
    pub total_injected: Amount,
    pub rewards_paid_out: Amount,
    pub rewards_compounded: Amount,
}

impl PoolStats {
    /// Reward handed out so far, by withdrawal or compounding.
    pub fn rewards_distributed(&self) -> Amount {
        self.rewards_paid_out.saturating_add(self.rewards_compounded)
    }
}
