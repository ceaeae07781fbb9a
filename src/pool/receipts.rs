use serde::{Deserialize, Serialize};

use crate::accumulator::{Amount, RewardRate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeReceipt {
    pub amount: Amount,
    /// Caller's principal after the deposit
    pub staked: Amount,
    pub total_staked: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectionReceipt {
    pub amount: Amount,
    pub rate_increment: RewardRate,
    pub acc_reward_per_share: RewardRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundReceipt {
    pub compounded: Amount,
    pub staked: Amount,
    pub total_staked: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawReceipt {
    pub principal: Amount,
    pub reward: Amount,
    /// `principal + reward`, released to the caller
    pub payout: Amount,
    pub total_staked: Amount,
}
