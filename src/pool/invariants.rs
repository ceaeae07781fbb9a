//! Full-ledger audit.
//!
//! Walks every account, so it is O(participants). Ledger operations never
//! call it; tests and snapshot restore do.

use super::Pool;
use crate::account::Identity;
use crate::error::{PoolError, Result};

/// Check all invariants. Returns Err on the first one violated.
pub fn check_invariants<I: Identity>(pool: &Pool<I>) -> Result<()> {
    // OwnerNeverParticipates
    if pool.accounts.contains(pool.guard.owner()) {
        return Err(PoolError::InvariantViolation(format!(
            "owner {:?} holds a participant account",
            pool.guard.owner()
        )));
    }

    // StakeConservation
    let staked_sum = pool
        .accounts
        .total_staked_sum()
        .ok_or(PoolError::ArithmeticOverflow("staked sum"))?;
    if staked_sum != pool.total_staked {
        return Err(PoolError::InvariantViolation(format!(
            "accounts hold {} but pool records {}",
            staked_sum, pool.total_staked
        )));
    }

    // CheckpointNotAhead: total_reward fails on a future checkpoint
    let mut outstanding: u128 = 0;
    for (_, account) in pool.accounts.iter() {
        let reward = account.total_reward(&pool.acc_reward_per_share)?;
        outstanding = outstanding
            .checked_add(reward)
            .ok_or(PoolError::ArithmeticOverflow("outstanding rewards"))?;
    }

    // RewardConservation
    let distributed = outstanding
        .checked_add(pool.rewards_paid_out)
        .and_then(|v| v.checked_add(pool.rewards_compounded))
        .ok_or(PoolError::ArithmeticOverflow("distributed rewards"))?;
    if distributed > pool.total_injected {
        return Err(PoolError::InvariantViolation(format!(
            "rewards owed or paid {} exceed injected {}",
            distributed, pool.total_injected
        )));
    }

    Ok(())
}
