//! Single-pool staking ledger.
//!
//! Rewards are distributed by pull, not push. An injection only raises the
//! global accumulator; each account picks up its share the next time it is
//! settled, from the delta between the accumulator and its own checkpoint.
//! Every operation touches one account and a handful of totals, so cost does
//! not depend on how many participants exist or when they last acted.
//!
//! Each mutating operation runs in the same order:
//! 1. authorize the caller
//! 2. validate the input
//! 3. stage a settled copy of the account and the new totals
//! 4. call the value-transfer collaborator
//! 5. commit
//!
//! Any error before step 5 leaves the pool untouched.

pub mod invariants;
pub mod receipts;
pub mod stats;


use serde::{Deserialize, Serialize};
use std::hash::Hash;
use tracing::{debug, error, info};

use crate::account::{AccountId, Identity, ParticipantAccount, ParticipantRegistry};
use crate::accumulator::{Amount, RewardRate};
use crate::config::PoolConfig;
use crate::error::{PoolError, Result};
use crate::guard::{AccessGuard, Operation};
use crate::transfer::ValueTransfer;

pub use invariants::check_invariants;
pub use receipts::{CompoundReceipt, InjectionReceipt, StakeReceipt, WithdrawReceipt};
pub use stats::PoolStats;

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(bound(
    serialize = "I: Serialize",
    deserialize = "I: Deserialize<'de> + Eq + Hash"
))]
pub struct Pool<I = AccountId> {
    guard: AccessGuard<I>,
    total_staked: Amount,
    acc_reward_per_share: RewardRate,
    accounts: ParticipantRegistry<I>,

    // Running totals for auditing reward conservation
    total_injected: Amount,
    rewards_paid_out: Amount,
    rewards_compounded: Amount,
    injections: u64,
}

fn add(a: Amount, b: Amount, what: &'static str) -> Result<Amount> {
    a.checked_add(b).ok_or(PoolError::ArithmeticOverflow(what))
}

impl Pool<AccountId> {
    pub fn from_config(config: &PoolConfig) -> Self {
        Pool::new(config.pool.owner.clone())
    }
}

impl<I: Identity> Pool<I> {
    pub fn new(owner: I) -> Self {
        info!("Pool created (owner: {:?})", owner);
        Self {
            guard: AccessGuard::new(owner),
            total_staked: 0,
            acc_reward_per_share: RewardRate::zero(),
            accounts: ParticipantRegistry::new(),
            total_injected: 0,
            rewards_paid_out: 0,
            rewards_compounded: 0,
            injections: 0,
        }
    }

    /// Deposit `amount` of principal for `caller`.
    ///
    /// Earlier rewards are settled first, so the new principal only earns
    /// from injections made after this call.
    pub fn stake<T: ValueTransfer<I>>(
        &mut self,
        caller: &I,
        amount: Amount,
        transfer: &mut T,
    ) -> Result<StakeReceipt> {
        let result = self.try_stake(caller, amount, transfer);
        report(Operation::Stake, &result);
        result
    }

    fn try_stake<T: ValueTransfer<I>>(
        &mut self,
        caller: &I,
        amount: Amount,
        transfer: &mut T,
    ) -> Result<StakeReceipt> {
        self.guard.authorize(caller, Operation::Stake)?;
        if amount == 0 {
            return Err(PoolError::InvalidAmount);
        }

        let mut account = self.settled_account(caller)?;
        account.staked = add(account.staked, amount, "stake")?;
        account.deposit_count = account.deposit_count.saturating_add(1);
        let staked = account.staked;
        let total_staked = add(self.total_staked, amount, "total staked")?;

        transfer.credit(caller, amount)?;

        self.accounts.commit(caller, account);
        self.total_staked = total_staked;
        info!(
            "Stake: {:?} +{} (staked: {}, pool: {})",
            caller, amount, staked, total_staked
        );

        Ok(StakeReceipt {
            amount,
            staked,
            total_staked,
        })
    }

    /// Owner deposit distributed over everyone staked right now, in
    /// proportion to their stake. Later stakers get none of it.
    pub fn inject_reward<T: ValueTransfer<I>>(
        &mut self,
        caller: &I,
        amount: Amount,
        transfer: &mut T,
    ) -> Result<InjectionReceipt> {
        let result = self.try_inject_reward(caller, amount, transfer);
        report(Operation::InjectReward, &result);
        result
    }

    fn try_inject_reward<T: ValueTransfer<I>>(
        &mut self,
        caller: &I,
        amount: Amount,
        transfer: &mut T,
    ) -> Result<InjectionReceipt> {
        self.guard.authorize(caller, Operation::InjectReward)?;
        if amount == 0 {
            return Err(PoolError::InvalidAmount);
        }
        if self.total_staked == 0 {
            return Err(PoolError::NoParticipants);
        }

        let increment = RewardRate::increment(amount, self.total_staked)?;
        let acc_reward_per_share = self.acc_reward_per_share.add(&increment);
        let total_injected = add(self.total_injected, amount, "total injected")?;

        transfer.credit(caller, amount)?;

        self.acc_reward_per_share = acc_reward_per_share.clone();
        self.total_injected = total_injected;
        self.injections = self.injections.saturating_add(1);
        info!(
            "Reward injected: {} over {} staked (rate +{} -> {})",
            amount, self.total_staked, increment, acc_reward_per_share
        );

        Ok(InjectionReceipt {
            amount,
            rate_increment: increment,
            acc_reward_per_share,
        })
    }

    /// Turn all of the caller's reward into principal. No value moves.
    pub fn compound(&mut self, caller: &I) -> Result<CompoundReceipt> {
        let result = self.try_compound(caller);
        report(Operation::Compound, &result);
        result
    }

    fn try_compound(&mut self, caller: &I) -> Result<CompoundReceipt> {
        self.guard.authorize(caller, Operation::Compound)?;

        let mut account = self.settled_account(caller)?;
        let reward = account.settled_reward;
        if reward == 0 {
            return Err(PoolError::NoReward);
        }

        account.staked = add(account.staked, reward, "compound")?;
        account.settled_reward = 0;
        let staked = account.staked;
        let total_staked = add(self.total_staked, reward, "total staked")?;
        let rewards_compounded = add(self.rewards_compounded, reward, "rewards compounded")?;

        self.accounts.commit(caller, account);
        self.total_staked = total_staked;
        self.rewards_compounded = rewards_compounded;
        info!("Compound: {:?} reward {} -> staked {}", caller, reward, staked);

        Ok(CompoundReceipt {
            compounded: reward,
            staked,
            total_staked,
        })
    }

    /// Pay out principal plus reward and reset the account. There is no
    /// partial withdrawal.
    pub fn withdraw<T: ValueTransfer<I>>(
        &mut self,
        caller: &I,
        transfer: &mut T,
    ) -> Result<WithdrawReceipt> {
        let result = self.try_withdraw(caller, transfer);
        report(Operation::Withdraw, &result);
        result
    }

    fn try_withdraw<T: ValueTransfer<I>>(
        &mut self,
        caller: &I,
        transfer: &mut T,
    ) -> Result<WithdrawReceipt> {
        self.guard.authorize(caller, Operation::Withdraw)?;

        let mut account = self.settled_account(caller)?;
        let principal = account.staked;
        let reward = account.settled_reward;
        let payout = add(principal, reward, "payout")?;
        if payout == 0 {
            return Err(PoolError::NothingToWithdraw);
        }

        let total_staked = self.total_staked.checked_sub(principal).ok_or_else(|| {
            PoolError::InvariantViolation(format!(
                "withdrawal of {} exceeds pool stake {}",
                principal, self.total_staked
            ))
        })?;
        let rewards_paid_out = add(self.rewards_paid_out, reward, "rewards paid out")?;
        if add(rewards_paid_out, self.rewards_compounded, "rewards distributed")?
            > self.total_injected
        {
            return Err(PoolError::InvariantViolation(format!(
                "reward payout {} exceeds injected rewards {}",
                reward, self.total_injected
            )));
        }
        account.reset();

        transfer.debit(caller, payout)?;

        self.accounts.commit(caller, account);
        self.total_staked = total_staked;
        self.rewards_paid_out = rewards_paid_out;
        info!(
            "Withdraw: {:?} principal {} + reward {} = {} (pool: {})",
            caller, principal, reward, payout, total_staked
        );

        Ok(WithdrawReceipt {
            principal,
            reward,
            payout,
            total_staked,
        })
    }

    /// Current principal of `caller`; 0 if never registered.
    pub fn staked_balance(&self, caller: &I) -> Result<Amount> {
        self.guard.authorize(caller, Operation::StakedBalance)?;
        Ok(self.accounts.get(caller).map(|a| a.staked).unwrap_or(0))
    }

    /// Settled plus accrued reward of `caller`, computed without settling.
    pub fn pending_reward(&self, caller: &I) -> Result<Amount> {
        self.guard.authorize(caller, Operation::PendingReward)?;
        match self.accounts.get(caller) {
            Some(account) => account.total_reward(&self.acc_reward_per_share),
            None => Ok(0),
        }
    }

    pub fn total_staked(&self) -> Amount {
        self.total_staked
    }

    pub fn acc_reward_per_share(&self) -> &RewardRate {
        &self.acc_reward_per_share
    }

    pub fn owner(&self) -> &I {
        self.guard.owner()
    }

    pub fn guard(&self) -> &AccessGuard<I> {
        &self.guard
    }

    /// Read-only view of a participant record.
    pub fn account(&self, id: &I) -> Option<&ParticipantAccount> {
        self.accounts.get(id)
    }

    pub fn participants(&self) -> usize {
        self.accounts.len()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            total_staked: self.total_staked,
            acc_reward_per_share: self.acc_reward_per_share.clone(),
            participants: self.accounts.len() as u64,
            injections: self.injections,
            total_injected: self.total_injected,
            rewards_paid_out: self.rewards_paid_out,
            rewards_compounded: self.rewards_compounded,
        }
    }

    /// Staged copy of `caller`'s account, settled against the current
    /// accumulator.
    fn settled_account(&self, caller: &I) -> Result<ParticipantAccount> {
        let mut account = self.accounts.get_or_default(caller);
        let delta = account.settle(&self.acc_reward_per_share)?;
        if delta > 0 {
            debug!("Settled {} for {:?}", delta, caller);
        }
        Ok(account)
    }
}

impl<I> Pool<I>
where
    I: Identity + Serialize + for<'de> Deserialize<'de>,
{
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PoolError::Snapshot(e.to_string()))
    }

    /// Restore a snapshot. The restored ledger is audited before it is
    /// handed back.
    pub fn from_json(data: &str) -> Result<Self> {
        let pool: Self =
            serde_json::from_str(data).map_err(|e| PoolError::Snapshot(e.to_string()))?;
        check_invariants(&pool)?;
        Ok(pool)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| PoolError::Snapshot(e.to_string()))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let pool: Self =
            bincode::deserialize(data).map_err(|e| PoolError::Snapshot(e.to_string()))?;
        check_invariants(&pool)?;
        Ok(pool)
    }
}

fn report<T>(operation: Operation, result: &Result<T>) {
    if let Err(e) = result {
        if e.is_fatal() {
            error!("{} halted without committing: {}", operation, e);
        } else {
            debug!("{} rejected: {}", operation, e);
        }
    }
}
