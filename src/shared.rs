//! Thread-safe handle to a pool.
//!
//! Mutations take the write lock and so run one at a time. Queries take the
//! read lock and may run together; each sees the accumulator, the totals and
//! the target account from the same committed state.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::account::{AccountId, Identity};
use crate::accumulator::Amount;
use crate::error::{PoolError, Result};
use crate::pool::{
    CompoundReceipt, InjectionReceipt, Pool, PoolStats, StakeReceipt, WithdrawReceipt,
};
use crate::transfer::ValueTransfer;

#[derive(Debug)]
pub struct SharedPool<I = AccountId> {
    inner: Arc<RwLock<Pool<I>>>,
}

impl<I> Clone for SharedPool<I> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I: Identity> SharedPool<I> {
    pub fn new(pool: Pool<I>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(pool)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Pool<I>>> {
        self.inner.read().map_err(|_| PoolError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Pool<I>>> {
        self.inner.write().map_err(|_| PoolError::LockPoisoned)
    }

    pub fn stake<T: ValueTransfer<I>>(
        &self,
        caller: &I,
        amount: Amount,
        transfer: &mut T,
    ) -> Result<StakeReceipt> {
        self.write()?.stake(caller, amount, transfer)
    }

    pub fn inject_reward<T: ValueTransfer<I>>(
        &self,
        caller: &I,
        amount: Amount,
        transfer: &mut T,
    ) -> Result<InjectionReceipt> {
        self.write()?.inject_reward(caller, amount, transfer)
    }

    pub fn compound(&self, caller: &I) -> Result<CompoundReceipt> {
        self.write()?.compound(caller)
    }

    pub fn withdraw<T: ValueTransfer<I>>(
        &self,
        caller: &I,
        transfer: &mut T,
    ) -> Result<WithdrawReceipt> {
        self.write()?.withdraw(caller, transfer)
    }

    pub fn staked_balance(&self, caller: &I) -> Result<Amount> {
        self.read()?.staked_balance(caller)
    }

    pub fn pending_reward(&self, caller: &I) -> Result<Amount> {
        self.read()?.pending_reward(caller)
    }

    pub fn total_staked(&self) -> Result<Amount> {
        Ok(self.read()?.total_staked())
    }

    pub fn stats(&self) -> Result<PoolStats> {
        Ok(self.read()?.stats())
    }

    /// Run `f` against one consistent view of the pool.
    pub fn with_snapshot<R>(&self, f: impl FnOnce(&Pool<I>) -> R) -> Result<R> {
        let pool = self.read()?;
        Ok(f(&pool))
    }
}
