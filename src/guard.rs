//! Caller classification and operation authorization

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::account::Identity;
use crate::error::{PoolError, Result};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallerClass {
    /// The single identity fixed at pool creation
    Owner,
    /// Anyone else
    Participant,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Stake,
    InjectReward,
    Compound,
    Withdraw,
    StakedBalance,
    PendingReward,
}

impl Operation {
    /// Caller class allowed to run the operation
    pub fn required_class(self) -> CallerClass {
        match self {
            Operation::InjectReward => CallerClass::Owner,
            Operation::Stake
            | Operation::Compound
            | Operation::Withdraw
            | Operation::StakedBalance
            | Operation::PendingReward => CallerClass::Participant,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Stake => "stake",
            Operation::InjectReward => "inject_reward",
            Operation::Compound => "compound",
            Operation::Withdraw => "withdraw",
            Operation::StakedBalance => "staked_balance",
            Operation::PendingReward => "pending_reward",
        };
        f.write_str(name)
    }
}

/// Checks every call against the owner identity before it reaches the
/// ledger.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AccessGuard<I> {
    owner: I,
}

impl<I: Identity> AccessGuard<I> {
    pub fn new(owner: I) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> &I {
        &self.owner
    }

    pub fn is_owner(&self, caller: &I) -> bool {
        *caller == self.owner
    }

    pub fn classify(&self, caller: &I) -> CallerClass {
        if self.is_owner(caller) {
            CallerClass::Owner
        } else {
            CallerClass::Participant
        }
    }

    pub fn authorize(&self, caller: &I, operation: Operation) -> Result<CallerClass> {
        let class = self.classify(caller);
        if operation.required_class() != class {
            warn!("Rejected {} from {:?} ({:?})", operation, caller, class);
            return Err(PoolError::Forbidden { operation });
        }
        Ok(class)
    }
}
