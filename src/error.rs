use thiserror::Error;

use crate::guard::Operation;

/// Failure reported by the external value-transfer collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Insufficient funds: needed {needed}, available {available}")]
    InsufficientFunds { needed: u128, available: u128 },
    #[error("Balance overflow")]
    Overflow,
    #[error("Transfer rejected: {0}")]
    Rejected(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Forbidden: caller may not perform {operation}")]
    Forbidden { operation: Operation },
    #[error("Invalid amount: must be greater than zero")]
    InvalidAmount,
    #[error("No participants: nothing is staked in the pool")]
    NoParticipants,
    #[error("No reward to compound")]
    NoReward,
    #[error("Nothing to withdraw")]
    NothingToWithdraw,
    #[error("Arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
    #[error("Transfer failed: {0}")]
    Transfer(#[from] TransferError),
    #[error("Pool lock poisoned")]
    LockPoisoned,
    #[error("Config error: {0}")]
    Config(String),
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

impl PoolError {
    /// Integrity failures. The operation halted without committing, but the
    /// inputs that caused it are outside anything the ledger can represent.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PoolError::ArithmeticOverflow(_) | PoolError::InvariantViolation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PoolError>;
