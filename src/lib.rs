//! Compass single-pool staking ledger.
//!
//! Participants stake into one shared pool; the owner injects rewards that
//! are split pro rata over whoever is staked at that moment. Accrual is
//! tracked by a fixed-point accumulator, so no operation ever walks the
//! participant set.

pub mod accumulator;
pub mod account;
pub mod error;
pub mod guard;
pub mod transfer;
pub mod pool;
pub mod shared;
pub mod config;
pub mod logging;

pub use account::{AccountId, Custody, Identity, ParticipantAccount};
pub use accumulator::{Amount, RewardRate, SCALE};
pub use config::PoolConfig;
pub use error::{PoolError, Result, TransferError};
pub use guard::{AccessGuard, CallerClass, Operation};
pub use pool::{check_invariants, Pool, PoolStats};
pub use shared::SharedPool;
pub use transfer::ValueTransfer;
