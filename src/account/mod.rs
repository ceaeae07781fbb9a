//! Participant accounts
//!
//! - Per-participant stake and reward records
//! - The registry that owns them
//! - In-memory custody implementing the value-transfer boundary

pub mod types;
pub mod registry;
pub mod custody;

pub use types::{AccountId, Identity, ParticipantAccount};
pub use registry::ParticipantRegistry;
pub use custody::Custody;
