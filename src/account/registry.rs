//! Participant registry

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

use super::types::{Identity, ParticipantAccount};
use crate::accumulator::Amount;

/// Owns every participant account. Operations read a copy, stage their
/// changes on it, and write it back with `commit` once nothing can fail.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(bound(
    serialize = "I: Serialize",
    deserialize = "I: Deserialize<'de> + Eq + Hash"
))]
pub struct ParticipantRegistry<I> {
    accounts: HashMap<I, ParticipantAccount>,
}

impl<I: Identity> ParticipantRegistry<I> {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    pub fn get(&self, id: &I) -> Option<&ParticipantAccount> {
        self.accounts.get(id)
    }

    /// Staged copy of the account, or a fresh one for an unknown caller.
    /// Nothing is registered until `commit`.
    pub fn get_or_default(&self, id: &I) -> ParticipantAccount {
        self.accounts.get(id).cloned().unwrap_or_default()
    }

    pub fn contains(&self, id: &I) -> bool {
        self.accounts.contains_key(id)
    }

    /// Write a staged account back
    pub fn commit(&mut self, id: &I, account: ParticipantAccount) {
        self.accounts.insert(id.clone(), account);
    }

    /// Number of registered participants
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Full scan. Audits and tests only; no ledger operation iterates.
    pub fn iter(&self) -> impl Iterator<Item = (&I, &ParticipantAccount)> {
        self.accounts.iter()
    }

    pub fn total_staked_sum(&self) -> Option<Amount> {
        self.accounts
            .values()
            .try_fold(0u128, |acc, a| acc.checked_add(a.staked))
    }
}

impl<I: Identity> Default for ParticipantRegistry<I> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::types::AccountId;

    #[test]
    fn test_lazy_registration() {
        let mut registry: ParticipantRegistry<AccountId> = ParticipantRegistry::new();
        let alice = "alice".to_string();

        let staged = registry.get_or_default(&alice);
        assert_eq!(staged, ParticipantAccount::default());
        assert!(!registry.contains(&alice));

        registry.commit(&alice, ParticipantAccount { staked: 7, ..staged });
        assert!(registry.contains(&alice));
        assert_eq!(registry.get(&alice).map(|a| a.staked), Some(7));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_total_staked_sum() {
        let mut registry: ParticipantRegistry<u32> = ParticipantRegistry::new();
        registry.commit(&1, ParticipantAccount { staked: 100, ..Default::default() });
        registry.commit(&2, ParticipantAccount { staked: 300, ..Default::default() });

        assert_eq!(registry.total_staked_sum(), Some(400));
    }
}
