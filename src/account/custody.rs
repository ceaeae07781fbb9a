//! In-memory custody for pool funds and participant wallets

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

use super::types::Identity;
use crate::accumulator::Amount;
use crate::error::TransferError;
use crate::transfer::ValueTransfer;

/// Wallet balances per identity plus the pool's own custody balance.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(bound(
    serialize = "I: Serialize",
    deserialize = "I: Deserialize<'de> + Eq + Hash"
))]
pub struct Custody<I> {
    wallets: HashMap<I, Amount>,
    custody: Amount,
}

impl<I: Identity> Custody<I> {
    pub fn new() -> Self {
        Self {
            wallets: HashMap::new(),
            custody: 0,
        }
    }

    /// Get wallet balance for an identity
    pub fn wallet_balance(&self, id: &I) -> Amount {
        self.wallets.get(id).copied().unwrap_or(0)
    }

    /// Funds currently held by the pool
    pub fn custody_balance(&self) -> Amount {
        self.custody
    }

    /// Mint funds into a wallet (genesis / test setup)
    pub fn fund(&mut self, id: &I, amount: Amount) -> Result<(), TransferError> {
        let current = self.wallet_balance(id);
        let new_balance = current
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;
        self.wallets.insert(id.clone(), new_balance);
        Ok(())
    }
}

impl<I: Identity> ValueTransfer<I> for Custody<I> {
    fn credit(&mut self, from: &I, amount: Amount) -> Result<(), TransferError> {
        if amount == 0 {
            return Ok(());
        }

        let available = self.wallet_balance(from);
        if available < amount {
            return Err(TransferError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        // Check both sides before touching either
        let new_custody = self
            .custody
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;

        let remaining = available - amount;
        if remaining == 0 {
            self.wallets.remove(from);
        } else {
            self.wallets.insert(from.clone(), remaining);
        }
        self.custody = new_custody;
        Ok(())
    }

    fn debit(&mut self, to: &I, amount: Amount) -> Result<(), TransferError> {
        if amount == 0 {
            return Ok(());
        }

        if self.custody < amount {
            return Err(TransferError::InsufficientFunds {
                needed: amount,
                available: self.custody,
            });
        }
        let new_balance = self
            .wallet_balance(to)
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;

        self.custody -= amount;
        self.wallets.insert(to.clone(), new_balance);
        Ok(())
    }
}

impl<I: Identity> Default for Custody<I> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_and_debit() {
        let mut custody: Custody<String> = Custody::new();
        let alice = "alice".to_string();
        custody.fund(&alice, 1000).unwrap();

        custody.credit(&alice, 300).unwrap();
        assert_eq!(custody.wallet_balance(&alice), 700);
        assert_eq!(custody.custody_balance(), 300);

        custody.debit(&alice, 100).unwrap();
        assert_eq!(custody.wallet_balance(&alice), 800);
        assert_eq!(custody.custody_balance(), 200);
    }

    #[test]
    fn test_insufficient_funds_changes_nothing() {
        let mut custody: Custody<String> = Custody::new();
        let bob = "bob".to_string();
        custody.fund(&bob, 10).unwrap();

        let err = custody.credit(&bob, 11).unwrap_err();
        assert_eq!(err, TransferError::InsufficientFunds { needed: 11, available: 10 });
        assert_eq!(custody.wallet_balance(&bob), 10);
        assert_eq!(custody.custody_balance(), 0);

        assert!(custody.debit(&bob, 1).is_err());
        assert_eq!(custody.wallet_balance(&bob), 10);
    }

    #[test]
    fn test_fund_overflow() {
        let mut custody: Custody<u8> = Custody::new();
        custody.fund(&1, u128::MAX).unwrap();
        assert_eq!(custody.fund(&1, 1), Err(TransferError::Overflow));
    }
}
