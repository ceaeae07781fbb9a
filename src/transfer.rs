//! Value-transfer boundary.
//!
//! The pool never moves value itself. It finalizes its bookkeeping, asks the
//! collaborator to move funds, and commits only if that succeeded. Both
//! calls must be atomic: they either apply fully or return an error having
//! changed nothing.

use crate::accumulator::Amount;
use crate::error::TransferError;

pub trait ValueTransfer<I> {
    /// `from` deposits `amount` into pool custody.
    fn credit(&mut self, from: &I, amount: Amount) -> Result<(), TransferError>;

    /// Pool custody releases `amount` to `to`.
    fn debit(&mut self, to: &I, amount: Amount) -> Result<(), TransferError>;
}
