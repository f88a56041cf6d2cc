//! Balance ledger trait.

use crate::LedgerError;
use aequitas_types::HolderAddress;

/// Trait for fungible balance operations.
///
/// The engines treat `transfer` as a trusted ledger primitive: it moves
/// shares unconditionally on sufficient balance, with no holder consent
/// check. Consent lives a layer up, in the operations that call it
/// (self-initiated transfers, forced buyout sweeps, claim resolutions).
pub trait FungibleLedger {
    fn balance_of(&self, holder: &HolderAddress) -> u128;

    /// Sum of all balances on this ledger.
    fn total_outstanding(&self) -> u128;

    /// All holders with a nonzero balance, in address order.
    /// Sweeps over holders rely on this order being deterministic.
    fn holders(&self) -> Vec<(HolderAddress, u128)>;

    fn transfer(
        &mut self,
        from: &HolderAddress,
        to: &HolderAddress,
        amount: u128,
    ) -> Result<(), LedgerError>;

    fn mint(&mut self, to: &HolderAddress, amount: u128) -> Result<(), LedgerError>;

    fn approve(&mut self, owner: &HolderAddress, spender: &HolderAddress, amount: u128);

    fn allowance(&self, owner: &HolderAddress, spender: &HolderAddress) -> u128;

    /// Allowance-gated pull: `spender` moves `amount` from `owner` to `to`.
    /// The allowance is checked before any balance moves and decremented
    /// only when the transfer succeeds.
    fn transfer_from(
        &mut self,
        spender: &HolderAddress,
        owner: &HolderAddress,
        to: &HolderAddress,
        amount: u128,
    ) -> Result<(), LedgerError>;
}
