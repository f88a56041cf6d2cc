//! In-memory balance ledger.

use std::collections::HashMap;

use crate::{FungibleLedger, LedgerError};
use aequitas_types::HolderAddress;
use serde::{Deserialize, Serialize};

/// In-memory fungible ledger with O(1) balance lookups.
///
/// `total` is maintained incrementally on mint (transfers conserve it), so
/// `total_outstanding()` never walks the balance map. Zeroed balances and
/// allowances are removed so iteration stays proportional to live holders.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TokenRegistry {
    balances: HashMap<HolderAddress, u128>,
    allowances: HashMap<(HolderAddress, HolderAddress), u128>,
    total: u128,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Debit `from` and credit `to`, both sides validated before either side
    /// is written. Self-transfers validate and leave the ledger untouched.
    fn move_balance(
        &mut self,
        from: &HolderAddress,
        to: &HolderAddress,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available: from_balance,
            });
        }
        if from == to || amount == 0 {
            return Ok(());
        }
        let to_balance = self.balance_of(to);
        let new_to = to_balance
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;

        let new_from = from_balance - amount;
        if new_from == 0 {
            self.balances.remove(from);
        } else {
            self.balances.insert(from.clone(), new_from);
        }
        self.balances.insert(to.clone(), new_to);
        Ok(())
    }
}

impl FungibleLedger for TokenRegistry {
    fn balance_of(&self, holder: &HolderAddress) -> u128 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    fn total_outstanding(&self) -> u128 {
        self.total
    }

    fn holders(&self) -> Vec<(HolderAddress, u128)> {
        let mut holders: Vec<(HolderAddress, u128)> = self
            .balances
            .iter()
            .map(|(addr, balance)| (addr.clone(), *balance))
            .collect();
        holders.sort_by(|a, b| a.0.cmp(&b.0));
        holders
    }

    fn transfer(
        &mut self,
        from: &HolderAddress,
        to: &HolderAddress,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.move_balance(from, to, amount)
    }

    fn mint(&mut self, to: &HolderAddress, amount: u128) -> Result<(), LedgerError> {
        let new_total = self
            .total
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;
        // Balance cannot overflow if the total does not: every balance is
        // bounded by the total.
        let balance = self.balances.entry(to.clone()).or_insert(0);
        *balance += amount;
        if *balance == 0 {
            self.balances.remove(to);
        }
        self.total = new_total;
        Ok(())
    }

    fn approve(&mut self, owner: &HolderAddress, spender: &HolderAddress, amount: u128) {
        let key = (owner.clone(), spender.clone());
        if amount == 0 {
            self.allowances.remove(&key);
        } else {
            self.allowances.insert(key, amount);
        }
    }

    fn allowance(&self, owner: &HolderAddress, spender: &HolderAddress) -> u128 {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    fn transfer_from(
        &mut self,
        spender: &HolderAddress,
        owner: &HolderAddress,
        to: &HolderAddress,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let approved = self.allowance(owner, spender);
        if approved < amount {
            return Err(LedgerError::InsufficientAllowance {
                needed: amount,
                approved,
            });
        }
        self.move_balance(owner, to, amount)?;
        self.approve(owner, spender, approved - amount);
        Ok(())
    }
}
