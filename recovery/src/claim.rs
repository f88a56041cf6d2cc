//! Claim records and the per-ledger claim book.

use crate::events::ClaimEvent;
use aequitas_types::{ClaimState, CommitmentHash, HolderAddress, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A registered commitment awaiting its reveal.
///
/// The commitment hides the target address, so a prepared claim is keyed by
/// claimant only; nobody can tell which holder it aims at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedClaim {
    pub commitment: CommitmentHash,
    pub prepared_at: Timestamp,
}

/// A declared (or resolved) claim against a lost holder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub claimant: HolderAddress,
    pub lost_holder: HolderAddress,
    pub commitment: CommitmentHash,
    pub prepared_at: Timestamp,
    pub declared_at: Timestamp,
    /// The lost address's balance when the claim was declared. Resolution
    /// transfers the balance at resolution time, which may differ.
    pub declared_balance: u128,
    /// Collateral locked with the ledger custodian, returned on resolution.
    pub collateral: u128,
    /// Only `Declared` or `Resolved` ever appear in a stored record.
    pub state: ClaimState,
}

/// All claim state owned by one ledger instance.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClaimBook {
    /// Pending commitments, one per claimant. A fresh prepare replaces any
    /// earlier one.
    preclaims: HashMap<HolderAddress, PreparedClaim>,
    /// Claims keyed by the lost holder. A resolved record stays until a new
    /// declare cycle replaces it.
    claims: HashMap<HolderAddress, ClaimRecord>,
    /// Journal of observable transitions, drained by the host.
    events: Vec<ClaimEvent>,
}

impl ClaimBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// The commitment currently registered by `claimant`, if any.
    pub fn commitment_of(&self, claimant: &HolderAddress) -> Option<CommitmentHash> {
        self.preclaims.get(claimant).map(|p| p.commitment)
    }

    /// When `claimant` registered their current commitment.
    pub fn prepared_at(&self, claimant: &HolderAddress) -> Option<Timestamp> {
        self.preclaims.get(claimant).map(|p| p.prepared_at)
    }

    pub fn preclaim(&self, claimant: &HolderAddress) -> Option<&PreparedClaim> {
        self.preclaims.get(claimant)
    }

    /// The claim record for a lost holder, declared or resolved.
    pub fn record(&self, lost_holder: &HolderAddress) -> Option<&ClaimRecord> {
        self.claims.get(lost_holder)
    }

    /// The protocol state for a `(claimant, lost holder)` pair.
    ///
    /// `Prepared` only says the claimant has a pending commitment; the
    /// commitment itself never discloses the target.
    pub fn state_for(&self, claimant: &HolderAddress, lost_holder: &HolderAddress) -> ClaimState {
        if let Some(record) = self.claims.get(lost_holder) {
            if &record.claimant == claimant {
                return record.state;
            }
        }
        if self.preclaims.contains_key(claimant) {
            ClaimState::Prepared
        } else {
            ClaimState::None
        }
    }

    pub(crate) fn put_preclaim(&mut self, claimant: HolderAddress, prepared: PreparedClaim) {
        self.preclaims.insert(claimant, prepared);
    }

    pub(crate) fn take_preclaim(&mut self, claimant: &HolderAddress) -> Option<PreparedClaim> {
        self.preclaims.remove(claimant)
    }

    pub(crate) fn put_record(&mut self, record: ClaimRecord) {
        self.claims.insert(record.lost_holder.clone(), record);
    }

    pub(crate) fn record_mut(&mut self, lost_holder: &HolderAddress) -> Option<&mut ClaimRecord> {
        self.claims.get_mut(lost_holder)
    }

    pub(crate) fn push_event(&mut self, event: ClaimEvent) {
        self.events.push(event);
    }

    /// Drain and return all journaled events in order.
    pub fn drain_events(&mut self) -> Vec<ClaimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Peek at the journal without draining it.
    pub fn events(&self) -> &[ClaimEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_address(n: u8) -> HolderAddress {
        HolderAddress::new(format!("aeq_{:0>60}", n))
    }

    #[test]
    fn state_for_distinguishes_pairs() {
        let mut book = ClaimBook::new();
        let claimant = test_address(1);
        let lost = test_address(2);
        let stranger = test_address(3);

        assert_eq!(book.state_for(&claimant, &lost), ClaimState::None);

        book.put_preclaim(
            claimant.clone(),
            PreparedClaim {
                commitment: CommitmentHash::ZERO,
                prepared_at: Timestamp::EPOCH,
            },
        );
        assert_eq!(book.state_for(&claimant, &lost), ClaimState::Prepared);
        assert_eq!(book.state_for(&stranger, &lost), ClaimState::None);

        book.put_record(ClaimRecord {
            claimant: claimant.clone(),
            lost_holder: lost.clone(),
            commitment: CommitmentHash::ZERO,
            prepared_at: Timestamp::EPOCH,
            declared_at: Timestamp::new(100),
            declared_balance: 50,
            collateral: 50,
            state: ClaimState::Declared,
        });
        book.take_preclaim(&claimant);
        assert_eq!(book.state_for(&claimant, &lost), ClaimState::Declared);
        // Another claimant sees no claim of their own on the same holder.
        assert_eq!(book.state_for(&stranger, &lost), ClaimState::None);
    }

    #[test]
    fn re_prepare_replaces_commitment() {
        let mut book = ClaimBook::new();
        let claimant = test_address(1);

        book.put_preclaim(
            claimant.clone(),
            PreparedClaim {
                commitment: CommitmentHash::new([1u8; 32]),
                prepared_at: Timestamp::new(10),
            },
        );
        book.put_preclaim(
            claimant.clone(),
            PreparedClaim {
                commitment: CommitmentHash::new([2u8; 32]),
                prepared_at: Timestamp::new(20),
            },
        );

        assert_eq!(
            book.commitment_of(&claimant),
            Some(CommitmentHash::new([2u8; 32]))
        );
        assert_eq!(book.prepared_at(&claimant), Some(Timestamp::new(20)));
    }
}
