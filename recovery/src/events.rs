//! Observable claim-recovery events.

use aequitas_types::{CommitmentHash, HolderAddress};
use serde::{Deserialize, Serialize};

/// Events appended to the claim book's journal, one per state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimEvent {
    /// A commitment was registered (or replaced) for `claimer`.
    ClaimPrepared {
        claimer: HolderAddress,
        commitment: CommitmentHash,
    },
    /// A claim was declared and collateralized. `balance` is the lost
    /// address's balance at declaration time.
    ClaimMade {
        claimant: HolderAddress,
        lost_address: HolderAddress,
        balance: u128,
    },
    /// A claim was resolved; the lost balance moved to the claimant and
    /// `collateral` was returned.
    ClaimResolved {
        claimant: HolderAddress,
        lost_address: HolderAddress,
        collateral: u128,
    },
}
