//! Observable acquisition events.

use crate::offer::OfferId;
use aequitas_types::{HolderAddress, VoteChoice};
use serde::{Deserialize, Serialize};

/// Events appended to the offer book's journal, one per state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcquisitionEvent {
    /// A funded offer opened at a fixed price.
    Initiated {
        offer: OfferId,
        acquirer: HolderAddress,
        price_per_share: u128,
    },
    /// A holder voted (or changed their vote). Tallies are the running
    /// totals after this vote.
    VoteCast {
        offer: OfferId,
        voter: HolderAddress,
        choice: VoteChoice,
        yes_votes: u128,
        no_votes: u128,
    },
    /// Quorum was reached and the forced buyout executed.
    Completed {
        offer: OfferId,
        acquirer: HolderAddress,
        price_per_share: u128,
        yes_votes: u128,
        no_votes: u128,
    },
}
