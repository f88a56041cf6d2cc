//! Acquisition offers and the per-ledger offer book.

use crate::events::AcquisitionEvent;
use aequitas_types::{HolderAddress, OfferState, Timestamp, VoteChoice};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sequential identifier of an offer within one ledger instance.
pub type OfferId = u64;

/// A holder's recorded position on an offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastVote {
    pub choice: VoteChoice,
    /// The weight this vote currently contributes to its tally. Recorded at
    /// the balance the voter held when voting, then migrated share-for-share
    /// as balances move.
    pub weight: u128,
}

/// A drag-along offer with running vote tallies.
///
/// Invariant: `yes_votes + no_votes <= outstanding_at_creation`. Upheld by
/// recording per-voter weights, migrating them on transfers, and the ledger
/// freezing issuance while the offer is open.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AcquisitionOffer {
    pub id: OfferId,
    pub acquirer: HolderAddress,
    /// Raw collateral-currency units paid per share unit. Fixed at initiation.
    pub price_per_share: u128,
    pub yes_votes: u128,
    pub no_votes: u128,
    pub created_at: Timestamp,
    /// Denominator of the absolute quorum, snapshotted at initiation.
    pub outstanding_at_creation: u128,
    pub state: OfferState,
    votes: HashMap<HolderAddress, CastVote>,
}

impl AcquisitionOffer {
    pub fn new(
        id: OfferId,
        acquirer: HolderAddress,
        price_per_share: u128,
        outstanding_at_creation: u128,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            acquirer,
            price_per_share,
            yes_votes: 0,
            no_votes: 0,
            created_at,
            outstanding_at_creation,
            state: OfferState::Open,
            votes: HashMap::new(),
        }
    }

    pub fn has_voted_yes(&self, holder: &HolderAddress) -> bool {
        matches!(
            self.votes.get(holder),
            Some(CastVote {
                choice: VoteChoice::Yes,
                ..
            })
        )
    }

    pub fn has_voted_no(&self, holder: &HolderAddress) -> bool {
        matches!(
            self.votes.get(holder),
            Some(CastVote {
                choice: VoteChoice::No,
                ..
            })
        )
    }

    pub fn vote_of(&self, holder: &HolderAddress) -> Option<CastVote> {
        self.votes.get(holder).copied()
    }

    pub fn votes_cast(&self) -> u128 {
        self.yes_votes + self.no_votes
    }

    /// Record a vote at the given weight, first unwinding any previous vote
    /// by this holder. A same-direction re-vote refreshes the weight to the
    /// holder's current balance.
    pub(crate) fn record_vote(&mut self, voter: HolderAddress, choice: VoteChoice, weight: u128) {
        if let Some(previous) = self.votes.get(&voter).copied() {
            *self.tally_mut(previous.choice) -= previous.weight;
        }
        // Weights are bounded by balances, so a tally never exceeds the
        // outstanding supply and cannot overflow.
        *self.tally_mut(choice) += weight;
        self.votes.insert(voter, CastVote { choice, weight });
    }

    /// Migrate recorded vote weight along a share transfer.
    ///
    /// The sender's recorded weight shrinks by the amount moved (capped at
    /// what was recorded); a receiver who has voted sees their side grow by
    /// the full amount. The voted flags themselves never clear.
    pub(crate) fn migrate_votes(&mut self, from: &HolderAddress, to: &HolderAddress, amount: u128) {
        if let Some(vote) = self.votes.get_mut(from) {
            let moved = vote.weight.min(amount);
            vote.weight -= moved;
            let choice = vote.choice;
            *self.tally_mut(choice) -= moved;
        }
        if let Some(vote) = self.votes.get_mut(to) {
            vote.weight += amount;
            let choice = vote.choice;
            *self.tally_mut(choice) += amount;
        }
    }

    fn tally_mut(&mut self, choice: VoteChoice) -> &mut u128 {
        match choice {
            VoteChoice::Yes => &mut self.yes_votes,
            VoteChoice::No => &mut self.no_votes,
        }
    }

    /// Absolute quorum: yes votes against everything outstanding when the
    /// offer opened. Available at any time.
    pub fn meets_absolute_quorum(&self, quorum_bps: u32) -> bool {
        self.yes_votes >= bps_ceil(self.outstanding_at_creation, quorum_bps)
    }

    /// Relative quorum: yes votes against votes actually cast. Only
    /// meaningful once someone has voted.
    pub fn meets_relative_quorum(&self, quorum_bps: u32) -> bool {
        self.votes_cast() > 0 && self.yes_votes >= bps_ceil(self.votes_cast(), quorum_bps)
    }
}

/// Ceiling of `base * bps / 10_000`, exact and overflow-free for any `base`
/// when `bps <= 10_000`.
pub(crate) fn bps_ceil(base: u128, bps: u32) -> u128 {
    let bps = bps as u128;
    let rem = (base % 10_000) * bps;
    (base / 10_000) * bps + rem / 10_000 + u128::from(rem % 10_000 != 0)
}

/// All acquisition state owned by one ledger instance.
///
/// A single slot: at most one live offer, and a completed offer occupies the
/// slot forever. The registry has been bought out and stays that way.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OfferBook {
    current: Option<AcquisitionOffer>,
    next_id: OfferId,
    events: Vec<AcquisitionEvent>,
}

impl OfferBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current (or most recent) offer, whatever its state.
    pub fn current_offer(&self) -> Option<&AcquisitionOffer> {
        self.current.as_ref()
    }

    /// The current offer if it is still collecting votes.
    pub fn open_offer(&self) -> Option<&AcquisitionOffer> {
        self.current.as_ref().filter(|o| o.state.is_open())
    }

    pub(crate) fn open_offer_mut(&mut self) -> Option<&mut AcquisitionOffer> {
        self.current.as_mut().filter(|o| o.state.is_open())
    }

    /// Whether the drag-along ever executed on this ledger.
    pub fn was_acquired(&self) -> bool {
        self.current
            .as_ref()
            .map(|o| o.state == OfferState::Completed)
            .unwrap_or(false)
    }

    pub(crate) fn allocate_id(&mut self) -> OfferId {
        self.next_id += 1;
        self.next_id
    }

    pub(crate) fn put_offer(&mut self, offer: AcquisitionOffer) {
        self.current = Some(offer);
    }

    pub(crate) fn push_event(&mut self, event: AcquisitionEvent) {
        self.events.push(event);
    }

    /// Drain and return all journaled events in order.
    pub fn drain_events(&mut self) -> Vec<AcquisitionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Peek at the journal without draining it.
    pub fn events(&self) -> &[AcquisitionEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_address(n: u8) -> HolderAddress {
        HolderAddress::new(format!("aeq_{:0>60}", n))
    }

    fn test_offer(outstanding: u128) -> AcquisitionOffer {
        AcquisitionOffer::new(1, test_address(9), 2, outstanding, Timestamp::new(0))
    }

    #[test]
    fn revote_moves_recorded_weight() {
        let mut offer = test_offer(10_000);
        let alice = test_address(1);

        offer.record_vote(alice.clone(), VoteChoice::Yes, 3_000);
        assert_eq!(offer.yes_votes, 3_000);
        assert!(offer.has_voted_yes(&alice));

        offer.record_vote(alice.clone(), VoteChoice::No, 3_000);
        assert_eq!(offer.yes_votes, 0);
        assert_eq!(offer.no_votes, 3_000);
        assert!(offer.has_voted_no(&alice));
        assert!(!offer.has_voted_yes(&alice));
    }

    #[test]
    fn same_direction_revote_refreshes_weight() {
        let mut offer = test_offer(10_000);
        let alice = test_address(1);

        offer.record_vote(alice.clone(), VoteChoice::Yes, 3_000);
        // Alice's balance changed; she votes again at the new weight.
        offer.record_vote(alice.clone(), VoteChoice::Yes, 1_200);

        assert_eq!(offer.yes_votes, 1_200);
        assert_eq!(offer.vote_of(&alice).unwrap().weight, 1_200);
    }

    #[test]
    fn migration_shrinks_sender_and_grows_voted_receiver() {
        let mut offer = test_offer(10_000);
        let alice = test_address(1);
        let bob = test_address(2);
        let carol = test_address(3);

        offer.record_vote(alice.clone(), VoteChoice::Yes, 3_000);
        offer.record_vote(bob.clone(), VoteChoice::No, 1_000);

        // Alice sends 1_000 to Bob: yes shrinks, no grows.
        offer.migrate_votes(&alice, &bob, 1_000);
        assert_eq!(offer.yes_votes, 2_000);
        assert_eq!(offer.no_votes, 2_000);

        // Alice sends 5_000 to Carol (never voted): only the recorded
        // remainder leaves the tally, nothing lands anywhere.
        offer.migrate_votes(&alice, &carol, 5_000);
        assert_eq!(offer.yes_votes, 0);
        assert_eq!(offer.no_votes, 2_000);
        assert_eq!(offer.vote_of(&alice).unwrap().weight, 0);
        // The flag survives at weight zero.
        assert!(offer.has_voted_yes(&alice));
    }

    #[test]
    fn migration_between_nonvoters_changes_nothing() {
        let mut offer = test_offer(10_000);
        offer.record_vote(test_address(1), VoteChoice::Yes, 3_000);

        offer.migrate_votes(&test_address(4), &test_address(5), 2_000);

        assert_eq!(offer.yes_votes, 3_000);
        assert_eq!(offer.no_votes, 0);
    }

    #[test]
    fn absolute_quorum_thresholds_are_exact() {
        let mut offer = test_offer(10_000);
        offer.record_vote(test_address(1), VoteChoice::Yes, 7_499);
        assert!(!offer.meets_absolute_quorum(7_500));

        offer.record_vote(test_address(2), VoteChoice::Yes, 1);
        assert!(offer.meets_absolute_quorum(7_500));
    }

    #[test]
    fn absolute_quorum_rounds_up_on_fractions() {
        // 75% of 10_001 is 7_500.75, so 7_501 yes votes are required.
        let mut offer = test_offer(10_001);
        offer.record_vote(test_address(1), VoteChoice::Yes, 7_500);
        assert!(!offer.meets_absolute_quorum(7_500));

        offer.record_vote(test_address(2), VoteChoice::Yes, 1);
        assert!(offer.meets_absolute_quorum(7_500));
    }

    #[test]
    fn relative_quorum_needs_at_least_one_vote() {
        let offer = test_offer(10_000);
        assert!(!offer.meets_relative_quorum(5_000));
    }

    #[test]
    fn relative_quorum_tracks_votes_cast() {
        let mut offer = test_offer(10_000);
        offer.record_vote(test_address(1), VoteChoice::Yes, 500);
        offer.record_vote(test_address(2), VoteChoice::No, 499);
        assert!(offer.meets_relative_quorum(5_000));

        offer.record_vote(test_address(3), VoteChoice::No, 2);
        assert!(!offer.meets_relative_quorum(5_000));
    }

    #[test]
    fn bps_ceil_matches_wide_arithmetic() {
        assert_eq!(bps_ceil(10_000, 7_500), 7_500);
        assert_eq!(bps_ceil(10_001, 7_500), 7_501);
        assert_eq!(bps_ceil(1, 1), 1);
        assert_eq!(bps_ceil(0, 10_000), 0);
        assert_eq!(bps_ceil(3, 3_333), 1);
        // No overflow at the extreme.
        assert_eq!(bps_ceil(u128::MAX, 10_000), u128::MAX);
    }

    #[test]
    fn empty_book_has_no_offer() {
        let book = OfferBook::new();
        assert!(book.current_offer().is_none());
        assert!(book.open_offer().is_none());
        assert!(!book.was_acquired());
    }
}
