//! The acquisition engine.
//!
//! Stateless: every operation takes the offer book, the share ledger under
//! offer, and the collateral (payment) ledger by reference, plus the
//! caller-supplied clock. Completion plans the full sweep and verifies the
//! acquirer's funding before moving anything, so a failure never leaves a
//! half-executed buyout.

use crate::error::OfferError;
use crate::events::AcquisitionEvent;
use crate::offer::{AcquisitionOffer, OfferBook, OfferId};
use aequitas_registry::{FungibleLedger, LedgerError};
use aequitas_types::{HolderAddress, OfferState, ProtocolParams, Timestamp, VoteChoice};

/// Engine for the initiate / vote / complete drag-along lifecycle.
pub struct AcquisitionEngine;

impl AcquisitionEngine {
    /// Open a funded offer to buy out the whole ledger at `price_per_share`.
    ///
    /// The acquirer must hold, and have approved to the ledger custodian,
    /// enough collateral currency to pay for every outstanding share. A
    /// ledger with nothing outstanding cannot be put under offer. A
    /// completed offer blocks the ledger forever; a cancelled one frees the
    /// slot.
    #[allow(clippy::too_many_arguments)]
    pub fn initiate<S, C>(
        &self,
        book: &mut OfferBook,
        shares: &S,
        collateral: &C,
        custodian: &HolderAddress,
        acquirer: &HolderAddress,
        price_per_share: u128,
        now: Timestamp,
    ) -> Result<OfferId, OfferError>
    where
        S: FungibleLedger,
        C: FungibleLedger,
    {
        match book.current_offer() {
            Some(offer) if offer.state.is_open() => return Err(OfferError::OfferAlreadyOpen),
            Some(offer) if offer.state == OfferState::Completed => {
                return Err(OfferError::AlreadyAcquired)
            }
            _ => {}
        }

        let outstanding = shares.total_outstanding();
        // An empty ledger would satisfy the absolute quorum with zero votes.
        if outstanding == 0 {
            return Err(OfferError::NothingToAcquire);
        }
        let required = price_per_share
            .checked_mul(outstanding)
            .ok_or(OfferError::Ledger(LedgerError::AmountOverflow))?;
        let approved = collateral.allowance(acquirer, custodian);
        if approved < required {
            return Err(OfferError::Ledger(LedgerError::InsufficientAllowance {
                needed: required,
                approved,
            }));
        }
        let available = collateral.balance_of(acquirer);
        if available < required {
            return Err(OfferError::Ledger(LedgerError::InsufficientBalance {
                needed: required,
                available,
            }));
        }

        let id = book.allocate_id();
        book.put_offer(AcquisitionOffer::new(
            id,
            acquirer.clone(),
            price_per_share,
            outstanding,
            now,
        ));
        book.push_event(AcquisitionEvent::Initiated {
            offer: id,
            acquirer: acquirer.clone(),
            price_per_share,
        });
        Ok(id)
    }

    /// Vote on the open offer with the voter's current balance as weight.
    ///
    /// Re-voting is allowed and atomic: the recorded weight leaves the old
    /// tally and the current balance lands on the new one.
    pub fn cast_vote<S>(
        &self,
        book: &mut OfferBook,
        shares: &S,
        voter: &HolderAddress,
        choice: VoteChoice,
    ) -> Result<(), OfferError>
    where
        S: FungibleLedger,
    {
        let weight = shares.balance_of(voter);
        let offer = book.open_offer_mut().ok_or(OfferError::NoActiveOffer)?;
        offer.record_vote(voter.clone(), choice, weight);

        let event = AcquisitionEvent::VoteCast {
            offer: offer.id,
            voter: voter.clone(),
            choice,
            yes_votes: offer.yes_votes,
            no_votes: offer.no_votes,
        };
        book.push_event(event);
        Ok(())
    }

    /// Whether the drag-along ever executed on this ledger.
    pub fn was_acquired(&self, book: &OfferBook) -> bool {
        book.was_acquired()
    }

    /// Mirror a share transfer into the open offer's tallies.
    ///
    /// The moved weight leaves the sender's recorded vote; a receiver who
    /// has voted absorbs the full amount on their side. The ledger calls
    /// this on every transfer while an offer is open, so tallies always
    /// reflect who can still back their vote with shares.
    pub fn migrate_votes(
        &self,
        book: &mut OfferBook,
        from: &HolderAddress,
        to: &HolderAddress,
        amount: u128,
    ) {
        if let Some(offer) = book.open_offer_mut() {
            offer.migrate_votes(from, to, amount);
        }
    }

    /// Execute the forced buyout if either quorum track is satisfied.
    ///
    /// `collateral` must be the same ledger the offer was initiated against;
    /// the funding check at initiation holds only there. Sweep order is the
    /// ledger's deterministic holder order. Every holder except the acquirer
    /// loses their shares and receives `balance * price_per_share` from the
    /// acquirer's approved funds.
    pub fn complete<S, C>(
        &self,
        book: &mut OfferBook,
        shares: &mut S,
        collateral: &mut C,
        params: &ProtocolParams,
        custodian: &HolderAddress,
        now: Timestamp,
    ) -> Result<(), OfferError>
    where
        S: FungibleLedger,
        C: FungibleLedger,
    {
        let offer = book.open_offer().ok_or(OfferError::NoActiveOffer)?;

        let absolute = offer.meets_absolute_quorum(params.absolute_quorum_bps);
        let relative = offer
            .created_at
            .has_expired(params.acquisition_min_duration_secs, now)
            && offer.meets_relative_quorum(params.relative_quorum_bps);
        if !absolute && !relative {
            return Err(OfferError::QuorumNotMet {
                yes_votes: offer.yes_votes,
                votes_cast: offer.votes_cast(),
                outstanding: offer.outstanding_at_creation,
            });
        }

        let acquirer = offer.acquirer.clone();
        let price = offer.price_per_share;

        // Plan the entire sweep before touching a balance.
        let mut payments: Vec<(HolderAddress, u128, u128)> = Vec::new();
        let mut total_payment: u128 = 0;
        for (holder, balance) in shares.holders() {
            if holder == acquirer {
                continue;
            }
            let payment = balance
                .checked_mul(price)
                .ok_or(OfferError::Ledger(LedgerError::AmountOverflow))?;
            total_payment = total_payment
                .checked_add(payment)
                .ok_or(OfferError::Ledger(LedgerError::AmountOverflow))?;
            payments.push((holder, balance, payment));
        }
        let approved = collateral.allowance(&acquirer, custodian);
        if approved < total_payment {
            return Err(OfferError::Ledger(LedgerError::InsufficientAllowance {
                needed: total_payment,
                approved,
            }));
        }
        let available = collateral.balance_of(&acquirer);
        if available < total_payment {
            return Err(OfferError::Ledger(LedgerError::InsufficientBalance {
                needed: total_payment,
                available,
            }));
        }

        // Execute. Nothing below can fail: share amounts are the balances
        // just read, and the payments were verified against allowance and
        // balance in total.
        for (holder, balance, payment) in payments {
            shares.transfer(&holder, &acquirer, balance)?;
            collateral.transfer_from(custodian, &acquirer, &holder, payment)?;
        }

        let offer = book
            .open_offer_mut()
            .ok_or(OfferError::NoActiveOffer)?;
        offer.state = OfferState::Completed;
        let event = AcquisitionEvent::Completed {
            offer: offer.id,
            acquirer,
            price_per_share: price,
            yes_votes: offer.yes_votes,
            no_votes: offer.no_votes,
        };
        book.push_event(event);
        Ok(())
    }
}
