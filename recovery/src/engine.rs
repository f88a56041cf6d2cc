//! The claim-recovery engine.
//!
//! Stateless: every operation takes the claim book, the share ledger being
//! claimed against, and the collateral ledger by reference, plus the
//! caller-supplied clock. All checks run before the first balance moves, so
//! a failed operation leaves every ledger untouched.

use crate::claim::{ClaimBook, ClaimRecord, PreparedClaim};
use crate::error::ClaimError;
use crate::events::ClaimEvent;
use aequitas_crypto::commitment_hash;
use aequitas_registry::FungibleLedger;
use aequitas_types::{ClaimState, CommitmentHash, HolderAddress, Nonce, ProtocolParams, Timestamp};

/// Engine for the prepare / declare / resolve claim lifecycle.
pub struct RecoveryEngine;

impl RecoveryEngine {
    /// Register (or replace) a commitment for a future claim.
    ///
    /// Costs nothing and reveals nothing; the preclaim delay starts now.
    pub fn prepare_claim(
        &self,
        book: &mut ClaimBook,
        claimant: HolderAddress,
        commitment: CommitmentHash,
        now: Timestamp,
    ) {
        book.put_preclaim(
            claimant.clone(),
            PreparedClaim {
                commitment,
                prepared_at: now,
            },
        );
        book.push_event(ClaimEvent::ClaimPrepared {
            claimer: claimant,
            commitment,
        });
    }

    /// Reveal a commitment and open a collateralized claim on `lost_holder`.
    ///
    /// The collateral is `balance_of(lost_holder) * collateral_rate`, pulled
    /// from the claimant's prior approval to the ledger custodian on the
    /// collateral ledger.
    #[allow(clippy::too_many_arguments)]
    pub fn declare_lost<S, C>(
        &self,
        book: &mut ClaimBook,
        shares: &S,
        collateral: &mut C,
        params: &ProtocolParams,
        custodian: &HolderAddress,
        claimant: &HolderAddress,
        lost_holder: &HolderAddress,
        nonce: &Nonce,
        now: Timestamp,
    ) -> Result<(), ClaimError>
    where
        S: FungibleLedger,
        C: FungibleLedger,
    {
        let prepared = book
            .preclaim(claimant)
            .ok_or(ClaimError::InvalidReveal)?
            .clone();
        let expected = commitment_hash(nonce, claimant, lost_holder);
        if prepared.commitment != expected {
            return Err(ClaimError::InvalidReveal);
        }
        if !prepared
            .prepared_at
            .has_expired(params.pre_claim_period_secs, now)
        {
            return Err(ClaimError::TooEarly {
                remaining_secs: prepared
                    .prepared_at
                    .remaining(params.pre_claim_period_secs, now),
            });
        }
        if claimant == lost_holder {
            return Err(ClaimError::SelfClaim);
        }
        if let Some(existing) = book.record(lost_holder) {
            if existing.state == ClaimState::Declared {
                return Err(ClaimError::ClaimAlreadyDeclared(lost_holder.to_string()));
            }
        }
        let lost_balance = shares.balance_of(lost_holder);
        if lost_balance == 0 {
            return Err(ClaimError::NothingToClaim(lost_holder.to_string()));
        }
        let collateral_amount = lost_balance
            .checked_mul(params.collateral_rate)
            .ok_or(ClaimError::Ledger(
                aequitas_registry::LedgerError::AmountOverflow,
            ))?;

        // Last fallible step: pull collateral into the custodian's custody.
        collateral.transfer_from(custodian, claimant, custodian, collateral_amount)?;

        book.take_preclaim(claimant);
        book.put_record(ClaimRecord {
            claimant: claimant.clone(),
            lost_holder: lost_holder.clone(),
            commitment: prepared.commitment,
            prepared_at: prepared.prepared_at,
            declared_at: now,
            declared_balance: lost_balance,
            collateral: collateral_amount,
            state: ClaimState::Declared,
        });
        book.push_event(ClaimEvent::ClaimMade {
            claimant: claimant.clone(),
            lost_address: lost_holder.clone(),
            balance: lost_balance,
        });
        Ok(())
    }

    /// Close a declared claim after the claim period: transfer the lost
    /// address's current balance to the claimant and return the collateral.
    ///
    /// Callable by anyone; the payout always goes to the recorded claimant.
    pub fn resolve_claim<S, C>(
        &self,
        book: &mut ClaimBook,
        shares: &mut S,
        collateral: &mut C,
        params: &ProtocolParams,
        custodian: &HolderAddress,
        lost_holder: &HolderAddress,
        now: Timestamp,
    ) -> Result<(), ClaimError>
    where
        S: FungibleLedger,
        C: FungibleLedger,
    {
        let record = match book.record(lost_holder) {
            Some(r) if r.state == ClaimState::Declared => r.clone(),
            _ => return Err(ClaimError::NoActiveClaim(lost_holder.to_string())),
        };
        if !record
            .declared_at
            .has_expired(params.claim_period_secs, now)
        {
            return Err(ClaimError::TooEarly {
                remaining_secs: record.declared_at.remaining(params.claim_period_secs, now),
            });
        }

        // Refund first: it is the only transfer here that could fail, and it
        // fails before anything has moved.
        collateral.transfer(custodian, &record.claimant, record.collateral)?;
        // Cannot fail: the amount is exactly the current balance.
        let current_balance = shares.balance_of(lost_holder);
        shares.transfer(lost_holder, &record.claimant, current_balance)?;

        if let Some(stored) = book.record_mut(lost_holder) {
            stored.state = ClaimState::Resolved;
        }
        book.push_event(ClaimEvent::ClaimResolved {
            claimant: record.claimant,
            lost_address: lost_holder.clone(),
            collateral: record.collateral,
        });
        Ok(())
    }
}
