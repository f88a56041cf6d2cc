//! The composed share ledger.

use crate::error::SharesError;
use aequitas_acquisition::{AcquisitionEngine, AcquisitionEvent, OfferBook, OfferId};
use aequitas_recovery::{ClaimBook, ClaimEvent, RecoveryEngine};
use aequitas_registry::{FungibleLedger, LedgerError, TokenRegistry};
use aequitas_types::{
    ClaimState, CommitmentHash, HolderAddress, Nonce, OfferState, ProtocolParams, Timestamp,
    VoteChoice,
};
use serde::{Deserialize, Serialize};

const SHARES_LEDGER_META_KEY: &str = "shares_ledger_state";

/// One share registry together with the claim book and offer book that
/// govern it.
///
/// The ledger's own `address` acts as custodian: claim collateral and
/// buyout payments flow through allowances granted to it on the injected
/// collateral ledger, and wrapped base shares sit on it. Collateral ledgers
/// are passed per call, so one currency registry can back any number of
/// share ledgers, but a given claim or offer must see the same collateral
/// ledger at every step of its lifecycle.
pub struct SharesLedger {
    pub recovery: RecoveryEngine,
    pub acquisition: AcquisitionEngine,
    address: HolderAddress,
    params: ProtocolParams,
    registry: TokenRegistry,
    claims: ClaimBook,
    offers: OfferBook,
}

impl SharesLedger {
    pub fn new(address: HolderAddress, params: ProtocolParams) -> Self {
        Self {
            recovery: RecoveryEngine,
            acquisition: AcquisitionEngine,
            address,
            params,
            registry: TokenRegistry::new(),
            claims: ClaimBook::new(),
            offers: OfferBook::new(),
        }
    }

    /// The custodian address of this ledger.
    pub fn address(&self) -> &HolderAddress {
        &self.address
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    /// Read access to the claim book.
    pub fn claims(&self) -> &ClaimBook {
        &self.claims
    }

    /// Read access to the offer book.
    pub fn offers(&self) -> &OfferBook {
        &self.offers
    }

    // ── Registry surface ────────────────────────────────────────────────

    pub fn balance_of(&self, holder: &HolderAddress) -> u128 {
        self.registry.balance_of(holder)
    }

    pub fn total_outstanding(&self) -> u128 {
        self.registry.total_outstanding()
    }

    pub fn holders(&self) -> Vec<(HolderAddress, u128)> {
        self.registry.holders()
    }

    pub fn allowance(&self, owner: &HolderAddress, spender: &HolderAddress) -> u128 {
        self.registry.allowance(owner, spender)
    }

    pub fn approve(&mut self, owner: &HolderAddress, spender: &HolderAddress, amount: u128) {
        self.registry.approve(owner, spender, amount);
    }

    /// Issue new shares. Refused while an offer is open, since the quorum
    /// denominators are snapshotted at initiation, and forever after a
    /// buyout.
    pub fn mint(&mut self, to: &HolderAddress, amount: u128) -> Result<(), SharesError> {
        if self.issuance_frozen() {
            return Err(SharesError::IssuanceFrozen);
        }
        self.registry.mint(to, amount)?;
        tracing::debug!(ledger = %self.address, to = %to, amount, "shares minted");
        Ok(())
    }

    fn issuance_frozen(&self) -> bool {
        self.offers.current_offer().map_or(false, |offer| {
            matches!(offer.state, OfferState::Open | OfferState::Completed)
        })
    }

    /// Move shares and mirror the moved weight into any open offer.
    pub fn transfer(
        &mut self,
        from: &HolderAddress,
        to: &HolderAddress,
        amount: u128,
    ) -> Result<(), SharesError> {
        self.registry.transfer(from, to, amount)?;
        self.acquisition
            .migrate_votes(&mut self.offers, from, to, amount);
        tracing::debug!(ledger = %self.address, from = %from, to = %to, amount, "shares transferred");
        Ok(())
    }

    /// Allowance-gated transfer with the same vote mirroring as [`transfer`].
    ///
    /// [`transfer`]: SharesLedger::transfer
    pub fn transfer_from(
        &mut self,
        spender: &HolderAddress,
        owner: &HolderAddress,
        to: &HolderAddress,
        amount: u128,
    ) -> Result<(), SharesError> {
        self.registry.transfer_from(spender, owner, to, amount)?;
        self.acquisition
            .migrate_votes(&mut self.offers, owner, to, amount);
        tracing::debug!(ledger = %self.address, owner = %owner, to = %to, amount, "shares pulled by allowance");
        Ok(())
    }

    /// Move `amount` of `base` shares from `caller` into the wrapper's
    /// custody and mint the same amount of wrapper shares to `beneficiary`.
    ///
    /// As long as a wrapper ledger is only ever issued through this path,
    /// its outstanding total equals the base shares its address holds.
    pub fn wrap_into(
        base: &mut SharesLedger,
        wrapper: &mut SharesLedger,
        caller: &HolderAddress,
        beneficiary: &HolderAddress,
        amount: u128,
    ) -> Result<(), SharesError> {
        if wrapper.issuance_frozen() {
            return Err(SharesError::IssuanceFrozen);
        }
        if wrapper
            .registry
            .total_outstanding()
            .checked_add(amount)
            .is_none()
        {
            return Err(SharesError::Ledger(LedgerError::AmountOverflow));
        }
        // The custody transfer is the last fallible step; the mint below
        // cannot overflow once the precheck passed.
        base.transfer(caller, &wrapper.address, amount)?;
        wrapper.registry.mint(beneficiary, amount)?;
        tracing::info!(
            base = %base.address,
            wrapper = %wrapper.address,
            beneficiary = %beneficiary,
            amount,
            "base shares wrapped"
        );
        Ok(())
    }

    // ── Claim recovery ──────────────────────────────────────────────────

    /// Register (or replace) a commitment for a future claim.
    pub fn prepare_claim(
        &mut self,
        claimant: &HolderAddress,
        commitment: CommitmentHash,
        now: Timestamp,
    ) {
        self.recovery
            .prepare_claim(&mut self.claims, claimant.clone(), commitment, now);
        tracing::debug!(ledger = %self.address, claimant = %claimant, commitment = %commitment, "claim prepared");
    }

    /// Reveal a commitment and open a collateralized claim on `lost_holder`.
    pub fn declare_lost<C>(
        &mut self,
        collateral: &mut C,
        claimant: &HolderAddress,
        lost_holder: &HolderAddress,
        nonce: &Nonce,
        now: Timestamp,
    ) -> Result<(), SharesError>
    where
        C: FungibleLedger,
    {
        self.recovery.declare_lost(
            &mut self.claims,
            &self.registry,
            collateral,
            &self.params,
            &self.address,
            claimant,
            lost_holder,
            nonce,
            now,
        )?;
        tracing::info!(ledger = %self.address, claimant = %claimant, lost = %lost_holder, "claim declared");
        Ok(())
    }

    /// Close a declared claim: the lost address's current balance goes to
    /// the claimant and the collateral returns.
    pub fn resolve_claim<C>(
        &mut self,
        collateral: &mut C,
        lost_holder: &HolderAddress,
        now: Timestamp,
    ) -> Result<(), SharesError>
    where
        C: FungibleLedger,
    {
        let claimant = self.claims.record(lost_holder).map(|r| r.claimant.clone());
        let recovered = self.registry.balance_of(lost_holder);
        self.recovery.resolve_claim(
            &mut self.claims,
            &mut self.registry,
            collateral,
            &self.params,
            &self.address,
            lost_holder,
            now,
        )?;
        // The recovered balance left the lost address; mirror it into any
        // open offer so the tallies keep tracking real share positions.
        if let Some(claimant) = claimant {
            self.acquisition
                .migrate_votes(&mut self.offers, lost_holder, &claimant, recovered);
        }
        tracing::info!(ledger = %self.address, lost = %lost_holder, recovered, "claim resolved");
        Ok(())
    }

    /// The claim state for a `(claimant, lost holder)` pair.
    pub fn claim_state(&self, claimant: &HolderAddress, lost_holder: &HolderAddress) -> ClaimState {
        self.claims.state_for(claimant, lost_holder)
    }

    // ── Acquisition ─────────────────────────────────────────────────────

    /// Open a funded offer to buy out every share on this ledger.
    pub fn initiate_acquisition<C>(
        &mut self,
        collateral: &C,
        acquirer: &HolderAddress,
        price_per_share: u128,
        now: Timestamp,
    ) -> Result<OfferId, SharesError>
    where
        C: FungibleLedger,
    {
        let offer = self.acquisition.initiate(
            &mut self.offers,
            &self.registry,
            collateral,
            &self.address,
            acquirer,
            price_per_share,
            now,
        )?;
        tracing::info!(ledger = %self.address, offer, acquirer = %acquirer, price_per_share, "acquisition offer opened");
        Ok(offer)
    }

    pub fn vote_yes(&mut self, voter: &HolderAddress) -> Result<(), SharesError> {
        self.cast_vote(voter, VoteChoice::Yes)
    }

    pub fn vote_no(&mut self, voter: &HolderAddress) -> Result<(), SharesError> {
        self.cast_vote(voter, VoteChoice::No)
    }

    /// Vote on the open offer with the voter's current balance as weight.
    pub fn cast_vote(
        &mut self,
        voter: &HolderAddress,
        choice: VoteChoice,
    ) -> Result<(), SharesError> {
        self.acquisition
            .cast_vote(&mut self.offers, &self.registry, voter, choice)?;
        tracing::debug!(ledger = %self.address, voter = %voter, choice = ?choice, "acquisition vote cast");
        Ok(())
    }

    /// Whether a buyout has executed on this ledger.
    pub fn was_acquired(&self) -> bool {
        self.offers.was_acquired()
    }

    /// Execute the buyout sweep if a quorum track is satisfied.
    ///
    /// Pass the collateral ledger the offer was initiated against: the
    /// funding check at initiation holds only for that ledger.
    pub fn complete_acquisition<C>(
        &mut self,
        collateral: &mut C,
        now: Timestamp,
    ) -> Result<(), SharesError>
    where
        C: FungibleLedger,
    {
        self.acquisition.complete(
            &mut self.offers,
            &mut self.registry,
            collateral,
            &self.params,
            &self.address,
            now,
        )?;
        tracing::info!(ledger = %self.address, "acquisition completed, issuance frozen");
        Ok(())
    }

    // ── Events ──────────────────────────────────────────────────────────

    /// Drain journaled claim events for the host to process.
    pub fn drain_claim_events(&mut self) -> Vec<ClaimEvent> {
        self.claims.drain_events()
    }

    /// Drain journaled offer events for the host to process.
    pub fn drain_offer_events(&mut self) -> Vec<AcquisitionEvent> {
        self.offers.drain_events()
    }

    // ── Persistence ─────────────────────────────────────────────────────

    /// Capture the full ledger state for persistence.
    pub fn snapshot(&self) -> SharesSnapshot {
        SharesSnapshot {
            address: self.address.clone(),
            params: self.params.clone(),
            registry: self.registry.clone(),
            claims: self.claims.clone(),
            offers: self.offers.clone(),
        }
    }

    /// Rebuild a ledger from a persisted snapshot.
    pub fn restore(snapshot: SharesSnapshot) -> Self {
        Self {
            recovery: RecoveryEngine,
            acquisition: AcquisitionEngine,
            address: snapshot.address,
            params: snapshot.params,
            registry: snapshot.registry,
            claims: snapshot.claims,
            offers: snapshot.offers,
        }
    }

    /// Serialize the ledger to bytes for meta-store persistence.
    pub fn save_state(&self) -> Vec<u8> {
        bincode::serialize(&self.snapshot()).unwrap_or_default()
    }

    /// Restore a ledger from serialized bytes.
    ///
    /// Corrupt bytes are an error, never an empty ledger: defaulting here
    /// would silently erase every balance.
    pub fn load_state(data: &[u8]) -> Result<Self, SharesError> {
        let snapshot = bincode::deserialize::<SharesSnapshot>(data)
            .map_err(|err| SharesError::Snapshot(err.to_string()))?;
        Ok(Self::restore(snapshot))
    }

    /// The meta-store key used for ledger persistence.
    pub fn meta_key() -> &'static str {
        SHARES_LEDGER_META_KEY
    }
}

/// Serializable snapshot of a share ledger for persistence across restarts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SharesSnapshot {
    pub address: HolderAddress,
    pub params: ProtocolParams,
    pub registry: TokenRegistry,
    pub claims: ClaimBook,
    pub offers: OfferBook,
}

#[cfg(test)]
mod tests {
    use super::*;
    use aequitas_acquisition::OfferError;
    use aequitas_crypto::{commitment_hash, generate_nonce};

    fn test_address(n: u8) -> HolderAddress {
        HolderAddress::new(format!("aeq_{:0>60}", n))
    }

    fn test_params() -> ProtocolParams {
        ProtocolParams {
            collateral_rate: 2,
            pre_claim_period_secs: 100,
            claim_period_secs: 1_000,
            acquisition_min_duration_secs: 1_000,
            ..ProtocolParams::registry_defaults()
        }
    }

    fn setup() -> SharesLedger {
        let mut ledger = SharesLedger::new(test_address(200), test_params());
        ledger.mint(&test_address(1), 5_000).unwrap();
        ledger.mint(&test_address(2), 3_000).unwrap();
        ledger.mint(&test_address(3), 2_000).unwrap();
        ledger
    }

    fn money_for(owner: &HolderAddress, custodian: &HolderAddress, amount: u128) -> TokenRegistry {
        let mut money = TokenRegistry::new();
        money.mint(owner, amount).unwrap();
        money.approve(owner, custodian, amount);
        money
    }

    /// Run a full buyout on the ledger: holder 1 acquires at price 1.
    fn acquire(ledger: &mut SharesLedger, money: &mut TokenRegistry) {
        let acquirer = test_address(1);
        ledger
            .initiate_acquisition(money, &acquirer, 1, Timestamp::new(0))
            .unwrap();
        ledger.vote_yes(&test_address(1)).unwrap();
        ledger.vote_yes(&test_address(2)).unwrap();
        ledger.complete_acquisition(money, Timestamp::new(1)).unwrap();
    }

    #[test]
    fn completed_acquisition_freezes_issuance() {
        let mut ledger = setup();
        let mut money = money_for(&test_address(1), ledger.address(), 10_000);

        acquire(&mut ledger, &mut money);
        assert!(ledger.was_acquired());

        let minted = ledger.mint(&test_address(4), 100);
        assert!(matches!(minted, Err(SharesError::IssuanceFrozen)));

        // Wrapping into a frozen ledger is issuance too.
        let mut base = SharesLedger::new(test_address(201), test_params());
        base.mint(&test_address(4), 100).unwrap();
        let wrapped =
            SharesLedger::wrap_into(&mut base, &mut ledger, &test_address(4), &test_address(4), 50);
        assert!(matches!(wrapped, Err(SharesError::IssuanceFrozen)));
    }

    #[test]
    fn open_offer_freezes_issuance_to_protect_the_tallies() {
        let mut ledger = setup();
        let money = money_for(&test_address(1), &test_address(200), 10_000);

        ledger
            .initiate_acquisition(&money, &test_address(1), 1, Timestamp::new(0))
            .unwrap();

        let minted = ledger.mint(&test_address(4), 100);
        assert!(matches!(minted, Err(SharesError::IssuanceFrozen)));
        assert_eq!(ledger.total_outstanding(), 10_000);
    }

    #[test]
    fn fresh_ledger_cannot_be_acquired_before_first_issue() {
        let mut ledger = SharesLedger::new(test_address(200), test_params());
        let mut money = TokenRegistry::new();

        // Nothing outstanding, nothing approved: an offer that would cost
        // zero and complete with zero votes must not open at all.
        let attempt =
            ledger.initiate_acquisition(&money, &test_address(1), 1_000, Timestamp::new(0));
        assert!(matches!(
            attempt,
            Err(SharesError::Offer(OfferError::NothingToAcquire))
        ));
        assert!(!ledger.was_acquired());

        let completion = ledger.complete_acquisition(&mut money, Timestamp::new(1));
        assert!(matches!(
            completion,
            Err(SharesError::Offer(OfferError::NoActiveOffer))
        ));

        // The ledger still works: issuance and a funded offer proceed.
        ledger.mint(&test_address(1), 5_000).unwrap();
        let money = money_for(&test_address(1), &test_address(200), 5_000);
        ledger
            .initiate_acquisition(&money, &test_address(1), 1, Timestamp::new(10))
            .unwrap();
    }

    #[test]
    fn transfer_mirrors_weight_into_open_offer() {
        let mut ledger = setup();
        let money = money_for(&test_address(1), &test_address(200), 10_000);

        ledger
            .initiate_acquisition(&money, &test_address(1), 1, Timestamp::new(0))
            .unwrap();
        ledger.vote_yes(&test_address(2)).unwrap();

        ledger
            .transfer(&test_address(2), &test_address(3), 1_000)
            .unwrap();

        let offer = ledger.offers().current_offer().unwrap();
        assert_eq!(offer.yes_votes, 2_000);
        assert_eq!(offer.no_votes, 0);
    }

    #[test]
    fn wrap_keeps_custody_equal_to_wrapped_supply() {
        let mut base = setup();
        let mut wrapper = SharesLedger::new(test_address(210), test_params());

        SharesLedger::wrap_into(&mut base, &mut wrapper, &test_address(1), &test_address(1), 4_000)
            .unwrap();
        SharesLedger::wrap_into(&mut base, &mut wrapper, &test_address(2), &test_address(2), 1_500)
            .unwrap();

        assert_eq!(wrapper.total_outstanding(), 5_500);
        assert_eq!(base.balance_of(wrapper.address()), 5_500);
        assert_eq!(wrapper.balance_of(&test_address(1)), 4_000);
        assert_eq!(base.balance_of(&test_address(1)), 1_000);
    }

    #[test]
    fn wrap_rejects_more_than_the_caller_holds() {
        let mut base = setup();
        let mut wrapper = SharesLedger::new(test_address(210), test_params());

        let result = SharesLedger::wrap_into(
            &mut base,
            &mut wrapper,
            &test_address(3),
            &test_address(3),
            2_001,
        );

        assert!(matches!(
            result,
            Err(SharesError::Ledger(LedgerError::InsufficientBalance { .. }))
        ));
        assert_eq!(wrapper.total_outstanding(), 0);
        assert_eq!(base.balance_of(&test_address(3)), 2_000);
    }

    #[test]
    fn claim_cycle_runs_through_the_ledger_surface() {
        let mut ledger = setup();
        let claimant = test_address(7);
        let lost = test_address(3);
        let mut money = money_for(&claimant, &test_address(200), 10_000);

        let nonce = generate_nonce();
        let commitment = commitment_hash(&nonce, &claimant, &lost);
        ledger.prepare_claim(&claimant, commitment, Timestamp::new(0));
        assert_eq!(ledger.claim_state(&claimant, &lost), ClaimState::Prepared);

        ledger
            .declare_lost(&mut money, &claimant, &lost, &nonce, Timestamp::new(100))
            .unwrap();
        assert_eq!(ledger.claim_state(&claimant, &lost), ClaimState::Declared);
        // Collateral is 2_000 * rate 2.
        assert_eq!(money.balance_of(&test_address(200)), 4_000);

        ledger
            .resolve_claim(&mut money, &lost, Timestamp::new(1_100))
            .unwrap();
        assert_eq!(ledger.claim_state(&claimant, &lost), ClaimState::Resolved);
        assert_eq!(ledger.balance_of(&claimant), 2_000);
        assert_eq!(ledger.balance_of(&lost), 0);
        assert_eq!(money.balance_of(&claimant), 10_000);
    }

    #[test]
    fn resolution_shrinks_a_lost_voters_tally() {
        let mut ledger = setup();
        let claimant = test_address(7);
        let lost = test_address(3);
        let mut money = money_for(&claimant, &test_address(200), 10_000);

        let nonce = generate_nonce();
        ledger.prepare_claim(&claimant, commitment_hash(&nonce, &claimant, &lost), Timestamp::new(0));
        ledger
            .declare_lost(&mut money, &claimant, &lost, &nonce, Timestamp::new(100))
            .unwrap();

        let acquirer_money = money_for(&test_address(1), &test_address(200), 20_000);
        ledger
            .initiate_acquisition(&acquirer_money, &test_address(1), 1, Timestamp::new(200))
            .unwrap();
        // The lost wallet's old key votes yes before resolution.
        ledger.vote_yes(&lost).unwrap();
        assert_eq!(ledger.offers().current_offer().unwrap().yes_votes, 2_000);

        ledger
            .resolve_claim(&mut money, &lost, Timestamp::new(1_100))
            .unwrap();

        // The claimant has not voted, so the recovered weight leaves the
        // tally entirely.
        assert_eq!(ledger.offers().current_offer().unwrap().yes_votes, 0);
    }

    #[test]
    fn snapshot_round_trips_mid_lifecycle() {
        let mut ledger = setup();
        let money = money_for(&test_address(1), &test_address(200), 10_000);
        ledger
            .initiate_acquisition(&money, &test_address(1), 1, Timestamp::new(0))
            .unwrap();
        ledger.vote_yes(&test_address(2)).unwrap();

        let bytes = ledger.save_state();
        let restored = SharesLedger::load_state(&bytes).unwrap();

        assert_eq!(restored.address(), ledger.address());
        assert_eq!(restored.params(), ledger.params());
        assert_eq!(restored.balance_of(&test_address(1)), 5_000);
        assert_eq!(restored.total_outstanding(), 10_000);
        let offer = restored.offers().current_offer().unwrap();
        assert_eq!(offer.yes_votes, 3_000);
        assert!(!restored.was_acquired());
    }

    #[test]
    fn corrupt_snapshot_is_an_error_not_an_empty_ledger() {
        let result = SharesLedger::load_state(&[0xff, 0x01, 0x02]);
        assert!(matches!(result, Err(SharesError::Snapshot(_))));
    }

    #[test]
    fn event_journals_drain_independently() {
        let mut ledger = setup();
        let money = money_for(&test_address(1), &test_address(200), 10_000);

        ledger.prepare_claim(&test_address(7), CommitmentHash::new([9u8; 32]), Timestamp::new(0));
        ledger
            .initiate_acquisition(&money, &test_address(1), 1, Timestamp::new(0))
            .unwrap();

        assert_eq!(ledger.drain_claim_events().len(), 1);
        assert_eq!(ledger.drain_offer_events().len(), 1);
        assert!(ledger.drain_claim_events().is_empty());
        assert!(ledger.drain_offer_events().is_empty());
    }
}
