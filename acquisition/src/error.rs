//! Acquisition-specific errors.

use aequitas_registry::LedgerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OfferError {
    #[error("an acquisition offer is already open")]
    OfferAlreadyOpen,

    #[error("registry was already acquired")]
    AlreadyAcquired,

    #[error("ledger has no outstanding shares to acquire")]
    NothingToAcquire,

    #[error("no active acquisition offer")]
    NoActiveOffer,

    /// Neither quorum track is satisfied yet. Carries the tallies so a host
    /// can tell "wait longer" from "the offer is failing".
    #[error("quorum not met: {yes_votes} yes of {votes_cast} cast, {outstanding} outstanding")]
    QuorumNotMet {
        yes_votes: u128,
        votes_cast: u128,
        outstanding: u128,
    },

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
