//! State enums for claims, acquisition offers, and votes.

use serde::{Deserialize, Serialize};

/// The lifecycle state of a claim, as seen for a `(claimant, lost holder)` pair.
///
/// Stored claim records only ever carry `Declared` or `Resolved`; `None` and
/// `Prepared` describe the commitment phase before any record exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimState {
    /// No commitment and no claim on record.
    None,
    /// A commitment is registered; the preclaim delay is running.
    Prepared,
    /// The claim is declared and collateralized; the dispute window is running.
    Declared,
    /// The claim was resolved and the lost balance transferred.
    Resolved,
}

impl ClaimState {
    /// Whether collateral is currently locked for this claim.
    pub fn is_collateralized(&self) -> bool {
        matches!(self, Self::Declared)
    }

    /// Whether this state admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}

/// The lifecycle state of an acquisition offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfferState {
    /// Votes are being collected; completion may be attempted.
    Open,
    /// Quorum was reached and the forced buyout executed. Terminal.
    Completed,
    /// The offer was withdrawn before completion. Terminal.
    Cancelled,
}

impl OfferState {
    /// Whether votes are still accepted.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Whether this state admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// A holder's position on an open acquisition offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteChoice {
    Yes,
    No,
}
