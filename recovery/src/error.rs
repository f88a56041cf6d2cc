//! Claim-recovery errors.

use aequitas_registry::LedgerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaimError {
    /// The revealed nonce does not reproduce any commitment registered by
    /// this claimant. Deliberately silent about which part mismatched.
    #[error("reveal does not match any registered commitment")]
    InvalidReveal,

    #[error("time lock still active: {remaining_secs}s remaining")]
    TooEarly { remaining_secs: u64 },

    #[error("no active claim for holder {0}")]
    NoActiveClaim(String),

    #[error("cannot claim against your own address")]
    SelfClaim,

    #[error("holder {0} has no balance to claim")]
    NothingToClaim(String),

    #[error("holder {0} already has a declared claim")]
    ClaimAlreadyDeclared(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
