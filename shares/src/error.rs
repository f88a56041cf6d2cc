use thiserror::Error;

#[derive(Debug, Error)]
pub enum SharesError {
    #[error("issuance is frozen while an offer is open or after a buyout")]
    IssuanceFrozen,

    #[error("claim error: {0}")]
    Claim(#[from] aequitas_recovery::ClaimError),

    #[error("offer error: {0}")]
    Offer(#[from] aequitas_acquisition::OfferError),

    #[error("ledger error: {0}")]
    Ledger(#[from] aequitas_registry::LedgerError),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}
