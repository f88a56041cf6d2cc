//! Composed share ledger.
//!
//! [`SharesLedger`] owns one registry of share balances together with the
//! claim book and offer book that govern it, and routes every operation
//! through the matching engine. Collateral ledgers are injected per call,
//! so one currency registry can back claims and buyouts on any number of
//! share ledgers.
//!
//! Wrapped ledgers are built with [`SharesLedger::wrap_into`]: base shares
//! move into the wrapper's custody address and the wrapper mints matching
//! balances, so a wrapper's outstanding total equals the base shares its
//! address holds.

mod error;
mod ledger;

pub use error::SharesError;
pub use ledger::{SharesLedger, SharesSnapshot};

// Hosts consume engine-level events and identifiers through this crate.
pub use aequitas_acquisition::{AcquisitionEvent, OfferId};
pub use aequitas_recovery::ClaimEvent;
