//! Fungible balance ledger for the Aequitas registry.
//!
//! The claim-recovery and acquisition engines depend only on the
//! [`FungibleLedger`] trait; [`TokenRegistry`] is the in-memory
//! implementation backing every ledger instance.

pub mod error;
pub mod ledger;
pub mod token_registry;

pub use error::LedgerError;
pub use ledger::FungibleLedger;
pub use token_registry::TokenRegistry;
